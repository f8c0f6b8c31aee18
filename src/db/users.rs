use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::models::user::{Role, User};

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? COLLATE NOCASE")
        .bind(email)
        .fetch_optional(executor)
        .await
}

/// Inserts a user; the very first account gets [`Role::Admin`].
pub async fn insert<'e, E>(
    executor: E,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, role, created_at)
        VALUES (
            ?, ?, ?,
            CASE WHEN EXISTS (SELECT 1 FROM users) THEN ? ELSE ? END,
            ?
        )
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(email.to_lowercase())
    .bind(password_hash)
    .bind(Role::User)
    .bind(Role::Admin)
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}

pub fn is_duplicate_email(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}
