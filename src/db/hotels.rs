use sqlx::{Executor, Sqlite};

use crate::db::like_pattern;
use crate::models::hotel::{CreateHotel, Hotel, DEFAULT_PHOTO};

pub async fn search<'e, E>(executor: E, term: Option<&str>) -> Result<Vec<Hotel>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    match term.map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => {
            let pattern = like_pattern(term);
            sqlx::query_as::<_, Hotel>(
                r#"
                SELECT * FROM hotels
                WHERE name LIKE ?1 ESCAPE '\' OR city LIKE ?1 ESCAPE '\'
                ORDER BY id
                "#,
            )
            .bind(pattern)
            .fetch_all(executor)
            .await
        }
        None => {
            sqlx::query_as::<_, Hotel>("SELECT * FROM hotels ORDER BY id")
                .fetch_all(executor)
                .await
        }
    }
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Hotel>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Hotel>("SELECT * FROM hotels WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn insert<'e, E>(executor: E, hotel: &CreateHotel) -> Result<Hotel, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Hotel>(
        r#"
        INSERT INTO hotels (name, description, address, city, rating, photo)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&hotel.name)
    .bind(&hotel.description)
    .bind(&hotel.address)
    .bind(&hotel.city)
    .bind(hotel.rating)
    .bind(hotel.photo.as_deref().unwrap_or(DEFAULT_PHOTO))
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E>(executor: E, hotel: &Hotel) -> Result<Hotel, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Hotel>(
        r#"
        UPDATE hotels
        SET name = ?, description = ?, address = ?, city = ?, rating = ?, photo = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&hotel.name)
    .bind(&hotel.description)
    .bind(&hotel.address)
    .bind(&hotel.city)
    .bind(hotel.rating)
    .bind(&hotel.photo)
    .bind(hotel.id)
    .fetch_one(executor)
    .await
}

/// Returns `false` when no hotel had that id. Rooms and bookings cascade.
pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM hotels WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
