use std::ops::{Deref, DerefMut};

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

/// A pooled connection inside `BEGIN IMMEDIATE`.
///
/// SQLite's write lock is taken when the transaction opens, so a
/// read-then-write sequence never has to upgrade a shared lock and other
/// writers queue on the busy timeout instead of failing with `SQLITE_BUSY`.
/// Dropping it without `commit` rolls back.
pub struct WriteTransaction {
    conn: Option<PoolConnection<Sqlite>>,
}

impl WriteTransaction {
    pub async fn begin(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(Self { conn: Some(conn) })
    }

    pub async fn commit(mut self) -> Result<(), sqlx::Error> {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = sqlx::query("COMMIT").execute(&mut *conn).await {
                rollback(conn);
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Deref for WriteTransaction {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        self.conn
            .as_deref()
            .expect("connection is held until commit or drop")
    }
}

impl DerefMut for WriteTransaction {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        self.conn
            .as_deref_mut()
            .expect("connection is held until commit or drop")
    }
}

impl Drop for WriteTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            rollback(conn);
        }
    }
}

/// The connection goes back to the pool only once the rollback has run.
fn rollback(mut conn: PoolConnection<Sqlite>) {
    actix_web::rt::spawn(async move {
        if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
            log::warn!("rollback failed, closing connection: {e}");
            let _ = conn.close().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE notes (body TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    async fn count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[actix_rt::test]
    async fn committed_writes_are_kept() {
        let pool = pool().await;
        let mut tx = WriteTransaction::begin(&pool).await.unwrap();
        sqlx::query("INSERT INTO notes (body) VALUES ('kept')")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(count(&pool).await, 1);
    }

    #[actix_rt::test]
    async fn dropped_transaction_rolls_back_and_frees_the_connection() {
        let pool = pool().await;
        {
            let mut tx = WriteTransaction::begin(&pool).await.unwrap();
            sqlx::query("INSERT INTO notes (body) VALUES ('discarded')")
                .execute(&mut *tx)
                .await
                .unwrap();
        }

        // Single connection: this only succeeds once the rollback released it.
        let tx = WriteTransaction::begin(&pool).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(count(&pool).await, 0);
    }
}
