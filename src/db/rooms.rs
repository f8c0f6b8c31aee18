use sqlx::{Executor, Sqlite};

use crate::models::room::{CreateRoom, HotelSummary, Room};

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Room>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_hotel<'e, E>(executor: E, hotel_id: i64) -> Result<Vec<Room>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE hotel_id = ? ORDER BY id")
        .bind(hotel_id)
        .fetch_all(executor)
        .await
}

pub async fn hotel_summary<'e, E>(executor: E, hotel_id: i64) -> Result<Option<HotelSummary>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, HotelSummary>("SELECT id, name, description FROM hotels WHERE id = ?")
        .bind(hotel_id)
        .fetch_optional(executor)
        .await
}

pub async fn insert<'e, E>(executor: E, hotel_id: i64, room: &CreateRoom) -> Result<Room, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Room>(
        r#"
        INSERT INTO rooms (hotel_id, room_number, room_type, price, is_available)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(hotel_id)
    .bind(&room.room_number)
    .bind(room.room_type)
    .bind(room.price)
    .bind(room.is_available.unwrap_or(true))
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E>(executor: E, room: &Room) -> Result<Room, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Room>(
        r#"
        UPDATE rooms
        SET room_number = ?, room_type = ?, price = ?, is_available = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&room.room_number)
    .bind(room.room_type)
    .bind(room.price)
    .bind(room.is_available)
    .bind(room.id)
    .fetch_one(executor)
    .await
}

/// Returns `false` when no room had that id. Its bookings cascade.
pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
