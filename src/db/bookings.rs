use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::models::booking::{Booking, BookingListing, NewBooking};

const LISTING_SELECT: &str = r#"
    SELECT b.id, b.hotel_id, h.name AS hotel_name, h.city AS hotel_city,
           b.room_id, r.room_number, b.user_id, u.name AS user_name, u.email AS user_email,
           b.check_in_date, b.check_out_date, b.total_price
    FROM bookings b
    JOIN hotels h ON h.id = b.hotel_id
    JOIN rooms r ON r.id = b.room_id
    JOIN users u ON u.id = b.user_id
"#;

/// Message raised by the `bookings_no_overlap` trigger.
const OVERLAP_ABORT: &str = "booking_overlap";

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Booking>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Every booking of a room, in storage order, regardless of dates.
pub async fn find_by_room<'e, E>(executor: E, room_id: i64) -> Result<Vec<Booking>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE room_id = ? ORDER BY id")
        .bind(room_id)
        .fetch_all(executor)
        .await
}

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<BookingListing>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{LISTING_SELECT} ORDER BY b.check_in_date, b.id");
    sqlx::query_as::<_, BookingListing>(&sql)
        .fetch_all(executor)
        .await
}

pub async fn list_for_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<BookingListing>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{LISTING_SELECT} WHERE b.user_id = ? ORDER BY b.check_in_date, b.id");
    sqlx::query_as::<_, BookingListing>(&sql)
        .bind(user_id)
        .fetch_all(executor)
        .await
}

pub async fn insert<'e, E>(executor: E, booking: &NewBooking) -> Result<Booking, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings
            (hotel_id, room_id, user_id, check_in_date, check_out_date, nightly_price, total_price, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(booking.hotel_id)
    .bind(booking.room_id)
    .bind(booking.user_id)
    .bind(booking.stay.check_in())
    .bind(booking.stay.check_out())
    .bind(booking.nightly_price)
    .bind(booking.total_price)
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}

pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// True when an insert was aborted by the store's overlap trigger.
pub fn is_overlap_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.message().contains(OVERLAP_ABORT))
        .unwrap_or(false)
}
