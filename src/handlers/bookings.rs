use actix_web::{web, HttpResponse};
use sqlx::{SqliteConnection, SqlitePool};

use crate::auth::{AdminIdentity, Identity};
use crate::availability::{evaluate_booking, StayRange};
use crate::db::{self, RoomLocks, WriteTransaction};
use crate::error::ApiError;
use crate::handlers::{ApiResponse, Empty};
use crate::models::booking::{Booking, CreateBooking, NewBooking};

pub async fn create_booking(
    pool: web::Data<SqlitePool>,
    locks: web::Data<RoomLocks>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<CreateBooking>,
) -> Result<HttpResponse, ApiError> {
    let room_id = path.into_inner();

    // Check, price and insert as one step per room.
    let _guard = locks.acquire(room_id).await;
    let mut tx = WriteTransaction::begin(pool.get_ref()).await?;

    let room = db::rooms::find_by_id(&mut *tx, room_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room", room_id))?;
    let stay = StayRange::new(body.check_in_date, body.check_out_date)?;
    if !room.is_available {
        return Err(ApiError::Validation(format!(
            "Room {} is not available for booking",
            room.room_number
        )));
    }

    let existing = db::bookings::find_by_room(&mut *tx, room_id).await?;
    let quote = match evaluate_booking(room_id, &existing, &stay, room.price) {
        Ok(quote) => quote,
        Err(conflict) => {
            log::debug!("room {room_id} blocked by booking {}", conflict.booking_id);
            return Err(conflict.into());
        }
    };

    let new_booking = NewBooking {
        hotel_id: room.hotel_id,
        room_id,
        user_id: identity.id(),
        stay,
        nightly_price: quote.nightly_price,
        total_price: quote.total_price,
    };
    let booking = match db::bookings::insert(&mut *tx, &new_booking).await {
        Ok(booking) => booking,
        Err(e) if db::bookings::is_overlap_violation(&e) => {
            return Err(conflict_from_store(&mut tx, room_id, &stay, e).await);
        }
        Err(e) => return Err(e.into()),
    };
    tx.commit().await?;

    log::info!(
        "user {} booked room {room_id} for {} night(s), total {:.2}",
        identity.id(),
        quote.nights,
        quote.total_price
    );
    Ok(HttpResponse::Created().json(ApiResponse::new(booking)))
}

/// The store refused an overlapping insert that our own check let through,
/// so another writer got there first. Report whichever booking now blocks.
async fn conflict_from_store(
    conn: &mut SqliteConnection,
    room_id: i64,
    stay: &StayRange,
    cause: sqlx::Error,
) -> ApiError {
    let existing = match db::bookings::find_by_room(&mut *conn, room_id).await {
        Ok(existing) => existing,
        Err(e) => return e.into(),
    };
    match existing.iter().find(|booking| booking.overlaps(stay)) {
        Some(blocking) => ApiError::Conflict(blocking.into()),
        None => cause.into(),
    }
}

pub async fn get_bookings(
    pool: web::Data<SqlitePool>,
    _admin: AdminIdentity,
) -> Result<HttpResponse, ApiError> {
    let bookings = db::bookings::list_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(bookings)))
}

pub async fn get_my_bookings(
    pool: web::Data<SqlitePool>,
    identity: Identity,
) -> Result<HttpResponse, ApiError> {
    let bookings = db::bookings::list_for_user(pool.get_ref(), identity.id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(bookings)))
}

async fn find_managed_booking(
    pool: &SqlitePool,
    identity: &Identity,
    id: i64,
    action: &str,
) -> Result<Booking, ApiError> {
    let booking = db::bookings::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", id))?;
    if !identity.can_manage(&booking) {
        return Err(ApiError::Forbidden(format!(
            "Not authorized to {action} this booking"
        )));
    }
    Ok(booking)
}

pub async fn get_booking(
    pool: web::Data<SqlitePool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let booking = find_managed_booking(pool.get_ref(), &identity, path.into_inner(), "view").await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(booking)))
}

pub async fn delete_booking(
    pool: web::Data<SqlitePool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    find_managed_booking(pool.get_ref(), &identity, id, "delete").await?;

    if !db::bookings::delete(pool.get_ref(), id).await? {
        return Err(ApiError::not_found("Booking", id));
    }
    log::info!("user {} deleted booking {id}", identity.id());
    Ok(HttpResponse::Ok().json(ApiResponse::new(Empty {})))
}
