use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::AdminIdentity;
use crate::db::{self, RoomLocks, WriteTransaction};
use crate::error::ApiError;
use crate::handlers::{ApiResponse, Empty};
use crate::models::room::{CreateRoom, RoomDetails, UpdateRoom};

pub async fn get_rooms(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let hotel_id = path.into_inner();
    let rooms = db::rooms::find_by_hotel(pool.get_ref(), hotel_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(rooms)))
}

pub async fn get_room(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let room = db::rooms::find_by_id(pool.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room", id))?;
    let hotel = db::rooms::hotel_summary(pool.get_ref(), room.hotel_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Hotel", room.hotel_id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(RoomDetails::new(room, hotel))))
}

pub async fn add_room(
    pool: web::Data<SqlitePool>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
    body: web::Json<CreateRoom>,
) -> Result<HttpResponse, ApiError> {
    let hotel_id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let mut tx = WriteTransaction::begin(pool.get_ref()).await?;
    if db::hotels::find_by_id(&mut *tx, hotel_id).await?.is_none() {
        return Err(ApiError::not_found("Hotel", hotel_id));
    }
    let room = db::rooms::insert(&mut *tx, hotel_id, &body).await?;
    tx.commit().await?;

    log::info!("added room {} to hotel {hotel_id}", room.id);
    Ok(HttpResponse::Created().json(ApiResponse::new(room)))
}

pub async fn update_room(
    pool: web::Data<SqlitePool>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
    body: web::Json<UpdateRoom>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let mut tx = WriteTransaction::begin(pool.get_ref()).await?;
    let room = db::rooms::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room", id))?;
    let room = db::rooms::update(&mut *tx, &body.apply(room)).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(room)))
}

pub async fn delete_room(
    pool: web::Data<SqlitePool>,
    locks: web::Data<RoomLocks>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let _guard = locks.acquire(id).await;
    if !db::rooms::delete(pool.get_ref(), id).await? {
        return Err(ApiError::not_found("Room", id));
    }

    log::info!("deleted room {id} with its bookings");
    Ok(HttpResponse::Ok().json(ApiResponse::new(Empty {})))
}
