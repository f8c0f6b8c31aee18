use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::AdminIdentity;
use crate::db::{self, WriteTransaction};
use crate::error::ApiError;
use crate::handlers::{ApiResponse, Empty};
use crate::models::hotel::{CreateHotel, HotelSearch, UpdateHotel};

pub async fn get_hotels(
    pool: web::Data<SqlitePool>,
    params: web::Query<HotelSearch>,
) -> Result<HttpResponse, ApiError> {
    let hotels = db::hotels::search(pool.get_ref(), params.search.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(hotels)))
}

pub async fn get_hotel_by_id(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let hotel = db::hotels::find_by_id(pool.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Hotel", id))?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(hotel)))
}

pub async fn create_hotel(
    pool: web::Data<SqlitePool>,
    _admin: AdminIdentity,
    body: web::Json<CreateHotel>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner().trimmed();
    body.validate()?;

    let hotel = db::hotels::insert(pool.get_ref(), &body).await?;
    log::info!("created hotel {} ({})", hotel.id, hotel.name);
    Ok(HttpResponse::Created().json(ApiResponse::new(hotel)))
}

pub async fn update_hotel(
    pool: web::Data<SqlitePool>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
    body: web::Json<UpdateHotel>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let mut tx = WriteTransaction::begin(pool.get_ref()).await?;
    let hotel = db::hotels::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Hotel", id))?;
    let hotel = db::hotels::update(&mut *tx, &body.apply(hotel)).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(hotel)))
}

pub async fn delete_hotel(
    pool: web::Data<SqlitePool>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    if !db::hotels::delete(pool.get_ref(), id).await? {
        return Err(ApiError::not_found("Hotel", id));
    }
    log::info!("deleted hotel {id} with its rooms and bookings");
    Ok(HttpResponse::Ok().json(ApiResponse::new(Empty {})))
}
