//! REST API for browsing hotels and rooms and booking stays.

use actix_cors::Cors;
use actix_web::web;
use sqlx::SqlitePool;

pub mod auth;
pub mod availability;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;

use crate::auth::Authenticator;
use crate::db::RoomLocks;
use crate::error::ApiError;

/// Shared state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub pool: web::Data<SqlitePool>,
    pub auth: web::Data<Authenticator>,
    pub locks: web::Data<RoomLocks>,
}

impl AppState {
    pub fn new(pool: SqlitePool, auth: Authenticator) -> Self {
        Self {
            pool: web::Data::new(pool),
            auth: web::Data::new(auth),
            locks: web::Data::new(RoomLocks::new()),
        }
    }
}

/// Registers state, extractor error handling and the `/api/v1` routes.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state.pool)
            .app_data(state.auth)
            .app_data(state.locks)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::Validation(err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                ApiError::NotFound(format!("Resource not found: {err}")).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                ApiError::Validation(err.to_string()).into()
            }))
            .service(web::scope("/api/v1").configure(routes));
    }
}

/// Lets the browser client at `origin` call the API.
pub fn cors(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

fn routes(cfg: &mut web::ServiceConfig) {
    use handlers::{auth, bookings, hotels, rooms};

    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/me", web::get().to(auth::me)),
    )
    .service(
        web::scope("/hotels")
            .route("", web::get().to(hotels::get_hotels))
            .route("", web::post().to(hotels::create_hotel))
            .route("/{id}", web::get().to(hotels::get_hotel_by_id))
            .route("/{id}", web::put().to(hotels::update_hotel))
            .route("/{id}", web::delete().to(hotels::delete_hotel))
            .route("/{hotel_id}/rooms", web::get().to(rooms::get_rooms))
            .route("/{hotel_id}/rooms", web::post().to(rooms::add_room)),
    )
    .service(
        web::scope("/rooms")
            .route("/{id}", web::get().to(rooms::get_room))
            .route("/{id}", web::put().to(rooms::update_room))
            .route("/{id}", web::delete().to(rooms::delete_room))
            .route("/{room_id}/bookings", web::post().to(bookings::create_booking)),
    )
    .service(
        web::scope("/bookings")
            .route("", web::get().to(bookings::get_bookings))
            .route("/me", web::get().to(bookings::get_my_bookings))
            .route("/{id}", web::get().to(bookings::get_booking))
            .route("/{id}", web::delete().to(bookings::delete_booking)),
    );
}
