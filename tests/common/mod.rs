#![allow(dead_code)]

use std::path::PathBuf;
use std::str::FromStr;

use actix_web::http::header;
use actix_web::test::TestRequest;
use chrono::Duration;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use hotel_booking_api::auth::Authenticator;
use hotel_booking_api::config::Config;
use hotel_booking_api::db;
use hotel_booking_api::models::hotel::{CreateHotel, Hotel};
use hotel_booking_api::models::room::{CreateRoom, Room, RoomType};
use hotel_booking_api::models::user::User;
use hotel_booking_api::AppState;

/// Fresh in-memory database with migrations applied. A single connection
/// keeps every request on the same database.
pub async fn test_state() -> AppState {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    db::run_migrations(&pool).await.unwrap();
    AppState::new(pool, Authenticator::new("test-secret", Duration::days(1), 4))
}

/// A scratch database file, removed on drop.
pub struct TempDb {
    path: PathBuf,
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let mut path = self.path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

/// A database file behind a pool of several connections, configured the way
/// the server configures its own, so requests really run side by side.
pub async fn file_state(name: &str) -> (AppState, TempDb) {
    let path = std::env::temp_dir().join(format!(
        "hotel-booking-{name}-{}-{}.db",
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    let db = TempDb { path };
    let config = Config {
        database_url: format!("sqlite://{}", db.path.display()),
        host: "127.0.0.1".to_string(),
        port: 0,
        client_url: "http://localhost:3000".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expire_days: 1,
        bcrypt_cost: 4,
        max_connections: 5,
    };
    let pool = db::get_db_pool(&config).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let state = AppState::new(pool, Authenticator::new("test-secret", Duration::days(1), 4));
    (state, db)
}

/// Inserts a user directly and returns it with a valid token. The first
/// user seeded into a state is the admin.
pub async fn seed_user(state: &AppState, name: &str) -> (User, String) {
    let email = format!("{}@example.com", name.to_lowercase());
    let user = db::users::insert(state.pool.get_ref(), name, &email, "not-a-real-hash")
        .await
        .unwrap();
    let token = state.auth.issue_token(&user).unwrap();
    (user, token)
}

pub async fn seed_hotel(state: &AppState, name: &str, city: &str) -> Hotel {
    let hotel = CreateHotel {
        name: name.to_string(),
        description: format!("{name} in {city}"),
        address: "1 Main Street".to_string(),
        city: city.to_string(),
        rating: Some(4.0),
        photo: None,
    };
    db::hotels::insert(state.pool.get_ref(), &hotel).await.unwrap()
}

pub async fn seed_room(state: &AppState, hotel_id: i64, number: &str, price: f64) -> Room {
    let room = CreateRoom {
        room_number: number.to_string(),
        room_type: RoomType::Double,
        price,
        is_available: Some(true),
    };
    db::rooms::insert(state.pool.get_ref(), hotel_id, &room).await.unwrap()
}

pub fn authed(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

pub fn book_request(room_id: i64, token: &str, check_in: &str, check_out: &str) -> TestRequest {
    authed(
        TestRequest::post()
            .uri(&format!("/api/v1/rooms/{room_id}/bookings"))
            .set_json(serde_json::json!({ "checkInDate": check_in, "checkOutDate": check_out })),
        token,
    )
}

pub fn msg(body: &Value) -> &str {
    body["msg"].as_str().unwrap_or_default()
}
