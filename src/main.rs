use std::io;

use actix_web::{middleware, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

use hotel_booking_api::auth::Authenticator;
use hotel_booking_api::config::Config;
use hotel_booking_api::{configure, cors, db, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {e}");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    // The store is required; without it there is nothing to serve.
    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config).await.map_err(|e| {
        log::error!("database connection failed: {e}");
        io::Error::new(io::ErrorKind::ConnectionRefused, e)
    })?;

    log::info!("Running migrations...");
    db::run_migrations(&pool).await.map_err(|e| {
        log::error!("migrations failed: {e}");
        io::Error::new(io::ErrorKind::Other, e)
    })?;

    let auth = Authenticator::new(
        &config.jwt_secret,
        chrono::Duration::days(config.jwt_expire_days),
        config.bcrypt_cost,
    );
    let state = AppState::new(pool, auth);

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!("Accepting browser requests from {}", config.client_url);

    let client_url = config.client_url.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&client_url))
            .wrap(middleware::Logger::default())
            .configure(configure(state.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
