use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::{Authenticator, Identity};
use crate::db;
use crate::error::ApiError;
use crate::handlers::ApiResponse;
use crate::models::user::{LoginUser, RegisterUser, TokenResponse};

pub async fn register(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    body: web::Json<RegisterUser>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let hash = auth.hash_password(body.password).await?;
    let user = match db::users::insert(pool.get_ref(), body.name.trim(), body.email.trim(), &hash).await {
        Ok(user) => user,
        Err(e) if db::users::is_duplicate_email(&e) => {
            return Err(ApiError::Validation("Email is already registered".to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    log::info!("registered user {} with role {}", user.id, user.role.as_str());

    let token = auth.issue_token(&user)?;
    Ok(HttpResponse::Created().json(TokenResponse {
        success: true,
        token,
    }))
}

pub async fn login(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    body: web::Json<LoginUser>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());
    let user = db::users::find_by_email(pool.get_ref(), body.email.trim())
        .await?
        .ok_or_else(invalid)?;
    if !auth.verify_password(body.password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = auth.issue_token(&user)?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        success: true,
        token,
    }))
}

pub async fn me(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new(identity.user))
}
