//! Bearer-token authentication and role/ownership checks.
//!
//! [`Identity`] is extracted per request: the token is verified and the user
//! reloaded from the store, so deleted accounts lose access immediately.
//! [`AdminIdentity`] additionally requires [`Role::Admin`].

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db;
use crate::error::ApiError;
use crate::models::booking::Booking;
use crate::models::user::{Role, User};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl Authenticator {
    pub fn new(secret: &str, token_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
            bcrypt_cost,
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            id: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("rejected token: {e}");
                ApiError::unauthenticated()
            })
    }

    pub async fn hash_password(&self, password: String) -> Result<String, ApiError> {
        let cost = self.bcrypt_cost;
        web::block(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
    }

    pub async fn verify_password(&self, password: String, hash: String) -> Result<bool, ApiError> {
        web::block(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(|e| ApiError::Internal(format!("password check failed: {e}")))
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
}

impl Identity {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user.role == role
    }

    /// Owners and admins may view or delete a booking.
    pub fn can_manage(&self, booking: &Booking) -> bool {
        booking.user_id == self.user.id || self.has_role(Role::Admin)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

async fn authenticate(
    auth: Option<web::Data<Authenticator>>,
    pool: Option<web::Data<SqlitePool>>,
    token: Option<String>,
) -> Result<Identity, ApiError> {
    let (Some(auth), Some(pool)) = (auth, pool) else {
        return Err(ApiError::Internal("authentication is not configured".to_string()));
    };
    let token = token.ok_or_else(ApiError::unauthenticated)?;
    let claims = auth.verify_token(&token)?;
    let user = db::users::find_by_id(pool.get_ref(), claims.id)
        .await?
        .ok_or_else(ApiError::unauthenticated)?;
    Ok(Identity { user })
}

impl FromRequest for Identity {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let auth = req.app_data::<web::Data<Authenticator>>().cloned();
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();
        let token = bearer_token(req);
        Box::pin(authenticate(auth, pool, token))
    }
}

/// An [`Identity`] holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl FromRequest for AdminIdentity {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let auth = req.app_data::<web::Data<Authenticator>>().cloned();
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let identity = authenticate(auth, pool, token).await?;
            if !identity.has_role(Role::Admin) {
                return Err(ApiError::Forbidden(format!(
                    "User role {} is not authorized to access this route",
                    identity.user.role.as_str()
                )));
            }
            Ok(AdminIdentity(identity))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_tokens_verify() {
        let auth = Authenticator::new("secret", Duration::days(1), 4);
        let token = auth.issue_token(&user(9, Role::Admin)).unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.id, 9);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let auth = Authenticator::new("secret", Duration::days(-1), 4);
        let token = auth.issue_token(&user(9, Role::User)).unwrap();
        assert!(matches!(auth.verify_token(&token), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let other = Authenticator::new("other", Duration::days(1), 4);
        let token = other.issue_token(&user(9, Role::User)).unwrap();
        let auth = Authenticator::new("secret", Duration::days(1), 4);
        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn bearer_prefix_is_required() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def"));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn owners_and_admins_manage_bookings() {
        let booking = Booking {
            id: 1,
            hotel_id: 1,
            room_id: 1,
            user_id: 5,
            check_in_date: Utc::now(),
            check_out_date: Utc::now() + Duration::days(1),
            nightly_price: 10.0,
            total_price: 10.0,
            created_at: Utc::now(),
        };
        assert!(Identity { user: user(5, Role::User) }.can_manage(&booking));
        assert!(Identity { user: user(6, Role::Admin) }.can_manage(&booking));
        assert!(!Identity { user: user(6, Role::User) }.can_manage(&booking));
    }

    #[actix_rt::test]
    async fn password_round_trip() {
        let auth = Authenticator::new("secret", Duration::days(1), 4);
        let hash = auth.hash_password("hunter22".to_string()).await.unwrap();
        assert!(auth.verify_password("hunter22".to_string(), hash.clone()).await.unwrap());
        assert!(!auth.verify_password("hunter23".to_string(), hash).await.unwrap());
    }
}
