use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::{domain::UserRole, error::ApiError};

use super::{jwt::{Claims, Tokenizer}, session::SESSION_COOKIE};

// Extractor for any signed-in caller; the bool is true for admins
pub struct IsUser(pub Uuid, pub bool);

// Extractor for admin role
pub struct IsAdmin(pub Uuid);

// Session cookie first, then `Authorization: Bearer <token>`
fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string())
        }
    }

    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn claims_from_request(req: &HttpRequest) -> Result<Claims, ApiError> {
    let tokenizer = req.app_data::<web::Data<Tokenizer>>()
        .ok_or_else(|| ApiError::UnexpectedError(anyhow::anyhow!("Tokenizer is not registered as app data")))?;

    let token = token_from_request(req).ok_or(ApiError::Unauthorized)?;

    tokenizer.decode_key(&token).ok_or(ApiError::Unauthorized)
}

impl FromRequest for IsUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match claims_from_request(req) {
            Ok(claims) => ready(Ok(IsUser(claims.sub, claims.role.is_admin()))),
            Err(e) => ready(Err(e.into()))
        }
    }
}

impl FromRequest for IsAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match claims_from_request(req) {
            Ok(claims) => {
                match claims.role {
                    UserRole::Admin => ready(Ok(IsAdmin(claims.sub))),
                    UserRole::User => ready(Err(ApiError::Forbidden("Admin access required".to_string()).into()))
                }
            },
            Err(e) => ready(Err(e.into()))
        }
    }
}
