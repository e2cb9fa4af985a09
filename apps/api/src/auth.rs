//! Bearer-token authentication.
//!
//! The principal is the `sub` claim of an HS256 JWT issued by the identity
//! provider. Verification sits behind the `TokenVerifier` trait so handlers
//! and the pipeline can be exercised with a stub.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated principal attached to a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

pub trait TokenVerifier: Send + Sync {
    /// Returns the principal's user id when the token is valid.
    fn verify(&self, token: &str) -> Option<String>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

pub struct JwtVerifier {
    decoding_key: DecodingKey,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Option<String> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .ok()
            .map(|data| data.claims.sub)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        token
            .and_then(|t| state.auth.verify(t))
            .map(|user_id| AuthUser { user_id })
            .ok_or(AppError::Unauthorized)
    }
}
