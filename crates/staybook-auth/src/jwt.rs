//! Access token creation and verification.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use staybook_config::JwtConfig;
use staybook_core::AppError;

use crate::claims::Claims;

/// Creates an access token whose subject is `email`.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(email: &str, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: email.to_string(),
        exp,
        iat: now,
    };

    encode_claims(&claims, jwt_config)
}

pub(crate) fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

/// Verifies an access token's signature and expiry and returns its claims.
///
/// # Errors
///
/// Returns an unauthorized error carrying the underlying `jsonwebtoken`
/// failure (bad signature, expired, malformed) as its detail.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::unauthorized("Invalid or expired token").with_detail(e))
}
