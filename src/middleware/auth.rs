use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use staybook_auth::verify_token;
use staybook_core::AppError;
use staybook_models::SessionPrincipal;

use crate::metrics::track_jwt_validation;
use crate::state::AppState;

/// Cookie consulted when no bearer token is sent.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

pub const NO_TOKEN_MESSAGE: &str = "Access denied. No Token Provided";

/// Read the access token from `Authorization: Bearer`, falling back to the
/// `access_token` cookie when the header is missing, not a bearer header, or
/// empty.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Verify the request's token and resolve it to a [`SessionPrincipal`].
pub async fn resolve_principal(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<SessionPrincipal, AppError> {
    let token = extract_token(headers).ok_or_else(|| AppError::unauthorized(NO_TOKEN_MESSAGE))?;

    let claims = verify_token(&token, &state.jwt_config);
    track_jwt_validation(claims.is_ok());
    let claims = claims?;

    let record = state
        .auth_repository
        .find_user_by_email_for_auth(claims.email())
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| {
            debug!(email = %claims.email(), "Token subject does not match any user");
            AppError::unauthorized("Invalid token")
        })?;

    let user_id = record.id;
    SessionPrincipal::try_from(record).map_err(|e| {
        AppError::internal(anyhow!(e).context(format!("user {} has an unrecognised role", user_id)))
    })
}

/// Token verifier middleware. Attaches the [`SessionPrincipal`] to the request
/// extensions or ends the request with 401 (500 on repository failure).
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = resolve_principal(&state, req.headers()).await?;
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Extractor for the principal attached by [`authenticate`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionPrincipal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionPrincipal>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::unauthorized(NO_TOKEN_MESSAGE))
    }
}
