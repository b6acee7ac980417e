use axum::Json;
use tracing::instrument;

use staybook_models::SessionPrincipal;

use crate::docs::ErrorResponse;
use crate::middleware::auth::CurrentUser;

use super::model::AccessResponse;

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/api/account/me",
    responses(
        (status = 200, description = "The authenticated user", body = SessionPrincipal),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Account"
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<SessionPrincipal> {
    Json(user)
}

/// List the access policies the authenticated user satisfies
#[utoipa::path(
    get,
    path = "/api/account/access",
    responses(
        (status = 200, description = "Role and satisfied policies", body = AccessResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Account"
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_access(CurrentUser(user): CurrentUser) -> Json<AccessResponse> {
    Json(AccessResponse::for_role(user.role))
}
