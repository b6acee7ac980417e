use axum::{Json, extract::State};
use tracing::{info, instrument};

use staybook_core::AppError;
use staybook_db::run_expiry_sweep;

use crate::docs::ErrorResponse;
use crate::metrics::track_bookings_expired;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::model::ExpireBookingsResponse;

/// Expire stale bookings now (via admin only)
#[utoipa::path(
    post,
    path = "/api/bookings/expire",
    responses(
        (status = 200, description = "Sweep finished", body = ExpireBookingsResponse),
        (status = 401, description = "Unauthorized - missing token or not a via admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Bookings"
)]
#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn expire_stale_bookings(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
) -> Result<Json<ExpireBookingsResponse>, AppError> {
    let report = run_expiry_sweep(state.booking_repository.as_ref())
        .await
        .map_err(AppError::internal)?;

    track_bookings_expired(report.pending_payments_expired, report.checkouts_expired);
    info!(
        pending_payments_expired = report.pending_payments_expired,
        checkouts_expired = report.checkouts_expired,
        "Manual booking expiry sweep finished"
    );

    Ok(Json(report.into()))
}
