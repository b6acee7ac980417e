//! Request-piggybacked booking expiry.
//!
//! Every request outside the skip-list first expires stale pending-payment
//! bookings and stale checkouts. The outcome is logged and never changes the
//! request: failures are swallowed and `next` always runs.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};

use staybook_db::{SweepError, SweepReport, run_expiry_sweep};

use crate::metrics::{track_bookings_expired, track_sweep_failure};
use crate::state::AppState;

pub async fn booking_cleanup(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let skip = state.cleanup_config.should_skip(req.uri().path());

    if !skip {
        match run_expiry_sweep(state.booking_repository.as_ref()).await {
            Ok(report) => record_activity(&state, &report),
            Err(err) => record_failure(&req, &err),
        }
    }

    next.run(req).await
}

fn record_activity(state: &AppState, report: &SweepReport) {
    track_bookings_expired(report.pending_payments_expired, report.checkouts_expired);

    if state.cleanup_config.log_activity && !report.is_idle() {
        info!(
            pending_payments_expired = report.pending_payments_expired,
            checkouts_expired = report.checkouts_expired,
            "Expired stale bookings"
        );
    }
}

fn record_failure(req: &Request, err: &SweepError) {
    track_sweep_failure(err.operation());

    if err.is_structural() {
        warn!(
            operation = err.operation(),
            path = %req.uri().path(),
            method = %req.method(),
            error = %err,
            "Booking cleanup returned an unexpected result"
        );
        return;
    }

    error!(
        operation = err.operation(),
        path = %req.uri().path(),
        method = %req.method(),
        timestamp = %chrono::Utc::now().to_rfc3339(),
        error = %err,
        "Booking cleanup failed"
    );
}
