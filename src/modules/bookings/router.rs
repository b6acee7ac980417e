use axum::{Router, routing::post};

use crate::modules::bookings::controller::expire_stale_bookings;
use crate::state::AppState;

pub fn init_bookings_router() -> Router<AppState> {
    Router::new().route("/expire", post(expire_stale_bookings))
}
