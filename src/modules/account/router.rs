use axum::{Router, routing::get};

use crate::modules::account::controller::{get_access, get_me};
use crate::state::AppState;

pub fn init_account_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/access", get(get_access))
}
