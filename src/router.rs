use axum::http::{HeaderValue, Method};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{is_observability_enabled, metrics_middleware};
use crate::middleware::auth::authenticate;
use crate::middleware::booking_cleanup::booking_cleanup;
use crate::middleware::role::{
    require_customer, require_hotel_manager_or_via_admin, require_via_admin,
};
use crate::modules::account::router::init_account_router;
use crate::modules::bookings::router::init_bookings_router;
use crate::modules::media::router::{init_avatar_router, init_hotel_images_router};
use crate::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn status() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "observability": is_observability_enabled(),
    }))
}

pub fn init_router(state: AppState) -> Router {
    let authenticated = || middleware::from_fn_with_state(state.clone(), authenticate);
    let max_file_size = state.media_config.max_file_size;

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .route("/status", get(status))
        .nest_service("/files", ServeDir::new(&state.media_config.storage_dir))
        .nest(
            "/api",
            Router::new()
                .nest("/account", init_account_router().route_layer(authenticated()))
                .nest(
                    "/bookings",
                    init_bookings_router()
                        .route_layer(middleware::from_fn(require_via_admin))
                        .route_layer(authenticated()),
                )
                .nest(
                    "/media",
                    Router::new()
                        .merge(
                            init_hotel_images_router(max_file_size).route_layer(
                                middleware::from_fn(require_hotel_manager_or_via_admin),
                            ),
                        )
                        .merge(
                            init_avatar_router(max_file_size)
                                .route_layer(middleware::from_fn(require_customer)),
                        )
                        .route_layer(authenticated()),
                ),
        );

    if let Some(handle) = state.metrics_handle.clone() {
        router = router.route("/metrics", get(move || async move { handle.render() }));
    }

    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    // Layers wrap outward: the last one added runs first.
    router
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, booking_cleanup))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors)
}
