use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::middleware::image::MAX_FILES_PER_REQUEST;
use crate::modules::media::controller::{upload_avatar, upload_hotel_images};
use crate::state::AppState;

/// `max_file_size` bounds each file; the body may carry several.
pub fn init_hotel_images_router(max_file_size: usize) -> Router<AppState> {
    Router::new()
        .route("/hotel-images", post(upload_hotel_images))
        .layer(DefaultBodyLimit::max(
            max_file_size.saturating_mul(MAX_FILES_PER_REQUEST),
        ))
}

pub fn init_avatar_router(max_file_size: usize) -> Router<AppState> {
    Router::new()
        .route("/avatar", post(upload_avatar))
        .layer(DefaultBodyLimit::max(max_file_size.saturating_mul(2)))
}
