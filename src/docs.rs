use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use staybook_models::{Role, SessionPrincipal};

use crate::middleware::role::AccessPolicy;
use crate::modules::account::model::AccessResponse;
use crate::modules::bookings::model::ExpireBookingsResponse;
use crate::modules::media::model::{
    AvatarForm, AvatarResponse, HotelImagesForm, HotelImagesResponse, StoredFile,
};

/// Shape of every error body.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    /// Underlying cause, when one is safe to expose
    pub error: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::account::controller::get_me,
        crate::modules::account::controller::get_access,
        crate::modules::bookings::controller::expire_stale_bookings,
        crate::modules::media::controller::upload_hotel_images,
        crate::modules::media::controller::upload_avatar,
    ),
    components(
        schemas(
            Role,
            SessionPrincipal,
            AccessPolicy,
            AccessResponse,
            ExpireBookingsResponse,
            StoredFile,
            HotelImagesResponse,
            HotelImagesForm,
            AvatarResponse,
            AvatarForm,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Account", description = "The authenticated user"),
        (name = "Bookings", description = "Booking maintenance"),
        (name = "Media", description = "Image uploads")
    ),
    info(
        title = "Staybook API",
        version = "0.1.0",
        description = "Hotel booking API built with Rust, Axum, and PostgreSQL. Authenticate with a bearer token or the `access_token` cookie.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
