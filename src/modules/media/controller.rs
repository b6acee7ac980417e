use axum::{Json, extract::State, http::StatusCode};
use tracing::{info, instrument};

use staybook_core::AppError;

use crate::docs::ErrorResponse;
use crate::middleware::auth::CurrentUser;
use crate::middleware::image::{ImageUpload, ImageUploads};
use crate::state::AppState;

use super::model::{AvatarForm, AvatarResponse, HotelImagesForm, HotelImagesResponse, StoredFile};
use super::service::MediaService;

/// Upload hotel images (hotel managers and via admins)
#[utoipa::path(
    post,
    path = "/api/media/hotel-images",
    request_body(content = HotelImagesForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Images stored", body = HotelImagesResponse),
        (status = 400, description = "No file uploaded or malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported stored content type", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Media"
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn upload_hotel_images(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ImageUploads(uploads): ImageUploads,
) -> Result<(StatusCode, Json<HotelImagesResponse>), AppError> {
    let storage = state.storage.as_ref();
    let mut response = HotelImagesResponse::default();
    let mut stored: Vec<StoredFile> = Vec::new();

    let files = uploads.fields.iter().map(|(field, files)| (field, files, false));
    let thumbnails = uploads.thumbnails.iter().map(|(field, files)| (field, files, true));

    for (field, files, is_thumbnail) in files.chain(thumbnails) {
        for (index, file) in files.iter().enumerate() {
            let prefix = if is_thumbnail { "hotels/thumbnails" } else { "hotels" };
            let transformed = is_thumbnail || uploads.is_transformed(field, index);

            let saved = match MediaService::store(storage, prefix, file, transformed).await {
                Ok(saved) => saved,
                Err(e) => {
                    MediaService::discard(storage, &stored).await;
                    return Err(e);
                }
            };

            stored.push(saved.clone());
            let target = if is_thumbnail {
                &mut response.thumbnails
            } else {
                &mut response.files
            };
            target.entry(field.clone()).or_default().push(saved);
        }
    }

    info!(files = stored.len(), "Hotel images stored");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Upload the customer's avatar (customers only)
#[utoipa::path(
    post,
    path = "/api/media/avatar",
    request_body(content = AvatarForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Avatar stored", body = AvatarResponse),
        (status = 400, description = "No file uploaded or more than one file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Upload is not an image", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Media"
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn upload_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ImageUpload(upload): ImageUpload,
) -> Result<(StatusCode, Json<AvatarResponse>), AppError> {
    if !upload.file.is_image() {
        return Err(AppError::unprocessable("Avatar must be an image"));
    }

    let storage = state.storage.as_ref();
    let prefix = format!("avatars/{}", user.id);

    let file = MediaService::store(storage, &prefix, &upload.file, upload.transformed).await?;

    let thumbnail = match &upload.thumbnail {
        Some(thumbnail) => {
            let thumbnail_prefix = format!("{}/thumbnails", prefix);
            match MediaService::store(storage, &thumbnail_prefix, thumbnail, true).await {
                Ok(saved) => Some(saved),
                Err(e) => {
                    MediaService::discard(storage, std::slice::from_ref(&file)).await;
                    return Err(e);
                }
            }
        }
        None => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(AvatarResponse {
            file,
            thumbnail,
            transformed: upload.transformed,
        }),
    ))
}
