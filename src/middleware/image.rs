//! Multipart upload extractors.
//!
//! Both extractors buffer the file parts of a multipart body and run them
//! through the [`ImageNormalizer`](staybook_media::ImageNormalizer) held in
//! [`AppState`]. Text parts are ignored. Normalization failures are absorbed
//! by the normalizer; only a malformed body, a missing file or an oversized
//! file rejects the request.

use anyhow::anyhow;
use axum::{
    extract::{FromRequest, Multipart, Request},
    http::StatusCode,
};

use staybook_core::AppError;
use staybook_media::{NormalizedFields, NormalizedFile, UploadFields, UploadedFile};

use crate::state::AppState;

/// Upper bound on file parts in one request; also sizes the body limit.
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Every file of a multipart body, normalized, keyed by field name.
#[derive(Debug, Clone)]
pub struct ImageUploads(pub NormalizedFields);

/// Exactly one file, normalized.
#[derive(Debug, Clone)]
pub struct ImageUpload(pub NormalizedFile);

impl FromRequest<AppState> for ImageUploads {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let fields = read_files(req, state).await?;

        if fields.is_empty() {
            return Err(AppError::bad_request("No file uploaded"));
        }

        Ok(ImageUploads(
            state.image_normalizer.normalize_fields(fields).await,
        ))
    }
}

impl FromRequest<AppState> for ImageUpload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut files = read_files(req, state).await?.into_values().flatten();

        let file = files
            .next()
            .ok_or_else(|| AppError::bad_request("No file uploaded"))?;

        if files.next().is_some() {
            return Err(AppError::bad_request("Only one file may be uploaded"));
        }

        Ok(ImageUpload(state.image_normalizer.normalize_file(file).await))
    }
}

async fn read_files(req: Request, state: &AppState) -> Result<UploadFields, AppError> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| AppError::bad_request("Invalid multipart body").with_detail(e))?;

    let max_file_size = state.media_config.max_file_size;
    let mut fields = UploadFields::new();
    let mut count = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request("Invalid multipart body").with_detail(e))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let field_name = field.name().unwrap_or("file").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        count += 1;
        if count > MAX_FILES_PER_REQUEST {
            return Err(AppError::bad_request(format!(
                "At most {} files may be uploaded at once",
                MAX_FILES_PER_REQUEST
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request("Failed to read uploaded file").with_detail(e))?;

        if bytes.len() > max_file_size {
            return Err(AppError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                anyhow!("File exceeds maximum size of {} bytes", max_file_size),
            ));
        }

        fields
            .entry(field_name.clone())
            .or_default()
            .push(UploadedFile::new(field_name, file_name, content_type, bytes));
    }

    Ok(fields)
}
