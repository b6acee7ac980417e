use anyhow::anyhow;
use axum::http::StatusCode;
use tracing::warn;

use staybook_core::AppError;
use staybook_media::{
    FileStorage, LocalFileStorage, OPAQUE_EXTENSION, StorageError, UploadedFile, extension_for,
};

use super::model::StoredFile;

pub struct MediaService;

impl MediaService {
    /// Store `file` under a fresh key below `prefix`.
    ///
    /// Optimizer output is keyed by its content type. Anything kept as
    /// uploaded gets an opaque `.bin` key whatever the client called it.
    pub async fn store(
        storage: &dyn FileStorage,
        prefix: &str,
        file: &UploadedFile,
        transformed: bool,
    ) -> Result<StoredFile, AppError> {
        let extension = if transformed {
            extension_for(&file.content_type).map_err(storage_error)?
        } else {
            OPAQUE_EXTENSION
        };
        let key = LocalFileStorage::generate_key(prefix, extension);

        let key = storage
            .save(&key, &file.bytes)
            .await
            .map_err(storage_error)?;
        let url = storage.get_url(&key).map_err(storage_error)?;

        Ok(StoredFile {
            key,
            url,
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
            size: file.size(),
        })
    }

    /// Best-effort removal of files stored earlier in a failed request.
    pub async fn discard(storage: &dyn FileStorage, stored: &[StoredFile]) {
        for file in stored {
            if let Err(e) = storage.delete(&file.key).await {
                warn!(key = %file.key, error = %e, "Failed to remove stored upload");
            }
        }
    }
}

fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::InvalidFileSize { max_bytes } => AppError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            anyhow!("File exceeds maximum size of {} bytes", max_bytes),
        ),
        StorageError::InvalidMimeType { received, .. } => AppError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            anyhow!("Unsupported content type '{}'", received),
        ),
        other => AppError::internal(other),
    }
}
