//! Media storage backends.
//!
//! Normalized uploads are written through [`FileStorage`] so the local disk
//! backend can be swapped for object storage without touching handlers.
//!
//! # Example
//!
//! ```ignore
//! use staybook_media::{FileStorage, LocalFileStorage};
//!
//! let storage = LocalFileStorage::from_config(&MediaStorageConfig::from_env());
//!
//! let key = LocalFileStorage::generate_key("hotels", "jpg");
//! storage.save(&key, &bytes).await?;
//! let url = storage.get_url(&key)?;
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::fs;
use uuid::Uuid;

use staybook_config::MediaStorageConfig;

type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

pub trait FileStorage: Send + Sync {
    /// Save file content under `key` and return the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Delete a file by key. Missing files are not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// Public URL for a stored key.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("MIME type '{received}' not allowed. Allowed types: {}", allowed.join(", "))]
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },
}

/// Content types stored under their own extension, as the optimizer emits them.
const STORED_IMAGE_TYPES: &[(&str, &str)] = &[("image/jpeg", "jpg"), ("image/png", "png")];

/// Extension for content kept exactly as uploaded.
pub const OPAQUE_EXTENSION: &str = "bin";

/// Key extension for a stored content type.
///
/// Only the types in the allow-list map to a typed extension, so a key never
/// carries an extension chosen by the client.
pub fn extension_for(content_type: &str) -> Result<&'static str, StorageError> {
    let content_type = content_type.trim();
    STORED_IMAGE_TYPES
        .iter()
        .find(|(allowed, _)| allowed.eq_ignore_ascii_case(content_type))
        .map(|(_, extension)| *extension)
        .ok_or_else(|| StorageError::InvalidMimeType {
            received: content_type.to_string(),
            allowed: STORED_IMAGE_TYPES
                .iter()
                .map(|(allowed, _)| allowed.to_string())
                .collect(),
        })
}

/// Stores files below a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    pub fn from_config(config: &MediaStorageConfig) -> Self {
        Self::new(
            config.storage_dir.clone(),
            config.base_url.clone(),
            config.max_file_size,
        )
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// A fresh key of the form `<prefix>/<uuid>.<extension>`.
    pub fn generate_key(prefix: &str, extension: &str) -> String {
        let prefix = prefix.trim_matches('/');
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            format!("{}/{}", prefix, Uuid::new_v4())
        } else {
            format!("{}/{}.{}", prefix, Uuid::new_v4(), extension)
        }
    }

    /// Reject empty keys, traversal, absolute paths and unexpected characters.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage(max_file_size: usize) -> LocalFileStorage {
        let dir = std::env::temp_dir().join(format!("staybook-media-{}", Uuid::new_v4()));
        LocalFileStorage::new(dir, "http://localhost:3000/files/".to_string(), max_file_size)
    }

    #[test]
    fn test_validate_key() {
        assert!(LocalFileStorage::validate_key("hotels/abc-123.jpg").is_ok());
        assert!(LocalFileStorage::validate_key("avatars/user_pic.png").is_ok());
        assert!(LocalFileStorage::validate_key("../../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("hotels/a b.png").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
    }

    #[test]
    fn test_generate_key_is_valid() {
        let key = LocalFileStorage::generate_key("/hotels/", ".jpg");
        assert!(key.starts_with("hotels/"));
        assert!(key.ends_with(".jpg"));
        assert!(LocalFileStorage::validate_key(&key).is_ok());
        assert_ne!(key, LocalFileStorage::generate_key("hotels", "jpg"));
    }

    #[test]
    fn test_extension_for_allow_list() {
        assert_eq!(extension_for("image/jpeg").unwrap(), "jpg");
        assert_eq!(extension_for("IMAGE/PNG").unwrap(), "png");

        let err = extension_for("text/html").unwrap_err();
        assert!(matches!(
            &err,
            StorageError::InvalidMimeType { received, allowed }
                if received == "text/html" && allowed.len() == 2
        ));
        assert_eq!(
            err.to_string(),
            "MIME type 'text/html' not allowed. Allowed types: image/jpeg, image/png"
        );
        assert!(extension_for("image/svg+xml").is_err());
    }

    #[test]
    fn test_get_url_handles_trailing_slash() {
        let storage = temp_storage(1024);
        let url = storage.get_url("hotels/lobby.png").unwrap();
        assert_eq!(url, "http://localhost:3000/files/hotels/lobby.png");
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let storage = temp_storage(1024);
        let key = LocalFileStorage::generate_key("hotels", "png");

        storage.save(&key, b"png-bytes").await.unwrap();
        let written = tokio::fs::read(storage.base_dir().join(&key)).await.unwrap();
        assert_eq!(written, b"png-bytes");

        storage.delete(&key).await.unwrap();
        assert!(!storage.base_dir().join(&key).exists());
        // Deleting again is fine.
        storage.delete(&key).await.unwrap();

        let _ = tokio::fs::remove_dir_all(storage.base_dir()).await;
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_content() {
        let storage = temp_storage(4);
        let err = storage.save("hotels/big.png", b"too large").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidFileSize { max_bytes: 4 }));
    }
}
