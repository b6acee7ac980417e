use std::env;
use std::path::PathBuf;

use crate::env::parse_or;

/// Where normalized uploads are written and how they are addressed.
///
/// - `MEDIA_STORAGE_DIR` (default `./storage/media`)
/// - `MEDIA_BASE_URL` (default `http://localhost:3000/files`)
/// - `MEDIA_MAX_FILE_SIZE` in bytes (default 10 MiB)
#[derive(Clone, Debug)]
pub struct MediaStorageConfig {
    pub storage_dir: PathBuf,
    pub base_url: String,
    pub max_file_size: usize,
}

impl MediaStorageConfig {
    pub fn from_env() -> Self {
        Self {
            storage_dir: env::var("MEDIA_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./storage/media")),
            base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
            max_file_size: parse_or("MEDIA_MAX_FILE_SIZE", 10 * 1024 * 1024),
        }
    }
}
