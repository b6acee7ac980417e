//! # Staybook Media
//!
//! Upload handling for the Staybook API.
//!
//! - [`upload`]: The in-memory [`UploadedFile`] artifact
//! - [`optimizer`]: The [`ImageOptimizer`] seam and its raster implementation
//! - [`normalizer`]: Applies resize / thumbnail options to uploads, never failing the request
//! - [`storage`]: Storage backends for normalized files
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use staybook_config::ImageProcessingConfig;
//! use staybook_media::{ImageNormalizer, RasterOptimizer};
//!
//! let normalizer = ImageNormalizer::new(Arc::new(RasterOptimizer), ImageProcessingConfig::default());
//! let normalized = normalizer.normalize_file(upload).await;
//! assert!(normalized.thumbnail.is_none());
//! ```

pub mod normalizer;
pub mod optimizer;
pub mod storage;
pub mod upload;

pub use normalizer::{ImageNormalizer, NormalizedFields, NormalizedFile};
pub use optimizer::{ImageError, ImageOptimizer, RasterOptimizer};
pub use storage::{FileStorage, LocalFileStorage, OPAQUE_EXTENSION, StorageError, extension_for};
pub use upload::{UploadFields, UploadedFile};
