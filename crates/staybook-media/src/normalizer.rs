//! Upload image normalization.
//!
//! Image processing must never block the request pipeline: every failure is
//! logged and the affected file continues untransformed, without a thumbnail.

use metrics::counter;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use staybook_config::ImageProcessingConfig;

use crate::optimizer::{ImageError, ImageOptimizer};
use crate::upload::{UploadFields, UploadedFile};

/// Result of normalizing a single upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFile {
    pub file: UploadedFile,
    pub thumbnail: Option<UploadedFile>,
    /// False when the file was not an image or its transformation failed.
    pub transformed: bool,
}

impl NormalizedFile {
    fn untouched(file: UploadedFile) -> Self {
        Self {
            file,
            thumbnail: None,
            transformed: false,
        }
    }
}

/// Result of normalizing a multi-field upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFields {
    pub fields: UploadFields,
    /// Per field, whether each file in `fields` was transformed.
    pub transformed: BTreeMap<String, Vec<bool>>,
    /// Thumbnails per field; fields without thumbnails are absent.
    pub thumbnails: UploadFields,
}

impl NormalizedFields {
    /// Whether the `index`th file of `field` is optimizer output.
    pub fn is_transformed(&self, field: &str, index: usize) -> bool {
        self.transformed
            .get(field)
            .and_then(|flags| flags.get(index))
            .copied()
            .unwrap_or(false)
    }
}

#[derive(Clone)]
pub struct ImageNormalizer {
    optimizer: Arc<dyn ImageOptimizer>,
    options: ImageProcessingConfig,
}

impl ImageNormalizer {
    pub fn new(optimizer: Arc<dyn ImageOptimizer>, options: ImageProcessingConfig) -> Self {
        Self { optimizer, options }
    }

    pub fn options(&self) -> &ImageProcessingConfig {
        &self.options
    }

    /// Normalize one upload. Non-image files pass through untouched.
    pub async fn normalize_file(&self, file: UploadedFile) -> NormalizedFile {
        if !file.is_image() {
            debug!(file_name = %file.file_name, content_type = %file.content_type, "Skipping non-image upload");
            return NormalizedFile::untouched(file);
        }

        let optimizer = Arc::clone(&self.optimizer);
        let options = self.options;
        let input = file.clone();

        let result = tokio::task::spawn_blocking(move || transform(optimizer.as_ref(), &input, &options))
            .await
            .map_err(|e| ImageError::Task(e.to_string()))
            .and_then(|r| r);

        match result {
            Ok((optimised, thumbnail)) => {
                counter!("images_normalized_total", "status" => "success").increment(1);
                debug!(
                    file_name = %optimised.file_name,
                    original_bytes = file.size(),
                    optimised_bytes = optimised.size(),
                    thumbnail = thumbnail.is_some(),
                    "Image normalized"
                );
                NormalizedFile {
                    file: optimised,
                    thumbnail,
                    transformed: true,
                }
            }
            Err(err) => {
                counter!("images_normalized_total", "status" => "failed").increment(1);
                warn!(
                    field = %file.field_name,
                    file_name = %file.file_name,
                    content_type = %file.content_type,
                    error = %err,
                    "Image processing failed, continuing with original file"
                );
                NormalizedFile::untouched(file)
            }
        }
    }

    /// Normalize every file of every field, collecting thumbnails per field.
    pub async fn normalize_fields(&self, fields: UploadFields) -> NormalizedFields {
        let mut normalized = NormalizedFields::default();

        for (field, files) in fields {
            let mut processed = Vec::with_capacity(files.len());
            let mut flags = Vec::with_capacity(files.len());

            for file in files {
                let result = self.normalize_file(file).await;
                if let Some(thumbnail) = result.thumbnail {
                    normalized
                        .thumbnails
                        .entry(field.clone())
                        .or_default()
                        .push(thumbnail);
                }
                processed.push(result.file);
                flags.push(result.transformed);
            }

            normalized.transformed.insert(field.clone(), flags);
            normalized.fields.insert(field, processed);
        }

        normalized
    }
}

fn transform(
    optimizer: &dyn ImageOptimizer,
    file: &UploadedFile,
    options: &ImageProcessingConfig,
) -> Result<(UploadedFile, Option<UploadedFile>), ImageError> {
    let optimised = optimizer.optimise(file, options.max_width, options.max_height, options.quality)?;

    let thumbnail = if options.generate_thumbnail {
        Some(optimizer.create_thumbnail(
            &optimised,
            options.thumbnail_width,
            options.thumbnail_height,
        )?)
    } else {
        None
    };

    Ok((optimised, thumbnail))
}
