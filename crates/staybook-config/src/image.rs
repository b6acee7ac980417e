//! Upload image normalization limits.
//!
//! # Environment Variables
//!
//! - `IMAGE_MAX_WIDTH` / `IMAGE_MAX_HEIGHT`: bounding box for normalized images (default: 1200)
//! - `IMAGE_QUALITY`: JPEG quality, 1-100 (default: 85)
//! - `IMAGE_GENERATE_THUMBNAIL`: derive a thumbnail for each image (default: false)
//! - `IMAGE_THUMBNAIL_WIDTH` / `IMAGE_THUMBNAIL_HEIGHT`: thumbnail bounding box (default: 200)

use crate::env::{flag_or, parse_or};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageProcessingConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub generate_thumbnail: bool,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

impl Default for ImageProcessingConfig {
    fn default() -> Self {
        Self {
            max_width: 1200,
            max_height: 1200,
            quality: 85,
            generate_thumbnail: false,
            thumbnail_width: 200,
            thumbnail_height: 200,
        }
    }
}

impl ImageProcessingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_width: parse_or("IMAGE_MAX_WIDTH", defaults.max_width).max(1),
            max_height: parse_or("IMAGE_MAX_HEIGHT", defaults.max_height).max(1),
            quality: parse_or("IMAGE_QUALITY", defaults.quality).clamp(1, 100),
            generate_thumbnail: flag_or("IMAGE_GENERATE_THUMBNAIL", defaults.generate_thumbnail),
            thumbnail_width: parse_or("IMAGE_THUMBNAIL_WIDTH", defaults.thumbnail_width).max(1),
            thumbnail_height: parse_or("IMAGE_THUMBNAIL_HEIGHT", defaults.thumbnail_height).max(1),
        }
    }

    pub fn with_thumbnails(mut self, generate: bool) -> Self {
        self.generate_thumbnail = generate;
        self
    }
}
