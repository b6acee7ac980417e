//! Raster image operations.
//!
//! [`ImageOptimizer`] is the seam the normalizer calls through. The provided
//! [`RasterOptimizer`] decodes with the `image` crate, fits the picture inside
//! a bounding box without upscaling, and re-encodes: JPEG input stays JPEG at
//! the requested quality, every other raster format becomes PNG.
//!
//! The operations are CPU bound and synchronous; async callers should run them
//! on the blocking pool.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

use crate::upload::UploadedFile;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image task failed: {0}")]
    Task(String),
}

pub trait ImageOptimizer: Send + Sync {
    /// Produce a copy of `file` fitting inside `max_width x max_height`.
    fn optimise(
        &self,
        file: &UploadedFile,
        max_width: u32,
        max_height: u32,
        quality: u8,
    ) -> Result<UploadedFile, ImageError>;

    /// Produce a thumbnail of `file` fitting inside `width x height`.
    fn create_thumbnail(
        &self,
        file: &UploadedFile,
        width: u32,
        height: u32,
    ) -> Result<UploadedFile, ImageError>;
}

/// Quality used for thumbnails; they are small enough that the difference is
/// not visible.
const THUMBNAIL_QUALITY: u8 = 75;

#[derive(Debug, Clone, Copy, Default)]
pub struct RasterOptimizer;

impl RasterOptimizer {
    fn decode(file: &UploadedFile) -> Result<(DynamicImage, ImageFormat), ImageError> {
        let reader = ImageReader::new(Cursor::new(file.bytes.as_ref())).with_guessed_format()?;
        let format = reader.format().ok_or(ImageError::UnknownFormat)?;
        let image = reader.decode().map_err(ImageError::Decode)?;
        Ok((image, format))
    }

    fn fit(image: DynamicImage, max_width: u32, max_height: u32, filter: FilterType) -> DynamicImage {
        if image.width() <= max_width && image.height() <= max_height {
            image
        } else {
            image.resize(max_width.max(1), max_height.max(1), filter)
        }
    }

    fn encode(
        image: &DynamicImage,
        source_format: ImageFormat,
        quality: u8,
    ) -> Result<(Bytes, &'static str, &'static str), ImageError> {
        let mut buffer = Vec::new();

        if source_format == ImageFormat::Jpeg {
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
            encoder
                .encode_image(&image.to_rgb8())
                .map_err(ImageError::Encode)?;
            Ok((Bytes::from(buffer), "image/jpeg", "jpg"))
        } else {
            image
                .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                .map_err(ImageError::Encode)?;
            Ok((Bytes::from(buffer), "image/png", "png"))
        }
    }

    fn transform(
        file: &UploadedFile,
        max_width: u32,
        max_height: u32,
        quality: u8,
        filter: FilterType,
        file_name_suffix: &str,
    ) -> Result<UploadedFile, ImageError> {
        let (image, format) = Self::decode(file)?;
        let image = Self::fit(image, max_width, max_height, filter);
        let (bytes, content_type, extension) = Self::encode(&image, format, quality)?;

        Ok(UploadedFile {
            field_name: file.field_name.clone(),
            file_name: format!("{}{}.{}", file.stem(), file_name_suffix, extension),
            content_type: content_type.to_string(),
            bytes,
        })
    }
}

impl ImageOptimizer for RasterOptimizer {
    fn optimise(
        &self,
        file: &UploadedFile,
        max_width: u32,
        max_height: u32,
        quality: u8,
    ) -> Result<UploadedFile, ImageError> {
        Self::transform(file, max_width, max_height, quality, FilterType::Lanczos3, "")
    }

    fn create_thumbnail(
        &self,
        file: &UploadedFile,
        width: u32,
        height: u32,
    ) -> Result<UploadedFile, ImageError> {
        Self::transform(
            file,
            width,
            height,
            THUMBNAIL_QUALITY,
            FilterType::Triangle,
            "_thumb",
        )
    }
}
