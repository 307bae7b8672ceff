//! Preview transformer
//!
//! Produces the catalog's derived previews: fixed width, aspect-preserving
//! height, three-channel JPEG.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageError};
use memex_core::constants::{PREVIEW_JPEG_QUALITY, PREVIEW_WIDTH};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Failed to decode image: {0}")]
    Decode(ImageError),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Failed to encode preview: {0}")]
    Encode(ImageError),
}

/// Resizes an image to a fixed width and re-encodes it as JPEG.
///
/// Pure and deterministic: the same input bytes always give the same output
/// bytes for a given width and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTransformer {
    width: u32,
    quality: u8,
}

impl Default for PreviewTransformer {
    fn default() -> Self {
        Self::new(PREVIEW_WIDTH, PREVIEW_JPEG_QUALITY)
    }
}

impl PreviewTransformer {
    pub fn new(width: u32, quality: u8) -> Self {
        Self { width, quality }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// `target_width * height / width`, truncated toward zero, never below 1.
    pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
        let scaled = u64::from(target_width) * u64::from(height) / u64::from(width.max(1));
        u32::try_from(scaled.max(1)).unwrap_or(u32::MAX)
    }

    /// Preview size for an original of `width` x `height`.
    pub fn preview_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        (self.width, Self::scaled_height(width, height, self.width))
    }

    /// Decode `data`, resize it and return the JPEG-encoded preview.
    pub fn transform(&self, data: &[u8]) -> Result<Bytes, TransformError> {
        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(ImageError::IoError(e)))?
            .decode()
            .map_err(TransformError::Decode)?;

        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(TransformError::EmptyImage { width, height });
        }

        let (preview_width, preview_height) = self.preview_dimensions(width, height);

        tracing::debug!(
            width,
            height,
            preview_width,
            preview_height,
            color = ?img.color(),
            "Resizing image for preview"
        );

        // JPEG has no alpha channel; flatten whatever we decoded to 8-bit RGB.
        let resized = img
            .resize_exact(preview_width, preview_height, FilterType::CatmullRom)
            .to_rgb8();

        let mut buffer = Vec::new();
        resized
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, self.quality))
            .map_err(TransformError::Encode)?;

        Ok(Bytes::from(buffer))
    }
}
