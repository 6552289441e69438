//! JPEG export format
//!
//! JPEG has no alpha channel, so alpha is dropped: fully transparent pixels
//! come out black and partly transparent ones keep their color.

use image::ImageEncoder;
use textimg_core::{
    error::{ExportError, Result},
    traits::Exporter,
    Surface,
};

/// Default encoder quality, 1 to 100
pub const DEFAULT_QUALITY: u8 = 90;

pub struct JpegExporter {
    quality: u8,
}

impl JpegExporter {
    pub fn new() -> Self {
        Self::with_quality(DEFAULT_QUALITY)
    }

    /// Quality is clamped to 1..=100
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for JpegExporter {
    fn name(&self) -> &'static str {
        "jpeg"
    }

    fn export(&self, surface: &Surface) -> Result<Vec<u8>> {
        if surface.is_empty() {
            return Err(ExportError::EncodingFailed(format!(
                "Cannot encode an empty {}x{} image",
                surface.width(),
                surface.height()
            ))
            .into());
        }

        let mut jpeg_data = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_data, self.quality)
            .write_image(
                &surface.to_rgb(),
                surface.width(),
                surface.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| ExportError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;
        Ok(jpeg_data)
    }

    fn extension(&self) -> &'static str {
        "jpg"
    }

    fn mime_type(&self) -> &'static str {
        "image/jpeg"
    }
}
