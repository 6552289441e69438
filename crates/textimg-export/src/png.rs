//! PNG export format
//!
//! Straight-alpha RGBA, so transparent backgrounds survive.

use image::ImageEncoder;
use textimg_core::{
    error::{ExportError, Result},
    traits::Exporter,
    Surface,
};

/// Encode a surface as an RGBA PNG
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>> {
    if surface.is_empty() {
        return Err(ExportError::EncodingFailed(format!(
            "Cannot encode an empty {}x{} image",
            surface.width(),
            surface.height()
        ))
        .into());
    }

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        &mut png_data,
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Sub,
    );
    encoder
        .write_image(
            &surface.to_rgba(),
            surface.width(),
            surface.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;

    Ok(png_data)
}

/// PNG exporter
///
/// # Examples
///
/// ```
/// use textimg_export::PngExporter;
/// let exporter = PngExporter::new();
/// ```
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PngExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, surface: &Surface) -> Result<Vec<u8>> {
        encode_png(surface)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}
