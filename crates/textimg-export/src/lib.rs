//! Export module for textimg
//!
//! Surfaces become PNG or JPEG bytes through the `image` crate.

use std::path::Path;
use std::str::FromStr;

use textimg_core::{
    error::{ExportError, Result},
    traits::Exporter,
    TextImgError,
};

pub mod jpeg;
pub mod png;

pub use jpeg::JpegExporter;
pub use png::PngExporter;

/// Output formats the exporters cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Guess the format from a file extension, ignoring case
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }

    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            Self::Png => Box::new(PngExporter::new()),
            Self::Jpeg => Box::new(JpegExporter::new()),
        }
    }
}

impl FromStr for ImageFormat {
    type Err = TextImgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(ExportError::FormatNotSupported(other.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path("out.png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path("out.JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("out.jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("out.bmp"), None);
        assert_eq!(ImageFormat::from_path("out"), None);
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let err = "webp".parse::<ImageFormat>().unwrap_err();
        assert!(matches!(
            err,
            TextImgError::ExportFailed(ExportError::FormatNotSupported(_))
        ));
    }

    #[test]
    fn test_exporter_matches_format() {
        assert_eq!(ImageFormat::Png.exporter().mime_type(), "image/png");
        assert_eq!(ImageFormat::Jpeg.exporter().extension(), "jpg");
    }
}
