//! Error types for textimg

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextImgError>;

/// Main error type for textimg
#[derive(Debug, Error)]
pub enum TextImgError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    /// The text cannot be laid out inside the region even at the smallest size
    #[error("Text does not fit in {width}x{height} at minimum font size {min_size}")]
    DoesNotFit {
        width: u32,
        height: u32,
        min_size: u32,
    },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid markup value: {0}")]
    InvalidMarkup(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    /// The family is not installed in any searched location
    #[error("Font not found: {0}")]
    NotFound(String),

    /// Not a single family of the fallback stack could be loaded
    #[error("No usable font among: {}", tried.join(", "))]
    NoUsableFont { tried: Vec<String> },
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixmap creation failed")]
    PixmapCreationFailed,

    #[error("Outline extraction failed for glyph {0}")]
    OutlineExtractionFailed(u32),

    #[error("Bitmap glyph decoding failed: {0}")]
    BitmapDecodeFailed(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Format not supported: {0}")]
    FormatNotSupported(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

impl FontLoadError {
    /// Whether this is the "family simply absent" case that callers recover from
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::FileNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_usable_font_lists_families() {
        let err = TextImgError::from(FontLoadError::NoUsableFont {
            tried: vec!["Arial".into(), "Noto Sans CJK JP".into()],
        });
        let msg = err.to_string();
        assert!(msg.contains("Arial, Noto Sans CJK JP"), "{msg}");
    }

    #[test]
    fn test_not_found_is_recoverable() {
        assert!(FontLoadError::NotFound("Tahoma".into()).is_not_found());
        assert!(FontLoadError::FileNotFound("msyh.ttc".into()).is_not_found());
        assert!(!FontLoadError::InvalidData.is_not_found());
    }
}
