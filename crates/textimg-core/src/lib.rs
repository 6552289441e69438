//! textimg core: the vocabulary shared by every crate in the workspace
//!
//! Styled text becomes a bitmap in four steps: markup is resolved into per-character
//! styles, each character finds a font that covers it, characters are measured and
//! grouped into lines, and lines are composited onto a [`Surface`]. This crate holds
//! the pieces those steps exchange.
//!
//! ## The Traits
//!
//! - [`FontRegistry`] - Family names in, fonts out
//! - [`FontFace`] - Coverage tests and size loading for one font
//! - [`RasterFont`] - Metrics and glyph drawing at one pixel size
//! - [`Exporter`] - Surfaces become PNG or JPEG bytes

pub mod color;
pub mod error;
pub mod surface;
pub mod traits;

pub use color::Color;
pub use error::{Result, TextImgError};
pub use surface::Surface;
pub use traits::{
    Exporter, FontFace, FontMetrics, FontRegistry, GlyphExtent, GlyphPaint, RasterFont,
};

/// Small value types used across the workspace
pub mod types {
    use std::fmt;
    use std::str::FromStr;

    use crate::error::TextImgError;

    /// Horizontal alignment of lines, or of a text block inside a region
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub enum HAlign {
        #[default]
        Left,
        Right,
        Center,
    }

    /// Vertical alignment of a text block inside a region
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub enum VAlign {
        Top,
        Bottom,
        #[default]
        Center,
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub enum FontStyle {
        #[default]
        Normal,
        Italic,
        Oblique,
    }

    /// CSS-style numeric weight, 100 through 900
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct FontWeight(pub u16);

    impl FontWeight {
        pub const LIGHT: Self = Self(300);
        pub const NORMAL: Self = Self(400);
        pub const MEDIUM: Self = Self(500);
        pub const BOLD: Self = Self(700);
        pub const BLACK: Self = Self(900);

        pub fn from_bold(bold: bool) -> Self {
            if bold {
                Self::BOLD
            } else {
                Self::NORMAL
            }
        }
    }

    impl Default for FontWeight {
        fn default() -> Self {
            Self::NORMAL
        }
    }

    impl FromStr for HAlign {
        type Err = TextImgError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_ascii_lowercase().as_str() {
                "left" => Ok(Self::Left),
                "right" => Ok(Self::Right),
                "center" => Ok(Self::Center),
                other => Err(TextImgError::InvalidMarkup(format!("alignment '{other}'"))),
            }
        }
    }

    impl fmt::Display for HAlign {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                Self::Left => "left",
                Self::Right => "right",
                Self::Center => "center",
            })
        }
    }

    impl FromStr for VAlign {
        type Err = TextImgError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_ascii_lowercase().as_str() {
                "top" => Ok(Self::Top),
                "bottom" => Ok(Self::Bottom),
                "center" => Ok(Self::Center),
                other => Err(TextImgError::InvalidMarkup(format!(
                    "vertical alignment '{other}'"
                ))),
            }
        }
    }

    impl FromStr for FontStyle {
        type Err = TextImgError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_ascii_lowercase().as_str() {
                "normal" => Ok(Self::Normal),
                "italic" => Ok(Self::Italic),
                "oblique" => Ok(Self::Oblique),
                other => Err(TextImgError::ConfigError(format!("font style '{other}'"))),
            }
        }
    }

    impl FromStr for FontWeight {
        type Err = TextImgError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let weight = match s.to_ascii_lowercase().as_str() {
                "ultralight" | "thin" => 100,
                "light" => 300,
                "normal" | "regular" | "book" => 400,
                "medium" => 500,
                "semibold" | "demibold" | "demi" => 600,
                "bold" => 700,
                "heavy" | "extra bold" => 800,
                "black" => 900,
                other => other
                    .parse::<u16>()
                    .ok()
                    .filter(|w| (1..=1000).contains(w))
                    .ok_or_else(|| TextImgError::ConfigError(format!("font weight '{s}'")))?,
            };
            Ok(Self(weight))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_align_parsing() {
            assert_eq!("CENTER".parse::<HAlign>().unwrap(), HAlign::Center);
            assert!("middle".parse::<HAlign>().is_err());
            assert_eq!("bottom".parse::<VAlign>().unwrap(), VAlign::Bottom);
        }

        #[test]
        fn test_weight_parsing() {
            assert_eq!("bold".parse::<FontWeight>().unwrap(), FontWeight::BOLD);
            assert_eq!("600".parse::<FontWeight>().unwrap(), FontWeight(600));
            assert!("heavyish".parse::<FontWeight>().is_err());
            assert_eq!(FontWeight::from_bold(false), FontWeight::NORMAL);
        }
    }
}
