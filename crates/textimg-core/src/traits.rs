//! The contracts between the layout engine and its collaborators
//!
//! - [`FontRegistry`] - Turns a family name into a loadable font
//! - [`FontFace`] - One resolved font: coverage test and size loading
//! - [`RasterFont`] - A font loaded at one pixel size: metrics and drawing
//! - [`Exporter`] - Where surfaces become files

use std::path::Path;
use std::sync::Arc;

use crate::{
    error::Result,
    surface::Surface,
    types::{FontStyle, FontWeight},
    Color,
};

/// Resolves family names to fonts
///
/// Lookups are deterministic for a given installed-font set. An absent family
/// is reported as [`FontLoadError::NotFound`](crate::error::FontLoadError::NotFound)
/// so callers can move on to the next entry of their fallback stack.
pub trait FontRegistry: Send + Sync {
    /// Find the best face of `family` for the requested style and weight
    fn find_font(
        &self,
        family: &str,
        style: FontStyle,
        weight: FontWeight,
    ) -> Result<Arc<dyn FontFace>>;

    /// Changes whenever the set of known fonts changes
    ///
    /// Anything that remembers lookups compares this to spot stale results.
    /// Registries whose font set never changes can keep the default.
    fn generation(&self) -> u64 {
        0
    }
}

/// A resolved, immutable font
pub trait FontFace: Send + Sync {
    /// Family name as reported by the font
    fn family(&self) -> &str;

    /// File the font was loaded from, when it came from disk
    fn path(&self) -> Option<&Path>;

    /// The only pixel size this font can be rasterized at, if it has one
    ///
    /// Bitmap-strike color emoji fonts report their strike size here.
    fn fixed_size(&self) -> Option<u32>;

    /// Whether the character map contains `ch`
    fn has_glyph(&self, ch: char) -> bool;

    /// Load a rasterizer at `px` pixels per em
    ///
    /// For fixed-size fonts callers only ever pass [`FontFace::fixed_size`].
    fn load_at_size(&self, px: u32) -> Result<Arc<dyn RasterFont>>;
}

/// Vertical font metrics at a given size, both measured away from the baseline
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// Measured box of one character
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphExtent {
    /// Distance to the next character's origin, stroke included
    pub advance: f32,
    /// Distance from the ascent line to the lowest inked pixel, stroke included
    pub height: f32,
}

/// How a glyph gets painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPaint {
    pub fill: Color,
    pub stroke_width: u32,
    /// Stroke color; the fill color is used when unset
    pub stroke: Option<Color>,
}

impl GlyphPaint {
    pub fn fill(fill: Color) -> Self {
        Self {
            fill,
            stroke_width: 0,
            stroke: None,
        }
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke.unwrap_or(self.fill)
    }
}

/// A font loaded at one pixel size
pub trait RasterFont: Send + Sync {
    /// Pixels per em this rasterizer was loaded at
    fn size(&self) -> u32;

    fn metrics(&self) -> FontMetrics;

    /// Measure one character, widening the box by the stroke on both sides
    fn measure(&self, ch: char, stroke_width: u32) -> GlyphExtent;

    /// Draw `ch` with its box's top-left corner at `origin`
    ///
    /// The baseline sits `metrics().ascent` below `origin.1`. Embedded color
    /// glyphs are drawn in their own colors.
    fn draw_glyph(
        &self,
        surface: &mut Surface,
        ch: char,
        origin: (f32, f32),
        paint: &GlyphPaint,
    ) -> Result<()>;
}

/// The final step: surfaces become files
pub trait Exporter: Send + Sync {
    /// Who are you?
    fn name(&self) -> &'static str;

    /// Encode the surface as bytes
    fn export(&self, surface: &Surface) -> Result<Vec<u8>>;

    /// What file extension should be used?
    fn extension(&self) -> &'static str;

    /// What MIME type identifies your format?
    fn mime_type(&self) -> &'static str;
}
