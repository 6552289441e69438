//! Stub fonts with fixed proportions, shared by unit and integration tests
//!
//! `tests/common` pulls this file in by path, so it names the library as
//! `textimg` from both sides.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use textimg::{fallback::FontSelector, renderer::TextRenderer};
use textimg_core::{
    error::{FontLoadError, Result},
    types::{FontStyle, FontWeight},
    FontFace, FontMetrics, FontRegistry, GlyphExtent, GlyphPaint, RasterFont, Surface,
};

/// Only covered by the fixed-size stub font
pub const EMOJI: char = '😀';

pub struct StubFace {
    family: String,
    fixed_size: Option<u32>,
    covers: fn(char) -> bool,
}

impl FontFace for StubFace {
    fn family(&self) -> &str {
        &self.family
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    fn fixed_size(&self) -> Option<u32> {
        self.fixed_size
    }

    fn has_glyph(&self, ch: char) -> bool {
        (self.covers)(ch)
    }

    fn load_at_size(&self, px: u32) -> Result<Arc<dyn RasterFont>> {
        Ok(Arc::new(StubRaster(px)))
    }
}

/// Ascent 0.8 em, descent 0.2 em, drawn as a solid box
///
/// ASCII glyphs are half an em wide, everything else a full em.
pub struct StubRaster(u32);

impl RasterFont for StubRaster {
    fn size(&self) -> u32 {
        self.0
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: self.0 as f32 * 0.8,
            descent: self.0 as f32 * 0.2,
        }
    }

    fn measure(&self, ch: char, stroke_width: u32) -> GlyphExtent {
        let stroke = 2.0 * stroke_width as f32;
        let em = if ch.is_ascii() { 0.5 } else { 1.0 };
        GlyphExtent {
            advance: self.0 as f32 * em + stroke,
            height: self.0 as f32 + stroke,
        }
    }

    fn draw_glyph(
        &self,
        surface: &mut Surface,
        ch: char,
        origin: (f32, f32),
        paint: &GlyphPaint,
    ) -> Result<()> {
        let extent = self.measure(ch, paint.stroke_width);
        surface.fill_rect(origin.0, origin.1, extent.advance, extent.height, paint.fill);
        Ok(())
    }
}

/// `Latin` and `Latin Bold` (ASCII), `CJK` (everything but the emoji) and a
/// 137px `Emoji`
///
/// Bold requests get `<family> Bold` when it exists.
pub struct StubRegistry {
    faces: HashMap<String, Arc<StubFace>>,
}

impl Default for StubRegistry {
    fn default() -> Self {
        let faces: [(&str, Option<u32>, fn(char) -> bool); 4] = [
            ("Latin", None, |ch| ch.is_ascii()),
            ("Latin Bold", None, |ch| ch.is_ascii()),
            ("CJK", None, |ch| ch != EMOJI),
            ("Emoji", Some(137), |ch| ch == EMOJI),
        ];
        Self {
            faces: faces
                .into_iter()
                .map(|(family, fixed_size, covers)| {
                    let face = StubFace {
                        family: family.to_string(),
                        fixed_size,
                        covers,
                    };
                    (family.to_string(), Arc::new(face))
                })
                .collect(),
        }
    }
}

impl FontRegistry for StubRegistry {
    fn find_font(
        &self,
        family: &str,
        _style: FontStyle,
        weight: FontWeight,
    ) -> Result<Arc<dyn FontFace>> {
        let bold = (weight >= FontWeight::BOLD)
            .then(|| self.faces.get(&format!("{family} Bold")))
            .flatten();
        match bold.or_else(|| self.faces.get(family)) {
            Some(face) => Ok(face.clone()),
            None => Err(FontLoadError::NotFound(family.to_string()).into()),
        }
    }
}

pub fn stub_selector() -> FontSelector {
    FontSelector::new(
        Arc::new(StubRegistry::default()),
        ["Latin", "CJK", "Emoji"].iter().map(|s| s.to_string()).collect(),
    )
}

pub fn stub_renderer() -> TextRenderer {
    TextRenderer::new(stub_selector())
}
