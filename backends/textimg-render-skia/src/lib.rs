//! Skia rasterizer: glyphs onto surfaces via tiny-skia
//!
//! Outlines come out of skrifa unhinted at the exact pixel size, go through a
//! path pen into a tiny-skia path, and get stroked and filled straight onto the
//! target surface. Fonts carrying color bitmap strikes (sbix, CBDT) draw those
//! images instead, scaled from the strike size to the requested size.
//!
//! Layered COLR glyphs are painted in their palette colors; a stroke, if any,
//! goes around the base outline underneath.

mod bitmap;
mod color;

use std::sync::Arc;

use skrifa::color::ColorGlyph;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::raw::types::BoundingBox;
use skrifa::{FontRef, GlyphId, MetadataProvider, Tag};
use tiny_skia::{FillRule, LineJoin, Paint, Path, PathBuilder, Stroke, Transform};

use textimg_core::{
    error::{FontLoadError, RenderError, Result},
    FontMetrics, GlyphExtent, GlyphPaint, RasterFont, Surface,
};

pub use bitmap::strike_sizes;

/// A font face loaded at one pixel size
///
/// Keeps the raw font bytes and re-parses them on demand; parsing a
/// `FontRef` is cheap and keeps this type free of self-borrows.
pub struct SkiaRasterFont {
    data: Arc<Vec<u8>>,
    face_index: u32,
    size: u32,
    metrics: FontMetrics,
    use_strikes: bool,
}

impl SkiaRasterFont {
    /// Load face `face_index` of `data` at `size` pixels per em
    pub fn new(data: Arc<Vec<u8>>, face_index: u32, size: u32) -> Result<Self> {
        if size == 0 {
            return Err(RenderError::InvalidDimensions {
                width: 0,
                height: 0,
            }
            .into());
        }
        let font = FontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;
        let raw = font.metrics(Size::new(size as f32), LocationRef::default());
        let metrics = FontMetrics {
            ascent: raw.ascent,
            descent: -raw.descent,
        };
        let use_strikes = bitmap::prefers_strikes(&font, has_outlines(&font));

        log::debug!(
            "Skia: loaded face {} at {}px (ascent={}, descent={}, strikes={})",
            face_index,
            size,
            metrics.ascent,
            metrics.descent,
            use_strikes
        );

        Ok(Self {
            data,
            face_index,
            size,
            metrics,
            use_strikes,
        })
    }

    fn font_ref(&self) -> Result<FontRef<'_>> {
        FontRef::from_index(&self.data, self.face_index)
            .map_err(|_| FontLoadError::InvalidData.into())
    }

    fn px(&self) -> f32 {
        self.size as f32
    }

    /// Whether `ch` maps to a layered COLR glyph
    pub fn has_color_glyph(&self, ch: char) -> bool {
        self.font_ref().is_ok_and(|font| {
            font.charmap()
                .map(ch)
                .is_some_and(|glyph_id| color::lookup(&font, glyph_id).is_some())
        })
    }

    /// Lowest inked point below the baseline (negative when the ink sits above it)
    fn ink_bottom(&self, font: &FontRef<'_>, glyph_id: GlyphId) -> Option<f32> {
        if self.use_strikes {
            if let Some(glyph) = bitmap::lookup(font, glyph_id, self.px()) {
                let placement = bitmap::placement(font, &glyph, self.px());
                return Some(placement.top + placement.height);
            }
        }
        let outline = outline_path(font, glyph_id, Size::new(self.px()));
        if let Some(glyph) = color::lookup(font, glyph_id) {
            return Some(-self.color_bounds(font, &glyph, outline.as_ref()).y_min);
        }
        outline.map(|path| -path.bounds().top())
    }

    /// Pixel box (y up) a color glyph paints into
    ///
    /// The font's clip box when it has one, else the base outline, else the em box.
    fn color_bounds(
        &self,
        font: &FontRef<'_>,
        glyph: &ColorGlyph<'_>,
        outline: Option<&Path>,
    ) -> BoundingBox<f32> {
        color::bounds(font, glyph, self.px())
            .or_else(|| {
                outline.map(|path| {
                    let b = path.bounds();
                    BoundingBox {
                        x_min: b.left(),
                        y_min: b.top(),
                        x_max: b.right(),
                        y_max: b.bottom(),
                    }
                })
            })
            .unwrap_or(BoundingBox {
                x_min: 0.0,
                y_min: -self.metrics.descent,
                x_max: self.px(),
                y_max: self.metrics.ascent,
            })
    }
}

impl RasterFont for SkiaRasterFont {
    fn size(&self) -> u32 {
        self.size
    }

    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn measure(&self, ch: char, stroke_width: u32) -> GlyphExtent {
        let stroke = stroke_width as f32 * 2.0;
        let Ok(font) = self.font_ref() else {
            return GlyphExtent {
                advance: stroke,
                height: self.metrics.ascent + stroke,
            };
        };
        let glyph_id = font.charmap().map(ch).unwrap_or(GlyphId::NOTDEF);
        let advance = font
            .glyph_metrics(Size::new(self.px()), LocationRef::default())
            .advance_width(glyph_id)
            .unwrap_or(0.0);
        // Glyphs without ink reach down to the ascent line only
        let bottom = self.ink_bottom(&font, glyph_id).unwrap_or(0.0);

        GlyphExtent {
            advance: advance + stroke,
            height: (self.metrics.ascent + bottom).max(0.0) + stroke,
        }
    }

    fn draw_glyph(
        &self,
        surface: &mut Surface,
        ch: char,
        origin: (f32, f32),
        paint: &GlyphPaint,
    ) -> Result<()> {
        let font = self.font_ref()?;
        let glyph_id = font.charmap().map(ch).unwrap_or(GlyphId::NOTDEF);
        let stroke = paint.stroke_width as f32;
        let pen_x = origin.0 + stroke;
        let baseline = origin.1 + self.metrics.ascent + stroke;

        if self.use_strikes {
            if let Some(glyph) = bitmap::lookup(&font, glyph_id, self.px()) {
                let placement = bitmap::placement(&font, &glyph, self.px());
                let image = bitmap::decode(&glyph, paint.fill)?;
                log::debug!(
                    "Skia: bitmap glyph {} for {:?} at {}x{} scaled by {}",
                    glyph_id.to_u32(),
                    ch,
                    image.width(),
                    image.height(),
                    placement.scale_x
                );
                surface.draw_scaled(
                    &image,
                    pen_x + placement.left,
                    baseline + placement.top,
                    placement.scale_x,
                    placement.scale_y,
                );
                return Ok(());
            }
        }

        let outline = outline_path(&font, glyph_id, Size::new(self.px()));
        // Fonts are y-up, surfaces y-down
        let transform = Transform::from_scale(1.0, -1.0).post_translate(pen_x, baseline);

        if paint.stroke_width > 0 {
            if let (Some(path), Some(mut pixmap)) = (&outline, surface.pixmap_mut()) {
                let mut stroke_paint = Paint::default();
                stroke_paint.set_color(paint.stroke_color().to_tiny_skia());
                stroke_paint.anti_alias = true;
                let pen = Stroke {
                    width: stroke * 2.0,
                    line_join: LineJoin::Round,
                    ..Stroke::default()
                };
                pixmap.stroke_path(path, &stroke_paint, &pen, transform, None);
            }
        }

        if let Some(glyph) = color::lookup(&font, glyph_id) {
            let bounds = self.color_bounds(&font, &glyph, outline.as_ref());
            let painted = color::render(&font, &glyph, bounds, self.px(), paint.fill)?;
            log::debug!(
                "Skia: color glyph {} for {:?} at {}x{}",
                glyph_id.to_u32(),
                ch,
                painted.image.width(),
                painted.image.height()
            );
            surface.draw_scaled(
                &painted.image,
                pen_x + painted.left,
                baseline + painted.top,
                1.0,
                1.0,
            );
            return Ok(());
        }

        let Some(path) = outline else {
            // Whitespace and other glyphs without ink
            return Ok(());
        };
        let Some(mut pixmap) = surface.pixmap_mut() else {
            return Ok(());
        };

        let mut fill_paint = Paint::default();
        fill_paint.set_color(paint.fill.to_tiny_skia());
        fill_paint.anti_alias = true;
        pixmap.fill_path(&path, &fill_paint, FillRule::Winding, transform, None);

        Ok(())
    }
}

/// Whether the face has glyf, CFF or CFF2 outlines
pub fn has_outlines(font: &FontRef<'_>) -> bool {
    [b"glyf", b"CFF ", b"CFF2"]
        .iter()
        .any(|tag| font.table_data(Tag::new(tag)).is_some())
}

/// Trace a glyph outline at `size`, in font orientation (y up)
pub(crate) fn outline_path(font: &FontRef<'_>, glyph_id: GlyphId, size: Size) -> Option<Path> {
    let outlines = font.outline_glyphs();
    let glyph = outlines.get(glyph_id)?;
    let mut pen = TinySkiaPathPen::new();
    let settings = DrawSettings::unhinted(size, LocationRef::default());
    if let Err(err) = glyph.draw(settings, &mut pen) {
        log::warn!("Skia: outline of glyph {} failed: {:?}", glyph_id.to_u32(), err);
        return None;
    }
    pen.finish()
}

/// A path pen that builds a tiny-skia Path
struct TinySkiaPathPen {
    builder: PathBuilder,
}

impl TinySkiaPathPen {
    fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
        }
    }

    /// `None` for an empty outline
    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl OutlinePen for TinySkiaPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.builder.quad_to(cx0, cy0, x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.builder.cubic_to(cx0, cy0, cx1, cy1, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
