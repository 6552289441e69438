//! Layered color glyphs (COLR v0 and v1)
//!
//! skrifa walks a glyph's paint graph and calls back into a [`ColorPainter`].
//! The painter here replays those calls onto a tiny-skia pixmap sized to the
//! glyph's color bounding box. Paint coordinates arrive in font units; the base
//! transform scales them to pixels and flips y.

use skrifa::color::{
    Brush, ColorGlyph, ColorPainter, ColorPalettes, ColorStop, CompositeMode, Extend, Transform,
};
use skrifa::instance::{LocationRef, Size};
use skrifa::raw::types::BoundingBox;
use skrifa::{FontRef, GlyphId, MetadataProvider};
use tiny_skia::{
    BlendMode, FillRule, GradientStop, LinearGradient, Mask, Paint, PathBuilder, Pixmap,
    PixmapPaint, Point, RadialGradient, Rect, Shader, SpreadMode,
};

use textimg_core::{
    error::{RenderError, Result},
    Color, Surface,
};

use crate::outline_path;

/// Palette index standing for the text color
const FOREGROUND: u16 = 0xFFFF;

/// Cap on either side of a color glyph image
const MAX_GLYPH_PX: f32 = 4096.0;

/// A painted color glyph, placed relative to the pen origin on the baseline (y down)
pub(crate) struct ColorImage {
    pub image: Surface,
    pub left: f32,
    pub top: f32,
}

pub(crate) fn lookup<'a>(font: &FontRef<'a>, glyph_id: GlyphId) -> Option<ColorGlyph<'a>> {
    font.color_glyphs().get(glyph_id)
}

fn units_per_em(font: &FontRef<'_>) -> f32 {
    let upem = font
        .metrics(Size::unscaled(), LocationRef::default())
        .units_per_em;
    f32::from(upem.max(1))
}

/// The glyph's own bounding box at `px`, in pixels with y up
pub(crate) fn bounds(font: &FontRef<'_>, glyph: &ColorGlyph<'_>, px: f32) -> Option<BoundingBox<f32>> {
    let scale = px / units_per_em(font);
    glyph
        .bounding_box(LocationRef::default(), Size::unscaled())
        .map(|b| BoundingBox {
            x_min: b.x_min * scale,
            y_min: b.y_min * scale,
            x_max: b.x_max * scale,
            y_max: b.y_max * scale,
        })
}

/// Paint `glyph` at `px` pixels per em into an image covering `bounds`
///
/// Palette entries that refer to the text color take `foreground`.
pub(crate) fn render(
    font: &FontRef<'_>,
    glyph: &ColorGlyph<'_>,
    bounds: BoundingBox<f32>,
    px: f32,
    foreground: Color,
) -> Result<ColorImage> {
    let width = (bounds.x_max - bounds.x_min).ceil().clamp(1.0, MAX_GLYPH_PX) as u32;
    let height = (bounds.y_max - bounds.y_min).ceil().clamp(1.0, MAX_GLYPH_PX) as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapCreationFailed)?;

    let scale = px / units_per_em(font);
    let base = tiny_skia::Transform::from_scale(scale, -scale)
        .post_translate(-bounds.x_min, bounds.y_max);
    let palettes = ColorPalettes::new(font);
    let first_palette = palettes.get(0);
    let palette = first_palette.as_ref().map(|p| p.colors()).unwrap_or_default();

    {
        let mut painter = Painter::new(&mut pixmap, font, palette, foreground, base);
        glyph
            .paint(LocationRef::default(), &mut painter)
            .map_err(|e| RenderError::BackendError(format!("COLR paint failed: {e:?}")))?;
    }

    Ok(ColorImage {
        image: Surface::from_premultiplied(width, height, pixmap.take())?,
        left: bounds.x_min,
        top: -bounds.y_max,
    })
}

/// A [`ColorPainter`] drawing into a tiny-skia pixmap
struct Painter<'a> {
    pixmap: &'a mut Pixmap,
    font: &'a FontRef<'a>,
    palette: &'a [skrifa::color::Color],
    foreground: Color,
    transforms: Vec<tiny_skia::Transform>,
    /// Effective clip at each depth; `None` paints everywhere
    clips: Vec<Option<Mask>>,
    layers: Vec<Layer>,
}

struct Layer {
    pixmap: Pixmap,
    composite_mode: CompositeMode,
}

impl<'a> Painter<'a> {
    fn new(
        pixmap: &'a mut Pixmap,
        font: &'a FontRef<'a>,
        palette: &'a [skrifa::color::Color],
        foreground: Color,
        base: tiny_skia::Transform,
    ) -> Self {
        Self {
            pixmap,
            font,
            palette,
            foreground,
            transforms: vec![base],
            clips: vec![None],
            layers: Vec::new(),
        }
    }

    fn transform(&self) -> tiny_skia::Transform {
        self.transforms
            .last()
            .copied()
            .unwrap_or_default()
    }

    fn clip(&self) -> Option<&Mask> {
        self.clips.last().and_then(Option::as_ref)
    }

    /// Narrow the current clip to `path` (in font units)
    fn push_clip_path(&mut self, path: Option<tiny_skia::Path>) {
        let transform = self.transform();
        let mask = match (self.clip().cloned(), path) {
            (Some(mut mask), Some(path)) => {
                mask.intersect_path(&path, FillRule::Winding, true, transform);
                Some(mask)
            }
            (None, Some(path)) => Mask::new(self.pixmap.width(), self.pixmap.height()).map(|mut mask| {
                mask.fill_path(&path, FillRule::Winding, true, transform);
                mask
            }),
            // Nothing to clip to: nothing shows through
            (_, None) => Mask::new(self.pixmap.width(), self.pixmap.height()),
        };
        self.clips.push(mask);
    }

    fn color(&self, palette_index: u16, alpha: f32) -> tiny_skia::Color {
        palette_color(self.palette, palette_index, alpha, self.foreground)
    }

    fn stops(&self, color_stops: &[ColorStop]) -> Vec<GradientStop> {
        color_stops
            .iter()
            .map(|stop| GradientStop::new(stop.offset, self.color(stop.palette_index, stop.alpha)))
            .collect()
    }

    fn shader(&self, brush: Brush<'_>) -> Option<Shader<'static>> {
        let transform = self.transform();
        match brush {
            Brush::Solid {
                palette_index,
                alpha,
            } => Some(Shader::SolidColor(self.color(palette_index, alpha))),
            Brush::LinearGradient {
                p0,
                p1,
                color_stops,
                extend,
            } => match color_stops {
                [] => None,
                [stop] => Some(Shader::SolidColor(self.color(stop.palette_index, stop.alpha))),
                _ => LinearGradient::new(
                    Point::from_xy(p0.x, p0.y),
                    Point::from_xy(p1.x, p1.y),
                    self.stops(color_stops),
                    spread_mode(extend),
                    transform,
                ),
            },
            Brush::RadialGradient {
                c0,
                r0,
                c1,
                r1,
                color_stops,
                extend,
            } => match color_stops {
                [] => None,
                [stop] => Some(Shader::SolidColor(self.color(stop.palette_index, stop.alpha))),
                // tiny-skia has a single radius; the larger circle bounds the gradient
                _ => RadialGradient::new(
                    Point::from_xy(c0.x, c0.y),
                    Point::from_xy(c1.x, c1.y),
                    r0.max(r1).max(0.001),
                    self.stops(color_stops),
                    spread_mode(extend),
                    transform,
                ),
            },
            Brush::SweepGradient { color_stops, .. } => {
                // No sweep shader in tiny-skia; the middle stop stands in
                let stop = color_stops.get(color_stops.len() / 2)?;
                log::debug!("Skia: sweep gradient drawn as solid ({} stops)", color_stops.len());
                Some(Shader::SolidColor(self.color(stop.palette_index, stop.alpha)))
            }
        }
    }
}

impl ColorPainter for Painter<'_> {
    fn push_transform(&mut self, transform: Transform) {
        let next = self.transform().pre_concat(tiny_skia::Transform::from_row(
            transform.xx,
            transform.yx,
            transform.xy,
            transform.yy,
            transform.dx,
            transform.dy,
        ));
        self.transforms.push(next);
    }

    fn pop_transform(&mut self) {
        if self.transforms.len() > 1 {
            self.transforms.pop();
        }
    }

    fn push_clip_glyph(&mut self, glyph_id: GlyphId) {
        let path = outline_path(self.font, glyph_id, Size::unscaled());
        self.push_clip_path(path);
    }

    fn push_clip_box(&mut self, clip_box: BoundingBox<f32>) {
        let path = Rect::from_ltrb(clip_box.x_min, clip_box.y_min, clip_box.x_max, clip_box.y_max)
            .map(PathBuilder::from_rect);
        self.push_clip_path(path);
    }

    fn pop_clip(&mut self) {
        if self.clips.len() > 1 {
            self.clips.pop();
        }
    }

    fn fill(&mut self, brush: Brush<'_>) {
        let Some(shader) = self.shader(brush) else {
            return;
        };
        let Some(rect) = Rect::from_xywh(
            0.0,
            0.0,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        ) else {
            return;
        };
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        let clip = self.clips.last().and_then(Option::as_ref);
        let target = match self.layers.last_mut() {
            Some(layer) => &mut layer.pixmap,
            None => &mut *self.pixmap,
        };
        target.fill_rect(rect, &paint, tiny_skia::Transform::identity(), clip);
    }

    fn push_layer(&mut self, composite_mode: CompositeMode) {
        if let Some(pixmap) = Pixmap::new(self.pixmap.width(), self.pixmap.height()) {
            self.layers.push(Layer {
                pixmap,
                composite_mode,
            });
        }
    }

    fn pop_layer(&mut self) {
        let Some(layer) = self.layers.pop() else {
            return;
        };
        let paint = PixmapPaint {
            blend_mode: blend_mode(layer.composite_mode),
            ..PixmapPaint::default()
        };
        let target = match self.layers.last_mut() {
            Some(parent) => &mut parent.pixmap,
            None => &mut *self.pixmap,
        };
        target.draw_pixmap(
            0,
            0,
            layer.pixmap.as_ref(),
            &paint,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    fn pop_layer_with_mode(&mut self, composite_mode: CompositeMode) {
        if let Some(layer) = self.layers.last_mut() {
            layer.composite_mode = composite_mode;
        }
        self.pop_layer();
    }
}

/// Resolve a palette entry; out-of-range entries fall back to the text color
fn palette_color(
    palette: &[skrifa::color::Color],
    index: u16,
    alpha: f32,
    foreground: Color,
) -> tiny_skia::Color {
    let (r, g, b, a) = match palette.get(index as usize) {
        Some(c) if index != FOREGROUND => (c.red, c.green, c.blue, c.alpha),
        _ => (foreground.r, foreground.g, foreground.b, foreground.a),
    };
    let a = (f32::from(a) * alpha.clamp(0.0, 1.0)).round() as u8;
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn spread_mode(extend: Extend) -> SpreadMode {
    match extend {
        Extend::Pad | Extend::Unknown => SpreadMode::Pad,
        Extend::Repeat => SpreadMode::Repeat,
        Extend::Reflect => SpreadMode::Reflect,
    }
}

fn blend_mode(mode: CompositeMode) -> BlendMode {
    match mode {
        CompositeMode::Clear => BlendMode::Clear,
        CompositeMode::Src => BlendMode::Source,
        CompositeMode::Dest => BlendMode::Destination,
        CompositeMode::SrcOver => BlendMode::SourceOver,
        CompositeMode::DestOver => BlendMode::DestinationOver,
        CompositeMode::SrcIn => BlendMode::SourceIn,
        CompositeMode::DestIn => BlendMode::DestinationIn,
        CompositeMode::SrcOut => BlendMode::SourceOut,
        CompositeMode::DestOut => BlendMode::DestinationOut,
        CompositeMode::SrcAtop => BlendMode::SourceAtop,
        CompositeMode::DestAtop => BlendMode::DestinationAtop,
        CompositeMode::Xor => BlendMode::Xor,
        CompositeMode::Plus => BlendMode::Plus,
        CompositeMode::Screen => BlendMode::Screen,
        CompositeMode::Overlay => BlendMode::Overlay,
        CompositeMode::Darken => BlendMode::Darken,
        CompositeMode::Lighten => BlendMode::Lighten,
        CompositeMode::ColorDodge => BlendMode::ColorDodge,
        CompositeMode::ColorBurn => BlendMode::ColorBurn,
        CompositeMode::HardLight => BlendMode::HardLight,
        CompositeMode::SoftLight => BlendMode::SoftLight,
        CompositeMode::Difference => BlendMode::Difference,
        CompositeMode::Exclusion => BlendMode::Exclusion,
        CompositeMode::Multiply => BlendMode::Multiply,
        CompositeMode::HslHue => BlendMode::Hue,
        CompositeMode::HslSaturation => BlendMode::Saturation,
        CompositeMode::HslColor => BlendMode::Color,
        CompositeMode::HslLuminosity => BlendMode::Luminosity,
        CompositeMode::Unknown => BlendMode::SourceOver,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> skrifa::color::Color {
        skrifa::color::Color {
            red: 255,
            green: 0,
            blue: 0,
            alpha: 255,
        }
    }

    #[test]
    fn test_palette_entry_is_used() {
        let c = palette_color(&[red()], 0, 1.0, Color::black());
        assert_eq!(c.to_color_u8().red(), 255);
        assert_eq!(c.to_color_u8().alpha(), 255);
    }

    #[test]
    fn test_foreground_entry_takes_text_color() {
        let fg = Color::rgb(0, 0, 255);
        let c = palette_color(&[red()], FOREGROUND, 0.5, fg).to_color_u8();
        assert_eq!((c.red(), c.green(), c.blue()), (0, 0, 255));
        assert_eq!(c.alpha(), 128);
        // Out of range behaves the same
        let c = palette_color(&[], 3, 1.0, fg).to_color_u8();
        assert_eq!(c.blue(), 255);
    }

    #[test]
    fn test_composite_modes_map_to_blend_modes() {
        assert_eq!(blend_mode(CompositeMode::SrcOver), BlendMode::SourceOver);
        assert_eq!(blend_mode(CompositeMode::Multiply), BlendMode::Multiply);
        assert_eq!(blend_mode(CompositeMode::DestIn), BlendMode::DestinationIn);
        assert_eq!(blend_mode(CompositeMode::Unknown), BlendMode::SourceOver);
    }

    #[test]
    fn test_extend_maps_to_spread_mode() {
        assert_eq!(spread_mode(Extend::Pad), SpreadMode::Pad);
        assert_eq!(spread_mode(Extend::Reflect), SpreadMode::Reflect);
    }
}
