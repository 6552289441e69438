//! One styled character and how it lands on a surface

use std::fmt;
use std::sync::Arc;

use textimg_core::{
    error::{RenderError, Result},
    Color, FontFace, GlyphPaint, RasterFont, Surface,
};

/// A character with its font, size, colors and measured box
///
/// Metrics are in requested-size pixels. For fixed-size fonts they are
/// measured at the font's only size and scaled by `font_size / fixed_size`.
#[derive(Clone)]
pub struct GlyphRun {
    ch: char,
    face: Arc<dyn FontFace>,
    raster: Arc<dyn RasterFont>,
    font_size: u32,
    paint: GlyphPaint,
    ascent: f32,
    descent: f32,
    width: f32,
    height: f32,
}

impl fmt::Debug for GlyphRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphRun")
            .field("ch", &self.ch)
            .field("family", &self.face.family())
            .field("font_size", &self.font_size)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl GlyphRun {
    /// Measure `ch` in `face` at `font_size`
    pub fn new(
        ch: char,
        face: Arc<dyn FontFace>,
        font_size: u32,
        fill: Color,
        stroke_width: u32,
        stroke_color: Option<Color>,
    ) -> Result<Self> {
        if font_size == 0 {
            return Err(RenderError::InvalidDimensions {
                width: 0,
                height: 0,
            }
            .into());
        }
        let raster = face.load_at_size(face.fixed_size().unwrap_or(font_size))?;
        let metrics = raster.metrics();
        let extent = raster.measure(ch, stroke_width);
        let scale = Self::scale_for(face.as_ref(), font_size);

        Ok(Self {
            ch,
            raster,
            font_size,
            paint: GlyphPaint {
                fill,
                stroke_width,
                stroke: stroke_color,
            },
            ascent: metrics.ascent * scale,
            descent: metrics.descent * scale,
            width: extent.advance * scale,
            height: extent.height * scale,
            face,
        })
    }

    fn scale_for(face: &dyn FontFace, font_size: u32) -> f32 {
        match face.fixed_size() {
            Some(fixed) if fixed > 0 => font_size as f32 / fixed as f32,
            _ => 1.0,
        }
    }

    pub fn ch(&self) -> char {
        self.ch
    }

    pub fn face(&self) -> &Arc<dyn FontFace> {
        &self.face
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn paint(&self) -> &GlyphPaint {
        &self.paint
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    /// Advance width, stroke included
    pub fn width(&self) -> f32 {
        self.width
    }

    /// From the ascent line to the lowest inked pixel
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Draw with the box's top-left corner at `position`
    ///
    /// Fixed-size fonts are rasterized at their own size onto a scratch
    /// surface, which is then resampled to the measured box and blended.
    pub fn draw_on(&self, surface: &mut Surface, position: (i32, i32)) -> Result<()> {
        let Some(fixed) = self.face.fixed_size().filter(|&fixed| fixed > 0) else {
            let origin = (position.0 as f32, position.1 as f32);
            return self.raster.draw_glyph(surface, self.ch, origin, &self.paint);
        };

        let ratio = fixed as f32 / self.font_size as f32;
        let raw_width = ((self.width * ratio) as u32).max(1);
        let raw_height = ((self.height * ratio) as u32).max(1);
        let mut scratch = Surface::new(raw_width, raw_height, None)?;
        self.raster
            .draw_glyph(&mut scratch, self.ch, (0.0, 0.0), &self.paint)?;

        let scaled = scratch.resize((self.width as u32).max(1), (self.height as u32).max(1))?;
        log::debug!(
            "{:?} rescaled from {}x{} to {}x{}",
            self.ch,
            raw_width,
            raw_height,
            scaled.width(),
            scaled.height()
        );
        surface.blend(&scaled, position.0, position.1);
        Ok(())
    }
}
