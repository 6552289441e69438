//! The compositing target text is rendered into.
//!
//! Pixels are stored as premultiplied RGBA so tiny-skia can draw into the buffer
//! directly. Zero-sized surfaces are valid; drawing into them is a no-op.

use tiny_skia::{
    FilterQuality, Paint, PixmapMut, PixmapPaint, PixmapRef, Rect, Transform,
};

use crate::{
    error::{RenderError, Result},
    Color,
};

/// Largest width or height a surface may have
pub const MAX_DIMENSION: u32 = 65535;

/// An RGBA raster image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a surface, transparent unless `fill` is given
    pub fn new(width: u32, height: u32, fill: Option<Color>) -> Result<Self> {
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        let mut surface = Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        };
        if let Some(color) = fill {
            surface.fill(color);
        }
        Ok(surface)
    }

    /// Build a surface from straight (non-premultiplied) RGBA bytes
    pub fn from_rgba(width: u32, height: u32, mut rgba: Vec<u8>) -> Result<Self> {
        if width > MAX_DIMENSION
            || height > MAX_DIMENSION
            || rgba.len() != width as usize * height as usize * 4
        {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        premultiply(&mut rgba);
        Ok(Self {
            width,
            height,
            data: rgba,
        })
    }

    /// Wrap bytes that are already premultiplied RGBA
    pub fn from_premultiplied(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width > MAX_DIMENSION
            || height > MAX_DIMENSION
            || data.len() != width as usize * height as usize * 4
        {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied RGBA bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable tiny-skia view for drawing; `None` for an empty surface
    pub fn pixmap_mut(&mut self) -> Option<PixmapMut<'_>> {
        PixmapMut::from_bytes(&mut self.data, self.width, self.height)
    }

    /// Read-only tiny-skia view; `None` for an empty surface
    pub fn pixmap(&self) -> Option<PixmapRef<'_>> {
        PixmapRef::from_bytes(&self.data, self.width, self.height)
    }

    /// Overwrite every pixel with `color`
    pub fn fill(&mut self, color: Color) {
        let px = premultiplied(color);
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Fill an axis-aligned rectangle, blending with what is underneath
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = false;
        if let Some(mut pixmap) = self.pixmap_mut() {
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    /// Straight-alpha color at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[idx..idx + 4]);
        unpremultiply(&mut px);
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Alpha-composite `src` over this surface with its top-left at `(x, y)`
    pub fn blend(&mut self, src: &Surface, x: i32, y: i32) {
        let Some(src) = src.pixmap() else {
            return;
        };
        if let Some(mut dst) = self.pixmap_mut() {
            dst.draw_pixmap(
                x,
                y,
                src,
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }

    /// Composite `src` scaled by `(sx, sy)` with its top-left at `(x, y)`
    ///
    /// Used for bitmap glyphs whose strike size differs from the target size.
    pub fn draw_scaled(&mut self, src: &Surface, x: f32, y: f32, sx: f32, sy: f32) {
        let Some(src) = src.pixmap() else {
            return;
        };
        let paint = PixmapPaint {
            quality: FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_scale(sx, sy).post_translate(x, y);
        if let Some(mut dst) = self.pixmap_mut() {
            dst.draw_pixmap(0, 0, src, &paint, transform, None);
        }
    }

    /// Resample to a new size with bicubic filtering
    pub fn resize(&self, width: u32, height: u32) -> Result<Surface> {
        let mut resized = Surface::new(width, height, None)?;
        if (width, height) == (self.width, self.height) {
            resized.data.copy_from_slice(&self.data);
            return Ok(resized);
        }
        let Some(src) = self.pixmap() else {
            return Ok(resized);
        };
        let sx = width as f32 / self.width as f32;
        let sy = height as f32 / self.height as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };
        if let Some(mut dst) = resized.pixmap_mut() {
            dst.draw_pixmap(0, 0, src, &paint, Transform::from_scale(sx, sy), None);
        }
        Ok(resized)
    }

    /// Straight-alpha RGBA bytes, row-major
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = self.data.clone();
        for px in rgba.chunks_exact_mut(4) {
            unpremultiply(px);
        }
        rgba
    }

    /// RGB bytes with alpha discarded
    pub fn to_rgb(&self) -> Vec<u8> {
        self.to_rgba()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }
}

fn premultiplied(color: Color) -> [u8; 4] {
    let a = color.a as u32;
    [
        (color.r as u32 * a / 255) as u8,
        (color.g as u32 * a / 255) as u8,
        (color.b as u32 * a / 255) as u8,
        color.a,
    ]
}

fn premultiply(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 255 {
            continue;
        }
        px[0] = (px[0] as u32 * a / 255) as u8;
        px[1] = (px[1] as u32 * a / 255) as u8;
        px[2] = (px[2] as u32 * a / 255) as u8;
    }
}

/// Undo premultiplication of a single pixel, rounding to nearest
fn unpremultiply(px: &mut [u8]) {
    let a = px[3] as u32;
    if a == 0 {
        px[0] = 0;
        px[1] = 0;
        px[2] = 0;
        return;
    }
    if a == 255 {
        return;
    }
    for c in &mut px[..3] {
        *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
    }
}
