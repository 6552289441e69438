//! Fitting plain text into a box on an existing surface
//!
//! The text is laid out at `max_font_size`, wrapped to the box width when it
//! is wider, and shrunk one pixel size at a time until it is short enough.

use textimg_core::{
    error::Result,
    types::{HAlign, VAlign},
    Color, Surface, TextImgError,
};

use crate::{fallback::FontSelector, style::TextStyle, text2image::Text2Image};

/// A box on a surface, edges in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Region {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub max_font_size: u32,
    pub min_font_size: u32,
    pub bold: bool,
    pub fill: Color,
    pub spacing: u32,
    /// Where the text block sits inside the region
    pub halign: HAlign,
    pub valign: VAlign,
    /// How lines align inside the text block
    pub lines_align: HAlign,
    /// Stroke width as a fraction of the font size
    pub stroke_ratio: f32,
    pub stroke_color: Option<Color>,
    pub font_name: Option<String>,
    pub fallback_fonts: Vec<String>,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_font_size: 30,
            min_font_size: 12,
            bold: false,
            fill: Color::black(),
            spacing: 4,
            halign: HAlign::Center,
            valign: VAlign::Center,
            lines_align: HAlign::Left,
            stroke_ratio: 0.0,
            stroke_color: None,
            font_name: None,
            fallback_fonts: Vec::new(),
        }
    }
}

impl FitOptions {
    fn style_at(&self, font_size: u32) -> TextStyle {
        TextStyle {
            font_size,
            bold: self.bold,
            fill: self.fill,
            spacing: self.spacing,
            align: self.lines_align,
            stroke_width: (font_size as f32 * self.stroke_ratio) as u32,
            stroke_color: self.stroke_color,
            font_name: self.font_name.clone(),
            fallback_fonts: self.fallback_fonts.clone(),
        }
    }
}

/// Lay out `text` at the largest size that fits `region`
///
/// Returns the layout and the size it was built at, or
/// [`TextImgError::DoesNotFit`] once the size would drop below
/// `min_font_size`.
pub fn fit_text(
    text: &str,
    region: Region,
    options: &FitOptions,
    selector: &FontSelector,
) -> Result<(Text2Image, u32)> {
    let width = region.width() as f32;
    let height = region.height() as f32;
    let mut font_size = options.max_font_size;

    loop {
        let mut layout = Text2Image::from_text(text, &options.style_at(font_size), selector)?;
        if layout.width() > width {
            layout.wrap(width);
        }
        if layout.height() <= height {
            log::debug!("Text fits {}x{} at {}px", region.width(), region.height(), font_size);
            return Ok((layout, font_size));
        }
        font_size = font_size.saturating_sub(1);
        if font_size < options.min_font_size || font_size == 0 {
            return Err(TextImgError::DoesNotFit {
                width: region.width().max(0) as u32,
                height: region.height().max(0) as u32,
                min_size: options.min_font_size,
            });
        }
    }
}

/// Draw `text` inside `region` of `surface`, shrinking it until it fits
pub fn draw_text(
    surface: &mut Surface,
    region: Region,
    text: &str,
    options: &FitOptions,
    selector: &FontSelector,
) -> Result<()> {
    let (layout, _) = fit_text(text, region, options, selector)?;
    let text_width = layout.width();
    let text_height = layout.height();
    let width = region.width() as f32;
    let height = region.height() as f32;

    let x = region.left as f32
        + match options.halign {
            HAlign::Left => 0.0,
            HAlign::Center => (width - text_width) / 2.0,
            HAlign::Right => width - text_width,
        };
    let y = region.top as f32
        + match options.valign {
            VAlign::Top => 0.0,
            VAlign::Center => (height - text_height) / 2.0,
            VAlign::Bottom => height - text_height,
        };

    let block = layout.to_image(None, (0, 0))?;
    surface.blend(&block, x as i32, y as i32);
    Ok(())
}
