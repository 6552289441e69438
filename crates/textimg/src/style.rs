//! Style options shared by the plain-text and markup entry points

use textimg_core::{
    types::{FontWeight, HAlign},
    Color,
};

/// Font size used when none is given
pub const DEFAULT_FONT_SIZE: u32 = 30;

/// Line spacing for plain text and region fitting
pub const DEFAULT_SPACING: u32 = 4;

/// Line spacing for markup text
pub const MARKUP_SPACING: u32 = 6;

/// How text should look before markup overrides anything
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Requested size in pixels per em
    pub font_size: u32,
    pub bold: bool,
    pub fill: Color,
    /// Pixels between one line's ascent box and the next
    pub spacing: u32,
    pub align: HAlign,
    /// Stroke width in pixels, 0 for none
    pub stroke_width: u32,
    /// Stroke color; the fill color is used when unset
    pub stroke_color: Option<Color>,
    /// Tried before any fallback font
    pub font_name: Option<String>,
    /// Replaces the registry's default fallback stack when non-empty
    pub fallback_fonts: Vec<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            bold: false,
            fill: Color::black(),
            spacing: DEFAULT_SPACING,
            align: HAlign::Left,
            stroke_width: 0,
            stroke_color: None,
            font_name: None,
            fallback_fonts: Vec::new(),
        }
    }
}

impl TextStyle {
    /// Defaults for markup text, which is set a little looser
    pub fn for_markup() -> Self {
        Self {
            spacing: MARKUP_SPACING,
            ..Self::default()
        }
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_align(mut self, align: HAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_stroke(mut self, width: u32, color: Option<Color>) -> Self {
        self.stroke_width = width;
        self.stroke_color = color;
        self
    }

    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }

    pub fn weight(&self) -> FontWeight {
        FontWeight::from_bold(self.bold)
    }
}
