//! Text in, surface out

use std::sync::Arc;

use textimg_core::{error::Result, Color, Surface};
use textimg_fontdb::FontDatabase;

use crate::{
    fallback::FontSelector,
    fit::{self, FitOptions, Region},
    style::TextStyle,
    text2image::Text2Image,
};

/// Everything besides the text that shapes a rendered image
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Canvas color; transparent when unset
    pub background: Option<Color>,
    /// Horizontal and vertical padding around the text block
    pub padding: (u32, u32),
    /// Lines wider than this are wrapped
    pub max_width: Option<f32>,
    pub style: TextStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: Some(Color::white()),
            padding: (10, 10),
            max_width: None,
            style: TextStyle::default(),
        }
    }
}

impl RenderOptions {
    /// Defaults with markup line spacing
    pub fn for_markup() -> Self {
        Self {
            style: TextStyle::for_markup(),
            ..Self::default()
        }
    }
}

/// Renders text with one font selector shared by every call
pub struct TextRenderer {
    selector: FontSelector,
}

impl TextRenderer {
    pub fn new(selector: FontSelector) -> Self {
        Self { selector }
    }

    pub fn from_database(db: Arc<FontDatabase>) -> Self {
        Self::new(FontSelector::from_database(db))
    }

    pub fn selector(&self) -> &FontSelector {
        &self.selector
    }

    pub fn layout(&self, text: &str, style: &TextStyle) -> Result<Text2Image> {
        Text2Image::from_text(text, style, &self.selector)
    }

    pub fn layout_markup(&self, text: &str, style: &TextStyle) -> Result<Text2Image> {
        Text2Image::from_bbcode_text(text, style, &self.selector)
    }

    /// Render literal text
    pub fn render(&self, text: &str, options: &RenderOptions) -> Result<Surface> {
        let layout = self.layout(text, &options.style)?;
        self.finish(layout, options)
    }

    /// Render text written in the bracket markup
    pub fn render_markup(&self, text: &str, options: &RenderOptions) -> Result<Surface> {
        let layout = self.layout_markup(text, &options.style)?;
        self.finish(layout, options)
    }

    /// Draw literal text into `region` of `surface` at the largest size that fits
    pub fn draw_text(
        &self,
        surface: &mut Surface,
        region: Region,
        text: &str,
        options: &FitOptions,
    ) -> Result<()> {
        fit::draw_text(surface, region, text, options, &self.selector)
    }

    fn finish(&self, mut layout: Text2Image, options: &RenderOptions) -> Result<Surface> {
        if let Some(max_width) = options.max_width {
            layout.wrap(max_width);
        }
        layout.to_image(options.background, options.padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stub_selector;

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.background, Some(Color::white()));
        assert_eq!(options.padding, (10, 10));
        assert_eq!(options.max_width, None);
        assert_eq!(RenderOptions::for_markup().style.spacing, 6);
    }

    #[test]
    fn test_render_applies_max_width() {
        let renderer = TextRenderer::new(stub_selector());
        let options = RenderOptions {
            max_width: Some(45.0),
            padding: (0, 0),
            ..RenderOptions::default()
        };
        let image = renderer.render("abcdef", &options).unwrap();
        // Two lines of three 15px glyphs
        assert_eq!(image.size(), (45, 24 + 4 + 30));
    }

    #[test]
    fn test_render_markup_strips_tags() {
        let renderer = TextRenderer::new(stub_selector());
        let options = RenderOptions {
            padding: (0, 0),
            ..RenderOptions::for_markup()
        };
        let image = renderer.render_markup("[b]ab[/b]", &options).unwrap();
        assert_eq!(image.size(), (30, 30));
    }
}
