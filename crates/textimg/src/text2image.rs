//! Multi-line styled text and its composition onto a surface

use std::mem;

use textimg_core::{
    error::{RenderError, Result},
    types::{FontStyle, FontWeight, HAlign},
    Color, Surface,
};

use crate::{
    fallback::FontSelector,
    glyph_run::GlyphRun,
    line::Line,
    markup::{self, MarkupDefaults},
    style::TextStyle,
};

/// Lines of glyph runs stacked with a fixed spacing
#[derive(Debug, Clone, Default)]
pub struct Text2Image {
    lines: Vec<Line>,
    spacing: u32,
}

impl Text2Image {
    pub fn new(lines: Vec<Line>, spacing: u32) -> Self {
        Self { lines, spacing }
    }

    /// Lay out literal text, one line per `\n`
    ///
    /// Blank lines are kept; a trailing `\n` does not start another line.
    pub fn from_text(text: &str, style: &TextStyle, selector: &FontSelector) -> Result<Self> {
        let weight = style.weight();
        let mut lines = Vec::new();
        let mut runs = Vec::new();

        for ch in text.chars() {
            if ch == '\n' {
                lines.push(Line::new(mem::take(&mut runs), style.align));
                continue;
            }
            let face = selector.get_proper_font(
                ch,
                FontStyle::Normal,
                weight,
                style.font_name.as_deref(),
                &style.fallback_fonts,
            )?;
            runs.push(GlyphRun::new(
                ch,
                face,
                style.font_size,
                style.fill,
                style.stroke_width,
                style.stroke_color,
            )?);
        }
        if !runs.is_empty() {
            lines.push(Line::new(runs, style.align));
        }

        Ok(Self::new(lines, style.spacing))
    }

    /// Lay out markup text
    ///
    /// `style` supplies the values outside every tag. Besides `\n`, a change
    /// of alignment between two characters also starts a new line.
    pub fn from_bbcode_text(text: &str, style: &TextStyle, selector: &FontSelector) -> Result<Self> {
        let defaults = MarkupDefaults {
            align: style.align,
            color: style.fill,
            font: style.font_name.clone(),
            size: style.font_size,
            bold: style.bold,
        };

        let mut lines = Vec::new();
        let mut runs = Vec::new();
        let mut last_align = style.align;

        for styled in markup::parse(text, &defaults) {
            if styled.ch == '\n' {
                lines.push(Line::new(mem::take(&mut runs), last_align));
                continue;
            }
            if styled.align != last_align {
                if !runs.is_empty() {
                    lines.push(Line::new(mem::take(&mut runs), last_align));
                }
                last_align = styled.align;
            }
            let face = selector.get_proper_font(
                styled.ch,
                FontStyle::Normal,
                FontWeight::from_bold(styled.bold),
                styled.font.as_deref(),
                &style.fallback_fonts,
            )?;
            runs.push(GlyphRun::new(
                styled.ch,
                face,
                styled.size,
                styled.color,
                style.stroke_width,
                style.stroke_color,
            )?);
        }
        if !runs.is_empty() {
            lines.push(Line::new(runs, last_align));
        }

        Ok(Self::new(lines, style.spacing))
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn spacing(&self) -> u32 {
        self.spacing
    }

    /// Widest line
    pub fn width(&self) -> f32 {
        self.lines.iter().map(Line::width).fold(0.0, f32::max)
    }

    /// Every line's ascent plus the spacing between lines, then the last
    /// line's descent
    pub fn height(&self) -> f32 {
        let Some(last) = self.lines.last() else {
            return 0.0;
        };
        let ascents: f32 = self.lines.iter().map(Line::ascent).sum();
        let gaps = self.spacing as f32 * (self.lines.len() - 1) as f32;
        ascents + gaps + last.descent()
    }

    /// Re-flow every line to at most `max_width`
    pub fn wrap(&mut self, max_width: f32) -> &mut Self {
        self.lines = self
            .lines
            .iter()
            .flat_map(|line| line.wrap(max_width))
            .collect();
        self
    }

    /// Render onto a new surface with `padding` around the text block
    ///
    /// Lines sit on a shared baseline and are aligned inside the block's
    /// width. The surface is transparent unless `background` is given.
    pub fn to_image(&self, background: Option<Color>, padding: (u32, u32)) -> Result<Surface> {
        let width = self.width();
        let (Some(canvas_width), Some(canvas_height)) =
            (padded(width, padding.0), padded(self.height(), padding.1))
        else {
            return Err(RenderError::InvalidDimensions {
                width: padding.0.saturating_mul(2),
                height: padding.1.saturating_mul(2),
            }
            .into());
        };
        let mut surface = Surface::new(canvas_width, canvas_height, background)?;

        let mut top = padding.1 as f32;
        for line in &self.lines {
            let offset = match line.align() {
                HAlign::Left => 0.0,
                HAlign::Center => (width - line.width()) / 2.0,
                HAlign::Right => width - line.width(),
            };
            let mut x = padding.0 as f32 + offset;
            for run in line.runs() {
                let y = top + line.ascent() - run.ascent();
                run.draw_on(&mut surface, (x.floor() as i32, y.floor() as i32))?;
                x += run.width();
            }
            top += line.ascent() + self.spacing as f32;
        }

        log::debug!(
            "Composed {} lines into {}x{}",
            self.lines.len(),
            canvas_width,
            canvas_height
        );
        Ok(surface)
    }
}

/// `extent` rounded up with `pad` on both sides, `None` past `u32::MAX`
fn padded(extent: f32, pad: u32) -> Option<u32> {
    pad.checked_mul(2)?.checked_add(extent.ceil() as u32)
}
