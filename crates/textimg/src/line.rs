//! A row of glyph runs sharing one alignment

use textimg_core::types::HAlign;

use crate::glyph_run::GlyphRun;

#[derive(Debug, Clone, Default)]
pub struct Line {
    runs: Vec<GlyphRun>,
    align: HAlign,
}

impl Line {
    pub fn new(runs: Vec<GlyphRun>, align: HAlign) -> Self {
        Self { runs, align }
    }

    pub fn runs(&self) -> &[GlyphRun] {
        &self.runs
    }

    pub fn align(&self) -> HAlign {
        self.align
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Sum of advance widths
    pub fn width(&self) -> f32 {
        self.runs.iter().map(GlyphRun::width).sum()
    }

    /// Tallest glyph box
    pub fn height(&self) -> f32 {
        self.runs.iter().map(GlyphRun::height).fold(0.0, f32::max)
    }

    pub fn ascent(&self) -> f32 {
        self.runs.iter().map(GlyphRun::ascent).fold(0.0, f32::max)
    }

    pub fn descent(&self) -> f32 {
        self.runs.iter().map(GlyphRun::descent).fold(0.0, f32::max)
    }

    /// Split greedily into lines no wider than `max_width`
    ///
    /// A run that is wider than `max_width` on its own still gets a line of
    /// its own. Always yields at least one line, so an empty line wraps to
    /// one empty line.
    pub fn wrap(&self, max_width: f32) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut width = 0.0;

        for (idx, run) in self.runs.iter().enumerate() {
            if idx > start && width + run.width() > max_width {
                lines.push(Line::new(self.runs[start..idx].to_vec(), self.align));
                start = idx;
                width = 0.0;
            }
            width += run.width();
        }
        lines.push(Line::new(self.runs[start..].to_vec(), self.align));
        lines
    }
}
