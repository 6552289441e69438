//! textimg - styled text rendered to images
//!
//! Text goes through four steps:
//! 1. Markup parsing: `[b]`, `[color=...]` and friends resolve to per-character styles
//! 2. Font selection: each character gets the first font that can draw it
//! 3. Layout: characters become glyph runs, runs become lines, lines get wrapped
//! 4. Composition: lines are drawn onto a surface on shared baselines
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use textimg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let db = Arc::new(FontDatabase::new(FontConfig::default())?);
//! let renderer = TextRenderer::from_database(db);
//! let image = renderer.render_markup(
//!     "[size=48][b]Hello[/b][/size]\n[color=#ff0000]world[/color]",
//!     &RenderOptions::for_markup(),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! Fonts that only exist at one size, like bitmap color emoji, are drawn at
//! that size and resampled to the requested one.

pub mod fallback;
pub mod fit;
pub mod glyph_run;
pub mod line;
pub mod markup;
pub mod renderer;
pub mod style;
pub mod text2image;

#[cfg(test)]
extern crate self as textimg;
#[cfg(test)]
mod testing;

pub use textimg_core::{error, types, Color, Surface};
pub use textimg_fontdb as fontdb;

pub use fallback::FontSelector;
pub use fit::{draw_text, fit_text, FitOptions, Region};
pub use glyph_run::GlyphRun;
pub use line::Line;
pub use markup::StyledChar;
pub use renderer::{RenderOptions, TextRenderer};
pub use style::TextStyle;
pub use text2image::Text2Image;

/// Common imports for typical usage
pub mod prelude {
    pub use textimg_core::{
        error::{Result, TextImgError},
        traits::{FontFace, FontRegistry, RasterFont},
        types::{FontStyle, FontWeight, HAlign, VAlign},
        Color, Surface,
    };
    pub use textimg_fontdb::{FontConfig, FontDatabase};

    pub use crate::{
        FitOptions, FontSelector, Region, RenderOptions, Text2Image, TextRenderer, TextStyle,
    };
}
