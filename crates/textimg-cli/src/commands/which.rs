//! Which command implementation
//!
//! Prints the font every character of the input resolves to.

use anyhow::{Context, Result};
use textimg::FontSelector;
use textimg_core::types::{FontStyle, FontWeight};

use crate::cli::WhichArgs;

pub fn run(args: &WhichArgs) -> Result<()> {
    let db = super::open_database(&args.fonts)?;
    let selector = FontSelector::from_database(db);
    let weight = FontWeight::from_bold(args.fonts.bold);

    for ch in args.text.chars().filter(|ch| !ch.is_control()) {
        let face = selector
            .get_proper_font(
                ch,
                FontStyle::Normal,
                weight,
                args.fonts.font.as_deref(),
                &args.fonts.fallback,
            )
            .with_context(|| format!("No font for {ch:?}"))?;
        let covered = if face.has_glyph(ch) { "" } else { " (missing glyph)" };
        match face.path() {
            Some(path) => println!(
                "U+{:04X} {:?} -> {} [{}]{}",
                ch as u32,
                ch,
                face.family(),
                path.display(),
                covered
            ),
            None => println!("U+{:04X} {:?} -> {}{}", ch as u32, ch, face.family(), covered),
        }
    }
    Ok(())
}
