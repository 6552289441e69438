//! Subcommand implementations

pub mod render;
pub mod which;

use std::sync::Arc;

use anyhow::{Context, Result};
use textimg_fontdb::{FontConfig, FontDatabase};

use crate::cli::FontArgs;

/// Build the font database the flags describe, on top of `TEXTIMG_*` settings
pub fn open_database(args: &FontArgs) -> Result<Arc<FontDatabase>> {
    let mut config = FontConfig::from_env().context("Invalid font configuration")?;
    if let Some(dir) = &args.font_dir {
        config.custom_font_path = Some(dir.clone());
    }
    if args.no_system_fonts {
        config.load_system_fonts = false;
    }

    let db = FontDatabase::new(config).context("Failed to open font database")?;
    for path in &args.font_files {
        db.load_font_file(path)
            .with_context(|| format!("Failed to load font file {}", path.display()))?;
    }
    log::info!("{} font faces available", db.len());
    Ok(Arc::new(db))
}
