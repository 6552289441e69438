//! Shared fixtures: the library's stub fonts and system font lookup
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use textimg::prelude::*;
use textimg_fontdb::FontDatabase;

#[path = "../../src/testing.rs"]
mod stubs;

pub use stubs::*;

const DEJAVU_DIRS: &[&str] = &["/usr/share/fonts/truetype/dejavu", "/usr/share/fonts/dejavu"];

/// An installed DejaVu font file, e.g. `DejaVuSerif.ttf`
pub fn dejavu_file(name: &str) -> Option<PathBuf> {
    DEJAVU_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(name))
        .find(|p| p.exists())
}

pub fn dejavu() -> Option<PathBuf> {
    dejavu_file("DejaVuSans.ttf")
}

/// An empty directory under the system temp dir, unique to this process and `name`
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("textimg-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// A database holding only DejaVu Sans, with DejaVu Sans as the whole stack
pub fn dejavu_database() -> Option<Arc<FontDatabase>> {
    let path = dejavu()?;
    let scratch = scratch_dir("tests");
    let db = FontDatabase::new(FontConfig {
        custom_font_path: Some(scratch),
        default_fallback_fonts: vec!["DejaVu Sans".to_string()],
        load_system_fonts: false,
        ..FontConfig::default()
    })
    .ok()?;
    db.load_font_file(path).ok()?;
    Some(Arc::new(db))
}
