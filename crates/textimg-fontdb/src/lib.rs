//! Where fonts are found: the font database for textimg
//!
//! Wraps a [`fontdb::Database`] populated from the plugin font directory first
//! and the system font paths second, and answers [`FontRegistry`] lookups by
//! family name, generic family or font file name.
//!
//! ## Lookups
//!
//! - `"Noto Sans CJK JP"` - family name, matched case-insensitively
//! - `"msyh.ttc"` - a font file, looked for in the plugin directory first
//! - `"sans-serif"` - whatever the database maps the generic family to
//!
//! Resolved faces are cached per (family, style, weight). Absent families are
//! cached too, so a fallback stack full of fonts that are not installed only
//! costs one query each.

mod config;
mod face;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use parking_lot::RwLock;
use walkdir::WalkDir;

use textimg_core::{
    error::{FontLoadError, Result},
    types::{FontStyle, FontWeight},
    FontFace, FontRegistry, TextImgError,
};

pub use config::{
    parse_font_list, FontConfig, DEFAULT_FALLBACK_FONTS, DEFAULT_FONT_DIR, FIXED_SIZE_FONTS,
};
pub use face::FontFile;

/// Extensions the plugin directory is scanned for
const LOADABLE_EXTENSIONS: &[&str] = &["ttf", "ttc", "otf", "otc"];

/// Extensions that mark a family name as a file name
const FILE_NAME_EXTENSIONS: &[&str] = &["ttf", "ttc", "otf", "otc", "fnt"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    style: FontStyle,
    weight: FontWeight,
}

/// The font library: every face from the plugin directory and the system
pub struct FontDatabase {
    config: FontConfig,
    font_dir: PathBuf,
    db: RwLock<Database>,
    /// `None` remembers a family that is not installed
    faces: RwLock<HashMap<FaceKey, Option<Arc<FontFile>>>>,
    /// File bytes shared by all faces of a collection
    files: RwLock<HashMap<PathBuf, Arc<Vec<u8>>>>,
    /// Bumped on every change to the font set
    generation: AtomicU64,
}

impl FontDatabase {
    /// Build the database once, up front
    pub fn new(config: FontConfig) -> Result<Self> {
        let font_dir = config.font_dir()?;
        let mut db = Database::new();

        let local = load_plugin_dir(&mut db, &font_dir);
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        log::info!(
            "Font database ready: {} faces ({} files from {})",
            db.len(),
            local,
            font_dir.display()
        );

        Ok(Self {
            config,
            font_dir,
            db: RwLock::new(db),
            faces: RwLock::new(HashMap::new()),
            files: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        })
    }

    /// Defaults overridden by `TEXTIMG_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(FontConfig::from_env()?)
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    /// The plugin font directory, expanded
    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }

    /// Number of faces known to the database
    pub fn len(&self) -> usize {
        self.db.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every family name in the database, sorted
    pub fn families(&self) -> Vec<String> {
        let db = self.db.read();
        let mut families: Vec<String> = db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    /// Register one more font file
    pub fn load_font_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.db
            .write()
            .load_font_file(path)
            .map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
        self.fonts_changed();
        Ok(())
    }

    /// Register font bytes that do not live on disk
    pub fn load_font_data(&self, data: Vec<u8>) {
        self.db.write().load_font_data(data);
        self.fonts_changed();
    }

    /// Drop cached lookups, including remembered misses
    fn fonts_changed(&self) {
        self.faces.write().clear();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Copy a font file into the plugin directory and register it
    ///
    /// Does nothing when a file called `name` is already there.
    pub fn add_font(&self, name: &str, source: impl AsRef<Path>) -> Result<PathBuf> {
        if Path::new(name).file_name().and_then(|n| n.to_str()) != Some(name) {
            return Err(TextImgError::ConfigError(format!(
                "font name '{name}' must be a plain file name"
            )));
        }
        let dest = self.font_dir.join(name);
        if dest.exists() {
            log::debug!("Font {} already present at {}", name, dest.display());
            return Ok(dest);
        }

        let source = source.as_ref();
        if !source.is_file() {
            return Err(FontLoadError::FileNotFound(source.display().to_string()).into());
        }
        std::fs::create_dir_all(&self.font_dir)?;
        std::fs::copy(source, &dest)?;
        self.load_font_file(&dest)?;
        log::info!("Added font {} from {}", name, source.display());
        Ok(dest)
    }

    fn resolve(&self, family: &str, style: FontStyle, weight: FontWeight) -> Option<fontdb::ID> {
        if is_file_name(family) {
            return self.find_by_file_name(family);
        }

        let db = self.db.read();
        let generic = match family.to_ascii_lowercase().as_str() {
            "sans-serif" | "sans" => Some(Family::SansSerif),
            "serif" => Some(Family::Serif),
            "monospace" => Some(Family::Monospace),
            "cursive" => Some(Family::Cursive),
            "fantasy" => Some(Family::Fantasy),
            _ => None,
        };
        if let Some(generic) = generic {
            return db.query(&query(&[generic], style, weight));
        }

        db.query(&query(&[Family::Name(family)], style, weight))
            .or_else(|| {
                // fontdb compares names exactly; retry with the installed spelling
                let installed = db.faces().find_map(|face| {
                    face.families
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(family))
                        .map(|(name, _)| name.clone())
                })?;
                db.query(&query(&[Family::Name(&installed)], style, weight))
            })
    }

    /// Plugin directory first, then any loaded face from a file of that name
    fn find_by_file_name(&self, file_name: &str) -> Option<fontdb::ID> {
        let lookup = |db: &Database| {
            db.faces()
                .filter(|face| {
                    source_path(&face.source)
                        .and_then(Path::file_name)
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.eq_ignore_ascii_case(file_name))
                })
                .min_by_key(|face| {
                    let in_plugin_dir = source_path(&face.source)
                        .is_some_and(|p| p.starts_with(&self.font_dir));
                    (!in_plugin_dir, face.index)
                })
                .map(|face| face.id)
        };

        if let Some(id) = lookup(&self.db.read()) {
            return Some(id);
        }
        // Dropped into the plugin directory after startup
        let local = self.font_dir.join(file_name);
        if local.is_file() && self.db.write().load_font_file(&local).is_ok() {
            self.fonts_changed();
            return lookup(&self.db.read());
        }
        None
    }

    fn load_face(&self, id: fontdb::ID) -> Result<FontFile> {
        let (family, source, index) = {
            let db = self.db.read();
            let info = db
                .face(id)
                .ok_or_else(|| FontLoadError::NotFound(format!("face {id:?}")))?;
            let family = info
                .families
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| info.post_script_name.clone());
            (family, info.source.clone(), info.index)
        };

        let (path, data) = match &source {
            Source::File(path) => (Some(path.clone()), self.file_data(path)?),
            Source::SharedFile(path, bytes) => (
                Some(path.clone()),
                Arc::new(bytes.as_ref().as_ref().to_vec()),
            ),
            Source::Binary(bytes) => (None, Arc::new(bytes.as_ref().as_ref().to_vec())),
        };

        let fixed_size = self.config.fixed_size_for(&family);
        FontFile::new(family, path, data, index, fixed_size)
    }

    fn file_data(&self, path: &Path) -> Result<Arc<Vec<u8>>> {
        if let Some(data) = self.files.read().get(path) {
            return Ok(data.clone());
        }
        let data = std::fs::read(path)
            .map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
        let data = Arc::new(data);
        self.files.write().insert(path.to_path_buf(), data.clone());
        Ok(data)
    }
}

impl FontRegistry for FontDatabase {
    fn find_font(
        &self,
        family: &str,
        style: FontStyle,
        weight: FontWeight,
    ) -> Result<Arc<dyn FontFace>> {
        let key = FaceKey {
            family: family.to_string(),
            style,
            weight,
        };
        if let Some(cached) = self.faces.read().get(&key) {
            return match cached {
                Some(face) => Ok(face.clone()),
                None => Err(FontLoadError::NotFound(family.to_string()).into()),
            };
        }

        let Some(id) = self.resolve(family, style, weight) else {
            log::warn!("Font '{}' not found", family);
            self.faces.write().insert(key, None);
            return Err(FontLoadError::NotFound(family.to_string()).into());
        };

        let face = Arc::new(self.load_face(id)?);
        log::debug!(
            "Resolved '{}' ({:?}, {}) to {:?}",
            family,
            style,
            weight.0,
            face
        );
        self.faces.write().insert(key, Some(face.clone()));
        Ok(face)
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

fn query<'a>(families: &'a [Family<'a>], style: FontStyle, weight: FontWeight) -> Query<'a> {
    Query {
        families,
        weight: Weight(weight.0),
        stretch: Stretch::Normal,
        style: match style {
            FontStyle::Normal => Style::Normal,
            FontStyle::Italic => Style::Italic,
            FontStyle::Oblique => Style::Oblique,
        },
    }
}

fn source_path(source: &Source) -> Option<&Path> {
    match source {
        Source::File(path) | Source::SharedFile(path, _) => Some(path),
        Source::Binary(_) => None,
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Whether a family name is really a font file name
pub fn is_file_name(family: &str) -> bool {
    has_extension(Path::new(family), FILE_NAME_EXTENSIONS)
}

/// Load the font files directly inside `dir`; returns how many were read
fn load_plugin_dir(db: &mut Database, dir: &Path) -> usize {
    if !dir.is_dir() {
        log::debug!("Font directory {} does not exist", dir.display());
        return 0;
    }
    let mut loaded = 0;
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !has_extension(path, LOADABLE_EXTENSIONS) {
            continue;
        }
        match db.load_font_file(path) {
            Ok(()) => loaded += 1,
            Err(err) => log::warn!("Failed to open font file {}: {}", path.display(), err),
        }
    }
    loaded
}
