//! One resolved font: its bytes, coverage and rasterizers

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use read_fonts::{FontRef, TableProvider};

use textimg_core::{
    error::{FontLoadError, Result},
    FontFace, RasterFont,
};
use textimg_render_skia::{has_outlines, strike_sizes, SkiaRasterFont};

/// A font face backed by bytes in memory
///
/// The bytes are shared between all faces of one file, so TTC collections
/// are only read once. Rasterizers are created per pixel size and kept.
pub struct FontFile {
    family: String,
    path: Option<PathBuf>,
    data: Arc<Vec<u8>>,
    face_index: u32,
    fixed_size: Option<u32>,
    sizes: RwLock<HashMap<u32, Arc<dyn RasterFont>>>,
}

impl std::fmt::Debug for FontFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFile")
            .field("family", &self.family)
            .field("path", &self.path)
            .field("face_index", &self.face_index)
            .field("fixed_size", &self.fixed_size)
            .finish()
    }
}

impl FontFile {
    /// Wrap face `face_index` of `data`, validating that it parses
    ///
    /// `fixed_size` overrides detection for fonts that carry bitmap strikes;
    /// an outline-only build of the same family (COLR emoji) stays scalable.
    /// Without it, a font that has bitmap strikes but no outlines is pinned to
    /// its largest strike.
    pub fn new(
        family: impl Into<String>,
        path: Option<PathBuf>,
        data: Arc<Vec<u8>>,
        face_index: u32,
        fixed_size: Option<u32>,
    ) -> Result<Self> {
        FontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;
        let fixed_size = match fixed_size {
            Some(size) if has_strikes(&data, face_index) => Some(size),
            _ => detect_fixed_size(&data, face_index)?,
        };
        Ok(Self {
            family: family.into(),
            path,
            data,
            face_index,
            fixed_size,
            sizes: RwLock::new(HashMap::new()),
        })
    }

    /// Open a font file from disk, naming it after its own name table
    pub fn from_file(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
        let family = family_name(&data, face_index).unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        Self::new(family, Some(path.to_path_buf()), Arc::new(data), face_index, None)
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, self.face_index).ok()
    }
}

impl FontFace for FontFile {
    fn family(&self) -> &str {
        &self.family
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn fixed_size(&self) -> Option<u32> {
        self.fixed_size
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.font_ref()
            .and_then(|font| font.cmap().ok()?.map_codepoint(ch))
            .is_some_and(|gid| gid.to_u32() != 0)
    }

    fn load_at_size(&self, px: u32) -> Result<Arc<dyn RasterFont>> {
        if let Some(font) = self.sizes.read().get(&px) {
            return Ok(font.clone());
        }
        let font: Arc<dyn RasterFont> =
            Arc::new(SkiaRasterFont::new(self.data.clone(), self.face_index, px)?);
        self.sizes.write().insert(px, font.clone());
        Ok(font)
    }
}

fn has_strikes(data: &[u8], face_index: u32) -> bool {
    skrifa::FontRef::from_index(data, face_index)
        .is_ok_and(|font| !strike_sizes(&font).is_empty())
}

/// Largest strike of a font that has strikes but no outlines
fn detect_fixed_size(data: &[u8], face_index: u32) -> Result<Option<u32>> {
    let font =
        skrifa::FontRef::from_index(data, face_index).map_err(|_| FontLoadError::InvalidData)?;
    if has_outlines(&font) {
        return Ok(None);
    }
    let size = strike_sizes(&font)
        .into_iter()
        .reduce(f32::max)
        .map(|ppem| ppem.round() as u32)
        .filter(|&ppem| ppem > 0);
    if let Some(size) = size {
        log::debug!("Bitmap-only face {} pinned to {}px", face_index, size);
    }
    Ok(size)
}

/// Typographic family name from the name table
pub(crate) fn family_name(data: &[u8], face_index: u32) -> Option<String> {
    use skrifa::string::StringId;
    use skrifa::MetadataProvider;

    let font = skrifa::FontRef::from_index(data, face_index).ok()?;
    let strings = font.localized_strings(StringId::TYPOGRAPHIC_FAMILY_NAME);
    strings
        .english_or_first()
        .or_else(|| font.localized_strings(StringId::FAMILY_NAME).english_or_first())
        .map(|s| s.to_string())
}
