//! Per-character font fallback
//!
//! Every character is drawn with the first font of
//! `[preferred] + fallback stack` whose character map contains it. When none
//! does, the first font that resolves at all is used, so uncovered characters
//! show up as that font's missing-glyph box instead of failing the render.
//!
//! Selections are remembered until the registry reports a new generation,
//! so fonts added at runtime are picked up by the next lookup.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::RwLock;

use textimg_core::{
    error::{FontLoadError, Result},
    types::{FontStyle, FontWeight},
    FontFace, FontRegistry, TextImgError,
};
use textimg_fontdb::FontDatabase;

/// Default number of remembered selections
const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(4096) {
    Some(v) => v,
    None => unreachable!(),
};

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct SelectionKey {
    ch: char,
    style: FontStyle,
    weight: FontWeight,
    preferred: Option<String>,
    fallback: Vec<String>,
}

/// Remembered selections, valid for one registry generation
struct SelectionCache {
    generation: u64,
    entries: LruCache<SelectionKey, Arc<dyn FontFace>>,
}

/// Picks a font for each character from a registry
pub struct FontSelector {
    registry: Arc<dyn FontRegistry>,
    default_fallback: Vec<String>,
    cache: RwLock<SelectionCache>,
}

impl FontSelector {
    /// Select from `registry`, falling back through `default_fallback`
    /// whenever a caller passes an empty fallback list
    pub fn new(registry: Arc<dyn FontRegistry>, default_fallback: Vec<String>) -> Self {
        Self::with_capacity(registry, default_fallback, DEFAULT_CAPACITY.get())
    }

    pub fn with_capacity(
        registry: Arc<dyn FontRegistry>,
        default_fallback: Vec<String>,
        capacity: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        let generation = registry.generation();
        Self {
            registry,
            default_fallback,
            cache: RwLock::new(SelectionCache {
                generation,
                entries: LruCache::new(capacity),
            }),
        }
    }

    /// Select from a font database using its configured fallback stack
    pub fn from_database(db: Arc<FontDatabase>) -> Self {
        let fallback = db.config().default_fallback_fonts.clone();
        Self::new(db, fallback)
    }

    pub fn default_fallback(&self) -> &[String] {
        &self.default_fallback
    }

    /// The font `ch` should be drawn with
    ///
    /// Candidates are `preferred` followed by `fallback` (or the default stack
    /// when `fallback` is empty). Families the registry cannot find are
    /// skipped. Fails only when no candidate resolves at all.
    pub fn get_proper_font(
        &self,
        ch: char,
        style: FontStyle,
        weight: FontWeight,
        preferred: Option<&str>,
        fallback: &[String],
    ) -> Result<Arc<dyn FontFace>> {
        let key = SelectionKey {
            ch,
            style,
            weight,
            preferred: preferred.map(str::to_string),
            fallback: fallback.to_vec(),
        };
        let generation = self.registry.generation();
        {
            let mut cache = self.cache.write();
            if cache.generation != generation {
                log::debug!(
                    "Font set changed, forgetting {} selections",
                    cache.entries.len()
                );
                cache.entries.clear();
                cache.generation = generation;
            }
            if let Some(face) = cache.entries.get(&key) {
                return Ok(face.clone());
            }
        }

        let face = self.select(ch, style, weight, preferred, fallback)?;
        // Fonts may have changed while selecting; such a result is not kept
        let mut cache = self.cache.write();
        if cache.generation == generation && self.registry.generation() == generation {
            cache.entries.put(key, face.clone());
        }
        Ok(face)
    }

    /// Forget every remembered selection
    pub fn clear_cache(&self) {
        self.cache.write().entries.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.read().entries.len()
    }

    fn select(
        &self,
        ch: char,
        style: FontStyle,
        weight: FontWeight,
        preferred: Option<&str>,
        fallback: &[String],
    ) -> Result<Arc<dyn FontFace>> {
        let fallback = if fallback.is_empty() {
            self.default_fallback.as_slice()
        } else {
            fallback
        };
        let candidates: Vec<&str> = preferred
            .filter(|name| !name.is_empty())
            .into_iter()
            .chain(fallback.iter().map(String::as_str))
            .collect();

        let mut first_resolved: Option<Arc<dyn FontFace>> = None;
        let mut checked: Vec<Arc<dyn FontFace>> = Vec::new();

        for family in &candidates {
            let face = match self.registry.find_font(family, style, weight) {
                Ok(face) => face,
                Err(TextImgError::FontLoad(e)) if e.is_not_found() => continue,
                Err(e) => {
                    log::warn!("Skipping font '{}': {}", family, e);
                    continue;
                }
            };
            // Several names can resolve to the same face
            if checked.iter().any(|seen| Arc::ptr_eq(seen, &face)) {
                continue;
            }
            checked.push(face.clone());

            if face.has_glyph(ch) {
                log::debug!("{:?} -> {}", ch, face.family());
                return Ok(face);
            }
            if first_resolved.is_none() {
                first_resolved = Some(face);
            }
        }

        match first_resolved {
            Some(face) => {
                log::debug!("{:?} not covered, using {}", ch, face.family());
                Ok(face)
            }
            None => Err(FontLoadError::NoUsableFont {
                tried: candidates.iter().map(|s| s.to_string()).collect(),
            }
            .into()),
        }
    }
}
