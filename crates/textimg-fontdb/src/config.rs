//! Font configuration
//!
//! Where plugin fonts live, which families to fall back through, and which
//! families can only be rasterized at one size.
//!
//! # Environment Variables
//!
//! ```bash
//! TEXTIMG_FONT_PATH=~/fonts TEXTIMG_FALLBACK_FONTS="Inter,Noto Sans CJK JP" textimg render "hi"
//! ```
//!
//! - `TEXTIMG_FONT_PATH`: plugin font directory (`~` and `$VAR` are expanded)
//! - `TEXTIMG_FALLBACK_FONTS`: comma-separated fallback stack
//! - `TEXTIMG_SYSTEM_FONTS`: `0`, `false`, `no` or `off` skips system fonts

use std::path::PathBuf;

use textimg_core::{error::Result, TextImgError};

/// Plugin font directory used when none is configured
pub const DEFAULT_FONT_DIR: &str = "data/fonts";

/// Latin sans, CJK sans, then emoji and symbol fonts
pub const DEFAULT_FALLBACK_FONTS: &[&str] = &[
    "Arial",
    "Tahoma",
    "Helvetica Neue",
    "Segoe UI",
    "PingFang SC",
    "Hiragino Sans GB",
    "Microsoft YaHei",
    "Source Han Sans SC",
    "Noto Sans CJK JP",
    "WenQuanYi Micro Hei",
    "Apple Color Emoji",
    "Noto Color Emoji",
    "Segoe UI Emoji",
    "Segoe UI Symbol",
];

/// Families whose bitmap strikes only exist at one size
pub const FIXED_SIZE_FONTS: &[(&str, u32)] = &[("Apple Color Emoji", 137), ("Noto Color Emoji", 109)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontConfig {
    /// Searched before system fonts; [`DEFAULT_FONT_DIR`] when unset
    pub custom_font_path: Option<PathBuf>,
    pub default_fallback_fonts: Vec<String>,
    pub load_system_fonts: bool,
    /// Known fixed-size families; other bitmap-only fonts are detected on load
    pub fixed_sizes: Vec<(String, u32)>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_font_path: None,
            default_fallback_fonts: DEFAULT_FALLBACK_FONTS.iter().map(|s| s.to_string()).collect(),
            load_system_fonts: true,
            fixed_sizes: FIXED_SIZE_FONTS
                .iter()
                .map(|(family, size)| (family.to_string(), *size))
                .collect(),
        }
    }
}

impl FontConfig {
    /// Defaults overridden by `TEXTIMG_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`FontConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup("TEXTIMG_FONT_PATH").filter(|p| !p.trim().is_empty()) {
            config.custom_font_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(fonts) = lookup("TEXTIMG_FALLBACK_FONTS") {
            let fonts = parse_font_list(&fonts);
            if fonts.is_empty() {
                return Err(TextImgError::ConfigError(
                    "TEXTIMG_FALLBACK_FONTS names no fonts".to_string(),
                ));
            }
            config.default_fallback_fonts = fonts;
        }
        if let Some(value) = lookup("TEXTIMG_SYSTEM_FONTS") {
            config.load_system_fonts = !matches!(
                value.trim().to_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }

        log::debug!("Font config: {:?}", config);
        Ok(config)
    }

    /// The plugin font directory with `~` and environment variables expanded
    pub fn font_dir(&self) -> Result<PathBuf> {
        let raw = self
            .custom_font_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_FONT_DIR.to_string());
        let expanded = shellexpand::full(&raw)
            .map_err(|e| TextImgError::ConfigError(format!("font path '{raw}': {e}")))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// Configured fixed size for `family`, compared case-insensitively
    pub fn fixed_size_for(&self, family: &str) -> Option<u32> {
        self.fixed_sizes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(family))
            .map(|(_, size)| *size)
    }
}

/// Split a comma-separated font list, dropping blanks
pub fn parse_font_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_stack_order() {
        let config = FontConfig::default();
        assert_eq!(config.default_fallback_fonts.first().map(String::as_str), Some("Arial"));
        assert_eq!(
            config.default_fallback_fonts.last().map(String::as_str),
            Some("Segoe UI Symbol")
        );
        assert!(config.load_system_fonts);
        assert_eq!(config.fixed_size_for("noto color emoji"), Some(109));
        assert_eq!(config.fixed_size_for("Arial"), None);
    }

    #[test]
    fn test_env_overrides() {
        let config = FontConfig::from_lookup(lookup(&[
            ("TEXTIMG_FONT_PATH", "/opt/fonts"),
            ("TEXTIMG_FALLBACK_FONTS", " Inter , ,Noto Sans CJK JP"),
            ("TEXTIMG_SYSTEM_FONTS", "off"),
        ]))
        .unwrap();
        assert_eq!(config.custom_font_path, Some(PathBuf::from("/opt/fonts")));
        assert_eq!(config.default_fallback_fonts, vec!["Inter", "Noto Sans CJK JP"]);
        assert!(!config.load_system_fonts);
    }

    #[test]
    fn test_empty_fallback_list_is_rejected() {
        let result = FontConfig::from_lookup(lookup(&[("TEXTIMG_FALLBACK_FONTS", " , ")]));
        assert!(matches!(result, Err(TextImgError::ConfigError(_))));
    }

    #[test]
    fn test_font_dir_defaults_and_expands() {
        let config = FontConfig::default();
        assert_eq!(config.font_dir().unwrap(), PathBuf::from(DEFAULT_FONT_DIR));

        let config = FontConfig {
            custom_font_path: Some(PathBuf::from("/srv/fonts/plugin")),
            ..FontConfig::default()
        };
        assert_eq!(config.font_dir().unwrap(), PathBuf::from("/srv/fonts/plugin"));
    }
}
