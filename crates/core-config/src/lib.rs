//! Configuration loading and parsing.
//!
//! Reads `winex.toml` (or an override path provided by the binary). Every
//! section is optional and unknown fields are ignored, so a partial file only
//! overrides what it names. A missing or unparsable file yields the defaults.
//!
//! ```toml
//! [history]
//! capacity = 500
//!
//! [completion]
//! max_height = 8
//! min_prefix = 2
//!
//! [list]
//! plain = "dropdown_plain"
//! marked = "dropdown_marked"
//! focus = "dropdown_walk"
//!
//! [palette.marked]
//! foreground = "black"
//! background = "light green"
//! ```

use anyhow::Result;
use core_markup::{AttrSpec, AttributeRegistry, palette};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const FILE_NAME: &str = "winex.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
        }
    }
}

impl HistoryConfig {
    const fn default_capacity() -> usize {
        500
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Popup rows before it scrolls.
    #[serde(default = "CompletionConfig::default_max_height")]
    pub max_height: usize,
    /// Typed graphemes before completion opens without tab.
    #[serde(default = "CompletionConfig::default_min_prefix")]
    pub min_prefix: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            max_height: Self::default_max_height(),
            min_prefix: Self::default_min_prefix(),
        }
    }
}

impl CompletionConfig {
    const fn default_max_height() -> usize {
        8
    }
    const fn default_min_prefix() -> usize {
        2
    }
}

/// Style keys the candidate list paints with.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ListConfig {
    #[serde(default = "ListConfig::default_plain")]
    pub plain: String,
    #[serde(default = "ListConfig::default_marked")]
    pub marked: String,
    #[serde(default = "ListConfig::default_focus")]
    pub focus: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            plain: Self::default_plain(),
            marked: Self::default_marked(),
            focus: Self::default_focus(),
        }
    }
}

impl ListConfig {
    fn default_plain() -> String {
        palette::DROPDOWN_PLAIN.to_string()
    }
    fn default_marked() -> String {
        palette::DROPDOWN_MARKED.to_string()
    }
    fn default_focus() -> String {
        palette::DROPDOWN_WALK.to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    #[serde(default)]
    pub foreground: String,
    #[serde(default)]
    pub background: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub palette: BTreeMap<String, PaletteEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub path: Option<PathBuf>,
}

/// Config path following platform conventions: `winex.toml` in the working
/// directory if present, otherwise `<config dir>/winex/winex.toml`.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("winex").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config {
                raw: Some(content),
                file,
                path: Some(path),
            };
            cfg.clamp_limits();
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Register every `[palette.<key>]` override. Must run before the built-in
    /// palette is seeded, since the registry keeps the first spec per key.
    /// Returns how many keys this call registered.
    pub fn apply_palette(&self, registry: &AttributeRegistry) -> usize {
        let mut applied = 0;
        for (key, entry) in &self.file.palette {
            let (_, inserted) = registry.register_with(key, || {
                AttrSpec::new(entry.foreground.as_str(), entry.background.as_str())
            });
            if inserted {
                applied += 1;
                info!(
                    target: "config",
                    key = %key,
                    fg = %entry.foreground,
                    bg = %entry.background,
                    builtin = palette::default_entry(key).is_some(),
                    "palette_override"
                );
            } else {
                warn!(target: "config", key = %key, "palette_override_after_registration_ignored");
            }
        }
        applied
    }

    fn clamp_limits(&mut self) {
        let history = &mut self.file.history;
        if history.capacity == 0 {
            info!(target: "config", raw = 0, clamped = 1, "history_capacity_clamped");
            history.capacity = 1;
        }
        let completion = &mut self.file.completion;
        if completion.max_height == 0 {
            info!(target: "config", raw = 0, clamped = 1, "completion_max_height_clamped");
            completion.max_height = 1;
        }
        if completion.min_prefix == 0 {
            info!(target: "config", raw = 0, clamped = 1, "completion_min_prefix_clamped");
            completion.min_prefix = 1;
        }
    }
}
