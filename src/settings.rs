//! User settings for notesweep.
//!
//! Settings live in `.notesweep.yaml` at the vault root. A missing file
//! means defaults; unknown fields are ignored for forward compatibility.
//! Loaded settings are always normalized: the ignored-key list is unioned
//! with the built-in timestamp keys and deduplicated case-insensitively,
//! and an invalid recent-day count falls back to the default.

use crate::error::{Result, SweepError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file name, relative to the vault root.
pub const SETTINGS_FILE: &str = ".notesweep.yaml";

/// Default day count for the recent scope.
pub const DEFAULT_RECENT_DAYS: u32 = 30;

/// Frontmatter keys ignored by default. All of these are timestamp spellings
/// observed in real vaults; matching is case- and punctuation-insensitive.
pub const DEFAULT_IGNORED_KEYS: [&str; 12] = [
    "ctime",
    "mtime",
    "created",
    "updated",
    "created_at",
    "updated_at",
    "createdtime",
    "updatedtime",
    "late modified",
    "last modified",
    "date modified",
    "date-modified",
];

/// User preferences for cleanup runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default day count for the `recent` command.
    pub recent_days: u32,

    /// Whether to ask before deleting.
    pub require_confirmation: bool,

    /// Frontmatter keys to disregard during emptiness classification.
    pub ignored_frontmatter_keys: Vec<String>,

    /// Manual daily notes folder override (empty = resolve automatically).
    pub daily_notes_folder: String,

    /// Manual daily notes date format override (empty = resolve automatically).
    pub daily_notes_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recent_days: DEFAULT_RECENT_DAYS,
            require_confirmation: true,
            ignored_frontmatter_keys: DEFAULT_IGNORED_KEYS
                .iter()
                .map(|key| key.to_string())
                .collect(),
            daily_notes_folder: String::new(),
            daily_notes_format: String::new(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file, falling back to defaults when the
    /// file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default().normalized());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SweepError::UserError(format!(
                "failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string. Unknown fields are ignored.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)
            .map_err(|e| SweepError::UserError(format!("failed to parse settings YAML: {}", e)))?;
        Ok(settings.normalized())
    }

    /// Apply defaults and canonical forms to freshly parsed values.
    fn normalized(mut self) -> Self {
        if self.recent_days == 0 {
            self.recent_days = DEFAULT_RECENT_DAYS;
        }

        let mut merged: Vec<String> = self.ignored_frontmatter_keys;
        merged.extend(DEFAULT_IGNORED_KEYS.iter().map(|key| key.to_string()));
        self.ignored_frontmatter_keys = normalize_ignored_keys(merged.iter().map(String::as_str));

        self.daily_notes_folder = self.daily_notes_folder.trim().to_string();
        self.daily_notes_format = self.daily_notes_format.trim().to_string();
        self
    }
}

/// Trim, drop empties, and deduplicate case-insensitively, keeping the first
/// spelling of each key.
pub fn normalize_ignored_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut result: Vec<String> = Vec::new();

    for raw in keys {
        let key = raw.trim();
        if key.is_empty() {
            continue;
        }
        let dedupe_key = key.to_lowercase();
        if seen.contains(&dedupe_key) {
            continue;
        }
        seen.push(dedupe_key);
        result.push(key.to_string());
    }

    result
}
