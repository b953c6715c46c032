//! Date <-> vault path mapping for the resolved daily notes convention.
//!
//! Paths are vault-relative strings with `/` separators. The codec is pure:
//! it never touches the filesystem, so both directions of the mapping can be
//! tested exhaustively without a vault.

use super::DailyNotesConvention;
use super::format::{DateFormat, FormatError};
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// File extension (without dot) of notes the codec considers.
pub const NOTE_EXTENSION: &str = "md";

static BACKSLASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\+").unwrap());
static DUPLICATE_SLASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new("/{2,}").unwrap());

/// Normalize a vault path: backslashes to slashes, collapse duplicate
/// slashes, strip a leading `./`.
pub fn normalize_vault_path(path: &str) -> String {
    let forward = BACKSLASHES.replace_all(path, "/");
    let collapsed = DUPLICATE_SLASHES.replace_all(&forward, "/");
    if let Some(stripped) = collapsed.strip_prefix("./") {
        return stripped.to_string();
    }
    collapsed.into_owned()
}

/// Strip leading and trailing slashes.
pub fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// Normalize a configured folder value. `/` and `.` mean the vault root.
pub fn normalize_folder(folder: &str) -> String {
    let normalized = normalize_vault_path(folder);
    if normalized == "/" || normalized == "." {
        return String::new();
    }
    trim_slashes(&normalized).to_string()
}

/// Compiled date<->path converter for one daily notes convention.
#[derive(Debug, Clone)]
pub struct DailyNoteCodec {
    folder: String,
    format: DateFormat,
}

impl DailyNoteCodec {
    /// Compile a convention into a codec.
    ///
    /// Fails when the convention's date format uses tokens the codec cannot
    /// round-trip; nothing is guessed in that case.
    pub fn new(convention: &DailyNotesConvention) -> std::result::Result<Self, FormatError> {
        Ok(Self {
            folder: normalize_folder(&convention.folder),
            format: DateFormat::compile(&convention.format)?,
        })
    }

    /// The normalized daily notes folder (`""` = vault root).
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// The vault path where the daily note for `date` is expected to live.
    pub fn expected_path(&self, date: NaiveDate) -> String {
        let rendered = self.format.render(date);
        let date_relative = trim_slashes(&rendered);
        let joined = if self.folder.is_empty() {
            format!("{date_relative}.{NOTE_EXTENSION}")
        } else {
            format!("{}/{date_relative}.{NOTE_EXTENSION}", self.folder)
        };
        normalize_vault_path(&joined)
    }

    /// Whether `path` is a daily note under this convention.
    ///
    /// True iff the path has the note extension, lies strictly inside the
    /// folder (and is not the folder itself), parses strictly under the date
    /// format, and re-rendering the parsed date reproduces the remainder
    /// exactly. The round trip rejects loosely-matching but non-canonical
    /// names such as `2026-2-8` under `YYYY-MM-DD`.
    pub fn matches(&self, path: &str) -> bool {
        let Some(remainder) = self.relative_remainder(path) else {
            return false;
        };
        match self.format.parse_strict(&remainder) {
            Some(date) => self.format.render(date) == remainder,
            None => false,
        }
    }

    /// The folder-relative, extension-stripped remainder of `path`, or `None`
    /// when the path is outside the folder or not a note file.
    fn relative_remainder(&self, path: &str) -> Option<String> {
        let normalized = normalize_vault_path(path);
        let suffix = format!(".{NOTE_EXTENSION}");
        let stem = normalized.strip_suffix(&suffix)?;

        if self.folder.is_empty() {
            return Some(stem.to_string());
        }
        if stem == self.folder {
            // The folder name itself is never a daily note.
            return None;
        }
        stem.strip_prefix(&format!("{}/", self.folder))
            .map(str::to_string)
    }
}

/// The `days` most recent dates, newest first, starting at `from` inclusive.
///
/// Always returns at least one date. Pure and restartable: the caller decides
/// what "today" is.
pub fn recent_dates(days: u32, from: NaiveDate) -> Vec<NaiveDate> {
    let safe_days = days.max(1);
    (0..safe_days)
        .map(|offset| from - Duration::days(i64::from(offset)))
        .collect()
}
