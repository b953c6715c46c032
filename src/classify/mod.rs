//! Emptiness classification for daily note content.
//!
//! A note counts as empty when its body holds nothing but whitespace and its
//! frontmatter carries no meaningful values: timestamp-like keys and
//! caller-ignored keys are disregarded, and the remaining values are tested
//! recursively for effective emptiness.
//!
//! The evaluation order is load-bearing:
//!
//! 1. Body content always wins, no matter what the header says.
//! 2. An unterminated header fence is uncertain, never empty.
//! 3. Frontmatter that fails to parse, or parses to something other than a
//!    key-value mapping, is uncertain.
//!
//! Uncertain outcomes always report `is_empty = false`; the cleanup run
//! skips those notes rather than treating doubt as permission to delete.

use serde_yaml::Value;

/// Why a note was (or was not) classified as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyNoteReason {
    /// The note body contains non-whitespace content.
    BodyHasContent,
    /// No frontmatter block and an empty body.
    EmptyNoFrontmatter,
    /// A frontmatter block whose values are all ignorable or empty.
    EmptyFrontmatterOnly,
    /// Some non-ignored frontmatter key holds a meaningful value.
    NonIgnoredFrontmatterValue,
    /// The frontmatter block is malformed or does not parse.
    FrontmatterParseError,
    /// The frontmatter parsed, but not to a key-value mapping.
    FrontmatterStructureUnsupported,
}

impl EmptyNoteReason {
    /// Whether this reason reflects uncertainty rather than real content.
    /// Uncertain notes are reported separately and never deleted.
    pub fn is_uncertain(self) -> bool {
        matches!(
            self,
            EmptyNoteReason::FrontmatterParseError
                | EmptyNoteReason::FrontmatterStructureUnsupported
        )
    }
}

impl std::fmt::Display for EmptyNoteReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EmptyNoteReason::BodyHasContent => "body-has-content",
            EmptyNoteReason::EmptyNoFrontmatter => "empty-no-frontmatter",
            EmptyNoteReason::EmptyFrontmatterOnly => "empty-frontmatter-only",
            EmptyNoteReason::NonIgnoredFrontmatterValue => "non-ignored-frontmatter-value",
            EmptyNoteReason::FrontmatterParseError => "frontmatter-parse-error",
            EmptyNoteReason::FrontmatterStructureUnsupported => {
                "frontmatter-structure-unsupported"
            }
        };
        write!(f, "{label}")
    }
}

/// Outcome of classifying one note's content.
///
/// Invariant: `is_empty` is true iff `reason` is `EmptyNoFrontmatter` or
/// `EmptyFrontmatterOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteClassification {
    pub is_empty: bool,
    pub reason: EmptyNoteReason,
}

impl NoteClassification {
    fn empty(reason: EmptyNoteReason) -> Self {
        Self {
            is_empty: true,
            reason,
        }
    }

    fn not_empty(reason: EmptyNoteReason) -> Self {
        Self {
            is_empty: false,
            reason,
        }
    }
}

/// Result of splitting note text into a header block and body.
struct FrontmatterSplit {
    frontmatter: Option<String>,
    body: String,
    malformed: bool,
}

/// Split note text into an optional frontmatter block and the body.
///
/// A header block exists only when the text starts with a `---` fence line;
/// it ends at the next `---` or `...` line. A start fence without a closing
/// fence discards the unterminated header text entirely and flags the split
/// as malformed, so equally-malformed input is classified uniformly.
fn split_frontmatter(content: &str) -> FrontmatterSplit {
    let normalized = content.replace("\r\n", "\n");
    if !normalized.starts_with("---\n") {
        return FrontmatterSplit {
            frontmatter: None,
            body: normalized,
            malformed: false,
        };
    }

    let lines: Vec<&str> = normalized.split('\n').collect();
    for index in 1..lines.len() {
        if lines[index] == "---" || lines[index] == "..." {
            return FrontmatterSplit {
                frontmatter: Some(lines[1..index].join("\n")),
                body: lines[index + 1..].join("\n"),
                malformed: false,
            };
        }
    }

    FrontmatterSplit {
        frontmatter: None,
        body: String::new(),
        malformed: true,
    }
}

/// Normalize a frontmatter key for comparison: lowercase, ASCII
/// alphanumerics only.
fn normalize_key(key: &str) -> String {
    key.to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Whether a normalized key names a timestamp.
///
/// Creation/modification stamps are near-universal and carry no authored
/// content, so they are exempt independently of the caller's ignore list.
fn is_time_like_key(normalized: &str) -> bool {
    if normalized.is_empty() {
        return false;
    }
    if normalized == "ctime" || normalized == "mtime" {
        return true;
    }
    normalized.contains("created") || normalized.contains("updated") || normalized.contains("modified")
}

/// Recursive effective-emptiness test over a parsed frontmatter value.
///
/// Nulls are empty; strings are empty iff whitespace-only; numbers, booleans
/// and tagged scalars are never empty; sequences and mappings are empty iff
/// all of their elements are. Parsed YAML values are acyclic trees, so plain
/// recursion terminates.
fn is_effectively_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
        Value::Sequence(items) => items.iter().all(is_effectively_empty),
        Value::Mapping(mapping) => mapping.values().all(is_effectively_empty),
        Value::Tagged(_) => false,
    }
}

/// Classify a note's raw text.
///
/// `ignored_keys` are matched case-insensitively both verbatim (trimmed,
/// lowercased) and in normalized form (punctuation stripped), so `date-modified`
/// and `Date Modified` are the same key.
pub fn classify_note(content: &str, ignored_keys: &[String]) -> NoteClassification {
    let split = split_frontmatter(content);

    if !split.body.trim().is_empty() {
        return NoteClassification::not_empty(EmptyNoteReason::BodyHasContent);
    }

    if split.malformed {
        return NoteClassification::not_empty(EmptyNoteReason::FrontmatterParseError);
    }

    let Some(frontmatter) = split.frontmatter else {
        return NoteClassification::empty(EmptyNoteReason::EmptyNoFrontmatter);
    };

    if frontmatter.trim().is_empty() {
        return NoteClassification::empty(EmptyNoteReason::EmptyFrontmatterOnly);
    }

    let parsed: Value = match serde_yaml::from_str(&frontmatter) {
        Ok(value) => value,
        Err(_) => return NoteClassification::not_empty(EmptyNoteReason::FrontmatterParseError),
    };

    if parsed.is_null() {
        return NoteClassification::empty(EmptyNoteReason::EmptyFrontmatterOnly);
    }

    let Value::Mapping(mapping) = parsed else {
        return NoteClassification::not_empty(EmptyNoteReason::FrontmatterStructureUnsupported);
    };

    let lowered_ignored: Vec<String> = ignored_keys
        .iter()
        .map(|key| key.trim().to_lowercase())
        .filter(|key| !key.is_empty())
        .collect();
    let normalized_ignored: Vec<String> = ignored_keys
        .iter()
        .map(|key| normalize_key(key.trim()))
        .filter(|key| !key.is_empty())
        .collect();

    for (key, value) in &mapping {
        let name = key.as_str().unwrap_or_default();
        let normalized = normalize_key(name);

        if lowered_ignored.contains(&name.to_lowercase())
            || normalized_ignored.contains(&normalized)
            || is_time_like_key(&normalized)
        {
            continue;
        }

        if !is_effectively_empty(value) {
            return NoteClassification::not_empty(EmptyNoteReason::NonIgnoredFrontmatterValue);
        }
    }

    NoteClassification::empty(EmptyNoteReason::EmptyFrontmatterOnly)
}
