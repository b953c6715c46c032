//! Daily note conventions: discovery, and date<->path mapping.
//!
//! A convention is the pair of a vault folder and a date pattern that
//! together define where daily notes live and how their filenames encode
//! dates. `resolve` discovers the convention from the host's configuration
//! sources; `format` and `path` turn it into a deterministic two-way mapping
//! between calendar dates and vault paths.

pub mod format;
pub mod path;
pub mod resolve;

pub use format::{DateFormat, FormatError};
pub use path::{DailyNoteCodec, NOTE_EXTENSION, normalize_folder, normalize_vault_path, recent_dates};
pub use resolve::{
    ConfigHost, ConventionFailure, DailyNotesState, ManualConvention, SETTINGS_DOCUMENT_PATHS,
    resolve_convention,
};

/// The resolved daily notes convention.
///
/// `folder` is vault-relative and normalized (no leading or trailing slash,
/// `""` meaning the vault root); `format` is never empty once resolution
/// succeeds. Immutable once resolved, and re-resolved on every cleanup
/// invocation since the source of truth may change between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyNotesConvention {
    /// Vault-relative folder holding daily notes.
    pub folder: String,
    /// Date pattern the filenames follow.
    pub format: String,
}
