//! Vault access layer.
//!
//! The cleanup core never touches the filesystem directly; it works through
//! the [`Vault`] trait so tests can substitute in-memory fakes and hosts can
//! supply their own storage. [`FsVault`] is the production implementation
//! over a vault directory on disk.

use crate::error::Result;

mod fs;

pub use fs::FsVault;

/// Identifier of one note inside the vault.
///
/// The path is vault-relative, uses `/` separators, and includes the `.md`
/// extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteRef {
    pub path: String,
}

impl NoteRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Minimal capabilities the cleanup core needs from note storage.
///
/// Failure contract: `list_notes` failures abort the invocation before any
/// note is touched; `read_note` and `trash_note` failures are per-note and
/// the caller contains them.
pub trait Vault {
    /// Every note in the vault.
    fn list_notes(&self) -> Result<Vec<NoteRef>>;

    /// The note at `path`, or `None` when no such note exists.
    fn lookup_note(&self, path: &str) -> Option<NoteRef>;

    /// The raw text content of a note.
    fn read_note(&self, note: &NoteRef) -> Result<String>;

    /// Move a note to the vault trash. Never partially deletes.
    fn trash_note(&self, note: &NoteRef) -> Result<()>;
}
