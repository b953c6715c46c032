//! Filesystem-backed vault.
//!
//! A vault is a directory of Markdown notes. Hidden directories (the host
//! config dir, the trash, our own state dir) are never listed. Deletion is
//! always a move into the vault-local `.trash/` directory so a cleanup run
//! can be undone by hand; notes are never unlinked.

use super::{NoteRef, Vault};
use crate::daily::resolve::{ConfigHost, DailyNotesState};
use crate::daily::{NOTE_EXTENSION, normalize_vault_path};
use crate::error::{Result, SweepError};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Host application config directory inside the vault.
pub const CONFIG_DIR: &str = ".obsidian";

/// Vault-local trash directory deleted notes are moved into.
pub const TRASH_DIR: &str = ".trash";

/// Registry of the host's built-in features inside the config dir.
const CORE_PLUGINS_FILE: &str = "core-plugins.json";

/// Feature id of the daily notes plugin.
const DAILY_NOTES_PLUGIN_ID: &str = "daily-notes";

/// A note vault rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Open a vault at `root`. The directory must exist.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(SweepError::UserError(format!(
                "vault path '{}' is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, vault_path: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in vault_path.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    fn read_json(&self, path: &Path) -> Option<Value> {
        let raw = fs::read_to_string(path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// Whether the daily notes core feature is enabled.
    ///
    /// The registry has appeared both as an array of enabled ids and as an
    /// id-to-bool map. A missing or unreadable registry means the defaults
    /// apply, and daily notes is an enabled-by-default core feature.
    fn daily_notes_enabled(&self, config_dir: &Path) -> bool {
        match self.read_json(&config_dir.join(CORE_PLUGINS_FILE)) {
            Some(Value::Array(ids)) => ids
                .iter()
                .any(|id| id.as_str() == Some(DAILY_NOTES_PLUGIN_ID)),
            Some(Value::Object(map)) => map
                .get(DAILY_NOTES_PLUGIN_ID)
                .and_then(Value::as_bool)
                .unwrap_or(true),
            _ => true,
        }
    }
}

impl Vault for FsVault {
    fn list_notes(&self) -> Result<Vec<NoteRef>> {
        let mut notes = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_hidden_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                SweepError::VaultError(format!(
                    "failed to list vault '{}': {}",
                    self.root.display(),
                    e
                ))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|ext| ext.to_str()) != Some(NOTE_EXTENSION) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path());
            let vault_path = normalize_vault_path(&relative.to_string_lossy());
            notes.push(NoteRef::new(vault_path));
        }

        // Directory iteration order is filesystem-dependent; sort so that a
        // full-vault scan is deterministic.
        notes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(notes)
    }

    fn lookup_note(&self, path: &str) -> Option<NoteRef> {
        let normalized = normalize_vault_path(path);
        if !normalized.ends_with(&format!(".{NOTE_EXTENSION}")) || contains_traversal(&normalized) {
            return None;
        }
        let absolute = self.absolute(&normalized);
        absolute.is_file().then(|| NoteRef::new(normalized))
    }

    fn read_note(&self, note: &NoteRef) -> Result<String> {
        let absolute = self.absolute(&note.path);
        fs::read_to_string(&absolute).map_err(|e| {
            SweepError::VaultError(format!("failed to read note '{}': {}", note.path, e))
        })
    }

    fn trash_note(&self, note: &NoteRef) -> Result<()> {
        if contains_traversal(&note.path) {
            return Err(SweepError::VaultError(format!(
                "refusing to trash path with traversal: {}",
                note.path
            )));
        }

        let source = self.absolute(&note.path);
        let trash_dir = self.root.join(TRASH_DIR);
        fs::create_dir_all(&trash_dir).map_err(|e| {
            SweepError::VaultError(format!(
                "failed to create trash directory '{}': {}",
                trash_dir.display(),
                e
            ))
        })?;

        let file_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SweepError::VaultError(format!("note '{}' has no file name", note.path))
            })?;

        let destination = free_trash_slot(&trash_dir, file_name);
        move_into_trash(&source, &destination).map_err(|e| {
            SweepError::VaultError(format!(
                "failed to move note '{}' to trash: {}",
                note.path, e
            ))
        })
    }
}

impl ConfigHost for FsVault {
    fn daily_notes_state(&self) -> Option<DailyNotesState> {
        let config_dir = self.root.join(CONFIG_DIR);
        if !config_dir.is_dir() {
            return None;
        }

        let options = self
            .read_json(&config_dir.join("daily-notes.json"))
            .filter(Value::is_object);

        Some(DailyNotesState {
            enabled: self.daily_notes_enabled(&config_dir),
            options,
            resolved_options: None,
            default_options: None,
            raw: Value::Null,
        })
    }

    fn read_settings_document(&self, candidate_paths: &[&str]) -> Option<Value> {
        let config_dir = self.root.join(CONFIG_DIR);
        for relative in candidate_paths {
            let path = config_dir.join(relative);
            if let Some(document) = self.read_json(&path).filter(Value::is_object) {
                return Some(document);
            }
        }
        None
    }
}

/// Whether a walk entry is a hidden directory (leading dot).
fn is_hidden_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Whether a vault path contains a `..` component.
fn contains_traversal(path: &str) -> bool {
    Path::new(path)
        .components()
        .any(|component| matches!(component, Component::ParentDir))
}

/// First unoccupied destination for `file_name` inside the trash.
///
/// Collisions get a ` (n)` suffix before the extension so repeated cleanups
/// of same-named notes never overwrite an earlier trashed copy.
fn free_trash_slot(trash_dir: &Path, file_name: &str) -> PathBuf {
    let direct = trash_dir.join(file_name);
    if !direct.exists() {
        return direct;
    }

    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, extension)) => (stem, Some(extension)),
        None => (file_name, None),
    };

    let mut counter = 1u32;
    loop {
        let candidate_name = match extension {
            Some(extension) => format!("{stem} ({counter}).{extension}"),
            None => format!("{stem} ({counter})"),
        };
        let candidate = trash_dir.join(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Move a file, falling back to copy + delete across filesystems.
fn move_into_trash(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_rename(&e) => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        Err(e) => Err(e),
    }
}

fn is_cross_device_rename(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault_with_notes(notes: &[(&str, &str)]) -> (TempDir, FsVault) {
        let temp = TempDir::new().unwrap();
        for (path, content) in notes {
            let absolute = temp.path().join(path);
            fs::create_dir_all(absolute.parent().unwrap()).unwrap();
            fs::write(absolute, content).unwrap();
        }
        let vault = FsVault::open(temp.path()).unwrap();
        (temp, vault)
    }

    #[test]
    fn open_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("no-such-vault");
        let result = FsVault::open(&missing);
        assert!(matches!(result, Err(SweepError::UserError(_))));
    }

    #[test]
    fn list_notes_finds_markdown_recursively() {
        let (_temp, vault) = vault_with_notes(&[
            ("Daily/2026-02-08.md", ""),
            ("Daily/sub/2026-02-07.md", ""),
            ("README.md", "hi"),
        ]);
        let notes = vault.list_notes().unwrap();
        let paths: Vec<&str> = notes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["Daily/2026-02-08.md", "Daily/sub/2026-02-07.md", "README.md"]
        );
    }

    #[test]
    fn list_notes_skips_hidden_dirs_and_non_markdown() {
        let (_temp, vault) = vault_with_notes(&[
            ("Daily/2026-02-08.md", ""),
            (".obsidian/daily-notes.json", "{}"),
            (".trash/2026-01-01.md", ""),
            ("assets/image.png", ""),
        ]);
        let notes = vault.list_notes().unwrap();
        let paths: Vec<&str> = notes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["Daily/2026-02-08.md"]);
    }

    #[test]
    fn lookup_note_finds_existing_note() {
        let (_temp, vault) = vault_with_notes(&[("Daily/2026-02-08.md", "")]);
        let note = vault.lookup_note("Daily/2026-02-08.md").unwrap();
        assert_eq!(note.path, "Daily/2026-02-08.md");
    }

    #[test]
    fn lookup_note_returns_none_for_missing_or_non_note() {
        let (_temp, vault) = vault_with_notes(&[("Daily/2026-02-08.md", "")]);
        assert!(vault.lookup_note("Daily/2026-02-09.md").is_none());
        assert!(vault.lookup_note("Daily").is_none());
    }

    #[test]
    fn lookup_note_rejects_traversal() {
        let (_temp, vault) = vault_with_notes(&[("Daily/2026-02-08.md", "")]);
        assert!(vault.lookup_note("../outside.md").is_none());
        assert!(vault.lookup_note("Daily/../../outside.md").is_none());
    }

    #[test]
    fn read_note_returns_content() {
        let (_temp, vault) = vault_with_notes(&[("Daily/2026-02-08.md", "hello\n")]);
        let note = vault.lookup_note("Daily/2026-02-08.md").unwrap();
        assert_eq!(vault.read_note(&note).unwrap(), "hello\n");
    }

    #[test]
    fn trash_note_moves_file_into_trash() {
        let (temp, vault) = vault_with_notes(&[("Daily/2026-02-08.md", "")]);
        let note = vault.lookup_note("Daily/2026-02-08.md").unwrap();

        vault.trash_note(&note).unwrap();

        assert!(!temp.path().join("Daily/2026-02-08.md").exists());
        assert!(temp.path().join(".trash/2026-02-08.md").exists());
    }

    #[test]
    fn trash_note_suffixes_name_collisions() {
        let (temp, vault) = vault_with_notes(&[
            ("Daily/2026-02-08.md", "first"),
            ("Other/2026-02-08.md", "second"),
        ]);

        // Other/2026-02-08.md is not a real daily note, but the vault layer
        // does not care; both files land in the trash under distinct names.
        vault
            .trash_note(&vault.lookup_note("Daily/2026-02-08.md").unwrap())
            .unwrap();
        vault
            .trash_note(&vault.lookup_note("Other/2026-02-08.md").unwrap())
            .unwrap();

        assert!(temp.path().join(".trash/2026-02-08.md").exists());
        assert!(temp.path().join(".trash/2026-02-08 (1).md").exists());
    }

    #[test]
    fn trash_note_fails_for_missing_file() {
        let (_temp, vault) = vault_with_notes(&[("Daily/2026-02-08.md", "")]);
        let ghost = NoteRef::new("Daily/2026-02-09.md");
        assert!(vault.trash_note(&ghost).is_err());
    }

    #[test]
    fn daily_notes_state_requires_config_dir() {
        let (_temp, vault) = vault_with_notes(&[("Daily/2026-02-08.md", "")]);
        assert!(vault.daily_notes_state().is_none());
    }

    #[test]
    fn daily_notes_state_reads_options() {
        let (_temp, vault) = vault_with_notes(&[(
            ".obsidian/daily-notes.json",
            r#"{"folder": "Daily", "format": "YYYY-MM-DD"}"#,
        )]);
        let state = vault.daily_notes_state().unwrap();
        assert!(state.enabled);
        let options = state.options.unwrap();
        assert_eq!(options["folder"], "Daily");
    }

    #[test]
    fn core_plugin_array_registry_controls_enabled() {
        let (_temp, vault) = vault_with_notes(&[
            (".obsidian/core-plugins.json", r#"["file-explorer"]"#),
            (".obsidian/daily-notes.json", "{}"),
        ]);
        assert!(!vault.daily_notes_state().unwrap().enabled);

        let (_temp, vault) = vault_with_notes(&[
            (".obsidian/core-plugins.json", r#"["daily-notes"]"#),
        ]);
        assert!(vault.daily_notes_state().unwrap().enabled);
    }

    #[test]
    fn core_plugin_map_registry_controls_enabled() {
        let (_temp, vault) = vault_with_notes(&[(
            ".obsidian/core-plugins.json",
            r#"{"daily-notes": false}"#,
        )]);
        assert!(!vault.daily_notes_state().unwrap().enabled);

        let (_temp, vault) = vault_with_notes(&[(
            ".obsidian/core-plugins.json",
            r#"{"file-explorer": true}"#,
        )]);
        // Absent from the map means the default applies, which is enabled.
        assert!(vault.daily_notes_state().unwrap().enabled);
    }

    #[test]
    fn read_settings_document_tries_paths_in_order() {
        let (_temp, vault) = vault_with_notes(&[
            (
                ".obsidian/plugins/daily-notes/data.json",
                r#"{"format": "DD.MM.YYYY"}"#,
            ),
            (".obsidian/daily-notes.json", r#"{"format": "YYYY-MM-DD"}"#),
        ]);
        let document = vault
            .read_settings_document(&["daily-notes.json", "plugins/daily-notes/data.json"])
            .unwrap();
        assert_eq!(document["format"], "YYYY-MM-DD");
    }

    #[test]
    fn read_settings_document_skips_invalid_json() {
        let (_temp, vault) = vault_with_notes(&[
            (".obsidian/daily-notes.json", "not json"),
            (
                ".obsidian/plugins/daily-notes/data.json",
                r#"{"format": "YYYY-MM-DD"}"#,
            ),
        ]);
        let document = vault
            .read_settings_document(&["daily-notes.json", "plugins/daily-notes/data.json"])
            .unwrap();
        assert_eq!(document["format"], "YYYY-MM-DD");
    }
}
