use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Create a vault directory with the daily notes feature configured for
/// `Daily/YYYY-MM-DD.md` notes.
pub(crate) fn create_test_vault() -> TempDir {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join(".obsidian");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("daily-notes.json"),
        r#"{"folder": "Daily", "format": "YYYY-MM-DD"}"#,
    )
    .unwrap();
    std::fs::create_dir_all(temp.path().join("Daily")).unwrap();
    temp
}

/// Write a note at a vault-relative path, creating parent directories.
pub(crate) fn write_note(vault_root: &Path, relative: &str, content: &str) {
    let path = vault_root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
