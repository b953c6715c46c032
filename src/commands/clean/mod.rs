//! Implementation of the cleanup commands (`today`, `recent`, `all`).
//!
//! One run:
//! - loads settings from `.notesweep.yaml` and applies CLI overrides
//! - re-resolves the daily notes convention (manual override first)
//! - scans, classifies, and confirms via the cleanup orchestrator
//! - prints a single end-of-run summary and appends an audit event
//!
//! # Safety
//!
//! - Deletion requires confirmation unless disabled in settings or `--yes`
//! - Uncertain classifications (unparseable frontmatter, read failures) are
//!   skipped, never deleted
//! - Deleted notes go to the vault's `.trash/`, not the unlink syscall
//! - A convention that cannot be resolved aborts before any note is read

mod display;


use crate::cli::CleanArgs;
use crate::cleanup::{CleanupRequest, CleanupScope, execute_cleanup};
use crate::daily::{DailyNoteCodec, ManualConvention, resolve_convention};
use crate::error::{Result, SweepError};
use crate::events::{append_event, clean_event};
use crate::settings::{SETTINGS_FILE, Settings, normalize_ignored_keys};
use crate::vault::FsVault;
use chrono::Local;
use display::print_summary;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Which scope the CLI selected, before settings fill in defaults.
#[derive(Debug, Clone, Copy)]
pub enum ScopeSelection {
    Today,
    Recent { days: Option<u32> },
    All,
}

/// Execute a cleanup command against the vault at `vault_root`.
pub fn cmd_clean(vault_root: &Path, selection: ScopeSelection, args: &CleanArgs) -> Result<()> {
    let vault = FsVault::open(vault_root)?;
    let settings = Settings::load(vault.root().join(SETTINGS_FILE))?;

    let manual = manual_convention(&settings, args);
    let convention = resolve_convention(&vault, Some(&manual))?;
    let codec = DailyNoteCodec::new(&convention).map_err(|e| {
        SweepError::UserError(format!(
            "cannot use daily note date format '{}': {}",
            convention.format, e
        ))
    })?;

    let scope = match selection {
        ScopeSelection::Today => CleanupScope::Today,
        ScopeSelection::Recent { days } => CleanupScope::Recent {
            days: days.unwrap_or(settings.recent_days).max(1),
        },
        ScopeSelection::All => CleanupScope::All,
    };

    let ignored_keys = merged_ignored_keys(&settings, args);
    let request = CleanupRequest {
        scope,
        ignored_keys: &ignored_keys,
        require_confirmation: settings.require_confirmation && !args.yes,
    };

    let mut confirm = prompt_confirmation;
    let summary = execute_cleanup(
        &vault,
        &codec,
        &request,
        Some(&mut confirm),
        Local::now().date_naive(),
    )?;

    print_summary(&summary);

    // Best-effort audit trail; a logging failure never fails the cleanup.
    if let Err(e) = append_event(vault.root(), &clean_event(&summary)) {
        eprintln!("Warning: failed to log clean event: {}", e);
    }

    Ok(())
}

/// The manual convention override: CLI flags beat the settings file.
fn manual_convention(settings: &Settings, args: &CleanArgs) -> ManualConvention {
    let folder = args
        .folder
        .clone()
        .or_else(|| non_empty(&settings.daily_notes_folder));
    let format = args
        .format
        .clone()
        .or_else(|| non_empty(&settings.daily_notes_format));
    ManualConvention { folder, format }
}

/// Settings keys plus this run's `--ignore` additions, deduplicated.
fn merged_ignored_keys(settings: &Settings, args: &CleanArgs) -> Vec<String> {
    let combined: Vec<&str> = settings
        .ignored_frontmatter_keys
        .iter()
        .map(String::as_str)
        .chain(args.ignore.iter().map(String::as_str))
        .collect();
    normalize_ignored_keys(combined)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Interactive confirmation gate: list the candidates, ask once, default no.
///
/// EOF and any answer other than `y`/`yes` decline. There is no timeout; the
/// prompt waits as long as the user does.
fn prompt_confirmation(candidate_paths: &[String]) -> bool {
    println!(
        "About to move {} empty daily note(s) to the vault trash:",
        candidate_paths.len()
    );
    for path in candidate_paths {
        println!("  - {}", path);
    }
    print!("Proceed? [y/N] ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
