//! Audit logging for cleanup runs.
//!
//! Every finished run appends one event to `.notesweep/events.ndjson` inside
//! the vault (one JSON object per line). The log is append-only and written
//! best-effort: a failure to log warns but never fails the command.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: the action performed (currently always `clean`)
//! - `actor`: the owner string (e.g. `user@HOST`)
//! - `details`: freeform object with action-specific details

use crate::cleanup::CleanupSummary;
use crate::error::{Result, SweepError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory inside the vault holding notesweep state.
pub const STATE_DIR: &str = ".notesweep";

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A cleanup run finished (any terminal status).
    Clean,
}

/// One audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// When the event happened.
    pub ts: DateTime<Utc>,
    /// What happened.
    pub action: EventAction,
    /// Who did it, as `user@host`.
    pub actor: String,
    /// Action-specific details.
    pub details: Value,
}

impl Event {
    /// Create an event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            details: Value::Null,
        }
    }

    /// Attach details to the event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

/// Build the audit event for a finished cleanup run.
pub fn clean_event(summary: &CleanupSummary) -> Event {
    Event::new(EventAction::Clean).with_details(json!({
        "scope": summary.scope.to_string(),
        "status": summary.status.to_string(),
        "scanned": summary.scanned_count,
        "candidates": summary.candidate_count,
        "deleted": summary.deleted_count,
        "failed": summary.failed_count,
        "skipped_non_empty": summary.skipped_non_empty_count,
        "skipped_uncertain": summary.skipped_uncertain_count,
    }))
}

/// Path of the event log inside a vault.
pub fn events_file(vault_root: &Path) -> PathBuf {
    vault_root.join(STATE_DIR).join("events.ndjson")
}

/// Append one event to the vault's audit log.
pub fn append_event(vault_root: &Path, event: &Event) -> Result<()> {
    let file_path = events_file(vault_root);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SweepError::UserError(format!(
                "failed to create events directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let line = serde_json::to_string(event)
        .map_err(|e| SweepError::UserError(format!("failed to serialize event: {}", e)))?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&file_path)
        .map_err(|e| {
            SweepError::UserError(format!(
                "failed to open events log '{}': {}",
                file_path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", line).map_err(|e| {
        SweepError::UserError(format!(
            "failed to append to events log '{}': {}",
            file_path.display(),
            e
        ))
    })
}

/// Actor string for event metadata, determined from the environment.
fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let host = hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());
    format!("{user}@{host}")
}
