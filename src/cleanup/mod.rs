//! Cleanup orchestration.
//!
//! One cleanup run resolves its scope to candidate files, classifies each
//! file's content, optionally asks for confirmation, deletes the confirmed
//! candidates, and reports everything in a single summary.
//!
//! Failure containment is the point of this module: no single note's read,
//! parse, or delete failure aborts the batch. Uncertainty is never treated
//! as emptiness, and a missing confirmation callback while confirmation is
//! required counts as a decline.

mod types;


pub use types::{CandidateAnalysis, CleanupScope, CleanupStatus, CleanupSummary};

use crate::classify::classify_note;
use crate::daily::{DailyNoteCodec, recent_dates};
use crate::error::Result;
use crate::vault::{NoteRef, Vault};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Inputs of one cleanup run.
#[derive(Debug)]
pub struct CleanupRequest<'a> {
    /// Which daily notes to consider.
    pub scope: CleanupScope,
    /// Frontmatter keys to disregard during emptiness classification.
    pub ignored_keys: &'a [String],
    /// Whether deletion needs an explicit go-ahead.
    pub require_confirmation: bool,
}

/// Asynchronous-in-spirit yes/no gate: called at most once, with the full
/// candidate path list; returns whether deletion may proceed.
pub type ConfirmFn<'a> = &'a mut dyn FnMut(&[String]) -> bool;

/// Run one cleanup invocation.
///
/// `today` anchors the `Today` and `Recent` scopes; callers pass the current
/// local date, tests pass a fixed one. Only vault listing failures abort the
/// run; everything else is contained per note and lands in the summary.
pub fn execute_cleanup(
    vault: &dyn Vault,
    codec: &DailyNoteCodec,
    request: &CleanupRequest<'_>,
    mut confirm: Option<ConfirmFn<'_>>,
    today: NaiveDate,
) -> Result<CleanupSummary> {
    let files = collect_files_by_scope(vault, codec, request.scope, today)?;
    let files = dedupe_by_path(files);

    let analysis = analyze_candidates(vault, &files, request.ignored_keys);
    let candidate_paths: Vec<String> = analysis
        .candidates
        .iter()
        .map(|note| note.path.clone())
        .collect();

    if candidate_paths.is_empty() {
        return Ok(summarize(
            request.scope,
            &analysis,
            candidate_paths,
            Vec::new(),
            Vec::new(),
            CleanupStatus::NoCandidates,
        ));
    }

    if request.require_confirmation {
        let confirmed = match confirm.as_mut() {
            Some(callback) => callback(&candidate_paths),
            // No way to ask means no permission to delete.
            None => false,
        };
        if !confirmed {
            return Ok(summarize(
                request.scope,
                &analysis,
                candidate_paths,
                Vec::new(),
                Vec::new(),
                CleanupStatus::Cancelled,
            ));
        }
    }

    let mut deleted_paths = Vec::new();
    let mut failed_paths = Vec::new();
    for note in &analysis.candidates {
        match vault.trash_note(note) {
            Ok(()) => deleted_paths.push(note.path.clone()),
            Err(_) => failed_paths.push(note.path.clone()),
        }
    }

    Ok(summarize(
        request.scope,
        &analysis,
        candidate_paths,
        deleted_paths,
        failed_paths,
        CleanupStatus::Completed,
    ))
}

/// Resolve the scope to concrete files.
///
/// `Today` and `Recent` go date-first through the codec and only keep paths
/// that exist; `All` goes listing-first and keeps paths the codec accepts.
fn collect_files_by_scope(
    vault: &dyn Vault,
    codec: &DailyNoteCodec,
    scope: CleanupScope,
    today: NaiveDate,
) -> Result<Vec<NoteRef>> {
    match scope {
        CleanupScope::Today => {
            let path = codec.expected_path(today);
            Ok(vault.lookup_note(&path).into_iter().collect())
        }
        CleanupScope::Recent { days } => Ok(recent_dates(days, today)
            .into_iter()
            .filter_map(|date| vault.lookup_note(&codec.expected_path(date)))
            .collect()),
        CleanupScope::All => {
            let notes = vault.list_notes()?;
            Ok(notes
                .into_iter()
                .filter(|note| codec.matches(&note.path))
                .collect())
        }
    }
}

/// Drop duplicate paths while preserving first-seen order.
fn dedupe_by_path(files: Vec<NoteRef>) -> Vec<NoteRef> {
    let mut seen: HashSet<String> = HashSet::new();
    files
        .into_iter()
        .filter(|note| seen.insert(note.path.clone()))
        .collect()
}

/// Read and classify every file, partitioning into candidates and skips.
///
/// A read failure routes the file to skipped-uncertain; it is never allowed
/// to become a deletion candidate.
fn analyze_candidates(
    vault: &dyn Vault,
    files: &[NoteRef],
    ignored_keys: &[String],
) -> CandidateAnalysis {
    let mut analysis = CandidateAnalysis {
        scanned_count: files.len(),
        ..CandidateAnalysis::default()
    };

    for note in files {
        let content = match vault.read_note(note) {
            Ok(content) => content,
            Err(_) => {
                analysis.skipped_uncertain_paths.push(note.path.clone());
                continue;
            }
        };

        let classification = classify_note(&content, ignored_keys);
        if classification.is_empty {
            analysis.candidates.push(note.clone());
        } else if classification.reason.is_uncertain() {
            analysis.skipped_uncertain_paths.push(note.path.clone());
        } else {
            analysis.skipped_non_empty_paths.push(note.path.clone());
        }
    }

    analysis
}

/// Assemble the immutable end-of-run record.
fn summarize(
    scope: CleanupScope,
    analysis: &CandidateAnalysis,
    candidate_paths: Vec<String>,
    deleted_paths: Vec<String>,
    failed_paths: Vec<String>,
    status: CleanupStatus,
) -> CleanupSummary {
    CleanupSummary {
        scope,
        scanned_count: analysis.scanned_count,
        candidate_count: candidate_paths.len(),
        deleted_count: deleted_paths.len(),
        failed_count: failed_paths.len(),
        skipped_non_empty_count: analysis.skipped_non_empty_paths.len(),
        skipped_uncertain_count: analysis.skipped_uncertain_paths.len(),
        candidate_paths,
        deleted_paths,
        failed_paths,
        status,
    }
}
