//! Display and formatting for cleanup command output.

use crate::cleanup::{CleanupStatus, CleanupSummary};

/// Print the end-of-run summary in a readable format.
pub fn print_summary(summary: &CleanupSummary) {
    match summary.status {
        CleanupStatus::NoCandidates => {
            println!(
                "[{}] Scanned {} daily note(s), none are empty.",
                summary.scope, summary.scanned_count
            );
            print_skip_counts(summary);
        }
        CleanupStatus::Cancelled => {
            println!(
                "[{}] Cancelled: {} candidate(s) left untouched.",
                summary.scope, summary.candidate_count
            );
            for path in &summary.candidate_paths {
                println!("    - {}", path);
            }
        }
        CleanupStatus::Completed => {
            println!("[{}] Cleanup complete:", summary.scope);
            println!("  Scanned:  {}", summary.scanned_count);
            println!("  Deleted:  {}", summary.deleted_count);
            for path in &summary.deleted_paths {
                println!("    - {}", path);
            }
            if summary.failed_count > 0 {
                println!("  Failed:   {}", summary.failed_count);
                for path in &summary.failed_paths {
                    println!("    - {}", path);
                }
            }
            print_skip_counts(summary);
        }
    }
}

fn print_skip_counts(summary: &CleanupSummary) {
    if summary.skipped_non_empty_count > 0 {
        println!("  Skipped (non-empty): {}", summary.skipped_non_empty_count);
    }
    if summary.skipped_uncertain_count > 0 {
        println!("  Skipped (uncertain): {}", summary.skipped_uncertain_count);
    }
}
