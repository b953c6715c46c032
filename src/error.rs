//! Error types for the notesweep CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Only invocation-fatal problems become a `SweepError`: per-note read, parse,
//! and delete failures are contained by the cleanup run and surfaced through
//! the end-of-run summary instead.

use crate::daily::ConventionFailure;
use crate::exit_codes;
use thiserror::Error;

/// Main error type for notesweep operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum SweepError {
    /// User provided invalid arguments, an invalid vault, or invalid settings.
    #[error("{0}")]
    UserError(String),

    /// The daily notes convention could not be resolved.
    #[error("could not resolve the daily notes convention: {0}")]
    ConventionError(#[from] ConventionFailure),

    /// A vault-level operation failed.
    #[error("Vault operation failed: {0}")]
    VaultError(String),
}

impl SweepError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SweepError::UserError(_) => exit_codes::USER_ERROR,
            SweepError::ConventionError(_) => exit_codes::CONVENTION_FAILURE,
            SweepError::VaultError(_) => exit_codes::VAULT_FAILURE,
        }
    }
}

/// Result type alias for notesweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
