//! Exit code constants for the notesweep CLI.
//!
//! - 0: Success (including "no candidates" and a declined confirmation)
//! - 1: User error (bad args, invalid vault, invalid settings)
//! - 2: Convention resolution failure (daily notes config unavailable)
//! - 3: Vault operation failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid vault path, invalid settings, or an
/// unusable daily note date format.
pub const USER_ERROR: i32 = 1;

/// The daily notes convention could not be resolved; no note was touched.
pub const CONVENTION_FAILURE: i32 = 2;

/// A vault-level operation failed before any note could be classified.
pub const VAULT_FAILURE: i32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, CONVENTION_FAILURE, VAULT_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }
}
