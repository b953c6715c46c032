//! Command implementations for notesweep.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. All three commands are the same cleanup run under a
//! different scope.

mod clean;

use crate::cli::{Cli, Command};
use crate::error::{Result, SweepError};
use clean::{ScopeSelection, cmd_clean};
use std::path::PathBuf;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let vault_root = resolve_vault_root(cli.vault)?;

    match cli.command {
        Command::Today(args) => cmd_clean(&vault_root, ScopeSelection::Today, &args),
        Command::Recent(args) => cmd_clean(
            &vault_root,
            ScopeSelection::Recent { days: args.days },
            &args.common,
        ),
        Command::All(args) => cmd_clean(&vault_root, ScopeSelection::All, &args),
    }
}

/// The vault root: the `--vault` flag, or the current directory.
fn resolve_vault_root(vault: Option<PathBuf>) -> Result<PathBuf> {
    match vault {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| {
            SweepError::UserError(format!("failed to get current working directory: {}", e))
        }),
    }
}
