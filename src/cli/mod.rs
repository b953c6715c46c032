//! CLI argument parsing for notesweep.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Notesweep: find and remove empty daily notes in a Markdown note vault.
///
/// A daily note counts as empty when its body is blank and its frontmatter
/// carries nothing beyond timestamps and explicitly ignored keys. Deleted
/// notes are moved to the vault's `.trash/` directory, never unlinked.
#[derive(Parser, Debug)]
#[command(name = "notesweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault root (default: current directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for notesweep.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clean today's daily note if it is empty.
    Today(CleanArgs),

    /// Clean empty daily notes from the last N days.
    ///
    /// The day count defaults to the `recent_days` setting.
    Recent(RecentArgs),

    /// Clean every empty daily note in the vault.
    All(CleanArgs),
}

/// Arguments shared by all cleanup commands.
#[derive(Parser, Debug, Default)]
pub struct CleanArgs {
    /// Skip the confirmation prompt.
    #[arg(long)]
    pub yes: bool,

    /// Override the daily notes folder for this run.
    #[arg(long, value_name = "FOLDER")]
    pub folder: Option<String>,

    /// Override the daily notes date format for this run (e.g. YYYY-MM-DD).
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Additional frontmatter keys to ignore, comma separated.
    #[arg(long, value_delimiter = ',', value_name = "KEYS")]
    pub ignore: Vec<String>,
}

/// Arguments for the `recent` command.
#[derive(Parser, Debug)]
pub struct RecentArgs {
    /// How many days back to look, including today.
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    #[command(flatten)]
    pub common: CleanArgs,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
