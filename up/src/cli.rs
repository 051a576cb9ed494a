//! CLI argument parsing for unprefix

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "up")]
#[command(author, version, about = "Strip a fixed prefix from identifiers across a source tree", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Directory the configured directories are relative to
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Prefix to strip (overrides config)
    #[arg(short, long)]
    pub prefix: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Rewrite every collected file in place (default)
    Run {
        /// Report what would change without writing
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// List the files that would be rewritten
    Files,

    /// Print the name catalog
    Catalog {
        /// Print in substitution order (longest first)
        #[arg(short, long)]
        ordered: bool,
    },

    /// Report files that still contain prefixed names
    Check,
}

impl Default for Command {
    fn default() -> Self {
        Command::Run { dry_run: false }
    }
}
