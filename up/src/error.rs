//! Error types for collection and rewriting

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run
///
/// Every variant is fatal: the run stops at the first failure and files
/// already rewritten are left as they are.
#[derive(Debug, Error)]
pub enum UnprefixError {
    #[error("Failed to list directory {path}")]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace {path} with rewritten content")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}
