//! Unprefix - bulk prefix-stripping renamer for source trees
//!
//! Renames every `PREFIX + Name` to `Name` across the files of a source
//! tree, for a catalog of names built from a static list and from the file
//! names of the library directories.
//!
//! # Pipeline
//!
//! ```text
//! library dirs ──┐                 ┌── derived names ──┐
//!                ├── collect ──────┤                   ├── Catalog ── Rewriter
//! consumer dirs ─┘                 └── FileSet ────────┼──────────────────┘
//!                                   static names ──────┘
//! ```
//!
//! Collection runs to completion before the catalog is built, and the
//! rewriter receives the finished catalog. Nothing is mutated after that.
//!
//! # Example
//!
//! ```ignore
//! use unprefix::{Config, Pipeline, WriteMode};
//!
//! let pipeline = Pipeline::from_config(&Config::default())?;
//! let summary = pipeline.rewriter.rewrite_all(&pipeline.files, WriteMode::Apply, |_| {})?;
//! ```

pub mod catalog;
pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod rewrite;

pub use catalog::{Catalog, base_name};
pub use collect::{CollectedFile, Collection, DirectoryGroup, FileSet, Selector, collect};
pub use config::Config;
pub use error::UnprefixError;
pub use rewrite::{FileOutcome, Rewrite, RewriteSummary, Rewriter, WriteMode};

/// Default prefix stripped from names
pub const DEFAULT_PREFIX: &str = "eo";

/// Default header file marker
pub const DEFAULT_HEADER_MARKER: &str = ".h";

/// Default source file marker
pub const DEFAULT_SOURCE_MARKER: &str = ".cpp";

/// Everything a run needs, built once from configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Static names followed by derived names
    pub catalog: Catalog,
    /// Files to rewrite
    pub files: FileSet,
    /// Rewriter over the finished catalog
    pub rewriter: Rewriter,
}

impl Pipeline {
    /// Collect files, then build the catalog and the rewriter
    pub fn from_config(config: &Config) -> Result<Self, UnprefixError> {
        let Collection { files, derived_names } = collect(config)?;

        let mut catalog = Catalog::new(config.static_names.iter().cloned());
        catalog.extend(derived_names);

        let rewriter = Rewriter::new(config.prefix.as_str(), &catalog);
        tracing::debug!(files = files.len(), names = catalog.len(), "Pipeline ready");

        Ok(Self {
            catalog,
            files,
            rewriter,
        })
    }
}
