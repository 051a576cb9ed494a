//! Prefix stripping over collected files
//!
//! Substitution is literal and syntax-blind: `PREFIX + name` becomes `name`
//! wherever it appears, including comments and string literals. Names are
//! applied longest first so a short name never eats into a longer one, and
//! each line is rewritten until no prefixed name remains, which makes a
//! second run a no-op.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::collect::{CollectedFile, FileSet};
use crate::error::UnprefixError;

/// Whether rewritten content goes back to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Apply,
    DryRun,
}

/// Rewritten text and the number of substitutions made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub replacements: usize,
}

/// Result of rewriting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub replacements: usize,
    pub changed: bool,
}

/// Totals for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub files_processed: usize,
    pub files_changed: usize,
    pub replacements: usize,
}

impl RewriteSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_processed += 1;
        self.replacements += outcome.replacements;
        if outcome.changed {
            self.files_changed += 1;
        }
    }
}

/// Strips a fixed prefix from every catalog name
#[derive(Debug, Clone)]
pub struct Rewriter {
    prefix: String,
    /// (prefixed, base) in substitution order
    pairs: Vec<(String, String)>,
}

impl Rewriter {
    pub fn new(prefix: impl Into<String>, catalog: &Catalog) -> Self {
        let prefix = prefix.into();
        let pairs = if prefix.is_empty() {
            Vec::new()
        } else {
            catalog
                .longest_first()
                .into_iter()
                .map(|base| (format!("{prefix}{base}"), base.to_string()))
                .collect()
        };
        debug!(%prefix, substitutions = pairs.len(), "Rewriter created");
        Self { prefix, pairs }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Base names in the order they are substituted
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(_, base)| base.as_str())
    }

    /// Rewrite a single line
    pub fn rewrite_line(&self, line: &str) -> String {
        self.strip(line).0
    }

    /// Rewrite a whole text, preserving line endings byte for byte
    pub fn rewrite_text(&self, text: &str) -> Rewrite {
        let mut out = String::with_capacity(text.len());
        let mut replacements = 0;

        for line in text.split_inclusive('\n') {
            let (rewritten, count) = self.strip(line);
            out.push_str(&rewritten);
            replacements += count;
        }

        Rewrite {
            text: out,
            replacements,
        }
    }

    /// Number of substitutions a rewrite of `text` would make
    ///
    /// Zero means `text` is already clean. A prefixed name is counted once
    /// even when a shorter catalog name also occurs inside it.
    pub fn remaining(&self, text: &str) -> usize {
        self.rewrite_text(text).replacements
    }

    /// Rewrite one file in place
    ///
    /// Unchanged files are not touched. Changed content is written to a
    /// temporary file next to the original and renamed over it, so a failure
    /// leaves the original intact.
    pub fn rewrite_file(&self, path: &Path, mode: WriteMode) -> Result<FileOutcome, UnprefixError> {
        let content = fs::read_to_string(path).map_err(|source| UnprefixError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let rewrite = self.rewrite_text(&content);
        let changed = rewrite.text != content;

        if changed && mode == WriteMode::Apply {
            write_atomic(path, &rewrite.text)?;
        }

        debug!(path = %path.display(), replacements = rewrite.replacements, changed, ?mode, "Rewrote file");
        Ok(FileOutcome {
            path: path.to_path_buf(),
            replacements: rewrite.replacements,
            changed,
        })
    }

    /// Rewrite every file in order, stopping at the first error
    ///
    /// `on_file` is called with each file before it is processed.
    pub fn rewrite_all<F>(&self, files: &FileSet, mode: WriteMode, mut on_file: F) -> Result<RewriteSummary, UnprefixError>
    where
        F: FnMut(&CollectedFile),
    {
        let mut summary = RewriteSummary::default();

        for file in files {
            on_file(file);
            debug!(path = %file.relative.display(), "Processing");
            let outcome = self.rewrite_file(&file.path, mode)?;
            summary.record(&outcome);
        }

        info!(
            files = summary.files_processed,
            changed = summary.files_changed,
            replacements = summary.replacements,
            "Rewrite complete"
        );
        Ok(summary)
    }

    /// Apply all substitutions until none matches
    ///
    /// Every effective pass shortens the line by at least the prefix
    /// length, so the loop terminates.
    fn strip(&self, line: &str) -> (String, usize) {
        let mut current = line.to_string();
        let mut total = 0;

        loop {
            let mut pass = 0;
            for (prefixed, base) in &self.pairs {
                let count = current.matches(prefixed.as_str()).count();
                if count > 0 {
                    current = current.replace(prefixed.as_str(), base);
                    pass += count;
                }
            }
            if pass == 0 {
                break;
            }
            total += pass;
        }

        (current, total)
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), UnprefixError> {
    let write_err = |source| UnprefixError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).map_err(write_err)?.permissions();

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    fs::set_permissions(tmp.path(), permissions).map_err(write_err)?;

    tmp.persist(path).map_err(|source| UnprefixError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
