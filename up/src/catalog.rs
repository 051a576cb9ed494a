//! Base name catalog
//!
//! The catalog is the list of unprefixed names to restore. It starts from
//! the configured static names and is extended with names derived from
//! library file names. It is append-only; substitution order is computed
//! from it on demand by [`Catalog::longest_first`].

use std::collections::HashSet;
use std::path::Path;

/// Ordered, append-only list of base names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    names: Vec<String>,
}

impl Catalog {
    /// Create a catalog seeded with static names
    pub fn new<I, S>(static_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        catalog.extend(static_names);
        catalog
    }

    /// Append names, keeping duplicates
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    /// Names in insertion order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Substitution order: unique non-empty names, longest first
    ///
    /// A shorter name must never be substituted before a longer name that
    /// contains it. Names of equal length are ordered lexically, so the
    /// result depends only on the set of names, never on catalog order.
    pub fn longest_first(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut ordered: Vec<&str> = self
            .names
            .iter()
            .map(String::as_str)
            .filter(|n| !n.is_empty() && seen.insert(*n))
            .collect();
        ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        ordered
    }
}

/// File name without its final extension
///
/// `Pop.h` gives `Pop`, `make_op.cpp` gives `make_op`, a name without an
/// extension is returned unchanged.
pub fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}
