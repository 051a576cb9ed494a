//! File collection over the two directory groups
//!
//! Each configured directory is listed one level deep, without sorting, so
//! files come out in the order the filesystem returns them. Library
//! directories are listed first and also yield the derived base names.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::catalog::base_name;
use crate::config::Config;
use crate::error::UnprefixError;

/// Which configured group a directory belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryGroup {
    /// Library source: rewritten, and file names join the catalog
    Library,
    /// Application and test source: rewritten only
    Consumer,
}

impl DirectoryGroup {
    fn contributes_names(self) -> bool {
        matches!(self, DirectoryGroup::Library)
    }
}

/// File name selection rule
///
/// A file qualifies if its name contains either marker anywhere, not only
/// as a suffix: with the default markers `Pop.h.in` and `main.cpp~` qualify.
#[derive(Debug, Clone)]
pub struct Selector {
    pub header_marker: String,
    pub source_marker: String,
}

impl Selector {
    pub fn new(header_marker: impl Into<String>, source_marker: impl Into<String>) -> Self {
        Self {
            header_marker: header_marker.into(),
            source_marker: source_marker.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.header_marker, &config.source_marker)
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.contains(&self.header_marker) || file_name.contains(&self.source_marker)
    }
}

/// One file selected for rewriting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    /// Group of the directory it was found in
    pub group: DirectoryGroup,
    /// `directory/filename` as configured
    pub relative: PathBuf,
    /// Path on disk (root joined with `relative`)
    pub path: PathBuf,
}

/// Ordered list of files to rewrite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    files: Vec<CollectedFile>,
}

impl FileSet {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CollectedFile> {
        self.files.iter()
    }

    /// Relative paths in collection order
    pub fn paths(&self) -> Vec<&Path> {
        self.files.iter().map(|f| f.relative.as_path()).collect()
    }
}

impl FromIterator<CollectedFile> for FileSet {
    fn from_iter<I: IntoIterator<Item = CollectedFile>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a CollectedFile;
    type IntoIter = std::slice::Iter<'a, CollectedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Output of a collection pass
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Files to rewrite, library group first
    pub files: FileSet,
    /// Base names derived from library file names, in collection order
    pub derived_names: Vec<String>,
}

/// Collect files from both directory groups of `config`
pub fn collect(config: &Config) -> Result<Collection, UnprefixError> {
    let collector = Collector::new(&config.root, Selector::from_config(config));
    let mut collection = Collection::default();

    for dir in &config.library_dirs {
        collector.collect_dir(dir, DirectoryGroup::Library, &mut collection)?;
    }
    for dir in &config.consumer_dirs {
        collector.collect_dir(dir, DirectoryGroup::Consumer, &mut collection)?;
    }

    info!(
        files = collection.files.len(),
        derived_names = collection.derived_names.len(),
        "Collection complete"
    );
    Ok(collection)
}

struct Collector<'a> {
    root: &'a Path,
    selector: Selector,
}

impl<'a> Collector<'a> {
    fn new(root: &'a Path, selector: Selector) -> Self {
        Self { root, selector }
    }

    fn collect_dir(&self, dir: &Path, group: DirectoryGroup, out: &mut Collection) -> Result<(), UnprefixError> {
        let full = self.root.join(dir);
        debug!(dir = %full.display(), ?group, "Listing directory");

        if full.exists() && !full.is_dir() {
            return Err(UnprefixError::NotADirectory { path: full });
        }

        // Symlinks are resolved only for selected entries
        let walker = WalkDir::new(&full).min_depth(1).max_depth(1);

        for entry in walker {
            let entry = entry.map_err(|source| UnprefixError::DirectoryList {
                path: full.clone(),
                source,
            })?;

            let Some(file_name) = entry.file_name().to_str() else {
                warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };

            if !self.selector.matches(file_name) {
                continue;
            }

            if !is_regular_file(&entry)? {
                continue;
            }

            if group.contributes_names() {
                out.derived_names.push(base_name(file_name).to_string());
            }

            let relative = dir.join(file_name);
            out.files.files.push(CollectedFile {
                group,
                path: self.root.join(&relative),
                relative,
            });
        }

        Ok(())
    }
}

/// Whether a selected entry is a file, resolving symlinks
///
/// A selected link that cannot be resolved is a read error for that entry.
fn is_regular_file(entry: &walkdir::DirEntry) -> Result<bool, UnprefixError> {
    if !entry.path_is_symlink() {
        return Ok(entry.file_type().is_file());
    }

    let metadata = std::fs::metadata(entry.path()).map_err(|source| UnprefixError::Read {
        path: entry.path().to_path_buf(),
        source,
    })?;
    Ok(metadata.is_file())
}
