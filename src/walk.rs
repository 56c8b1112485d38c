//! Recursive traversal of the project tree.
//!
//! Walks with [`walkdir`] in file-name order. Directories named in the
//! skip-dir table are pruned (never descended, at any depth). Files named in
//! the skip-file table are reported as [`WalkItem::Skipped`] rather than
//! silently dropped so the CLI can tell the user about them.
//!
//! Errors on individual entries (permission denied, a file vanishing
//! mid-walk) are logged at debug level and swallowed. One unreadable
//! directory never stops the rest of the tree from being processed.

use crate::config;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file found during a walk, with its lower-cased extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTarget {
    pub path: PathBuf,
    /// Lower-cased extension without the dot; empty when the file has none.
    pub extension: String,
}

impl ConversionTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        Self { path, extension }
    }

    /// Whether the extension is one of the convertible raster formats.
    ///
    /// `.webp` is never an image here, so existing output is not re-processed.
    pub fn is_image(&self) -> bool {
        config::is_image_extension(&self.extension)
    }

    /// Sibling path with the extension replaced by `.webp`.
    pub fn webp_path(&self) -> PathBuf {
        webp_sibling(&self.path)
    }
}

/// `dir/name.ext` → `dir/name.webp`.
pub fn webp_sibling(path: &Path) -> PathBuf {
    path.with_extension("webp")
}

/// Path relative to `root` for display, falling back to the full path.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// One file-level result of walking the project tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    Target(ConversionTarget),
    /// A file whose base name is on the exclusion list.
    Skipped(PathBuf),
}

fn is_pruned_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(config::is_skipped_dir)
}

fn ok_entry(result: walkdir::Result<DirEntry>) -> Option<DirEntry> {
    match result {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::debug!(error = %e, "walk error ignored");
            None
        }
    }
}

/// Walk the project tree applying the exclusion tables.
pub fn walk_project(root: &Path) -> impl Iterator<Item = WalkItem> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_pruned_dir(e))
        .filter_map(ok_entry)
        .filter(|e| !e.file_type().is_dir())
        .map(|e| {
            let skipped = e.file_name().to_str().is_some_and(config::is_skipped_file);
            if skipped {
                WalkItem::Skipped(e.into_path())
            } else {
                WalkItem::Target(ConversionTarget::new(e.into_path()))
            }
        })
}

/// Walk every file under `root` with no exclusions (used for the backup tree).
pub fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(ok_entry)
        .filter(|e| !e.file_type().is_dir())
        .map(DirEntry::into_path)
}
