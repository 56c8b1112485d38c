//! Revert mode: put every backed-up original back and drop its WebP.
//!
//! Walks the backup tree, not the project tree. For each backed-up image:
//!
//! 1. If `<original>.webp` exists, delete it.
//! 2. Copy the backup to its original location, creating directories.
//!
//! The backup tree is never modified, so reverting twice gives the same
//! result and reports the same files. A missing WebP (deleted by hand, or a
//! conversion that failed after the backup) is not an error; the original is
//! restored anyway.

use crate::backup::{BackupError, BackupTree};
use crate::walk::{ConversionTarget, display_relative, walk_files, webp_sibling};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RevertError {
    #[error("No backup found at {0}")]
    MissingBackupRoot(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),
}

/// Progress events. Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertEvent {
    /// A generated WebP was removed.
    Deleted { path: String },
    Restored { path: String },
    Failed { path: String, error: String },
}

/// Totals for a revert run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevertSummary {
    pub restored: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl std::fmt::Display for RevertSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} restored, {} WebP deleted, {} failed",
            self.restored, self.deleted, self.failed
        )
    }
}

/// Restore every original under `root` from its backup tree.
///
/// Fails only when the backup tree itself is missing. Per-file problems are
/// reported as [`RevertEvent::Failed`] and counted.
pub fn revert(
    root: &Path,
    events: Option<Sender<RevertEvent>>,
) -> Result<RevertSummary, RevertError> {
    let tree = BackupTree::new(root);
    if !tree.backup_root().is_dir() {
        return Err(RevertError::MissingBackupRoot(
            tree.backup_root().to_path_buf(),
        ));
    }

    let mut summary = RevertSummary::default();
    let emit = |event: RevertEvent| {
        if let Some(tx) = &events {
            let _ = tx.send(event);
        }
    };

    for backup in walk_files(tree.backup_root()) {
        if !ConversionTarget::new(&backup).is_image() {
            continue;
        }
        let rel = display_relative(&backup, tree.backup_root());

        match delete_webp(&tree, &backup) {
            Ok(Some(webp)) => {
                summary.deleted += 1;
                emit(RevertEvent::Deleted {
                    path: display_relative(&webp, root),
                });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(path = %backup.display(), error = %e, "cannot delete WebP");
                summary.failed += 1;
                emit(RevertEvent::Failed {
                    path: rel,
                    error: e.to_string(),
                });
                continue;
            }
        }

        match tree.restore(&backup) {
            Ok(_) => {
                summary.restored += 1;
                emit(RevertEvent::Restored { path: rel });
            }
            Err(e) => {
                tracing::warn!(path = %backup.display(), error = %e, "restore failed");
                summary.failed += 1;
                emit(RevertEvent::Failed {
                    path: rel,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

/// Remove the WebP generated for `backup`, returning its path if one existed.
fn delete_webp(tree: &BackupTree, backup: &Path) -> Result<Option<PathBuf>, RevertError> {
    let webp = webp_sibling(&tree.original_path(backup)?);
    if !webp.exists() {
        return Ok(None);
    }
    fs::remove_file(&webp)?;
    Ok(Some(webp))
}
