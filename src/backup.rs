//! Mirrored backup tree for originals.
//!
//! Every original is moved to `<root>/.webpcon_backup/<relative path>` before
//! anything is written for it. The mapping is pure path arithmetic in both
//! directions; nothing is recorded on disk besides the backed-up files
//! themselves:
//!
//! ```text
//! project/                          project/
//! ├── a.png        ── convert ──▶   ├── a.webp
//! └── img/b.jpg                     ├── img/b.webp
//!                                   └── .webpcon_backup/
//!                                       ├── a.png
//!                                       └── img/b.jpg
//! ```
//!
//! Conversion moves (the original disappears from the project tree), revert
//! copies (the backup tree survives a revert).

use crate::config::BACKUP_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path is outside {root}: {path}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// Path mapping between a project tree and its backup tree.
#[derive(Debug, Clone)]
pub struct BackupTree {
    root: PathBuf,
    backup_root: PathBuf,
}

impl BackupTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let backup_root = root.join(BACKUP_DIR);
        Self { root, backup_root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// `root/R` → `root/.webpcon_backup/R`.
    pub fn backup_path(&self, original: &Path) -> Result<PathBuf, BackupError> {
        let rel = relative_to(original, &self.root)?;
        Ok(self.backup_root.join(rel))
    }

    /// `root/.webpcon_backup/R` → `root/R`.
    pub fn original_path(&self, backup: &Path) -> Result<PathBuf, BackupError> {
        let rel = relative_to(backup, &self.backup_root)?;
        Ok(self.root.join(rel))
    }

    /// Move `original` into the backup tree and return where it went.
    ///
    /// An existing backup at the same relative path is replaced.
    pub fn move_to_backup(&self, original: &Path) -> Result<PathBuf, BackupError> {
        let backup = self.backup_path(original)?;
        if let Some(parent) = backup.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(original, &backup)?;
        Ok(backup)
    }

    /// Copy a backed-up file to its original location and return that path.
    pub fn restore(&self, backup: &Path) -> Result<PathBuf, BackupError> {
        let original = self.original_path(backup)?;
        if let Some(parent) = original.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(backup, &original)?;
        Ok(original)
    }
}

fn relative_to<'a>(path: &'a Path, base: &Path) -> Result<&'a Path, BackupError> {
    path.strip_prefix(base)
        .map_err(|_| BackupError::OutsideRoot {
            path: path.to_path_buf(),
            root: base.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn backup_path_mirrors_relative_path() {
        let tree = BackupTree::new("/proj");
        assert_eq!(
            tree.backup_path(Path::new("/proj/img/a.png")).unwrap(),
            PathBuf::from("/proj/.webpcon_backup/img/a.png")
        );
    }

    #[test]
    fn original_path_inverts_backup_path() {
        let tree = BackupTree::new("/proj");
        let original = Path::new("/proj/x/y/z.jpeg");
        let backup = tree.backup_path(original).unwrap();
        assert_eq!(tree.original_path(&backup).unwrap(), original);
    }

    #[test]
    fn paths_outside_root_are_rejected() {
        let tree = BackupTree::new("/proj");
        assert!(matches!(
            tree.backup_path(Path::new("/elsewhere/a.png")),
            Err(BackupError::OutsideRoot { .. })
        ));
        assert!(tree.original_path(Path::new("/proj/a.png")).is_err());
    }

    #[test]
    fn move_to_backup_moves_bytes() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("nested/dir/a.png");
        fs::create_dir_all(original.parent().unwrap()).unwrap();
        fs::write(&original, b"original bytes").unwrap();

        let tree = BackupTree::new(tmp.path());
        let backup = tree.move_to_backup(&original).unwrap();

        assert!(!original.exists());
        assert_eq!(backup, tmp.path().join(".webpcon_backup/nested/dir/a.png"));
        assert_eq!(fs::read(&backup).unwrap(), b"original bytes");
    }

    #[test]
    fn move_to_backup_missing_source_errors() {
        let tmp = TempDir::new().unwrap();
        let tree = BackupTree::new(tmp.path());
        let result = tree.move_to_backup(&tmp.path().join("ghost.png"));
        assert!(matches!(result, Err(BackupError::Io(_))));
    }

    #[test]
    fn restore_copies_and_keeps_backup() {
        let tmp = TempDir::new().unwrap();
        let tree = BackupTree::new(tmp.path());
        let backup = tree.backup_root().join("sub/b.jpg");
        fs::create_dir_all(backup.parent().unwrap()).unwrap();
        fs::write(&backup, b"jpeg bytes").unwrap();

        let restored = tree.restore(&backup).unwrap();

        assert_eq!(restored, tmp.path().join("sub/b.jpg"));
        assert_eq!(fs::read(&restored).unwrap(), b"jpeg bytes");
        assert!(backup.exists());
    }
}
