//! Convert mode: walk the project, back up each image, write its WebP.
//!
//! For every convertible file found by [`walk_project`](crate::walk::walk_project):
//!
//! 1. Move the original into the backup tree. If this fails the file is left
//!    alone and reported; nothing else happens to it.
//! 2. Decode from the backup path and write `<name>.webp` next to where the
//!    original was:
//!    - multi-frame GIFs go through the [animated pipeline](crate::animated)
//!      when it is enabled;
//!    - everything else (including GIFs otherwise) is converted as a single
//!      frame.
//!
//! Failures are contained per file: they are reported as
//! [`ConvertEvent::Failed`] and the walk moves on. Only a missing project root
//! aborts the run.

use crate::animated::{self, AnimationError};
use crate::backup::{BackupError, BackupTree};
use crate::config::Settings;
use crate::imaging::{BackendError, ImageBackend, Quality, RustBackend, SourceFormat, StaticParams};
use crate::walk::{ConversionTarget, WalkItem, display_relative, walk_project};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Project root not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Backup failed: {0}")]
    Backup(#[from] BackupError),
    #[error("Image processing failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Animated conversion failed: {0}")]
    Animation(#[from] AnimationError),
    #[error("Unsupported image extension: {0}")]
    Unsupported(String),
}

/// Encoding choices for one convert run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub quality: Quality,
    /// Route multi-frame GIFs through the animated pipeline.
    pub animated_gif: bool,
    pub frame_quality: Quality,
}

impl ConvertOptions {
    /// Settings from `webpcon.toml`; the CLI flag can only switch animation on.
    pub fn from_settings(settings: &Settings, enable_gif: bool) -> Self {
        Self {
            quality: Quality::new(settings.convert.quality),
            animated_gif: enable_gif || settings.animation.enabled,
            frame_quality: Quality::new(settings.animation.quality),
        }
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), false)
    }
}

/// How a file ended up converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertMode {
    Static,
    Animated { frames: usize },
}

/// Progress events, one per file. Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertEvent {
    /// File on the exclusion list.
    Skipped { path: String },
    Converted {
        source: String,
        output: String,
        mode: ConvertMode,
    },
    Failed { path: String, error: String },
}

/// Totals for a convert run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Every successful conversion, animated ones included.
    pub converted: usize,
    pub animated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl std::fmt::Display for ConvertSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} converted ({} animated), {} skipped, {} failed",
            self.converted, self.animated, self.skipped, self.failed
        )
    }
}

pub fn convert(
    root: &Path,
    options: &ConvertOptions,
    events: Option<Sender<ConvertEvent>>,
) -> Result<ConvertSummary, ConvertError> {
    convert_with_backend(&RustBackend::new(), root, options, events)
}

/// Convert using a specific backend (allows testing with mock).
pub fn convert_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    options: &ConvertOptions,
    events: Option<Sender<ConvertEvent>>,
) -> Result<ConvertSummary, ConvertError> {
    if !root.is_dir() {
        return Err(ConvertError::RootNotFound(root.to_path_buf()));
    }

    let tree = BackupTree::new(root);
    let cache = animated::cache_dir(root);
    let mut summary = ConvertSummary::default();
    let emit = |event: ConvertEvent| {
        if let Some(tx) = &events {
            let _ = tx.send(event);
        }
    };

    for item in walk_project(root) {
        let target = match item {
            WalkItem::Skipped(path) => {
                summary.skipped += 1;
                emit(ConvertEvent::Skipped {
                    path: display_relative(&path, root),
                });
                continue;
            }
            WalkItem::Target(target) if target.is_image() => target,
            WalkItem::Target(_) => continue,
        };

        let rel = display_relative(&target.path, root);
        match convert_file(backend, &tree, &cache, &target, options) {
            Ok(mode) => {
                summary.converted += 1;
                if matches!(mode, ConvertMode::Animated { .. }) {
                    summary.animated += 1;
                }
                emit(ConvertEvent::Converted {
                    source: rel,
                    output: display_relative(&target.webp_path(), root),
                    mode,
                });
            }
            Err(e) => {
                tracing::warn!(path = %target.path.display(), error = %e, "conversion failed");
                summary.failed += 1;
                emit(ConvertEvent::Failed {
                    path: rel,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

fn convert_file(
    backend: &impl ImageBackend,
    tree: &BackupTree,
    cache: &Path,
    target: &ConversionTarget,
    options: &ConvertOptions,
) -> Result<ConvertMode, ConvertError> {
    let format = SourceFormat::from_extension(&target.extension)
        .ok_or_else(|| ConvertError::Unsupported(target.extension.clone()))?;
    let output = target.webp_path();

    let backup = tree.move_to_backup(&target.path)?;
    tracing::debug!(from = %target.path.display(), to = %backup.display(), "original moved to backup");

    if format == SourceFormat::Gif
        && options.animated_gif
        && backend.gif_frame_count(&backup)? > 1
    {
        let outcome =
            animated::convert_animated(backend, &backup, &output, cache, options.frame_quality)?;
        return Ok(ConvertMode::Animated {
            frames: outcome.frames,
        });
    }

    backend.convert_static(&StaticParams {
        source: backup,
        format,
        output,
        quality: options.quality,
    })?;
    Ok(ConvertMode::Static)
}
