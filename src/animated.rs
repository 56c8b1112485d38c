//! Animated GIF → animated WebP pipeline (experimental, opt-in).
//!
//! Runs four steps in order. Each step needs the previous one to succeed:
//!
//! ```text
//! 1. Extract    backup.gif      →  .webpcon_cache/frame_00.png ... frame_NN.png
//! 2. Compress   frame_NN.png    →  .webpcon_cache/frame_NN.webp   (quality 60)
//! 3. Assemble   frame_*.webp    →  <original>.webp                (animated)
//! 4. Cleanup    rm -r .webpcon_cache
//! ```
//!
//! Frame delays come from the GIF in centiseconds and are scaled by
//! [`GIF_DELAY_SCALE`] to milliseconds. Disposal methods and the loop count
//! are forwarded as the source declares them. The animation background is
//! always [`ANIMATION_BACKGROUND`].
//!
//! The pipeline is not transactional. If a step fails the error is returned
//! straight away and the cache directory is left as it was, so the partial
//! frames can be inspected. Each new attempt starts from an empty cache
//! directory.

use crate::config::{ANIMATION_BACKGROUND, CACHE_DIR, GIF_DELAY_SCALE};
use crate::imaging::{
    AnimationFrame, AnimationParams, BackendError, ExtractParams, FrameParams, ImageBackend,
    Quality, frame_path,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnimationError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("frame extraction failed: {0}")]
    Extract(#[source] BackendError),
    #[error("frame {index} compression failed: {source}")]
    Compress {
        index: usize,
        #[source]
        source: BackendError,
    },
    #[error("animation assembly failed: {0}")]
    Assemble(#[source] BackendError),
    #[error("GIF has {0} frame(s); nothing to animate")]
    NotAnimated(usize),
}

/// `<root>/.webpcon_cache`.
pub fn cache_dir(root: &Path) -> PathBuf {
    root.join(CACHE_DIR)
}

/// Result of a successful animated conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationOutcome {
    pub output: PathBuf,
    pub frames: usize,
    /// Sum of all frame durations.
    pub duration_ms: u64,
}

/// Convert a multi-frame GIF into an animated WebP at `output`.
///
/// `source` is the backed-up GIF; `cache` is the scratch directory, removed
/// after a successful assembly.
pub fn convert_animated(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    cache: &Path,
    quality: Quality,
) -> Result<AnimationOutcome, AnimationError> {
    reset_cache(cache)?;

    let set = backend
        .extract_gif_frames(&ExtractParams {
            source: source.to_path_buf(),
            frames_dir: cache.to_path_buf(),
        })
        .map_err(AnimationError::Extract)?;
    if set.len() < 2 {
        return Err(AnimationError::NotAnimated(set.len()));
    }
    tracing::debug!(source = %source.display(), frames = set.len(), "frames extracted");

    let mut frames = Vec::with_capacity(set.len());
    for (index, frame) in set.frames.iter().enumerate() {
        let webp = frame_path(cache, index, "webp");
        backend
            .compress_frame(&FrameParams {
                source: frame.png.clone(),
                output: webp.clone(),
                quality,
            })
            .map_err(|source| AnimationError::Compress { index, source })?;
        frames.push(AnimationFrame {
            webp,
            duration_ms: u32::from(frame.delay_cs) * GIF_DELAY_SCALE,
            disposal: frame.disposal,
        });
    }

    let duration_ms = frames.iter().map(|f| u64::from(f.duration_ms)).sum();
    let frame_count = frames.len();

    backend
        .assemble_animation(&AnimationParams {
            width: set.width,
            height: set.height,
            frames,
            loop_count: set.loop_count,
            background: ANIMATION_BACKGROUND,
            quality,
            output: output.to_path_buf(),
        })
        .map_err(AnimationError::Assemble)?;

    if let Err(e) = fs::remove_dir_all(cache) {
        tracing::warn!(cache = %cache.display(), error = %e, "failed to remove frame cache");
    }

    Ok(AnimationOutcome {
        output: output.to_path_buf(),
        frames: frame_count,
        duration_ms,
    })
}

fn reset_cache(cache: &Path) -> io::Result<()> {
    match fs::remove_dir_all(cache) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(cache)
}
