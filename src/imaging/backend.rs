//! Image backend trait and shared error type.
//!
//! The [`ImageBackend`] trait covers every codec operation the workflow
//! needs: the single-frame conversion, and the four steps of the animated
//! GIF pipeline (count, extract, compress, assemble).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`,
//! `gif` and `webp` crates.

use super::params::{AnimationParams, ExtractParams, FrameParams, FrameSet, StaticParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for image codec backends.
///
/// Operations take paths in and write files out, so drivers never hold pixel
/// buffers and a mock can stand in without any codec.
pub trait ImageBackend {
    /// Decode a single frame and write it as lossy WebP.
    fn convert_static(&self, params: &StaticParams) -> Result<(), BackendError>;

    /// Number of frames in a GIF.
    fn gif_frame_count(&self, path: &Path) -> Result<usize, BackendError>;

    /// Write every GIF frame as a full-canvas PNG and describe the set.
    fn extract_gif_frames(&self, params: &ExtractParams) -> Result<FrameSet, BackendError>;

    /// Re-encode one extracted frame as lossy WebP.
    fn compress_frame(&self, params: &FrameParams) -> Result<(), BackendError>;

    /// Combine per-frame WebPs into one animated WebP.
    fn assemble_animation(&self, params: &AnimationParams) -> Result<(), BackendError>;
}
