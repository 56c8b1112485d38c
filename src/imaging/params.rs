//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the drivers ([`convert`](crate::convert),
//! [`animated`](crate::animated)) which decide which files to produce and the
//! [`backend`](super::backend) which does the pixel work. This separation
//! allows swapping backends (e.g. for testing with a mock) without changing
//! the workflow logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy WebP quality (1–100). Clamped on construction.
//! - [`SourceFormat`]: Decoder selection by file extension.
//! - [`StaticParams`]: Single-frame decode → WebP encode.
//! - [`ExtractParams`] / [`FrameSet`]: GIF frames dumped as numbered PNGs.
//! - [`FrameParams`]: One PNG frame re-encoded as WebP.
//! - [`AnimationParams`]: Per-frame WebPs assembled into one animated WebP.

use image::ImageFormat;
use std::path::{Path, PathBuf};

/// Quality setting for lossy WebP encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Source formats with a decoder compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Bmp,
    /// Decoded as a still image: only the first frame is kept.
    Gif,
    Tiff,
}

impl SourceFormat {
    /// Pick a decoder from a lower-cased extension (no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

/// Parameters for a single-frame conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticParams {
    pub source: PathBuf,
    pub format: SourceFormat,
    pub output: PathBuf,
    pub quality: Quality,
}

/// GIF frame disposal, as declared by the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposal {
    #[default]
    Any,
    Keep,
    Background,
    Previous,
}

impl From<gif::DisposalMethod> for Disposal {
    fn from(method: gif::DisposalMethod) -> Self {
        match method {
            gif::DisposalMethod::Any => Self::Any,
            gif::DisposalMethod::Keep => Self::Keep,
            gif::DisposalMethod::Background => Self::Background,
            gif::DisposalMethod::Previous => Self::Previous,
        }
    }
}

/// `frame_03.png`, `frame_03.webp`, ...
pub fn frame_file_name(index: usize, ext: &str) -> String {
    format!("frame_{index:02}.{ext}")
}

/// Path of frame `index` with extension `ext` inside `dir`.
pub fn frame_path(dir: &Path, index: usize, ext: &str) -> PathBuf {
    dir.join(frame_file_name(index, ext))
}

/// Parameters for dumping every frame of a GIF into a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractParams {
    pub source: PathBuf,
    pub frames_dir: PathBuf,
}

/// One extracted frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFrame {
    /// Full-canvas PNG written during extraction.
    pub png: PathBuf,
    /// Delay as stored in the GIF, in centiseconds.
    pub delay_cs: u16,
    pub disposal: Disposal,
}

/// Frames extracted from a multi-frame GIF, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSet {
    pub width: u32,
    pub height: u32,
    /// 0 means loop forever.
    pub loop_count: u16,
    /// Background colour from the global palette, when the GIF declares one.
    pub background: Option<[u8; 4]>,
    pub frames: Vec<ExtractedFrame>,
}

impl FrameSet {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Parameters for re-encoding one extracted frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
}

/// One frame of the assembled animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub webp: PathBuf,
    pub duration_ms: u32,
    pub disposal: Disposal,
}

/// Parameters for assembling an animated WebP.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationParams {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<AnimationFrame>,
    pub loop_count: u16,
    pub background: [u8; 4],
    pub quality: Quality,
    pub output: PathBuf,
}
