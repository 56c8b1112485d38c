//! Codec operations behind a swappable backend.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Static convert** | `image` decoders + `webp::Encoder` |
//! | **GIF frames** | `gif` decoder, composited with `image::imageops::overlay` |
//! | **Frame compress** | `image` PNG decoder + `webp::Encoder` |
//! | **Animated assemble** | `webp::Decoder` + `webp::AnimEncoder` |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{
    AnimationFrame, AnimationParams, Disposal, ExtractParams, ExtractedFrame, FrameParams,
    FrameSet, Quality, SourceFormat, StaticParams, frame_path,
};
pub use rust_backend::RustBackend;
