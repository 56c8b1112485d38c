//! Production backend: `image` for decoding, `gif` for frames, `webp` for encoding.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, TIFF, GIF first frame) | `image::ImageReader::with_format` |
//! | Frame access (delay, disposal, bounds, loop count) | `gif::DecodeOptions` with RGBA output |
//! | Frame compositing | `image::imageops::overlay` onto a full-size RGBA canvas |
//! | Encode → WebP (lossy) | `webp::Encoder::encode_simple` |
//! | Decode WebP frame | `webp::Decoder` |
//! | Encode → animated WebP | `webp::AnimEncoder` |
//!
//! libwebp's animation encoder chooses each frame's disposal and blending
//! itself while it optimises sub-rectangles. Disposal values from the source
//! are therefore carried through to [`AnimationParams`] but not forced on the
//! encoder.

use super::backend::{BackendError, ImageBackend};
use super::params::{
    AnimationParams, ExtractParams, ExtractedFrame, FrameParams, FrameSet, Quality, StaticParams,
    frame_path,
};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Codec backend built on the `image`, `gif` and `webp` crates.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn load_image(path: &Path, format: ImageFormat) -> Result<DynamicImage, BackendError> {
    let reader = BufReader::new(File::open(path)?);
    ImageReader::with_format(reader, format)
        .decode()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
}

/// Lossy WebP bytes for any decoded image.
fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let (width, height) = (img.width(), img.height());
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height)
            .encode_simple(false, quality.as_f32())
            .map(|m| m.to_vec())
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height)
            .encode_simple(false, quality.as_f32())
            .map(|m| m.to_vec())
    };
    encoded.map_err(|e| BackendError::Encode(format!("WebP encode failed: {e:?}")))
}

fn open_gif(
    path: &Path,
    color: gif::ColorOutput,
) -> Result<gif::Decoder<BufReader<File>>, BackendError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(color);
    options
        .read_info(BufReader::new(File::open(path)?))
        .map_err(|e| gif_error(path, e))
}

fn gif_error(path: &Path, e: gif::DecodingError) -> BackendError {
    match e {
        gif::DecodingError::Io(io) => BackendError::Io(io),
        other => BackendError::Decode(format!("{}: {}", path.display(), other)),
    }
}

fn palette_color(palette: Option<&[u8]>, index: Option<usize>) -> Option<[u8; 4]> {
    let palette = palette?;
    let i = index? * 3;
    palette.get(i..i + 3).map(|c| [c[0], c[1], c[2], 255])
}

fn read_webp_frame(path: &Path) -> Result<RgbaImage, BackendError> {
    let bytes = std::fs::read(path)?;
    let decoded = webp::Decoder::new(&bytes)
        .decode()
        .ok_or_else(|| BackendError::Decode(format!("{}: not a WebP image", path.display())))?;
    Ok(decoded.to_image().to_rgba8())
}

impl ImageBackend for RustBackend {
    fn convert_static(&self, params: &StaticParams) -> Result<(), BackendError> {
        let img = load_image(&params.source, params.format.image_format())?;
        let bytes = encode_webp(&img, params.quality)?;
        std::fs::write(&params.output, bytes)?;
        Ok(())
    }

    fn gif_frame_count(&self, path: &Path) -> Result<usize, BackendError> {
        let mut decoder = open_gif(path, gif::ColorOutput::Indexed)?;
        let mut count = 0;
        while decoder
            .read_next_frame()
            .map_err(|e| gif_error(path, e))?
            .is_some()
        {
            count += 1;
        }
        Ok(count)
    }

    fn extract_gif_frames(&self, params: &ExtractParams) -> Result<FrameSet, BackendError> {
        let source = &params.source;
        let mut decoder = open_gif(source, gif::ColorOutput::RGBA)?;
        let width = u32::from(decoder.width());
        let height = u32::from(decoder.height());
        let background = palette_color(decoder.global_palette(), decoder.bg_color());

        // Frames are drawn over the previous result; disposal is not simulated.
        let mut canvas = RgbaImage::new(width, height);
        let mut frames = Vec::new();

        while let Some(frame) = decoder.read_next_frame().map_err(|e| gif_error(source, e))? {
            let patch = RgbaImage::from_raw(
                u32::from(frame.width),
                u32::from(frame.height),
                frame.buffer.to_vec(),
            )
            .ok_or_else(|| {
                BackendError::Decode(format!(
                    "{}: frame {} buffer does not match its bounds",
                    source.display(),
                    frames.len()
                ))
            })?;
            image::imageops::overlay(
                &mut canvas,
                &patch,
                i64::from(frame.left),
                i64::from(frame.top),
            );

            let png = frame_path(&params.frames_dir, frames.len(), "png");
            canvas
                .save_with_format(&png, ImageFormat::Png)
                .map_err(|e| BackendError::Encode(format!("{}: {}", png.display(), e)))?;

            frames.push(ExtractedFrame {
                png,
                delay_cs: frame.delay,
                disposal: frame.dispose.into(),
            });
        }

        let loop_count = match decoder.repeat() {
            gif::Repeat::Infinite => 0,
            gif::Repeat::Finite(n) => n,
        };

        Ok(FrameSet {
            width,
            height,
            loop_count,
            background,
            frames,
        })
    }

    fn compress_frame(&self, params: &FrameParams) -> Result<(), BackendError> {
        let img = load_image(&params.source, ImageFormat::Png)?;
        let bytes = encode_webp(&img, params.quality)?;
        std::fs::write(&params.output, bytes)?;
        Ok(())
    }

    fn assemble_animation(&self, params: &AnimationParams) -> Result<(), BackendError> {
        let images = params
            .frames
            .iter()
            .map(|f| read_webp_frame(&f.webp))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(bad) = images
            .iter()
            .position(|img| img.dimensions() != (params.width, params.height))
        {
            return Err(BackendError::Encode(format!(
                "frame {bad} does not match the {}x{} canvas",
                params.width, params.height
            )));
        }

        let mut config = webp::WebPConfig::new()
            .map_err(|_| BackendError::Encode("cannot initialise WebP config".into()))?;
        config.lossless = 0;
        config.quality = params.quality.as_f32();

        let mut encoder = webp::AnimEncoder::new(params.width, params.height, &config);
        encoder.set_bgcolor(params.background);
        encoder.set_loop_count(i32::from(params.loop_count));

        let mut timestamp_ms: i32 = 0;
        for (frame, img) in params.frames.iter().zip(&images) {
            tracing::trace!(webp = %frame.webp.display(), disposal = ?frame.disposal, timestamp_ms, "adding frame");
            encoder.add_frame(webp::AnimFrame::from_rgba(
                img.as_raw(),
                img.width(),
                img.height(),
                timestamp_ms,
            ));
            timestamp_ms = timestamp_ms.saturating_add(frame.duration_ms as i32);
        }

        let encoded = encoder
            .try_encode()
            .map_err(|e| BackendError::Encode(format!("animated WebP encode failed: {e:?}")))?;
        std::fs::write(&params.output, &*encoded)?;
        Ok(())
    }
}
