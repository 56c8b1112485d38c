//! Shared test utilities: synthetic image fixtures and WebP sniffing.
//!
//! Fixtures are generated on the fly into a `TempDir` rather than checked in,
//! so every test gets fresh files it can move, convert and revert.

use image::{ImageFormat, RgbImage, RgbaImage};
use std::fs;
use std::path::Path;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 128])
    })
}

fn save_rgb(path: &Path, width: u32, height: u32, format: ImageFormat) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height)
        .save_with_format(path, format)
        .unwrap();
}

pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    save_rgb(path, width, height, ImageFormat::Jpeg);
}

pub fn create_test_png(path: &Path, width: u32, height: u32) {
    save_rgb(path, width, height, ImageFormat::Png);
}

pub fn create_test_bmp(path: &Path, width: u32, height: u32) {
    save_rgb(path, width, height, ImageFormat::Bmp);
}

pub fn create_test_tiff(path: &Path, width: u32, height: u32) {
    save_rgb(path, width, height, ImageFormat::Tiff);
}

/// Write a GIF with `frames` full-canvas frames that loops forever.
///
/// Each frame is a different solid colour so frames do not get merged.
pub fn create_test_gif(path: &Path, width: u16, height: u16, frames: usize, delay_cs: u16) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = fs::File::create(path).unwrap();
    let mut encoder = gif::Encoder::new(file, width, height, &[]).unwrap();
    encoder.set_repeat(gif::Repeat::Infinite).unwrap();

    for i in 0..frames {
        let shade = (i * 60 % 256) as u8;
        let mut pixels = RgbaImage::from_pixel(
            u32::from(width),
            u32::from(height),
            image::Rgba([shade, 255 - shade, 40, 255]),
        )
        .into_raw();
        let mut frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, 10);
        frame.delay = delay_cs;
        frame.dispose = gif::DisposalMethod::Background;
        encoder.write_frame(&frame).unwrap();
    }
}

/// RIFF container with a WEBP form type.
pub fn is_webp(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
}

/// Extended WebP whose VP8X header sets the animation flag.
pub fn is_animated_webp(bytes: &[u8]) -> bool {
    is_webp(bytes) && bytes.len() >= 21 && &bytes[12..16] == b"VP8X" && bytes[20] & 0x02 != 0
}
