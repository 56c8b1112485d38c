//! Conversion settings and the fixed exclusion tables.
//!
//! Two kinds of configuration live here:
//!
//! - **Tables**: image extensions, skipped directories, skipped files and
//!   project marker files. These are compiled in and built once on first use.
//!   They are not configurable from the CLI, the environment or the config
//!   file.
//! - **Tunables**: encoding quality and the animated-GIF default, loaded from
//!   an optional `webpcon.toml` in the project root.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [convert]
//! quality = 80     # WebP quality for static images (1-100)
//!
//! [animation]
//! enabled = false  # Same as passing --enable-gif
//! quality = 60     # WebP quality for each animation frame (1-100)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

/// Directory under the project root that mirrors every converted original.
pub const BACKUP_DIR: &str = ".webpcon_backup";

/// Scratch directory under the project root used by the animated pipeline.
pub const CACHE_DIR: &str = ".webpcon_cache";

/// Name of the optional config file in the project root.
pub const CONFIG_FILENAME: &str = "webpcon.toml";

/// Paths with more components than this (root included) need a project
/// marker or an explicit confirmation.
pub const MAX_UNMARKED_DEPTH: usize = 10;

/// GIF delays are in centiseconds; WebP frame timestamps are in milliseconds.
pub const GIF_DELAY_SCALE: u32 = 10;

/// Background colour handed to the animation encoder (RGBA, fully opaque).
pub const ANIMATION_BACKGROUND: [u8; 4] = [255, 255, 255, 255];

static IMAGE_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff"]
        .into_iter()
        .collect()
});

static SKIP_DIRS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [".git", "node_modules", "dist", "build", BACKUP_DIR, CACHE_DIR]
        .into_iter()
        .collect()
});

static SKIP_FILES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "favicon.ico",
        "icon-192x192.png",
        "icon-512x512.png",
        "logo-icon-192x192.png",
        "logo-icon-512x512.png",
        "icon-template.svg",
    ]
    .into_iter()
    .collect()
});

/// Files whose presence marks a directory as a web project root.
pub const PROJECT_MARKERS: &[&str] = &[
    "package.json",
    "vite.config.ts",
    "vite.config.js",
    "index.html",
];

/// Whether a lower-cased extension (without the dot) is a convertible image.
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(ext)
}

/// Whether a directory with this base name is never descended into.
pub fn is_skipped_dir(name: &str) -> bool {
    SKIP_DIRS.contains(name)
}

/// Whether a file with this base name is never converted.
pub fn is_skipped_file(name: &str) -> bool {
    SKIP_FILES.contains(name)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings loaded from `webpcon.toml`.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Static image encoding.
    pub convert: ConvertConfig,
    /// Animated GIF pipeline.
    pub animation: AnimationConfig,
}

impl Settings {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.convert.quality) {
            return Err(ConfigError::Validation(
                "convert.quality must be 1-100".into(),
            ));
        }
        if !(1..=100).contains(&self.animation.quality) {
            return Err(ConfigError::Validation(
                "animation.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// Static conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Lossy WebP quality for single-frame output.
    pub quality: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

/// Animated GIF pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Engage the animated pipeline without the CLI flag.
    pub enabled: bool,
    /// Lossy WebP quality for each compressed frame.
    pub quality: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            quality: 60,
        }
    }
}

/// Load `webpcon.toml` from the project root.
///
/// Returns the defaults when the file does not exist. A file that exists but
/// fails to parse or validate is an error.
pub fn load_config(root: &Path) -> Result<Settings, ConfigError> {
    let path = root.join(CONFIG_FILENAME);
    if !path.is_file() {
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(&path)?;
    let settings: Settings = toml::from_str(&content)?;
    settings.validate()?;
    Ok(settings)
}
