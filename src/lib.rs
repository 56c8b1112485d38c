//! # webpcon
//!
//! Bulk-convert the raster images of a web project to WebP, keeping every
//! original in a backup tree so the whole run can be undone.
//!
//! # Architecture: Two Modes Over One Backup Tree
//!
//! ```text
//! convert   project/**/*.{png,jpg,...}  →  .webpcon_backup/<same path>  (moved)
//!                                       →  project/**/*.webp           (encoded)
//! revert    .webpcon_backup/**          →  project/<same path>          (copied)
//!                                          project/**/*.webp            (deleted)
//! ```
//!
//! The backup tree is the only state. It mirrors the project layout exactly,
//! so the original location of any backup is recomputed from its relative
//! path; there is no manifest to get out of sync. Revert only reads the backup
//! tree, so it can be run any number of times.
//!
//! Before either mode touches anything, the [`safety`] gate asks for
//! confirmation when the target looks like a filesystem root or a deep
//! directory with no project files in it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Compile-time tables (extensions, exclusions, markers) and optional `webpcon.toml` tunables |
//! | [`safety`] | Root/depth heuristics and the interactive confirmation prompt |
//! | [`walk`] | Sorted recursive traversal with skip-dir pruning and skip-file reporting |
//! | [`backup`] | Mapping between project paths and backup paths; move in, copy out |
//! | [`imaging`] | Codec operations behind the [`imaging::ImageBackend`] trait |
//! | [`animated`] | Multi-frame GIF → animated WebP pipeline through a frame cache |
//! | [`convert`] | Convert mode driver: backup, encode, per-file events |
//! | [`revert`] | Revert mode driver: delete WebP, restore original, per-file events |
//! | [`output`] | CLI output formatting for both modes |
//!
//! # Design Decisions
//!
//! ## Move, Then Encode
//!
//! The original is moved into the backup tree before anything is decoded, and
//! the encoder reads from the backup. A crash mid-run therefore never loses an
//! original: it is either still in place or already in the backup tree.
//!
//! ## Per-File Failure Containment
//!
//! Decode or encode failures are reported for that file and the walk goes on.
//! Only problems with the run as a whole (missing root, missing backup tree,
//! invalid config) stop it.
//!
//! ## Animated GIFs Are Opt-In
//!
//! Without `--enable-gif`, a GIF is converted from its first frame like any
//! other image. The animated pipeline writes intermediate frames to
//! `.webpcon_cache/` and is not transactional: a failure leaves the cache for
//! inspection and the next attempt starts from an empty one.

pub mod animated;
pub mod backup;
pub mod config;
pub mod convert;
pub mod imaging;
pub mod output;
pub mod revert;
pub mod safety;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
