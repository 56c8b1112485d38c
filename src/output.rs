//! CLI output formatting for convert and revert runs.
//!
//! Output is one line per file, prefixed with a fixed-width status tag so a
//! long run can be scanned by eye or grepped:
//!
//! ```text
//! converted  src/assets/hero.png → src/assets/hero.webp
//! animated   src/assets/spinner.gif → src/assets/spinner.webp (12 frames)
//! skipped    public/favicon.ico
//! failed     src/assets/broken.jpg
//!     Image processing failed: failed to decode ...
//!
//! 2 converted (1 animated), 1 skipped, 1 failed
//! ```
//!
//! Revert mode uses the same shape:
//!
//! ```text
//! deleted    src/assets/hero.webp
//! restored   src/assets/hero.png
//!
//! 1 restored, 1 WebP deleted, 0 failed
//! ```
//!
//! # Architecture
//!
//! Each event has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.

use crate::convert::{ConvertEvent, ConvertMode, ConvertSummary};
use crate::revert::{RevertEvent, RevertSummary};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Status tag padded to a fixed column.
fn tagged(tag: &str, rest: &str) -> String {
    format!("{:<10} {}", tag, rest)
}

/// Indented cause line under a failed entry.
fn cause_line(error: &str) -> String {
    format!("    {}", error)
}

// ============================================================================
// Run header
// ============================================================================

pub fn format_run_header(root: &Path, revert: bool, animated_gif: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if revert {
        lines.push(format!("==> Reverting {}", root.display()));
    } else {
        lines.push(format!("==> Converting {}", root.display()));
        if animated_gif {
            lines.push("    Animated GIF conversion enabled (experimental)".to_string());
        }
    }
    lines
}

pub fn print_run_header(root: &Path, revert: bool, animated_gif: bool) {
    for line in format_run_header(root, revert, animated_gif) {
        println!("{}", line);
    }
}

// ============================================================================
// Convert
// ============================================================================

pub fn format_convert_event(event: &ConvertEvent) -> Vec<String> {
    match event {
        ConvertEvent::Skipped { path } => vec![tagged("skipped", path)],
        ConvertEvent::Converted {
            source,
            output,
            mode: ConvertMode::Static,
        } => vec![tagged("converted", &format!("{} → {}", source, output))],
        ConvertEvent::Converted {
            source,
            output,
            mode: ConvertMode::Animated { frames },
        } => vec![tagged(
            "animated",
            &format!("{} → {} ({} frames)", source, output, frames),
        )],
        ConvertEvent::Failed { path, error } => {
            vec![tagged("failed", path), cause_line(error)]
        }
    }
}

pub fn format_convert_summary(summary: &ConvertSummary) -> Vec<String> {
    let mut lines = vec![String::new(), summary.to_string()];
    if summary.converted > 0 {
        lines.push("Originals saved in .webpcon_backup/ (run with `revert` to restore)".into());
    }
    lines
}

pub fn print_convert_summary(summary: &ConvertSummary) {
    for line in format_convert_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Revert
// ============================================================================

pub fn format_revert_event(event: &RevertEvent) -> Vec<String> {
    match event {
        RevertEvent::Deleted { path } => vec![tagged("deleted", path)],
        RevertEvent::Restored { path } => vec![tagged("restored", path)],
        RevertEvent::Failed { path, error } => vec![tagged("failed", path), cause_line(error)],
    }
}

pub fn format_revert_summary(summary: &RevertSummary) -> Vec<String> {
    vec![String::new(), summary.to_string()]
}

pub fn print_revert_summary(summary: &RevertSummary) {
    for line in format_revert_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Convert events
    // =========================================================================

    #[test]
    fn static_conversion_line() {
        let lines = format_convert_event(&ConvertEvent::Converted {
            source: "img/a.png".into(),
            output: "img/a.webp".into(),
            mode: ConvertMode::Static,
        });
        assert_eq!(lines, vec!["converted  img/a.png → img/a.webp"]);
    }

    #[test]
    fn animated_conversion_shows_frame_count() {
        let lines = format_convert_event(&ConvertEvent::Converted {
            source: "s.gif".into(),
            output: "s.webp".into(),
            mode: ConvertMode::Animated { frames: 12 },
        });
        assert_eq!(lines, vec!["animated   s.gif → s.webp (12 frames)"]);
    }

    #[test]
    fn skipped_line() {
        let lines = format_convert_event(&ConvertEvent::Skipped {
            path: "public/favicon.ico".into(),
        });
        assert_eq!(lines, vec!["skipped    public/favicon.ico"]);
    }

    #[test]
    fn failure_has_indented_cause() {
        let lines = format_convert_event(&ConvertEvent::Failed {
            path: "b.jpg".into(),
            error: "decode error".into(),
        });
        assert_eq!(lines, vec!["failed     b.jpg", "    decode error"]);
    }

    // =========================================================================
    // Summaries and header
    // =========================================================================

    #[test]
    fn convert_summary_mentions_backup_only_when_something_converted() {
        let empty = format_convert_summary(&ConvertSummary::default());
        assert_eq!(empty.len(), 2);
        assert_eq!(empty[1], "0 converted (0 animated), 0 skipped, 0 failed");

        let some = format_convert_summary(&ConvertSummary {
            converted: 2,
            animated: 1,
            skipped: 1,
            failed: 0,
        });
        assert_eq!(some[1], "2 converted (1 animated), 1 skipped, 0 failed");
        assert!(some[2].contains(".webpcon_backup"));
    }

    #[test]
    fn revert_lines_and_summary() {
        assert_eq!(
            format_revert_event(&RevertEvent::Deleted {
                path: "a.webp".into()
            }),
            vec!["deleted    a.webp"]
        );
        assert_eq!(
            format_revert_event(&RevertEvent::Restored {
                path: "a.png".into()
            }),
            vec!["restored   a.png"]
        );
        let summary = format_revert_summary(&RevertSummary {
            restored: 3,
            deleted: 2,
            failed: 1,
        });
        assert_eq!(summary, vec!["", "3 restored, 2 WebP deleted, 1 failed"]);
    }

    #[test]
    fn header_notes_animation_flag() {
        let lines = format_run_header(Path::new("/p"), false, true);
        assert_eq!(lines[0], "==> Converting /p");
        assert_eq!(lines.len(), 2);

        let lines = format_run_header(Path::new("/p"), true, true);
        assert_eq!(lines, vec!["==> Reverting /p"]);
    }
}
