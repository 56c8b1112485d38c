//! Guard against running over a path that is too broad.
//!
//! Converting moves files around, so pointing the tool at `/` or at some
//! random deep directory by mistake is expensive. Two heuristics ask for an
//! interactive confirmation:
//!
//! - the resolved path is a filesystem or drive root (three characters or
//!   fewer, e.g. `/`, `C:\`);
//! - the path has more than [`MAX_UNMARKED_DEPTH`] components and none of the
//!   [`PROJECT_MARKERS`] exists directly inside it.
//!
//! Everything else is allowed. False positives and negatives are accepted:
//! this is a guard rail, not a security boundary.

use crate::config::{MAX_UNMARKED_DEPTH, PROJECT_MARKERS};
use std::io::{self, BufRead, Write};
use std::path::{Component, Path, PathBuf};

/// Why a path needs confirmation before anything touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Concern {
    /// The path is a filesystem or drive root.
    RootOrDrive(PathBuf),
    /// The path is deep and carries no project marker.
    TooDeep { path: PathBuf, depth: usize },
}

impl std::fmt::Display for Concern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Concern::RootOrDrive(path) => {
                write!(f, "Path appears to be root or drive ({})", path.display())
            }
            Concern::TooDeep { depth, .. } => write!(
                f,
                "Folder is too deep ({depth} levels) and no project files found"
            ),
        }
    }
}

/// Outcome of assessing a target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Confirm(Concern),
}

/// Resolve `path` and decide whether it can be used without asking.
///
/// The path does not need to exist. Returns the absolute, normalized path
/// alongside the verdict.
pub fn assess(path: &Path) -> io::Result<(PathBuf, Verdict)> {
    let abs = normalize(&std::path::absolute(path)?);

    if abs.parent().is_none() || abs.as_os_str().len() <= 3 {
        let verdict = Verdict::Confirm(Concern::RootOrDrive(abs.clone()));
        return Ok((abs, verdict));
    }

    let depth = abs.components().count();
    if depth > MAX_UNMARKED_DEPTH && !has_project_marker(&abs) {
        let verdict = Verdict::Confirm(Concern::TooDeep {
            path: abs.clone(),
            depth,
        });
        return Ok((abs, verdict));
    }

    Ok((abs, Verdict::Allow))
}

/// Lexically collapse `.` and `..`. A `..` at the root stays at the root.
///
/// Symlinks are not resolved, so the path does not need to exist.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn has_project_marker(dir: &Path) -> bool {
    PROJECT_MARKERS.iter().any(|m| dir.join(m).exists())
}

/// Ask `Continue? (y/N): ` and read one line.
///
/// Only `y` or `yes` (any case) confirm. End of input declines.
pub fn confirm(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "Continue? (y/N): ")?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Full gate against arbitrary input and output streams.
///
/// Resolution failures and read errors count as a refusal.
pub fn is_safe_path_with(path: &Path, input: &mut impl BufRead, out: &mut impl Write) -> bool {
    let verdict = match assess(path) {
        Ok((_, verdict)) => verdict,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot resolve path");
            return false;
        }
    };

    match verdict {
        Verdict::Allow => true,
        Verdict::Confirm(concern) => {
            if writeln!(out, "{concern}").is_err() {
                return false;
            }
            confirm(input, out).unwrap_or(false)
        }
    }
}

/// Gate on the process's stdin/stdout.
pub fn is_safe_path(path: &Path) -> bool {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    is_safe_path_with(path, &mut input, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Create a directory nested deep enough to trip the depth heuristic.
    fn deep_dir(tmp: &TempDir) -> PathBuf {
        let mut dir = tmp.path().to_path_buf();
        for i in 0..MAX_UNMARKED_DEPTH {
            dir.push(format!("d{i}"));
        }
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn run_gate(path: &Path, answer: &str) -> (bool, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut out = Vec::new();
        let allowed = is_safe_path_with(path, &mut input, &mut out);
        (allowed, String::from_utf8(out).unwrap())
    }

    #[test]
    fn shallow_path_is_allowed() {
        let tmp = TempDir::new().unwrap();
        let (abs, verdict) = assess(tmp.path()).unwrap();
        assert!(abs.is_absolute());
        assert_eq!(verdict, Verdict::Allow);
    }

    #[test]
    fn root_needs_confirmation() {
        let (_, verdict) = assess(Path::new("/")).unwrap();
        assert!(matches!(verdict, Verdict::Confirm(Concern::RootOrDrive(_))));
    }

    #[test]
    fn parent_dirs_are_collapsed_before_the_root_check() {
        for input in ["/tmp/..", "/tmp/../", "/usr/lib/../..", "/a/./b/../../.."] {
            let (abs, verdict) = assess(Path::new(input)).unwrap();
            assert_eq!(abs, PathBuf::from("/"), "input {input}");
            assert!(
                matches!(verdict, Verdict::Confirm(Concern::RootOrDrive(_))),
                "input {input} gave {verdict:?}"
            );
        }
    }

    #[test]
    fn parent_dirs_do_not_count_towards_depth() {
        let (abs, verdict) = assess(Path::new("/a/b/c/d/e/f/g/h/i/j/../..")).unwrap();
        assert_eq!(abs, PathBuf::from("/a/b/c/d/e/f/g/h"));
        assert_eq!(verdict, Verdict::Allow);
    }

    #[test]
    fn depth_limit_counts_the_root_component() {
        // Root plus nine names: ten components, at the limit.
        let (_, verdict) = assess(Path::new("/a/b/c/d/e/f/g/h/i")).unwrap();
        assert_eq!(verdict, Verdict::Allow);

        // Root plus ten names: one past the limit.
        let (_, verdict) = assess(Path::new("/a/b/c/d/e/f/g/h/i/j")).unwrap();
        assert!(matches!(
            verdict,
            Verdict::Confirm(Concern::TooDeep { depth: 11, .. })
        ));
    }

    #[test]
    fn deep_path_without_marker_needs_confirmation() {
        let tmp = TempDir::new().unwrap();
        let dir = deep_dir(&tmp);
        let (_, verdict) = assess(&dir).unwrap();
        match verdict {
            Verdict::Confirm(Concern::TooDeep { depth, .. }) => {
                assert!(depth > MAX_UNMARKED_DEPTH)
            }
            other => panic!("expected TooDeep, got {other:?}"),
        }
    }

    #[test]
    fn deep_path_with_marker_is_allowed() {
        let tmp = TempDir::new().unwrap();
        let dir = deep_dir(&tmp);
        std::fs::write(dir.join("package.json"), "{}").unwrap();

        let (allowed, printed) = run_gate(&dir, "");
        assert!(allowed);
        assert!(printed.is_empty(), "no prompt expected, got {printed:?}");
    }

    #[test]
    fn deep_path_declined() {
        let tmp = TempDir::new().unwrap();
        let dir = deep_dir(&tmp);

        let (allowed, printed) = run_gate(&dir, "n\n");
        assert!(!allowed);
        assert!(printed.contains("too deep"));
        assert!(printed.contains("Continue? (y/N): "));
    }

    #[test]
    fn deep_path_accepted() {
        let tmp = TempDir::new().unwrap();
        let dir = deep_dir(&tmp);

        let (allowed, _) = run_gate(&dir, "YES\n");
        assert!(allowed);
    }

    #[test]
    fn confirm_accepts_y_and_yes_only() {
        for (answer, expected) in [
            ("y\n", true),
            ("Y\n", true),
            ("yes\n", true),
            ("  yes  \n", true),
            ("no\n", false),
            ("yep\n", false),
            ("\n", false),
            ("", false),
        ] {
            let mut input = Cursor::new(answer.as_bytes().to_vec());
            let mut out = Vec::new();
            assert_eq!(
                confirm(&mut input, &mut out).unwrap(),
                expected,
                "answer {answer:?}"
            );
        }
    }

    #[test]
    fn empty_path_is_refused() {
        let (allowed, _) = run_gate(Path::new(""), "y\n");
        assert!(!allowed);
    }
}
