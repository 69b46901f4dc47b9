//! Link target normalization
//!
//! Canonicalizes a link target for equality comparison so that relative and
//! absolute spellings of the same file count as one entry. Web URLs pass
//! through untouched; they never collide with filesystem paths.

use std::path::{Component, Path, PathBuf};

/// Normalize a link target against the directory containing the note
///
/// `http://` and `https://` targets are returned unchanged. Anything else is
/// treated as a filesystem path: relative paths resolve against `base_dir`,
/// `.`/`..` segments collapse, and symlinks are resolved when the path
/// exists. The result uses forward-slash separators. Purely lexical for
/// non-existent targets; never an existence check.
pub fn normalize_target(raw: &str, base_dir: &Path) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_string();
    }

    let path = Path::new(raw);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };

    let resolved = absolute
        .canonicalize()
        .unwrap_or_else(|_| lexical_normalize(&absolute));

    to_posix(&resolved)
}

/// Collapse `.` and `..` components without touching the filesystem
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Render a path with forward-slash separators
pub fn to_posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
