//! Filesystem path helpers.

use std::path::Path;

/// Check whether `path` has one of `extensions` (compared without the dot, case-sensitive).
#[inline]
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.trim_start_matches('.') == ext))
}

/// Display `path` relative to `root`, falling back to the full path.
#[inline]
pub fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
