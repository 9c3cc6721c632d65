use std::path::{Path, PathBuf};

use crate::layout;

/// Walks from `start` toward the filesystem root and returns the first
/// directory (inclusive of `start`) containing a project marker document.
///
/// `start` is resolved to a symlink-free absolute form first; when the path
/// itself no longer exists on disk the search still runs over its absolute
/// form, so a stale workspace path can resolve to a surviving ancestor.
/// Read-only traversal; never creates or modifies anything.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let start = start
        .canonicalize()
        .ok()
        .or_else(|| std::path::absolute(start).ok())?;
    for dir in start.ancestors() {
        if layout::marker_path(dir).exists() {
            return Some(dir.to_path_buf());
        }
    }
    None
}
