//! Source file discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories skipped by default: dependency caches and build output.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "coverage"];

/// Discover source files under `root`.
///
/// Walks the tree, pruning any directory whose name is in `exclude`, and keeps
/// files whose extension (without the dot) is in `extensions`. The root itself
/// is never pruned. Results are sorted for deterministic order.
#[must_use]
pub fn discover_sources(root: &Path, exclude: &[String], extensions: &[&str]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded_dir(e, exclude))
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    files
}

fn is_excluded_dir(entry: &walkdir::DirEntry, exclude: &[String]) -> bool {
    entry.file_type().is_dir()
        && exclude
            .iter()
            .any(|excluded| entry.file_name() == std::ffi::OsStr::new(excluded))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.trim_start_matches('.') == ext))
}
