//! Path algebra shared by the resolver, alias mapper and rewriter.
//!
//! Everything here is lexical: no function touches the file system except
//! [`project_root`].

use std::path::{Component, Path, PathBuf};

/// Markers that identify a project root, checked in order.
const ROOT_MARKERS: &[&str] = &["package.json", "tsconfig.json", ".git"];

/// Find the project root by walking up from `cwd`.
///
/// Returns the first directory containing `package.json`, `tsconfig.json` or
/// `.git`, or `None` if no marker is found.
#[must_use]
pub fn project_root(cwd: &Path) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();

    loop {
        if ROOT_MARKERS.iter().any(|m| current.join(m).exists()) {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment.
///
/// Leading `..` segments of a relative path are kept; `..` above a root is
/// dropped.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Path of `target` relative to the directory `base`.
///
/// Both paths should be normalized and either both absolute or both relative
/// to the same root. Returns `.` when they are equal.
#[must_use]
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let target: Vec<_> = target.components().collect();
    let base: Vec<_> = base.components().collect();

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base.len() {
        out.push("..");
    }
    for component in &target[common..] {
        out.push(component.as_os_str());
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Render a path with forward slashes regardless of platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// File stem and extension split on the last dot: `reelsService.ts` ->
/// (`reelsService`, `Some("ts")`).
#[must_use]
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Whether `dir` is a whole-segment prefix of `path` (both slash-separated,
/// `dir` ending in `/` or empty).
#[must_use]
pub fn has_dir_prefix(path: &str, dir: &str) -> bool {
    dir.is_empty() || path.starts_with(dir)
}
