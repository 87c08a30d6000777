//! File-system capability used by the resolver.
//!
//! Resolution only needs existence checks, so the engine depends on this
//! small trait instead of `std::fs`. [`OsFs`] is the real implementation;
//! [`MemoryFs`] backs unit tests with an in-memory tree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::paths::normalize;

/// Read-only existence checks.
pub trait FileSystem: Send + Sync {
    /// Whether `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` names an existing directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// The host file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// In-memory file tree.
///
/// Adding a file registers all of its ancestor directories.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file.
    pub fn add_file(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        let path = normalize(path.as_ref());
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() || !self.dirs.insert(dir.to_path_buf()) {
                break;
            }
            parent = dir.parent();
        }
        self.files.insert(path, contents.into());
    }

    /// Builder-style [`MemoryFs::add_file`].
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.add_file(path, contents);
        self
    }

    /// Contents of a file, if present.
    #[must_use]
    pub fn read(&self, path: &Path) -> Option<&str> {
        self.files.get(&normalize(path)).map(String::as_str)
    }

    /// All files in path order.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().map(|(p, c)| (p.as_path(), c.as_str()))
    }
}

impl FileSystem for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(&normalize(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_memory_fs_registers_ancestors() {
        let fs = MemoryFs::new().with_file("/p/src/services/reelsService.ts", "");

        assert!(fs.is_file(Path::new("/p/src/services/reelsService.ts")));
        assert!(fs.is_dir(Path::new("/p/src/services")));
        assert!(fs.is_dir(Path::new("/p/src")));
        assert!(fs.is_dir(Path::new("/p")));
        assert!(!fs.is_file(Path::new("/p/src/services")));
        assert!(!fs.is_dir(Path::new("/p/src/services/reelsService.ts")));
    }

    #[test]
    fn test_memory_fs_normalizes_lookups() {
        let fs = MemoryFs::new().with_file("/p/a/b.ts", "x");
        assert!(fs.is_file(Path::new("/p/c/../a/./b.ts")));
        assert_eq!(fs.read(Path::new("/p/a/b.ts")), Some("x"));
    }

    #[test]
    fn test_memory_fs_files_sorted() {
        let fs = MemoryFs::new()
            .with_file("/p/z.ts", "")
            .with_file("/p/a.ts", "");
        let names: Vec<_> = fs.files().map(|(p, _)| p.to_path_buf()).collect();
        assert_eq!(names, vec![PathBuf::from("/p/a.ts"), PathBuf::from("/p/z.ts")]);
    }

    #[test]
    fn test_os_fs() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.ts");
        fs::write(&file, "").unwrap();

        assert!(OsFs.is_file(&file));
        assert!(!OsFs.is_dir(&file));
        assert!(OsFs.is_dir(dir.path()));
        assert!(!OsFs.is_file(&dir.path().join("missing.ts")));
    }
}
