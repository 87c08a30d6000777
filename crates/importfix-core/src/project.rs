//! Disk-backed project loading and write-back.

use std::path::{Path, PathBuf};

use importfix_util::fs::{atomic_write, read_text};
use importfix_util::walk::discover_sources;

use crate::candidates::CandidateIndex;
use crate::config::Config;
use crate::engine::{FileChange, ProjectFile};
use crate::error::Error;
use crate::paths::normalize;
use crate::report::Warning;

/// Source files discovered under a project root.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    /// Every discovered source path, readable or not.
    pub sources: Vec<PathBuf>,
    /// Files that were read as UTF-8.
    pub files: Vec<ProjectFile>,
    /// Files that could not be read.
    pub warnings: Vec<Warning>,
}

impl Project {
    /// Discover and read the sources under `config.root`.
    ///
    /// Unreadable files (I/O errors, invalid UTF-8) are skipped and reported
    /// as `UNREADABLE_FILE` warnings.
    #[must_use]
    pub fn load(config: &Config) -> Self {
        let root = normalize(&config.root);
        let sources: Vec<PathBuf> = discover_sources(&root, &config.exclude, config.extensions)
            .into_iter()
            .map(|p| normalize(&p))
            .collect();

        let mut files = Vec::with_capacity(sources.len());
        let mut warnings = Vec::new();
        for path in &sources {
            match read_text(path) {
                Ok(text) => files.push(ProjectFile::new(&root, path, text)),
                Err(source) => warnings.push(Warning::from_error(&Error::UnreadableFile {
                    path: relative_to(&root, path),
                    source,
                })),
            }
        }

        Self {
            root,
            sources,
            files,
            warnings,
        }
    }

    /// Candidate index over every discovered source.
    #[must_use]
    pub fn candidate_index(&self) -> CandidateIndex {
        CandidateIndex::build(&self.sources)
    }
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Outcome of writing changes back.
#[derive(Debug, Default)]
pub struct WriteOutcome {
    /// Project-relative paths written.
    pub written: Vec<String>,
    /// `WRITE_FAILURE` warnings; processing continued past each.
    pub warnings: Vec<Warning>,
}

/// Write each change atomically, one file at a time.
#[must_use]
pub fn write_changes(changes: &[FileChange]) -> WriteOutcome {
    let mut outcome = WriteOutcome::default();

    for change in changes {
        match atomic_write(&change.path, change.new_text.as_bytes()) {
            Ok(()) => outcome.written.push(change.rel.clone()),
            Err(source) => outcome.warnings.push(Warning::from_error(&Error::WriteFailure {
                path: PathBuf::from(&change.rel),
                source,
            })),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_reads_sources_and_skips_excluded() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("src/a.ts"), "import b from './b';\n").unwrap();
        fs::write(root.join("src/b.tsx"), "").unwrap();
        fs::write(root.join("src/readme.md"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();

        let project = Project::load(&Config::new(root.to_path_buf()));
        let rels: Vec<_> = project.files.iter().map(|f| f.rel.as_str()).collect();
        assert_eq!(rels, vec!["src/a.ts", "src/b.tsx"]);
        assert!(project.warnings.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_a_warning() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("ok.ts"), "").unwrap();
        fs::write(root.join("bad.ts"), [0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let project = Project::load(&Config::new(root.to_path_buf()));
        assert_eq!(project.files.len(), 1);
        assert_eq!(project.sources.len(), 2);
        assert_eq!(project.warnings.len(), 1);
        assert_eq!(project.warnings[0].code, "UNREADABLE_FILE");
        assert_eq!(project.warnings[0].path.as_deref(), Some("bad.ts"));

        // Unreadable files still count as candidates
        assert_eq!(project.candidate_index().find_candidates("bad").len(), 1);
    }

    #[test]
    fn test_write_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "old").unwrap();

        let changes = vec![
            FileChange {
                path: path.clone(),
                rel: "a.ts".into(),
                new_text: "new".into(),
            },
            FileChange {
                path: dir.path().join("missing/b.ts"),
                rel: "missing/b.ts".into(),
                new_text: "x".into(),
            },
        ];
        let outcome = write_changes(&changes);

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(outcome.written, vec!["a.ts"]);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code, "WRITE_FAILURE");
    }
}
