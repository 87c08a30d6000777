//! Candidate matching for unresolved specifiers.
//!
//! A candidate is a project source file whose stem equals the specifier's
//! base name, or an `index*` file whose parent directory carries that name.
//! Matching is exact and case-sensitive. Candidate sets are always sorted so
//! disambiguation never depends on discovery order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::imports::{strip_source_extension, SOURCE_EXTENSIONS};

/// Ordered, de-duplicated set of candidate paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    paths: Vec<PathBuf>,
}

impl CandidateSet {
    /// Build a set from arbitrary paths (sorted, duplicates dropped).
    #[must_use]
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let sorted: BTreeSet<PathBuf> = paths.into_iter().collect();
        Self {
            paths: sorted.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The same set without `path` (a file never imports itself).
    #[must_use]
    pub fn without(&self, path: &Path) -> Self {
        Self {
            paths: self.paths.iter().filter(|p| *p != path).cloned().collect(),
        }
    }
}

/// Outcome of choosing among candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disambiguation {
    Unique(PathBuf),
    Ambiguous(Vec<PathBuf>),
    None,
}

/// Stem of a source file name, or `None` for non-source files.
fn source_stem(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    if !SOURCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        return None;
    }
    let stem = strip_source_extension(name);
    (stem != name).then_some(stem)
}

fn parent_name(path: &Path) -> Option<&str> {
    path.parent()?.file_name()?.to_str()
}

/// Whether `path` is a candidate for `base_name`.
fn is_candidate(path: &Path, base_name: &str) -> bool {
    let Some(stem) = source_stem(path) else {
        return false;
    };
    stem == base_name || (stem.starts_with("index") && parent_name(path) == Some(base_name))
}

/// Lookup of project files by stem and by `index*` parent directory.
///
/// Built once per run and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    by_stem: BTreeMap<String, BTreeSet<PathBuf>>,
    by_index_dir: BTreeMap<String, BTreeSet<PathBuf>>,
}

impl CandidateIndex {
    /// Index every source file in `files`; other files are ignored.
    pub fn build<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut index = Self::default();

        for file in files {
            let path = file.as_ref();
            let Some(stem) = source_stem(path) else {
                continue;
            };

            index
                .by_stem
                .entry(stem.to_string())
                .or_default()
                .insert(path.to_path_buf());

            if stem.starts_with("index") {
                if let Some(dir) = parent_name(path) {
                    index
                        .by_index_dir
                        .entry(dir.to_string())
                        .or_default()
                        .insert(path.to_path_buf());
                }
            }
        }

        index
    }

    /// Candidates for `base_name`.
    #[must_use]
    pub fn find_candidates(&self, base_name: &str) -> CandidateSet {
        let by_stem = self.by_stem.get(base_name).into_iter().flatten();
        let by_dir = self.by_index_dir.get(base_name).into_iter().flatten();
        CandidateSet::from_paths(by_stem.chain(by_dir).cloned())
    }

    /// Number of distinct stems indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_stem.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_stem.is_empty()
    }
}

/// Candidates for `base_name` by linear scan of `files`.
#[must_use]
pub fn find_candidates(base_name: &str, files: &[PathBuf]) -> CandidateSet {
    CandidateSet::from_paths(
        files
            .iter()
            .filter(|f| is_candidate(f, base_name))
            .cloned(),
    )
}

/// Choose a single candidate, or report ambiguity.
///
/// 1. A single candidate is unique.
/// 2. Otherwise a single candidate whose stem equals `base_name` is unique.
/// 3. Otherwise the set is ambiguous; nothing is picked arbitrarily.
#[must_use]
pub fn disambiguate(set: &CandidateSet, base_name: &str) -> Disambiguation {
    match set.paths() {
        [] => Disambiguation::None,
        [only] => Disambiguation::Unique(only.clone()),
        all => {
            let exact: Vec<&PathBuf> = all
                .iter()
                .filter(|p| source_stem(p) == Some(base_name))
                .collect();
            match exact.as_slice() {
                [one] => Disambiguation::Unique((*one).clone()),
                _ => Disambiguation::Ambiguous(all.to_vec()),
            }
        }
    }
}
