//! Path alias table.
//!
//! Maps alias prefixes (`@/hooks/`) to project-relative directories
//! (`hooks/`) in both directions. The table is built once from configuration
//! and never mutated afterwards.
//!
//! ## Ordering
//!
//! [`AliasTable::to_alias`] takes the first entry whose directory contains the
//! path, so entries are kept most specific first (longest directory first,
//! ties in configured order) and the catch-all (empty directory) is always
//! evaluated last. The catch-all is mandatory, which makes `to_alias` total.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths::{has_dir_prefix, normalize, to_slash};

/// One configured alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Specifier prefix, e.g. `@/hooks/`.
    pub prefix: String,
    /// Project-relative directory, e.g. `hooks/`; empty for the project root.
    pub dir: String,
}

impl AliasEntry {
    #[must_use]
    pub fn new(prefix: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            dir: dir.into(),
        }
    }

    fn is_catch_all(&self) -> bool {
        self.dir.is_empty()
    }
}

/// Ordered, validated alias table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    /// Non-catch-all entries, most specific first.
    entries: Vec<AliasEntry>,
    /// Prefix of the catch-all entry.
    catch_all: String,
}

impl AliasTable {
    /// Build a table from configured entries.
    ///
    /// Prefixes and directories are normalized to forward slashes with a
    /// trailing `/`; `.`/`./` directories mean the project root.
    ///
    /// # Errors
    /// - [`Error::AliasEntryInvalid`] for an empty prefix or a directory
    ///   outside the project.
    /// - [`Error::AliasTableMissingCatchAll`] if no entry maps to the root.
    pub fn new(entries: Vec<AliasEntry>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(entries.len());
        for entry in entries {
            normalized.push(normalize_entry(entry)?);
        }

        let catch_all = normalized
            .iter()
            .find(|e| e.is_catch_all())
            .map(|e| e.prefix.clone())
            .ok_or(Error::AliasTableMissingCatchAll)?;

        let mut entries: Vec<AliasEntry> =
            normalized.into_iter().filter(|e| !e.is_catch_all()).collect();
        // Stable: equal lengths keep configured order
        entries.sort_by(|a, b| b.dir.len().cmp(&a.dir.len()));

        Ok(Self { entries, catch_all })
    }

    /// Entries in evaluation order, catch-all last.
    #[must_use]
    pub fn entries(&self) -> Vec<AliasEntry> {
        let mut all = self.entries.clone();
        all.push(AliasEntry::new(self.catch_all.clone(), ""));
        all
    }

    /// Whether `specifier` starts with any configured prefix.
    #[must_use]
    pub fn matches(&self, specifier: &str) -> bool {
        specifier.starts_with(&self.catch_all)
            || self.entries.iter().any(|e| specifier.starts_with(&e.prefix))
    }

    /// Aliased form of a project-relative path, keeping its extension.
    #[must_use]
    pub fn to_alias_with_extension(&self, root_relative: &str) -> String {
        let path = root_relative.replace('\\', "/");
        let path = path.trim_start_matches("./");

        for entry in &self.entries {
            if has_dir_prefix(path, &entry.dir) {
                return format!("{}{}", entry.prefix, &path[entry.dir.len()..]);
            }
        }

        format!("{}{path}", self.catch_all)
    }

    /// Canonical aliased specifier for a project-relative path.
    ///
    /// `hooks/useAuth.ts` -> `@/hooks/useAuth` with `@/hooks/` -> `hooks/`.
    /// Only `.ts`/`.tsx` are stripped.
    #[must_use]
    pub fn to_alias(&self, root_relative: &str) -> String {
        let aliased = self.to_alias_with_extension(root_relative);
        match aliased
            .strip_suffix(".tsx")
            .or_else(|| aliased.strip_suffix(".ts"))
        {
            Some(stem) if !stem.is_empty() && !stem.ends_with('/') => stem.to_string(),
            _ => aliased,
        }
    }

    /// Expand an aliased specifier to a project-relative path.
    ///
    /// The longest matching prefix wins. Returns `None` when no prefix
    /// matches.
    #[must_use]
    pub fn from_alias(&self, specifier: &str) -> Option<String> {
        let best = self
            .entries
            .iter()
            .map(|e| (e.prefix.as_str(), e.dir.as_str()))
            .chain(std::iter::once((self.catch_all.as_str(), "")))
            .filter(|(prefix, _)| specifier.starts_with(prefix))
            .max_by_key(|(prefix, _)| prefix.len())?;

        Some(format!("{}{}", best.1, &specifier[best.0.len()..]))
    }

    /// Derive a table from `tsconfig.json` `compilerOptions`.
    ///
    /// `"@/hooks/*": ["./hooks/*"]` becomes `@/hooks/` -> `hooks/`, resolved
    /// against `baseUrl`. Patterns without a trailing `*` (exact aliases) and
    /// targets outside the project are ignored. Returns `Ok(None)` when no
    /// usable `paths` entry exists.
    ///
    /// # Errors
    /// [`Error::AliasTableMissingCatchAll`] when `paths` exist but none maps
    /// to the project root.
    pub fn from_tsconfig(tsconfig: &serde_json::Value) -> Result<Option<Self>> {
        let Some(options) = tsconfig.get("compilerOptions") else {
            return Ok(None);
        };
        let base_url = options
            .get("baseUrl")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(".");
        let Some(paths) = options.get("paths").and_then(serde_json::Value::as_object) else {
            return Ok(None);
        };

        let mut entries = Vec::new();
        for (pattern, targets) in paths {
            let Some(prefix) = pattern.strip_suffix('*') else {
                continue;
            };
            let Some(target) = targets
                .as_array()
                .and_then(|t| t.first())
                .and_then(serde_json::Value::as_str)
            else {
                continue;
            };
            let Some(target_dir) = target.strip_suffix('*') else {
                continue;
            };

            let dir = to_slash(&normalize(&Path::new(base_url).join(target_dir)));
            if dir.starts_with("..") || Path::new(&dir).has_root() {
                continue;
            }
            entries.push(AliasEntry::new(prefix, dir));
        }

        if entries.is_empty() {
            return Ok(None);
        }
        Self::new(entries).map(Some)
    }
}

fn normalize_entry(entry: AliasEntry) -> Result<AliasEntry> {
    if entry.prefix.is_empty() {
        return Err(Error::AliasEntryInvalid {
            prefix: entry.prefix,
            reason: "prefix is empty".to_string(),
        });
    }

    let mut prefix = entry.prefix.replace('\\', "/");
    if !prefix.ends_with('/') {
        prefix.push('/');
    }

    let raw = entry.dir.replace('\\', "/");
    let mut dir = to_slash(&normalize(Path::new(&raw)));
    if dir.starts_with("..") || raw.starts_with('/') {
        return Err(Error::AliasEntryInvalid {
            prefix,
            reason: format!("directory '{raw}' is outside the project"),
        });
    }
    if !dir.is_empty() && !dir.ends_with('/') {
        dir.push('/');
    }

    Ok(AliasEntry { prefix, dir })
}
