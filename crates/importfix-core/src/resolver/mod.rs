//! Path resolver.
//!
//! Decides whether a specifier names an existing source file:
//! - Relative specifiers (`./`, `../`) are joined to the importer's directory
//! - Aliased specifiers are expanded through the [`AliasTable`] and joined to
//!   the project root
//! - Bare specifiers are never resolved
//!
//! Probing order for a joined target:
//! 1. An existing directory resolves only through `index.{ts,tsx,js,jsx}`
//! 2. An existing file resolves to itself
//! 3. `target.{ts,tsx,js,jsx}`, first match wins
//!
//! All path arithmetic is lexical; only existence checks go through the
//! [`FileSystem`] capability.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::alias::AliasTable;
use crate::fs::FileSystem;
use crate::imports::{classify, is_relative, SpecifierKind, SOURCE_EXTENSIONS};
use crate::paths::normalize;

/// Reason codes for unresolved specifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// `resolve` was given a specifier that is not relative.
    NotRelative,
    /// Bare (package) specifier; never handled.
    Bare,
    /// No file or index file exists for the target.
    NotFound,
    /// Aliased specifier whose prefix is not in the table.
    UnknownAlias,
}

impl UnresolvedReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRelative => "NOT_RELATIVE",
            Self::Bare => "BARE",
            Self::NotFound => "NOT_FOUND",
            Self::UnknownAlias => "UNKNOWN_ALIAS",
        }
    }
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveResult {
    /// Normalized path of the resolved file.
    Resolved(PathBuf),
    Unresolved(UnresolvedReason),
}

impl ResolveResult {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Resolved(p) => Some(p),
            Self::Unresolved(_) => None,
        }
    }

    /// Whether this result resolved to `target` (compared lexically).
    #[must_use]
    pub fn resolves_to(&self, target: &Path) -> bool {
        self.path().is_some_and(|p| p == normalize(target))
    }
}

/// Resolves specifiers within one project.
pub struct Resolver<'fs> {
    fs: &'fs dyn FileSystem,
    root: PathBuf,
    aliases: Option<AliasTable>,
}

impl<'fs> Resolver<'fs> {
    /// Create a resolver for the project at `root` without aliases.
    #[must_use]
    pub fn new(fs: &'fs dyn FileSystem, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: normalize(&root.into()),
            aliases: None,
        }
    }

    /// Attach an alias table.
    #[must_use]
    pub fn with_aliases(mut self, aliases: Option<AliasTable>) -> Self {
        self.aliases = aliases;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn aliases(&self) -> Option<&AliasTable> {
        self.aliases.as_ref()
    }

    /// Classify a specifier against this resolver's alias table.
    #[must_use]
    pub fn classify(&self, specifier: &str) -> SpecifierKind {
        classify(specifier, self.aliases.as_ref())
    }

    /// Resolve a relative specifier from `importer` (a file path).
    ///
    /// Non-relative specifiers return `Unresolved(NotRelative)`.
    #[must_use]
    pub fn resolve(&self, importer: &Path, specifier: &str) -> ResolveResult {
        if !is_relative(specifier) {
            return ResolveResult::Unresolved(UnresolvedReason::NotRelative);
        }

        let parent = importer.parent().unwrap_or_else(|| Path::new(""));
        self.probe(&normalize(&parent.join(specifier)))
    }

    /// Resolve an aliased specifier against the project root.
    #[must_use]
    pub fn resolve_aliased(&self, specifier: &str) -> ResolveResult {
        let Some(rel) = self.aliases.as_ref().and_then(|t| t.from_alias(specifier)) else {
            return ResolveResult::Unresolved(UnresolvedReason::UnknownAlias);
        };

        self.probe(&normalize(&self.root.join(rel.trim_start_matches('/'))))
    }

    /// Resolve any specifier, dispatching on its kind.
    #[must_use]
    pub fn resolve_specifier(&self, importer: &Path, specifier: &str) -> ResolveResult {
        match self.classify(specifier) {
            SpecifierKind::Relative => self.resolve(importer, specifier),
            SpecifierKind::Aliased => self.resolve_aliased(specifier),
            SpecifierKind::Bare => ResolveResult::Unresolved(UnresolvedReason::Bare),
        }
    }

    fn probe(&self, target: &Path) -> ResolveResult {
        if self.fs.is_dir(target) {
            return SOURCE_EXTENSIONS
                .iter()
                .map(|ext| target.join(format!("index{ext}")))
                .find(|candidate| self.fs.is_file(candidate))
                .map_or(
                    ResolveResult::Unresolved(UnresolvedReason::NotFound),
                    ResolveResult::Resolved,
                );
        }

        if self.fs.is_file(target) {
            return ResolveResult::Resolved(target.to_path_buf());
        }

        for ext in SOURCE_EXTENSIONS {
            let mut with_ext = OsString::from(target.as_os_str());
            with_ext.push(ext);
            let with_ext = PathBuf::from(with_ext);
            if self.fs.is_file(&with_ext) {
                return ResolveResult::Resolved(with_ext);
            }
        }

        ResolveResult::Unresolved(UnresolvedReason::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasEntry;
    use crate::fs::MemoryFs;

    fn project() -> MemoryFs {
        MemoryFs::new()
            .with_file("/p/src/Pages/Reels.tsx", "")
            .with_file("/p/src/services/reelsService.ts", "")
            .with_file("/p/src/components/index.tsx", "")
            .with_file("/p/src/components.ts", "")
            .with_file("/p/src/legacy/util.js", "")
            .with_file("/p/src/legacy/util.jsx", "")
            .with_file("/p/src/data.json", "")
            .with_file("/p/hooks/useAuth.ts", "")
    }

    fn importer() -> PathBuf {
        PathBuf::from("/p/src/Pages/Reels.tsx")
    }

    #[test]
    fn test_resolves_sibling_directory_without_extension() {
        let fs = project();
        let resolver = Resolver::new(&fs, "/p");
        assert_eq!(
            resolver.resolve(&importer(), "../services/reelsService"),
            ResolveResult::Resolved(PathBuf::from("/p/src/services/reelsService.ts"))
        );
    }

    #[test]
    fn test_exact_name_required() {
        let fs = project();
        let resolver = Resolver::new(&fs, "/p");
        assert_eq!(
            resolver.resolve(&importer(), "../services/ReelsService"),
            ResolveResult::Unresolved(UnresolvedReason::NotFound)
        );
    }

    #[test]
    fn test_explicit_extension() {
        let fs = project();
        let resolver = Resolver::new(&fs, "/p");
        assert_eq!(
            resolver.resolve(&importer(), "../data.json").path(),
            Some(Path::new("/p/src/data.json"))
        );
        assert_eq!(
            resolver.resolve(&importer(), "../services/reelsService.ts").path(),
            Some(Path::new("/p/src/services/reelsService.ts"))
        );
    }

    #[test]
    fn test_directory_uses_index_only() {
        let fs = project();
        let resolver = Resolver::new(&fs, "/p");
        // components/ exists, so components.ts is not consulted
        assert_eq!(
            resolver.resolve(&importer(), "../components").path(),
            Some(Path::new("/p/src/components/index.tsx"))
        );
    }

    #[test]
    fn test_directory_without_index_is_not_found() {
        let fs = project();
        let resolver = Resolver::new(&fs, "/p");
        assert_eq!(
            resolver.resolve(&importer(), "../services"),
            ResolveResult::Unresolved(UnresolvedReason::NotFound)
        );
    }

    #[test]
    fn test_extension_order() {
        let fs = project();
        let resolver = Resolver::new(&fs, "/p");
        assert_eq!(
            resolver.resolve(&importer(), "../legacy/util").path(),
            Some(Path::new("/p/src/legacy/util.js"))
        );
    }

    #[test]
    fn test_current_dir_specifier() {
        let fs = MemoryFs::new()
            .with_file("/p/src/index.ts", "")
            .with_file("/p/src/main.ts", "");
        let resolver = Resolver::new(&fs, "/p");
        assert_eq!(
            resolver.resolve(Path::new("/p/src/main.ts"), ".").path(),
            Some(Path::new("/p/src/index.ts"))
        );
    }

    #[test]
    fn test_non_relative_is_not_attempted() {
        let fs = project();
        let resolver = Resolver::new(&fs, "/p");
        assert_eq!(
            resolver.resolve(&importer(), "react"),
            ResolveResult::Unresolved(UnresolvedReason::NotRelative)
        );
        assert_eq!(
            resolver.resolve_specifier(&importer(), "react"),
            ResolveResult::Unresolved(UnresolvedReason::Bare)
        );
    }

    #[test]
    fn test_resolve_aliased() {
        let fs = project();
        let table = AliasTable::new(vec![
            AliasEntry::new("@/hooks/", "hooks/"),
            AliasEntry::new("@/", ""),
        ])
        .unwrap();
        let resolver = Resolver::new(&fs, "/p").with_aliases(Some(table));

        assert_eq!(
            resolver.resolve_specifier(&importer(), "@/hooks/useAuth").path(),
            Some(Path::new("/p/hooks/useAuth.ts"))
        );
        assert_eq!(
            resolver.resolve_specifier(&importer(), "@/src/components").path(),
            Some(Path::new("/p/src/components/index.tsx"))
        );
        assert_eq!(
            resolver.resolve_aliased("@/hooks/missing"),
            ResolveResult::Unresolved(UnresolvedReason::NotFound)
        );
    }

    #[test]
    fn test_resolve_aliased_without_table() {
        let fs = project();
        let resolver = Resolver::new(&fs, "/p");
        assert_eq!(
            resolver.resolve_aliased("@/hooks/useAuth"),
            ResolveResult::Unresolved(UnresolvedReason::UnknownAlias)
        );
    }

    #[test]
    fn test_resolves_to_compares_normalized() {
        let result = ResolveResult::Resolved(PathBuf::from("/p/a.ts"));
        assert!(result.resolves_to(Path::new("/p/b/../a.ts")));
        assert!(!result.resolves_to(Path::new("/p/b.ts")));
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(UnresolvedReason::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(UnresolvedReason::UnknownAlias.to_string(), "UNKNOWN_ALIAS");
    }
}
