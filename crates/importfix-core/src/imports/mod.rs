//! Import clause discovery for JavaScript/TypeScript files.
//!
//! Provides a span-tracking scanner for import/export/require specifiers and
//! the classification used by the resolver.

mod scan;

pub use scan::{scan_imports, ClauseKind, ImportClause, Span};

use crate::alias::AliasTable;

/// How a specifier is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecifierKind {
    /// Starts with `./` or `../` (or is exactly `.` / `..`).
    Relative,
    /// Starts with a configured alias prefix.
    Aliased,
    /// Anything else; never rewritten.
    Bare,
}

/// Whether a specifier is relative to the importing file.
#[must_use]
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier == "."
        || specifier == ".."
}

/// Classify a specifier against an optional alias table.
#[must_use]
pub fn classify(specifier: &str, aliases: Option<&AliasTable>) -> SpecifierKind {
    if is_relative(specifier) {
        SpecifierKind::Relative
    } else if aliases.is_some_and(|t| t.matches(specifier)) {
        SpecifierKind::Aliased
    } else {
        SpecifierKind::Bare
    }
}

/// Extensions of imports that are not source modules (styles, data, assets).
const NON_CODE_EXTENSIONS: &[&str] = &[
    ".css", ".scss", ".sass", ".less", ".json", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico",
    ".webp", ".avif", ".mp4", ".webm", ".mp3", ".wav", ".woff", ".woff2", ".eot", ".ttf", ".otf",
    ".wasm", ".pdf",
];

/// Whether a specifier points at a non-code asset that the engine leaves alone.
#[must_use]
pub fn is_non_code(specifier: &str) -> bool {
    let lower = specifier.to_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or(&lower);
    NON_CODE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Base name used to search for candidates: the last segment without a
/// source extension. A trailing `index` segment defers to its directory.
///
/// `../services/reelsService` -> `reelsService`, `./components/index` -> `components`.
#[must_use]
pub fn base_name(specifier: &str) -> Option<&str> {
    let mut segments = specifier
        .trim_end_matches('/')
        .rsplit('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..");

    let last = strip_source_extension(segments.next()?);
    if last == "index" {
        return segments.next().map(strip_source_extension);
    }
    Some(last)
}

/// Source extensions recognised by the resolver, in probing order.
pub const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];

/// Strip one trailing source extension, if present.
#[must_use]
pub fn strip_source_extension(s: &str) -> &str {
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| s.strip_suffix(ext))
        .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
        .unwrap_or(s)
}
