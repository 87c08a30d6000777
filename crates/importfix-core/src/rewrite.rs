//! Specifier computation and anchored substitution.
//!
//! [`SpecifierRewriter::compute_replacement`] turns a target file into the
//! shortest specifier that still resolves to it; [`apply_edits`] substitutes
//! specifier spans found by the scanner, back to front.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::imports::{scan_imports, strip_source_extension, ImportClause, Span};
use crate::paths::{normalize, relative_path, to_slash};
use crate::resolver::Resolver;

/// Form of the specifiers written by a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RewritePolicy {
    /// Relative to the importing file (`../services/reelsService`).
    #[default]
    #[serde(rename = "relative")]
    Relative,
    /// Canonical alias form (`@/services/reelsService`).
    #[serde(rename = "alias")]
    Aliased,
}

impl RewritePolicy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::Aliased => "alias",
        }
    }
}

/// One substitution in a file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

impl Edit {
    #[must_use]
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

/// Computes replacement specifiers against a resolver.
pub struct SpecifierRewriter<'r, 'fs> {
    resolver: &'r Resolver<'fs>,
}

impl<'r, 'fs> SpecifierRewriter<'r, 'fs> {
    #[must_use]
    pub fn new(resolver: &'r Resolver<'fs>) -> Self {
        Self { resolver }
    }

    /// Specifier that `importer` should use to reach `target`.
    ///
    /// Shortened forms (extension stripped, `/index` collapsed) are used only
    /// when they resolve back to `target`. With [`RewritePolicy::Aliased`],
    /// targets outside the project root or that no alias form reaches fall
    /// back to the relative form.
    ///
    /// # Errors
    /// [`Error::AliasTableMissing`] for the aliased policy without a table.
    pub fn compute_replacement(
        &self,
        importer: &Path,
        target: &Path,
        policy: RewritePolicy,
    ) -> Result<String> {
        match policy {
            RewritePolicy::Relative => Ok(self.relative_form(importer, target)),
            RewritePolicy::Aliased => {
                if self.resolver.aliases().is_none() {
                    return Err(Error::AliasTableMissing);
                }
                Ok(self
                    .aliased_form(target)
                    .unwrap_or_else(|| self.relative_form(importer, target)))
            }
        }
    }

    fn relative_form(&self, importer: &Path, target: &Path) -> String {
        let target = normalize(target);
        let base = importer.parent().map(normalize).unwrap_or_default();

        let mut full = to_slash(&relative_path(&target, &base));
        if !(full.starts_with("./") || full.starts_with("../")) {
            full = format!("./{full}");
        }

        first_resolving(&shortenings(&full, strip_source_extension), &full, |spec| {
            self.resolver.resolve(importer, spec).resolves_to(&target)
        })
    }

    fn aliased_form(&self, target: &Path) -> Option<String> {
        let table = self.resolver.aliases()?;
        let rel = normalize(target)
            .strip_prefix(self.resolver.root())
            .ok()
            .map(to_slash)?;

        let full = table.to_alias_with_extension(&rel);
        let stripped = table.to_alias(&rel);
        let mut forms = shortenings(&stripped, |s| s);
        forms.push(full);

        forms
            .into_iter()
            .find(|spec| self.resolver.resolve_aliased(spec).resolves_to(target))
    }
}

/// Candidate forms of `full`, shortest first: index-collapsed, then
/// extension-stripped, then `full` itself.
fn shortenings(full: &str, strip: impl Fn(&str) -> &str) -> Vec<String> {
    let stripped = strip(full);
    let mut forms = Vec::with_capacity(3);

    if let Some(dir) = stripped.strip_suffix("/index") {
        if !dir.is_empty() && !dir.ends_with('/') {
            forms.push(dir.to_string());
        }
    }
    if stripped != full {
        forms.push(stripped.to_string());
    }
    forms.push(full.to_string());
    forms
}

fn first_resolving(forms: &[String], fallback: &str, resolves: impl Fn(&str) -> bool) -> String {
    forms
        .iter()
        .find(|spec| resolves(spec))
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

/// Apply edits to `text`, back to front. Overlapping edits after the first
/// (in source order) are dropped.
#[must_use]
pub fn apply_edits(text: &str, edits: &[Edit]) -> String {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|e| e.span.start);

    let mut kept: Vec<&Edit> = Vec::with_capacity(ordered.len());
    for edit in ordered {
        if edit.span.end > text.len() {
            continue;
        }
        if kept.last().is_some_and(|prev| prev.span.end > edit.span.start) {
            continue;
        }
        kept.push(edit);
    }

    let mut out = text.to_string();
    for edit in kept.iter().rev() {
        out.replace_range(edit.span.start..edit.span.end, &edit.replacement);
    }
    out
}

/// Replace the specifier of one scanned clause.
#[must_use]
pub fn rewrite(text: &str, clause: &ImportClause, new_specifier: &str) -> String {
    apply_edits(text, &[Edit::new(clause.span, new_specifier)])
}

/// Replace every import clause whose specifier equals `original`.
///
/// Occurrences outside import clauses (comments, strings) are left alone.
#[must_use]
pub fn rewrite_specifier(text: &str, original: &str, new_specifier: &str) -> String {
    let edits: Vec<Edit> = scan_imports(text)
        .into_iter()
        .filter(|c| c.specifier == original)
        .map(|c| Edit::new(c.span, new_specifier))
        .collect();
    apply_edits(text, &edits)
}
