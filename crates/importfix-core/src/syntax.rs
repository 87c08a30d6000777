//! Repairs for malformed import clauses.
//!
//! Hand edits and earlier scripted rewrites leave two kinds of breakage:
//!
//! - an unquoted relative specifier: `from ../a/b;`
//! - a stray inner quote: `from '../types"';`
//!
//! Both are found through the scanner, so comments and strings are never
//! touched.

use serde::Serialize;

use crate::imports::{is_relative, scan_imports, ImportClause};
use crate::rewrite::{apply_edits, Edit};

/// What was wrong with a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxIssue {
    UnquotedSpecifier,
    StrayQuote,
}

impl SyntaxIssue {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnquotedSpecifier => "UNQUOTED_SPECIFIER",
            Self::StrayQuote => "STRAY_QUOTE",
        }
    }
}

/// A planned syntax repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFix {
    pub line: u32,
    pub issue: SyntaxIssue,
    /// Specifier as scanned.
    pub original: String,
    /// Specifier after repair (without quotes).
    pub fixed: String,
    pub edit: Edit,
}

fn plan_fix(clause: &ImportClause) -> Option<SyntaxFix> {
    let (issue, fixed, replacement) = match clause.quote {
        None => {
            let fixed = clause.specifier.clone();
            let replacement = format!("'{fixed}'");
            (SyntaxIssue::UnquotedSpecifier, fixed, replacement)
        }
        Some(quote) => {
            let other = if quote == '"' { '\'' } else { '"' };
            let fixed = clause.specifier.trim_end_matches(other);
            if fixed.len() == clause.specifier.len() || !is_relative(fixed) {
                return None;
            }
            (SyntaxIssue::StrayQuote, fixed.to_string(), fixed.to_string())
        }
    };

    Some(SyntaxFix {
        line: clause.line,
        issue,
        original: clause.specifier.clone(),
        fixed,
        edit: Edit::new(clause.span, replacement),
    })
}

/// Find malformed clauses in `text` without changing it.
#[must_use]
pub fn find_syntax_issues(text: &str) -> Vec<SyntaxFix> {
    scan_imports(text).iter().filter_map(plan_fix).collect()
}

/// Repair malformed clauses, returning the new text and what was fixed.
#[must_use]
pub fn repair_import_syntax(text: &str) -> (String, Vec<SyntaxFix>) {
    let fixes = find_syntax_issues(text);
    if fixes.is_empty() {
        return (text.to_string(), fixes);
    }

    let edits: Vec<Edit> = fixes.iter().map(|f| f.edit.clone()).collect();
    (apply_edits(text, &edits), fixes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_unquoted_specifier() {
        let (out, fixes) = repair_import_syntax("import { a } from ../lib/a;\n");
        assert_eq!(out, "import { a } from '../lib/a';\n");
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].issue, SyntaxIssue::UnquotedSpecifier);
        assert_eq!(fixes[0].fixed, "../lib/a");
    }

    #[test]
    fn test_removes_stray_quote() {
        let (out, fixes) = repair_import_syntax("import { T } from '../types\"';\n");
        assert_eq!(out, "import { T } from '../types';\n");
        assert_eq!(fixes[0].issue, SyntaxIssue::StrayQuote);
        assert_eq!(fixes[0].original, "../types\"");

        let (out, _) = repair_import_syntax("import { T } from \"../types'\";\n");
        assert_eq!(out, "import { T } from \"../types\";\n");
    }

    #[test]
    fn test_well_formed_text_unchanged() {
        let text = "import a from './a';\nconst s = \"from ../x\";\n// from ../y\n";
        let (out, fixes) = repair_import_syntax(text);
        assert_eq!(out, text);
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_repair_is_idempotent() {
        let (once, _) = repair_import_syntax("import a from ./a\nimport b from './b\"'\n");
        let (twice, fixes) = repair_import_syntax(&once);
        assert_eq!(once, twice);
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_find_does_not_modify() {
        let fixes = find_syntax_issues("import a from ./a;");
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].line, 1);
    }
}
