//! Structured run report.
//!
//! The engine never prints; every pass returns a [`Report`] that the CLI
//! renders as text or serializes as one JSON object.

use serde::Serialize;
use std::path::PathBuf;

use crate::error::Error;
use crate::paths::to_slash;

/// Schema version of the JSON report. Bump on breaking changes.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// What happened to one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Fixed,
    Unresolved,
    Ambiguous,
    Skipped,
}

impl Outcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Unresolved => "unresolved",
            Self::Ambiguous => "ambiguous",
            Self::Skipped => "skipped",
        }
    }
}

/// Which pass produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// Resolution check or candidate repair.
    Import,
    /// Malformed clause repaired by the syntax pre-pass.
    Syntax,
    /// Relative import converted to its alias form.
    Alias,
}

/// One reported import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Importing file, project-relative with forward slashes.
    pub file: String,
    pub line: u32,
    /// Specifier as written.
    pub specifier: String,
    pub outcome: Outcome,
    pub kind: FindingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// Project-relative candidate paths.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
    /// Stable reason code for anything not fixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Finding {
    #[must_use]
    pub fn new(
        file: impl Into<String>,
        line: u32,
        specifier: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            specifier: specifier.into(),
            outcome,
            kind: FindingKind::Import,
            replacement: None,
            candidates: Vec::new(),
            reason: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: FindingKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// The error an unresolved or ambiguous import finding stands for.
    ///
    /// `None` for fixes, skips and syntax findings.
    #[must_use]
    pub fn as_error(&self) -> Option<Error> {
        if self.kind != FindingKind::Import {
            return None;
        }
        let importer = PathBuf::from(&self.file);
        let specifier = self.specifier.clone();
        match self.outcome {
            Outcome::Unresolved => Some(Error::UnresolvedImport {
                importer,
                specifier,
            }),
            Outcome::Ambiguous => Some(Error::AmbiguousCandidate {
                importer,
                specifier,
                candidates: self.candidates.iter().map(PathBuf::from).collect(),
            }),
            Outcome::Fixed | Outcome::Skipped => None,
        }
    }
}

/// A per-file problem that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

impl Warning {
    #[must_use]
    pub fn new(code: &str, path: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            path,
            message: message.into(),
        }
    }

    /// Warning for a non-fatal error, with the path it concerns.
    #[must_use]
    pub fn from_error(err: &Error) -> Self {
        let path = match err {
            Error::UnreadableFile { path, .. } | Error::WriteFailure { path, .. } => {
                Some(to_slash(path))
            }
            Error::UnresolvedImport { importer, .. }
            | Error::AmbiguousCandidate { importer, .. } => Some(to_slash(importer)),
            _ => None,
        };
        Self::new(err.code(), path, err.to_string())
    }
}

/// Counts over a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files_scanned: usize,
    pub imports_checked: usize,
    pub fixed: usize,
    pub unresolved: usize,
    pub ambiguous: usize,
    pub skipped: usize,
    pub files_changed: usize,
    pub warnings: usize,
    pub malformed_lines: usize,
}

/// Result of one command.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub command: String,
    pub root: String,
    pub dry_run: bool,
    pub summary: Summary,
    pub findings: Vec<Finding>,
    pub warnings: Vec<Warning>,
}

impl Report {
    #[must_use]
    pub fn new(command: &str, root: impl Into<String>) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            command: command.to_string(),
            root: root.into(),
            dry_run: false,
            summary: Summary::default(),
            findings: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn push_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn push_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Recount outcome totals and warnings from the collected entries.
    ///
    /// Scan counters (`files_scanned`, `imports_checked`, `files_changed`,
    /// `malformed_lines`) are set by the caller and left as they are.
    pub fn tally(&mut self) {
        let count = |o: Outcome| self.findings.iter().filter(|f| f.outcome == o).count();
        let (fixed, unresolved, ambiguous, skipped) = (
            count(Outcome::Fixed),
            count(Outcome::Unresolved),
            count(Outcome::Ambiguous),
            count(Outcome::Skipped),
        );
        self.summary.fixed = fixed;
        self.summary.unresolved = unresolved;
        self.summary.ambiguous = ambiguous;
        self.summary.skipped = skipped;
        self.summary.warnings = self.warnings.len();
    }

    /// Whether any import is left broken.
    #[must_use]
    pub fn has_unresolved(&self) -> bool {
        self.findings
            .iter()
            .any(|f| matches!(f.outcome, Outcome::Unresolved | Outcome::Ambiguous))
    }
}
