#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Import resolution and repair for TypeScript/JavaScript projects.
//!
//! The engine scans import clauses, resolves relative and aliased
//! specifiers against the project tree, and plans span-exact rewrites for
//! the ones that do not resolve. It never logs; every pass returns a
//! [`Report`].

pub mod alias;
pub mod candidates;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod fs;
pub mod imports;
pub mod paths;
pub mod project;
pub mod rename;
pub mod report;
pub mod resolver;
pub mod rewrite;
pub mod syntax;
pub mod version;

pub use alias::{AliasEntry, AliasTable};
pub use candidates::{disambiguate, find_candidates, CandidateIndex, CandidateSet, Disambiguation};
pub use config::{AliasSource, Config, ConfigFile};
pub use diagnostics::{parse_diagnostics, DiagnosticParse, ResolutionRequest};
pub use engine::{Engine, FileChange, ProjectFile, RunOutput};
pub use error::{Error, Result};
pub use fs::{FileSystem, MemoryFs, OsFs};
pub use imports::{scan_imports, ImportClause, SpecifierKind};
pub use project::{write_changes, Project, WriteOutcome};
pub use rename::Rename;
pub use report::{Finding, FindingKind, Outcome, Report, Summary, Warning, REPORT_SCHEMA_VERSION};
pub use resolver::{ResolveResult, Resolver, UnresolvedReason};
pub use rewrite::{RewritePolicy, SpecifierRewriter};
pub use version::{VersionInfo, VERSION};
