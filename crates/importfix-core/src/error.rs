use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes. These are part of the JSON report and must not change.
pub mod codes {
    pub const UNREADABLE_FILE: &str = "UNREADABLE_FILE";
    pub const UNRESOLVED_IMPORT: &str = "UNRESOLVED_IMPORT";
    pub const AMBIGUOUS_CANDIDATE: &str = "AMBIGUOUS_CANDIDATE";
    pub const WRITE_FAILURE: &str = "WRITE_FAILURE";
    pub const MALFORMED_DIAGNOSTIC_LINE: &str = "MALFORMED_DIAGNOSTIC_LINE";
    pub const CONFIG_READ: &str = "CONFIG_READ";
    pub const CONFIG_PARSE: &str = "CONFIG_PARSE";
    pub const ALIAS_TABLE_MISSING: &str = "ALIAS_TABLE_MISSING";
    pub const ALIAS_TABLE_MISSING_CATCH_ALL: &str = "ALIAS_TABLE_MISSING_CATCH_ALL";
    pub const ALIAS_ENTRY_INVALID: &str = "ALIAS_ENTRY_INVALID";
    pub const IO: &str = "IO";
}

/// Core error type for importfix operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read {path} as text: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot resolve '{specifier}' from {importer}")]
    UnresolvedImport { importer: PathBuf, specifier: String },

    #[error("'{specifier}' from {importer} matches {} candidates", candidates.len())]
    AmbiguousCandidate {
        importer: PathBuf,
        specifier: String,
        candidates: Vec<PathBuf>,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line} is not a resolution diagnostic: {text}")]
    MalformedDiagnosticLine { line: usize, text: String },

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No alias table configured (add \"aliases\" to importfix.json or \"paths\" to tsconfig.json)")]
    AliasTableMissing,

    #[error("Alias table has no catch-all entry (an alias whose directory is the project root)")]
    AliasTableMissingCatchAll,

    #[error("Invalid alias entry '{prefix}': {reason}")]
    AliasEntryInvalid { prefix: String, reason: String },
}

impl Error {
    /// Stable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => codes::IO,
            Self::UnreadableFile { .. } => codes::UNREADABLE_FILE,
            Self::UnresolvedImport { .. } => codes::UNRESOLVED_IMPORT,
            Self::AmbiguousCandidate { .. } => codes::AMBIGUOUS_CANDIDATE,
            Self::WriteFailure { .. } => codes::WRITE_FAILURE,
            Self::MalformedDiagnosticLine { .. } => codes::MALFORMED_DIAGNOSTIC_LINE,
            Self::ConfigRead { .. } => codes::CONFIG_READ,
            Self::ConfigParse { .. } => codes::CONFIG_PARSE,
            Self::AliasTableMissing => codes::ALIAS_TABLE_MISSING,
            Self::AliasTableMissingCatchAll => codes::ALIAS_TABLE_MISSING_CATCH_ALL,
            Self::AliasEntryInvalid { .. } => codes::ALIAS_ENTRY_INVALID,
        }
    }

    /// Whether this error aborts the whole run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigRead { .. }
                | Self::ConfigParse { .. }
                | Self::AliasTableMissing
                | Self::AliasTableMissingCatchAll
                | Self::AliasEntryInvalid { .. }
        )
    }
}

/// Result alias for importfix operations.
pub type Result<T> = std::result::Result<T, Error>;
