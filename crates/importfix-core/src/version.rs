//! Build identity reported by `importfix version`.

use serde::Serialize;
use std::fmt;

use crate::report::REPORT_SCHEMA_VERSION;

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name, version and build metadata of this binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Set at build time through `IMPORTFIX_BUILD_GIT_HASH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<&'static str>,
    /// Schema of the JSON report the commands emit.
    pub report_schema_version: u32,
}

impl VersionInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            name: "importfix",
            version: VERSION,
            git_hash: option_env!("IMPORTFIX_BUILD_GIT_HASH"),
            report_schema_version: REPORT_SCHEMA_VERSION,
        }
    }
}

/// One line, e.g. `importfix 0.1.0 (abc123)`.
impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)?;
        if let Some(hash) = self.git_hash {
            write!(f, " ({hash})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let vs = VersionInfo::current().to_string();
        assert!(vs.starts_with("importfix "));
        assert!(vs.contains(VERSION));
    }

    #[test]
    fn test_display_includes_git_hash() {
        let info = VersionInfo {
            git_hash: Some("abc123"),
            ..VersionInfo::current()
        };
        assert_eq!(info.to_string(), format!("importfix {VERSION} (abc123)"));
    }

    #[test]
    fn test_json_shape() {
        let info = VersionInfo {
            git_hash: None,
            ..VersionInfo::current()
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["name"], "importfix");
        assert_eq!(value["version"], VERSION);
        assert_eq!(value["report_schema_version"], REPORT_SCHEMA_VERSION);
        assert!(value.get("git_hash").is_none());
    }
}
