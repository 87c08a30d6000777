//! Configuration: `importfix.json`, the tsconfig alias fallback, and CLI overrides.

use importfix_util::walk::DEFAULT_EXCLUDE_DIRS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::alias::{AliasEntry, AliasTable};
use crate::error::{Error, Result};
use crate::imports::SOURCE_EXTENSIONS;
use crate::rename::Rename;
use crate::rewrite::RewritePolicy;

/// Config file looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "importfix.json";

/// Fallback source for the alias table.
pub const TSCONFIG_FILE_NAME: &str = "tsconfig.json";

/// On-disk shape of `importfix.json`. Comments and trailing commas are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Ordered alias entries; must include a catch-all (`"dir": ""`).
    pub aliases: Option<Vec<AliasEntry>>,
    /// Ordered segment renames tried when no candidate is found.
    pub renames: Vec<Rename>,
    /// Directory names skipped during discovery.
    pub exclude: Option<Vec<String>>,
    /// Default rewrite policy.
    pub policy: Option<RewritePolicy>,
}

/// Where the alias table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasSource {
    None,
    Config,
    Tsconfig,
}

/// Run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root.
    pub root: PathBuf,

    /// Alias table, if one was configured or derived.
    pub aliases: Option<AliasTable>,

    pub alias_source: AliasSource,

    pub renames: Vec<Rename>,

    /// Directory names skipped during discovery.
    pub exclude: Vec<String>,

    /// Source extensions, in probing order.
    pub extensions: &'static [&'static str],

    pub policy: RewritePolicy,

    /// Compute and report without writing.
    pub dry_run: bool,

    /// Emit the report (and logs) as JSON.
    pub json: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Non-fatal remarks produced while loading, for the caller to log.
    pub notes: Vec<String>,
}

impl Config {
    /// Defaults for the project at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            aliases: None,
            alias_source: AliasSource::None,
            renames: Vec::new(),
            exclude: DEFAULT_EXCLUDE_DIRS.iter().map(|s| (*s).to_string()).collect(),
            extensions: SOURCE_EXTENSIONS,
            policy: RewritePolicy::default(),
            dry_run: false,
            json: false,
            verbosity: 0,
            notes: Vec::new(),
        }
    }

    /// Load configuration for `root`.
    ///
    /// Reads `explicit` if given (it must exist), else `importfix.json` at the
    /// root if present. Without `aliases` in the config file, the alias table
    /// is derived from `tsconfig.json` `compilerOptions.paths`.
    ///
    /// # Errors
    /// `CONFIG_READ` / `CONFIG_PARSE` for unreadable or invalid files, and the
    /// alias table errors for invalid configured aliases.
    pub fn load(root: PathBuf, explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::new(root);

        let path = explicit.map_or_else(|| config.root.join(CONFIG_FILE_NAME), Path::to_path_buf);
        let file = if explicit.is_some() || path.is_file() {
            read_config_file(&path)?
        } else {
            ConfigFile::default()
        };

        if let Some(exclude) = file.exclude {
            config.exclude = exclude;
        }
        if let Some(policy) = file.policy {
            config.policy = policy;
        }
        config.renames = file.renames;

        if let Some(entries) = file.aliases {
            config.aliases = Some(AliasTable::new(entries)?);
            config.alias_source = AliasSource::Config;
        } else {
            let tsconfig = config.root.join(TSCONFIG_FILE_NAME);
            if tsconfig.is_file() {
                match AliasTable::from_tsconfig(&read_jsonc(&tsconfig)?) {
                    Ok(Some(table)) => {
                        config.aliases = Some(table);
                        config.alias_source = AliasSource::Tsconfig;
                    }
                    Ok(None) => {}
                    Err(Error::AliasTableMissingCatchAll) => config.notes.push(format!(
                        "{TSCONFIG_FILE_NAME} paths have no entry for the project root; aliases ignored"
                    )),
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RewritePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    serde_json::from_value(read_jsonc(path)?).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_jsonc(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&strip_jsonc(&text)).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Strip `//` and `/* */` comments and trailing commas so JSONC parses as JSON.
fn strip_jsonc(source: &str) -> String {
    strip_trailing_commas(&strip_comments(source))
}

fn strip_comments(source: &str) -> String {
    let mut result = String::with_capacity(source.len());
    let chars: Vec<char> = source.chars().collect();
    let len = chars.len();
    let mut i = 0;
    let mut in_string = false;
    let mut escaped = false;

    while i < len {
        let c = chars[i];
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < len && chars[i] != '\n' {
                i += 1;
            }
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i < len && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                // Keep line structure for error positions
                if chars[i] == '\n' {
                    result.push('\n');
                }
                i += 1;
            }
            i += 2;
        } else {
            if c == '"' {
                in_string = true;
            }
            result.push(c);
            i += 1;
        }
    }

    result
}

fn strip_trailing_commas(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut result = String::with_capacity(source.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        result.push(c);
    }

    result
}
