#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use importfix_core::paths::project_root;
use importfix_core::{Config, RewritePolicy};
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "importfix")]
#[command(author, version, about = "Find and repair broken import specifiers", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit the report as one JSON object (logs go to stderr as JSON lines)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Config file (default: importfix.json at the project root)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Replacement style for fixed imports.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PolicyArg {
    /// Relative to the importing file
    Relative,
    /// Canonical alias form
    Alias,
}

impl From<PolicyArg> for RewritePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Relative => Self::Relative,
            PolicyArg::Alias => Self::Aliased,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Report imports that do not resolve (exit 1 if any)
    Check,

    /// Repair unresolved imports in place
    Fix {
        /// Replacement style (default from config, else relative)
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Report fixes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Skip the malformed-clause pre-pass
        #[arg(long)]
        no_syntax: bool,
    },

    /// Repair the imports named by bundler "Could not resolve" diagnostics
    Repair {
        /// Diagnostic output to read (default: stdin)
        #[arg(long, short = 'i', value_name = "FILE")]
        input: Option<PathBuf>,

        /// Replacement style (default from config, else relative)
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Report fixes without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Convert resolvable relative imports to their alias form
    Alias {
        /// Report conversions without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Version) {
        return commands::version::run(cli.json);
    }

    logging::init(cli.verbose, cli.json);

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);
    let root = project_root(&cwd).unwrap_or_else(|| cwd.clone());
    let explicit = cli.config.map(|p| if p.is_absolute() { p } else { cwd.join(p) });

    let config = match Config::load(root, explicit.as_deref()) {
        Ok(config) => config.with_verbosity(cli.verbose).with_json(cli.json),
        Err(e) => commands::fail(e.code(), &e.to_string(), cli.json),
    };
    for note in &config.notes {
        tracing::warn!("{note}");
    }

    match cli.command {
        Commands::Version => commands::version::run(cli.json),
        Commands::Check => {
            let span = tracing::info_span!("check", cmd = "check", root = %config.root.display());
            let _guard = span.enter();
            commands::check::run(&config)
        }
        Commands::Fix {
            policy,
            dry_run,
            no_syntax,
        } => {
            let config = with_overrides(config, policy, dry_run);
            let span = tracing::info_span!("fix", cmd = "fix", root = %config.root.display());
            let _guard = span.enter();
            commands::fix::run(&config, !no_syntax)
        }
        Commands::Repair {
            input,
            policy,
            dry_run,
        } => {
            let config = with_overrides(config, policy, dry_run);
            let span = tracing::info_span!("repair", cmd = "repair", root = %config.root.display());
            let _guard = span.enter();
            let input = input.map(|p| if p.is_absolute() { p } else { cwd.join(p) });
            commands::repair::run(&config, input.as_deref())
        }
        Commands::Alias { dry_run } => {
            let config = config.with_dry_run(dry_run);
            let span = tracing::info_span!("alias", cmd = "alias", root = %config.root.display());
            let _guard = span.enter();
            commands::alias::run(&config)
        }
    }
}

fn with_overrides(config: Config, policy: Option<PolicyArg>, dry_run: bool) -> Config {
    let config = config.with_dry_run(dry_run);
    match policy {
        Some(policy) => config.with_policy(policy.into()),
        None => config,
    }
}
