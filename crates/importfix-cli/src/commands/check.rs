//! `importfix check`: detection only.

use importfix_core::{Config, OsFs};
use miette::Result;

use super::{engine, load_project, log_findings, print_report, EXIT_UNRESOLVED};

/// Run the check command.
///
/// Exits with [`EXIT_UNRESOLVED`] when any import is unresolved or
/// ambiguous.
pub fn run(config: &Config) -> Result<()> {
    let fs = OsFs;
    let project = load_project(config);
    let engine = engine(&fs, config, &project);

    let mut report = engine.check(&project.files);
    for warning in project.warnings {
        report.push_warning(warning);
    }
    report.tally();

    log_findings(&report);
    tracing::info!(
        files = report.summary.files_scanned,
        unresolved = report.summary.unresolved,
        "check complete"
    );
    print_report(&report, config.json)?;

    if report.has_unresolved() {
        std::process::exit(EXIT_UNRESOLVED);
    }
    Ok(())
}
