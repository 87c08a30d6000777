//! `importfix alias`: convert relative imports to their alias form.

use importfix_core::{Config, OsFs};
use miette::Result;

use super::{engine, fail, finish, load_project, log_findings};

/// Run the alias command.
pub fn run(config: &Config) -> Result<()> {
    let fs = OsFs;
    let project = load_project(config);
    let engine = engine(&fs, config, &project);

    let output = match engine.convert_to_aliases(&project.files) {
        Ok(output) => output,
        Err(e) => fail(e.code(), &e.to_string(), config.json),
    };
    log_findings(&output.report);

    let report = finish(config, project, output)?;
    tracing::info!(
        converted = report.summary.fixed,
        files_changed = report.summary.files_changed,
        "alias conversion complete"
    );
    Ok(())
}
