//! `importfix fix`: repair unresolved imports found by scanning the project.

use importfix_core::{Config, OsFs};
use miette::Result;

use super::{engine, fail, finish, load_project, log_findings};

/// Run the fix command.
pub fn run(config: &Config, syntax_pass: bool) -> Result<()> {
    let fs = OsFs;
    let project = load_project(config);
    let engine = engine(&fs, config, &project).with_syntax_pass(syntax_pass);

    let output = match engine.fix(&project.files) {
        Ok(output) => output,
        Err(e) => fail(e.code(), &e.to_string(), config.json),
    };
    log_findings(&output.report);

    let report = finish(config, project, output)?;
    tracing::info!(
        fixed = report.summary.fixed,
        unresolved = report.summary.unresolved,
        ambiguous = report.summary.ambiguous,
        files_changed = report.summary.files_changed,
        "fix complete"
    );
    Ok(())
}
