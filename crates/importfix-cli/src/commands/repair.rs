//! `importfix repair`: fix exactly the imports a bundler reported.

use importfix_core::error::codes;
use importfix_core::{parse_diagnostics, Config, OsFs};
use miette::Result;
use std::io::Read;
use std::path::Path;

use super::{engine, fail, finish, load_project, log_findings};

/// Run the repair command, reading diagnostics from `input` or stdin.
pub fn run(config: &Config, input: Option<&Path>) -> Result<()> {
    let text = match read_input(input) {
        Ok(text) => text,
        Err(e) => {
            let source = input.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
            fail(
                codes::IO,
                &format!("Failed to read diagnostics from {source}: {e}"),
                config.json,
            )
        }
    };

    let parsed = parse_diagnostics(&text);
    for malformed in &parsed.malformed {
        tracing::debug!(code = malformed.code(), "{malformed}");
    }
    tracing::debug!(requests = parsed.requests.len(), "parsed diagnostics");

    let fs = OsFs;
    let project = load_project(config);
    let engine = engine(&fs, config, &project);

    let mut output = match engine.repair(&project.files, &parsed.requests) {
        Ok(output) => output,
        Err(e) => fail(e.code(), &e.to_string(), config.json),
    };
    output.report.summary.malformed_lines = parsed.malformed.len();
    log_findings(&output.report);

    let report = finish(config, project, output)?;
    tracing::info!(
        requests = parsed.requests.len(),
        fixed = report.summary.fixed,
        files_changed = report.summary.files_changed,
        "repair complete"
    );
    Ok(())
}

fn read_input(input: Option<&Path>) -> std::io::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
