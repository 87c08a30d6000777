pub mod alias;
pub mod check;
pub mod fix;
pub mod repair;
pub mod version;

use importfix_core::{
    write_changes, CandidateIndex, Config, Engine, OsFs, Outcome, Project, Report, Resolver,
    RunOutput, Warning,
};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};

/// Exit code when `check` finds broken imports.
pub const EXIT_UNRESOLVED: i32 = 1;

/// Exit code for configuration and usage errors.
pub const EXIT_USAGE_ERROR: i32 = 2;

/// Print a fatal error (JSON on stdout or text on stderr) and exit with
/// [`EXIT_USAGE_ERROR`].
pub fn fail(code: &str, message: &str, json: bool) -> ! {
    if json {
        let error_json = serde_json::json!({
            "ok": false,
            "error": {
                "code": code,
                "message": message
            }
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&error_json).unwrap_or_default()
        );
    } else {
        eprintln!("error: {message}");
    }
    std::process::exit(EXIT_USAGE_ERROR);
}

/// Discover and read the project, logging unreadable files.
pub fn load_project(config: &Config) -> Project {
    let project = Project::load(config);
    tracing::debug!(
        files = project.files.len(),
        sources = project.sources.len(),
        "discovered sources"
    );
    for warning in &project.warnings {
        log_warning(warning);
    }
    project
}

/// Build the engine for a loaded project.
pub fn engine<'fs>(fs: &'fs OsFs, config: &Config, project: &Project) -> Engine<'fs> {
    let index: CandidateIndex = project.candidate_index();
    let resolver = Resolver::new(fs, project.root.clone()).with_aliases(config.aliases.clone());
    Engine::new(resolver, index)
        .with_renames(config.renames.clone())
        .with_policy(config.policy)
}

/// Write changes unless this is a dry run, then finalize and print the report.
pub fn finish(config: &Config, project: Project, output: RunOutput) -> Result<Report> {
    let RunOutput { mut report, changes } = output;
    report.dry_run = config.dry_run;

    for warning in project.warnings {
        report.push_warning(warning);
    }

    if config.dry_run {
        tracing::info!(files = changes.len(), "dry run, no files written");
    } else {
        let outcome = write_changes(&changes);
        for warning in &outcome.warnings {
            log_warning(warning);
        }
        for rel in &outcome.written {
            tracing::debug!(file = %rel, "wrote");
        }
        report.summary.files_changed = outcome.written.len();
        report.warnings.extend(outcome.warnings);
    }

    report.tally();
    print_report(&report, config.json)?;
    Ok(report)
}

pub fn log_warning(warning: &Warning) {
    match &warning.path {
        Some(path) => tracing::warn!(code = %warning.code, path = %path, "{}", warning.message),
        None => tracing::warn!(code = %warning.code, "{}", warning.message),
    }
}

/// Log each finding at debug level (ambiguities at warn).
pub fn log_findings(report: &Report) {
    for f in &report.findings {
        match (f.outcome, f.as_error()) {
            (Outcome::Ambiguous, Some(err)) => tracing::warn!(
                code = err.code(),
                file = %f.file,
                line = f.line,
                candidates = ?f.candidates,
                "{err}, left unchanged"
            ),
            _ => tracing::debug!(
                file = %f.file,
                line = f.line,
                specifier = %f.specifier,
                outcome = f.outcome.as_str(),
                replacement = ?f.replacement,
                "import"
            ),
        }
    }
}

/// Print the report as JSON or human-readable text on stdout.
pub fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        let json = serde_json::to_string_pretty(report).into_diagnostic()?;
        println!("{json}");
        Ok(())
    } else {
        print_human(report)
    }
}

fn print_human(report: &Report) -> Result<()> {
    let mut out = io::stdout().lock();

    for f in &report.findings {
        let label = match f.outcome {
            Outcome::Fixed => "\x1b[32mfixed\x1b[0m     ",
            Outcome::Unresolved => "\x1b[31munresolved\x1b[0m",
            Outcome::Ambiguous => "\x1b[33mambiguous\x1b[0m ",
            Outcome::Skipped => "\x1b[2mskipped\x1b[0m   ",
        };
        let mut line = format!("{label} {}:{}  '{}'", f.file, f.line, f.specifier);
        if let Some(replacement) = &f.replacement {
            line.push_str(&format!(" -> '{replacement}'"));
        }
        if let Some(reason) = &f.reason {
            line.push_str(&format!(" ({reason})"));
        }
        w(&mut out, &format!("{line}\n"))?;
        for candidate in &f.candidates {
            w(&mut out, &format!("             candidate: {candidate}\n"))?;
        }
    }

    for warning in &report.warnings {
        let path = warning.path.as_deref().unwrap_or("-");
        w(
            &mut out,
            &format!("\x1b[33mwarning\x1b[0m {} {path}: {}\n", warning.code, warning.message),
        )?;
    }

    let s = &report.summary;
    if !report.findings.is_empty() || !report.warnings.is_empty() {
        w(&mut out, "\n")?;
    }
    w(
        &mut out,
        &format!(
            "{} files, {} imports: {} fixed, {} unresolved, {} ambiguous, {} skipped\n",
            s.files_scanned, s.imports_checked, s.fixed, s.unresolved, s.ambiguous, s.skipped
        ),
    )?;
    if report.command != "check" {
        let written = if report.dry_run {
            format!("{} files would change (dry run)\n", s.files_changed)
        } else {
            format!("{} files changed\n", s.files_changed)
        };
        w(&mut out, &written)?;
    }

    Ok(())
}

fn w(out: &mut impl Write, s: &str) -> Result<()> {
    out.write_all(s.as_bytes()).into_diagnostic()
}
