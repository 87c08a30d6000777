//! Check, fix, repair and alias passes over a set of project files.
//!
//! The engine is pure with respect to file contents: it takes
//! [`ProjectFile`]s, asks the [`Resolver`] about existence, and returns a
//! [`Report`] plus the [`FileChange`]s to write. Per-file analysis runs on the
//! rayon pool; result order follows input order.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::candidates::{disambiguate, CandidateIndex, Disambiguation};
use crate::diagnostics::ResolutionRequest;
use crate::error::{codes, Error, Result};
use crate::imports::{base_name, is_non_code, scan_imports, ImportClause, SpecifierKind};
use crate::paths::{normalize, to_slash};
use crate::rename::{apply_renames, Rename};
use crate::report::{Finding, FindingKind, Outcome, Report, Warning};
use crate::resolver::{ResolveResult, Resolver};
use crate::rewrite::{apply_edits, Edit, RewritePolicy, SpecifierRewriter};
use crate::syntax::{repair_import_syntax, SyntaxFix};

/// Reason codes for skipped findings.
pub mod reasons {
    pub const NON_CODE: &str = "NON_CODE";
    pub const ALREADY_RESOLVES: &str = "ALREADY_RESOLVES";
    pub const NOT_IN_FILE: &str = "NOT_IN_FILE";
    pub const BARE_SPECIFIER: &str = "BARE_SPECIFIER";
}

/// A source file read for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    /// Normalized absolute path.
    pub path: PathBuf,
    /// Project-relative path with forward slashes.
    pub rel: String,
    pub text: String,
}

impl ProjectFile {
    #[must_use]
    pub fn new(root: &Path, path: &Path, text: impl Into<String>) -> Self {
        let path = normalize(path);
        let rel = display_path(root, &path);
        Self {
            path,
            rel,
            text: text.into(),
        }
    }
}

/// New contents for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub rel: String,
    pub new_text: String,
}

/// Report plus pending writes.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: Report,
    pub changes: Vec<FileChange>,
}

/// How an unresolved specifier was repaired, if at all.
enum Repair {
    Fixed(String),
    Ambiguous(Vec<PathBuf>),
    Unresolved,
}

#[derive(Default)]
struct FilePlan {
    findings: Vec<Finding>,
    edits: Vec<Edit>,
    /// Text after the syntax pre-pass, when it changed anything.
    repaired: Option<String>,
    imports: usize,
}

fn display_path(root: &Path, path: &Path) -> String {
    to_slash(path.strip_prefix(root).unwrap_or(path))
}

/// Resolution and repair engine for one project.
pub struct Engine<'fs> {
    resolver: Resolver<'fs>,
    index: CandidateIndex,
    renames: Vec<Rename>,
    policy: RewritePolicy,
    syntax_pass: bool,
}

impl<'fs> Engine<'fs> {
    #[must_use]
    pub fn new(resolver: Resolver<'fs>, index: CandidateIndex) -> Self {
        Self {
            resolver,
            index,
            renames: Vec::new(),
            policy: RewritePolicy::default(),
            syntax_pass: true,
        }
    }

    #[must_use]
    pub fn with_renames(mut self, renames: Vec<Rename>) -> Self {
        self.renames = renames;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RewritePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_syntax_pass(mut self, enabled: bool) -> Self {
        self.syntax_pass = enabled;
        self
    }

    #[must_use]
    pub fn resolver(&self) -> &Resolver<'fs> {
        &self.resolver
    }

    fn rel(&self, path: &Path) -> String {
        display_path(self.resolver.root(), path)
    }

    fn rels(&self, paths: &[PathBuf]) -> Vec<String> {
        paths.iter().map(|p| self.rel(p)).collect()
    }

    fn report(&self, command: &str) -> Report {
        Report::new(command, to_slash(self.resolver.root()))
    }

    /// Detection only: report every relative or aliased import that does not
    /// resolve, plus malformed clauses. Nothing is rewritten.
    #[must_use]
    pub fn check(&self, files: &[ProjectFile]) -> Report {
        let plans: Vec<FilePlan> = files.par_iter().map(|f| self.plan_check(f)).collect();

        let mut report = self.report("check");
        report.summary.files_scanned = files.len();
        for plan in plans {
            report.summary.imports_checked += plan.imports;
            report.findings.extend(plan.findings);
        }
        report.tally();
        report
    }

    /// Repair every unresolved import found by scanning the files.
    ///
    /// # Errors
    /// [`Error::AliasTableMissing`] when the alias policy is selected without
    /// an alias table.
    pub fn fix(&self, files: &[ProjectFile]) -> Result<RunOutput> {
        self.require_aliases_for(self.policy)?;

        let plans = files
            .par_iter()
            .map(|f| self.plan_fix(f))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.finish("fix", files, plans))
    }

    /// Repair exactly the imports named by bundler diagnostics.
    ///
    /// # Errors
    /// [`Error::AliasTableMissing`] when the alias policy is selected without
    /// an alias table.
    pub fn repair(
        &self,
        files: &[ProjectFile],
        requests: &[ResolutionRequest],
    ) -> Result<RunOutput> {
        self.require_aliases_for(self.policy)?;

        let mut by_file: BTreeMap<PathBuf, Vec<&ResolutionRequest>> = BTreeMap::new();
        for request in requests {
            let path = normalize(&self.resolver.root().join(&request.importer));
            by_file.entry(path).or_default().push(request);
        }

        let mut unknown: Vec<Warning> = Vec::new();
        for (path, reqs) in &by_file {
            if !files.iter().any(|f| &f.path == path) {
                for req in reqs {
                    unknown.push(Warning::from_error(&Error::UnresolvedImport {
                        importer: PathBuf::from(&req.importer),
                        specifier: req.specifier.clone(),
                    }));
                }
            }
        }

        let plans = files
            .par_iter()
            .map(|f| match by_file.get(&f.path) {
                Some(reqs) => self.plan_repair(f, reqs),
                None => Ok(FilePlan::default()),
            })
            .collect::<Result<Vec<_>>>()?;

        let mut output = self.finish("repair", files, plans);
        output.report.summary.files_scanned = by_file.len();
        for warning in unknown {
            output.report.push_warning(warning);
        }
        output.report.tally();
        Ok(output)
    }

    /// Rewrite every resolvable relative (or non-canonical aliased) import to
    /// its canonical alias form.
    ///
    /// # Errors
    /// [`Error::AliasTableMissing`] without an alias table.
    pub fn convert_to_aliases(&self, files: &[ProjectFile]) -> Result<RunOutput> {
        self.require_aliases_for(RewritePolicy::Aliased)?;

        let plans = files
            .par_iter()
            .map(|f| self.plan_alias(f))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.finish("alias", files, plans))
    }

    fn require_aliases_for(&self, policy: RewritePolicy) -> Result<()> {
        if policy == RewritePolicy::Aliased && self.resolver.aliases().is_none() {
            return Err(Error::AliasTableMissing);
        }
        Ok(())
    }

    fn finish(&self, command: &str, files: &[ProjectFile], plans: Vec<FilePlan>) -> RunOutput {
        let mut report = self.report(command);
        report.summary.files_scanned = files.len();
        let mut changes = Vec::new();

        for (file, plan) in files.iter().zip(plans) {
            report.summary.imports_checked += plan.imports;
            report.findings.extend(plan.findings);

            let base = plan.repaired.as_deref().unwrap_or(&file.text);
            let new_text = apply_edits(base, &plan.edits);
            if new_text != file.text {
                changes.push(FileChange {
                    path: file.path.clone(),
                    rel: file.rel.clone(),
                    new_text,
                });
            }
        }

        report.summary.files_changed = changes.len();
        report.tally();
        RunOutput { report, changes }
    }

    /// Policy for a replacement: aliased imports keep the alias form.
    fn policy_for(&self, kind: SpecifierKind) -> RewritePolicy {
        if kind == SpecifierKind::Aliased {
            RewritePolicy::Aliased
        } else {
            self.policy
        }
    }

    fn syntax_findings(file: &ProjectFile, fixes: &[SyntaxFix], outcome: Outcome) -> Vec<Finding> {
        fixes
            .iter()
            .map(|fix| {
                let finding = Finding::new(file.rel.clone(), fix.line, fix.original.clone(), outcome)
                    .with_kind(FindingKind::Syntax);
                if outcome == Outcome::Fixed {
                    finding.with_replacement(fix.fixed.clone())
                } else {
                    finding.with_reason(fix.issue.as_str())
                }
            })
            .collect()
    }

    fn plan_check(&self, file: &ProjectFile) -> FilePlan {
        let (text, fixes) = repair_import_syntax(&file.text);
        let mut plan = FilePlan {
            findings: Self::syntax_findings(file, &fixes, Outcome::Unresolved),
            ..FilePlan::default()
        };

        for clause in scan_imports(&text) {
            let spec = clause.specifier.as_str();
            let kind = self.resolver.classify(spec);
            if kind == SpecifierKind::Bare {
                continue;
            }
            plan.imports += 1;

            if self.resolver.resolve_specifier(&file.path, spec).is_resolved() {
                continue;
            }

            let finding = Finding::new(file.rel.clone(), clause.line, spec, Outcome::Unresolved);
            if is_non_code(spec) {
                plan.findings.push(
                    Finding {
                        outcome: Outcome::Skipped,
                        ..finding
                    }
                    .with_reason(reasons::NON_CODE),
                );
                continue;
            }

            let suggestions = base_name(spec)
                .map(|base| self.index.find_candidates(base).without(&file.path))
                .unwrap_or_default();
            plan.findings.push(
                finding
                    .with_reason(codes::UNRESOLVED_IMPORT)
                    .with_candidates(self.rels(suggestions.paths())),
            );
        }

        plan
    }

    fn plan_fix(&self, file: &ProjectFile) -> Result<FilePlan> {
        let mut plan = FilePlan::default();

        if self.syntax_pass {
            let (text, fixes) = repair_import_syntax(&file.text);
            if !fixes.is_empty() {
                plan.findings = Self::syntax_findings(file, &fixes, Outcome::Fixed);
                plan.repaired = Some(text);
            }
        }

        let clauses = scan_imports(plan.repaired.as_deref().unwrap_or(&file.text));
        for clause in &clauses {
            let kind = self.resolver.classify(&clause.specifier);
            if kind == SpecifierKind::Bare {
                continue;
            }
            plan.imports += 1;

            if self
                .resolver
                .resolve_specifier(&file.path, &clause.specifier)
                .is_resolved()
            {
                continue;
            }
            self.plan_clause_repair(file, clause, kind, &mut plan)?;
        }

        Ok(plan)
    }

    fn plan_repair(&self, file: &ProjectFile, requests: &[&ResolutionRequest]) -> Result<FilePlan> {
        let mut plan = FilePlan::default();
        let clauses = scan_imports(&file.text);

        for request in requests {
            let spec = request.specifier.as_str();
            let matching: Vec<&ImportClause> =
                clauses.iter().filter(|c| c.specifier == spec).collect();
            plan.imports += matching.len();

            let Some(first) = matching.first() else {
                plan.findings.push(
                    Finding::new(file.rel.clone(), 0, spec, Outcome::Skipped)
                        .with_reason(reasons::NOT_IN_FILE),
                );
                continue;
            };

            let kind = self.resolver.classify(spec);
            let skip_reason = if kind == SpecifierKind::Bare {
                Some(reasons::BARE_SPECIFIER)
            } else if self.resolver.resolve_specifier(&file.path, spec).is_resolved() {
                Some(reasons::ALREADY_RESOLVES)
            } else {
                None
            };
            if let Some(reason) = skip_reason {
                plan.findings.push(
                    Finding::new(file.rel.clone(), first.line, spec, Outcome::Skipped)
                        .with_reason(reason),
                );
                continue;
            }

            for clause in matching {
                self.plan_clause_repair(file, clause, kind, &mut plan)?;
            }
        }

        Ok(plan)
    }

    fn plan_alias(&self, file: &ProjectFile) -> Result<FilePlan> {
        let mut plan = FilePlan::default();
        let rewriter = SpecifierRewriter::new(&self.resolver);

        for clause in scan_imports(&file.text) {
            let spec = clause.specifier.as_str();
            if self.resolver.classify(spec) == SpecifierKind::Bare || is_non_code(spec) {
                continue;
            }
            plan.imports += 1;

            let ResolveResult::Resolved(target) = self.resolver.resolve_specifier(&file.path, spec)
            else {
                continue;
            };
            let replacement =
                rewriter.compute_replacement(&file.path, &target, RewritePolicy::Aliased)?;
            if replacement == spec || self.resolver.classify(&replacement) != SpecifierKind::Aliased
            {
                continue;
            }

            plan.edits.push(Edit::new(clause.span, replacement.clone()));
            plan.findings.push(
                Finding::new(file.rel.clone(), clause.line, spec, Outcome::Fixed)
                    .with_kind(FindingKind::Alias)
                    .with_replacement(replacement),
            );
        }

        Ok(plan)
    }

    fn plan_clause_repair(
        &self,
        file: &ProjectFile,
        clause: &ImportClause,
        kind: SpecifierKind,
        plan: &mut FilePlan,
    ) -> Result<()> {
        let spec = clause.specifier.as_str();
        let finding = Finding::new(file.rel.clone(), clause.line, spec, Outcome::Unresolved);

        if is_non_code(spec) {
            plan.findings.push(
                Finding {
                    outcome: Outcome::Skipped,
                    ..finding
                }
                .with_reason(reasons::NON_CODE),
            );
            return Ok(());
        }

        match self.repair_specifier(&file.path, spec, kind)? {
            Repair::Fixed(replacement) => {
                plan.edits.push(Edit::new(clause.span, replacement.clone()));
                plan.findings.push(
                    Finding {
                        outcome: Outcome::Fixed,
                        ..finding
                    }
                    .with_replacement(replacement),
                );
            }
            Repair::Ambiguous(candidates) => plan.findings.push(
                Finding {
                    outcome: Outcome::Ambiguous,
                    ..finding
                }
                .with_candidates(self.rels(&candidates))
                .with_reason(codes::AMBIGUOUS_CANDIDATE),
            ),
            Repair::Unresolved => plan
                .findings
                .push(finding.with_reason(codes::UNRESOLVED_IMPORT)),
        }

        Ok(())
    }

    /// Candidates first, then the rename table.
    fn repair_specifier(&self, importer: &Path, spec: &str, kind: SpecifierKind) -> Result<Repair> {
        let rewriter = SpecifierRewriter::new(&self.resolver);
        let policy = self.policy_for(kind);

        let pending = match base_name(spec) {
            Some(base) => {
                let set = self.index.find_candidates(base).without(importer);
                match disambiguate(&set, base) {
                    Disambiguation::Unique(target) => {
                        let replacement = rewriter.compute_replacement(importer, &target, policy)?;
                        return Ok(Repair::Fixed(replacement));
                    }
                    other => other,
                }
            }
            None => Disambiguation::None,
        };

        if let Some(renamed) = apply_renames(spec, &self.renames) {
            if let ResolveResult::Resolved(target) =
                self.resolver.resolve_specifier(importer, &renamed)
            {
                let replacement = rewriter.compute_replacement(importer, &target, policy)?;
                return Ok(Repair::Fixed(replacement));
            }
        }

        Ok(match pending {
            Disambiguation::Ambiguous(candidates) => Repair::Ambiguous(candidates),
            Disambiguation::Unique(_) | Disambiguation::None => Repair::Unresolved,
        })
    }
}
