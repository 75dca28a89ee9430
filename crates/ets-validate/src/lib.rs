// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Batch validation of ETS source trees.
//!
//! Walks a directory, parses every `.ets` file and classifies it as passed
//! or failed. In compatibility mode a file whose only problems are missing
//! `;` terminators still passes. Results can be persisted as a per-run
//! report plus a rolling history used for trend output.

pub mod asi;
pub mod discover;
pub mod history;
pub mod report;
mod timestamp;

pub use history::{History, HistoryEntry};
pub use report::{ReportSummary, ValidationReport};
pub use timestamp::Timestamp;

use std::fs;
use std::path::{Path, PathBuf};

use ets_diagnostics::Diagnostic;
use rayon::prelude::*;

/// Errors from persisting reports and history.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid report data: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValidateError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

/// Knobs for a validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Fail files on missing terminators too.
    pub strict: bool,
    /// Render the run as JSON instead of text.
    pub json_output: bool,
    /// Run [`asi::insert_terminators`] over each file before parsing.
    pub preprocess_asi: bool,
    /// Worker threads. 0 lets rayon decide, 1 runs sequentially.
    pub jobs: usize,
}

/// The verdict for one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub passed: bool,
    pub diagnostics: usize,
    /// First diagnostic message, or the read error.
    pub first_problem: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage rounded to two decimals, 0 when no files were found.
    pub pass_rate: f64,
    pub passed_files: Vec<String>,
    pub failed_files: Vec<String>,
    /// Per-file detail in discovery order.
    pub outcomes: Vec<FileOutcome>,
}

impl ValidationSummary {
    pub fn from_outcomes(outcomes: Vec<FileOutcome>) -> Self {
        let mut summary = Self { total: outcomes.len(), ..Self::default() };
        for outcome in &outcomes {
            let name = outcome.path.display().to_string();
            if outcome.passed {
                summary.passed_files.push(name);
            } else {
                summary.failed_files.push(name);
            }
        }
        summary.passed = summary.passed_files.len();
        summary.failed = summary.failed_files.len();
        summary.pass_rate = pass_rate(summary.passed, summary.total);
        summary.outcomes = outcomes;
        summary
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// `passed / total` as a percentage with two decimals.
pub fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (passed as f64 * 10_000.0 / total as f64).round() / 100.0
}

/// Whether a file with these diagnostics passes.
pub fn classify(diagnostics: &[Diagnostic], strict: bool) -> bool {
    diagnostics.is_empty() || (!strict && ets_diagnostics::only_missing_terminators(diagnostics))
}

/// Parse `source` and collect its diagnostics, applying the terminator
/// pre-pass first when asked.
pub fn diagnose_source(source: &str, preprocess_asi: bool) -> Vec<Diagnostic> {
    let parsed = if preprocess_asi {
        ets_parser::parse_source(&asi::insert_terminators(source))
    } else {
        ets_parser::parse_source(source)
    };
    ets_diagnostics::collect(&parsed)
}

/// Validate one file. Unreadable files fail.
pub fn check_file(path: &Path, opts: &ValidateOptions) -> FileOutcome {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            tracing::debug!(path = %path.display(), "unreadable: {e}");
            return FileOutcome {
                path: path.to_path_buf(),
                passed: false,
                diagnostics: 0,
                first_problem: Some(format!("cannot read file: {e}")),
            };
        }
    };

    let diagnostics = diagnose_source(&source, opts.preprocess_asi);
    let passed = classify(&diagnostics, opts.strict);
    tracing::debug!(path = %path.display(), passed, diagnostics = diagnostics.len(), "checked");
    FileOutcome {
        path: path.to_path_buf(),
        passed,
        diagnostics: diagnostics.len(),
        first_problem: diagnostics.first().map(|d| d.message.clone()),
    }
}

/// Validate `files`, in parallel when more than one is given. Outcomes keep
/// the order of `files`.
pub fn check_files(files: &[PathBuf], opts: &ValidateOptions) -> Vec<FileOutcome> {
    let sequential = || -> Vec<FileOutcome> { files.iter().map(|p| check_file(p, opts)).collect() };
    if files.len() <= 1 || opts.jobs == 1 {
        return sequential();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(opts.jobs).build() {
        Ok(pool) => pool.install(|| files.par_iter().map(|p| check_file(p, opts)).collect()),
        Err(e) => {
            tracing::warn!("failed to create thread pool ({e}), running sequentially");
            sequential()
        }
    }
}

/// Discover and validate every `.ets` file under `dir`.
pub fn validate(dir: &Path, opts: &ValidateOptions) -> ValidationSummary {
    let files = discover::find_sources(dir);
    let summary = ValidationSummary::from_outcomes(check_files(&files, opts));
    tracing::info!(
        target_dir = %dir.display(),
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        pass_rate = summary.pass_rate,
        strict = opts.strict,
        "validation finished"
    );
    summary
}

/// Write the run's report into `reports_dir` and append it to the history.
pub fn persist(
    reports_dir: &Path,
    summary: &ValidationSummary,
    target_dir: &Path,
    at: Timestamp,
) -> Result<(PathBuf, History), ValidateError> {
    let report = ValidationReport::new(summary, target_dir, at);
    let path = report::write_report(reports_dir, &report, at)?;
    let history = history::record(reports_dir, &report)?;
    Ok((path, history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pass_rate_rounds_to_two_decimals() {
        assert_eq!(pass_rate(2, 3), 66.67);
        assert_eq!(pass_rate(1, 3), 33.33);
        assert_eq!(pass_rate(3, 3), 100.0);
        assert_eq!(pass_rate(0, 0), 0.0);
    }

    #[test]
    fn missing_terminators_only_pass_in_compatibility_mode() {
        let diagnostics = diagnose_source("let x = { a: 1, b: 2 }", false);
        assert_eq!(diagnostics.len(), 1);
        assert!(classify(&diagnostics, false));
        assert!(!classify(&diagnostics, true));
    }

    #[test]
    fn other_errors_always_fail() {
        let diagnostics = diagnose_source("let x = ;\nlet y = 2", false);
        assert!(!classify(&diagnostics, false));
    }

    #[test]
    fn pre_pass_removes_missing_terminators() {
        let src = "let x = { a: 1, b: 2 }\nconst n = 3\n";
        assert!(!diagnose_source(src, false).is_empty());
        assert!(diagnose_source(src, true).is_empty());
    }

    #[test]
    fn summary_from_outcomes() {
        let outcome = |name: &str, passed| FileOutcome {
            path: PathBuf::from(name),
            passed,
            diagnostics: usize::from(!passed),
            first_problem: None,
        };
        let summary = ValidationSummary::from_outcomes(vec![outcome("a.ets", true), outcome("b.ets", false), outcome("c.ets", true)]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed_files, vec!["a.ets", "c.ets"]);
        assert_eq!(summary.failed_files, vec!["b.ets"]);
        assert_eq!(summary.pass_rate, 66.67);
        assert!(!summary.all_passed());
    }
}
