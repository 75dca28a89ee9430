// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-run validation reports.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;
use crate::{ValidateError, ValidationSummary};

/// The document written to `reports/validation_<timestamp>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub timestamp: String,
    pub target_dir: String,
    pub summary: ReportSummary,
    pub passed_files: Vec<String>,
    pub failed_files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

impl ValidationReport {
    pub fn new(summary: &ValidationSummary, target_dir: &Path, at: Timestamp) -> Self {
        Self {
            timestamp: at.to_string(),
            target_dir: target_dir.display().to_string(),
            summary: ReportSummary {
                total: summary.total,
                passed: summary.passed,
                failed: summary.failed,
                pass_rate: summary.pass_rate,
            },
            passed_files: summary.passed_files.clone(),
            failed_files: summary.failed_files.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, ValidateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendering for terminals and `--output` files.
    pub fn to_text(&self, strict: bool) -> String {
        let mut out = String::new();
        let mode = if strict { "strict" } else { "compatibility (missing `;` tolerated)" };
        let s = &self.summary;
        let rate = format!("{:.2}%", s.pass_rate);

        // Writing to a String never fails.
        let _ = writeln!(out, "ETS validation report");
        let _ = writeln!(out, "  time:   {}", self.timestamp);
        let _ = writeln!(out, "  target: {}", self.target_dir);
        let _ = writeln!(out, "  mode:   {mode}");
        let _ = writeln!(out);
        let _ = writeln!(out, "┌──────────────┬─────────┐");
        let _ = writeln!(out, "│ total        │ {:>7} │", s.total);
        let _ = writeln!(out, "│ passed       │ {:>7} │", s.passed);
        let _ = writeln!(out, "│ failed       │ {:>7} │", s.failed);
        let _ = writeln!(out, "│ pass rate    │ {rate:>7} │");
        let _ = writeln!(out, "└──────────────┴─────────┘");

        for (title, files) in [("failed", &self.failed_files), ("passed", &self.passed_files)] {
            if files.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n{title} files:");
            for (i, file) in files.iter().enumerate() {
                let _ = writeln!(out, "  {:>3}. {file}", i + 1);
            }
        }
        out
    }
}

/// File name of the report for a run started at `at`.
pub fn report_file_name(at: Timestamp) -> String {
    format!("validation_{}.json", at.file_stem())
}

/// Write `report` as JSON into `reports_dir`, creating it if needed.
pub fn write_report(reports_dir: &Path, report: &ValidationReport, at: Timestamp) -> Result<PathBuf, ValidateError> {
    fs::create_dir_all(reports_dir).map_err(|e| ValidateError::io(reports_dir, e))?;
    let path = reports_dir.join(report_file_name(at));
    fs::write(&path, report.to_json()?).map_err(|e| ValidateError::io(&path, e))?;
    tracing::debug!(path = %path.display(), "wrote report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ValidationReport {
        ValidationReport {
            timestamp: "2024-01-02T03:04:05.006Z".into(),
            target_dir: "app".into(),
            summary: ReportSummary { total: 3, passed: 2, failed: 1, pass_rate: 66.67 },
            passed_files: vec!["app/A.ets".into(), "app/B.ets".into()],
            failed_files: vec!["app/C.ets".into()],
        }
    }

    #[test]
    fn json_field_names() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(value["target_dir"], "app");
        assert_eq!(value["summary"]["pass_rate"], 66.67);
        assert_eq!(value["failed_files"][0], "app/C.ets");
    }

    #[test]
    fn text_lists_failures_before_passes() {
        let text = sample().to_text(false);
        assert!(text.contains("│ pass rate    │  66.67% │"), "{text}");
        let failed = text.find("failed files:").unwrap();
        let passed = text.find("passed files:").unwrap();
        assert!(failed < passed);
        assert!(text.contains("    1. app/C.ets"));
    }

    #[test]
    fn file_name_uses_stem() {
        assert_eq!(
            report_file_name(Timestamp::from_unix_millis(1_700_000_000_042)),
            "validation_2023-11-14T22-13-20-042Z.json"
        );
    }

    #[test]
    fn written_report_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let at = Timestamp::from_unix_millis(0);
        let path = write_report(&dir.path().join("reports"), &sample(), at).unwrap();
        let back: ValidationReport = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back, sample());
    }
}
