// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run history kept in `reports/summary.json`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::report::ValidationReport;
use crate::ValidateError;

pub const SUMMARY_FILE: &str = "summary.json";

/// Entries beyond this are dropped oldest first.
pub const HISTORY_LIMIT: usize = 100;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub target_dir: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

impl From<&ValidationReport> for HistoryEntry {
    fn from(report: &ValidationReport) -> Self {
        Self {
            timestamp: report.timestamp.clone(),
            target_dir: report.target_dir.clone(),
            total: report.summary.total,
            passed: report.summary.passed,
            failed: report.summary.failed,
            pass_rate: report.summary.pass_rate,
        }
    }
}

impl History {
    /// Load the history in `reports_dir`. A missing file is an empty
    /// history; an unparsable one is logged and started over.
    pub fn load(reports_dir: &Path) -> Result<Self, ValidateError> {
        let path = reports_dir.join(SUMMARY_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ValidateError::io(&path, e)),
        };
        match serde_json::from_str(&text) {
            Ok(history) => Ok(history),
            Err(e) => {
                tracing::warn!(path = %path.display(), "history is corrupt ({e}), starting a new one");
                Ok(Self::default())
            }
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    pub fn save(&self, reports_dir: &Path) -> Result<PathBuf, ValidateError> {
        fs::create_dir_all(reports_dir).map_err(|e| ValidateError::io(reports_dir, e))?;
        let path = reports_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| ValidateError::io(&path, e))?;
        Ok(path)
    }

    /// Target directories in order of first appearance.
    pub fn targets(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.history {
            if !seen.contains(&entry.target_dir.as_str()) {
                seen.push(&entry.target_dir);
            }
        }
        seen
    }

    pub fn runs_for<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a HistoryEntry> + 'a {
        self.history.iter().filter(move |e| e.target_dir == target)
    }

    /// Per-target trend: run count, latest rate, change from the previous
    /// run and a sparkline of every recorded rate.
    pub fn render_trend(&self) -> String {
        if self.history.is_empty() {
            return "no validation runs recorded\n".to_string();
        }
        let mut out = String::new();
        for target in self.targets() {
            let runs: Vec<_> = self.runs_for(target).collect();
            let rates: Vec<f64> = runs.iter().map(|r| r.pass_rate).collect();
            let Some(latest) = runs.last() else { continue };
            let change = match runs.len().checked_sub(2).map(|i| runs[i]) {
                Some(prev) => format_change(latest.pass_rate - prev.pass_rate),
                None => "-".to_string(),
            };
            let _ = writeln!(out, "{target}");
            let _ = writeln!(
                out,
                "  runs: {}  latest: {:.2}% ({}/{})  change: {change}",
                runs.len(),
                latest.pass_rate,
                latest.passed,
                latest.total
            );
            let _ = writeln!(out, "  {}", sparkline(&rates));
        }
        out
    }
}

fn format_change(delta: f64) -> String {
    if delta > 0.0 {
        format!("↑ {delta:.2}%")
    } else if delta < 0.0 {
        format!("↓ {:.2}%", -delta)
    } else {
        "= 0.00%".to_string()
    }
}

/// One bar per percentage in `rates`, scaled to 0..=100.
pub fn sparkline(rates: &[f64]) -> String {
    rates
        .iter()
        .map(|rate| {
            let level = (rate.clamp(0.0, 100.0) / 100.0 * (BARS.len() - 1) as f64).round() as usize;
            BARS[level.min(BARS.len() - 1)]
        })
        .collect()
}

/// Append `report` to the history in `reports_dir` and save it.
pub fn record(reports_dir: &Path, report: &ValidationReport) -> Result<History, ValidateError> {
    let mut history = History::load(reports_dir)?;
    history.push(HistoryEntry::from(report));
    history.save(reports_dir)?;
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(target: &str, rate: f64) -> HistoryEntry {
        HistoryEntry {
            timestamp: "2024-01-01T00:00:00.000Z".into(),
            target_dir: target.into(),
            total: 4,
            passed: (rate / 25.0) as usize,
            failed: 4 - (rate / 25.0) as usize,
            pass_rate: rate,
        }
    }

    #[test]
    fn sparkline_scales_to_percent() {
        assert_eq!(sparkline(&[0.0, 50.0, 100.0]), "▁▅█");
        assert_eq!(sparkline(&[150.0, -3.0]), "█▁");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn push_keeps_last_hundred() {
        let mut history = History::default();
        for i in 0..(HISTORY_LIMIT + 5) {
            let mut e = entry("app", 50.0);
            e.total = i;
            history.push(e);
        }
        assert_eq!(history.history.len(), HISTORY_LIMIT);
        assert_eq!(history.history[0].total, 5);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(History::load(dir.path()).unwrap(), History::default());
    }

    #[test]
    fn corrupt_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SUMMARY_FILE), "{ not json").unwrap();
        let mut history = History::load(dir.path()).unwrap();
        assert!(history.history.is_empty());
        history.push(entry("app", 75.0));
        history.save(dir.path()).unwrap();
        assert_eq!(History::load(dir.path()).unwrap().history.len(), 1);
    }

    #[test]
    fn trend_groups_by_target() {
        let mut history = History::default();
        history.push(entry("a", 50.0));
        history.push(entry("b", 100.0));
        history.push(entry("a", 75.0));
        assert_eq!(history.targets(), vec!["a", "b"]);

        let text = history.render_trend();
        assert!(text.contains("a\n  runs: 2  latest: 75.00% (3/4)  change: ↑ 25.00%\n  ▅▆\n"), "{text}");
        assert!(text.contains("b\n  runs: 1  latest: 100.00% (4/4)  change: -\n  █\n"), "{text}");
    }
}
