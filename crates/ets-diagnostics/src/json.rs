// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON diagnostic output for machine consumption.
//!
//! Each diagnostic carries its code, category, 1-based line/column
//! locations, the source line and any concrete fix. Use `--format json`
//! with `ets parse`, `ets check` or `ets lint`.

use serde::Serialize;

use ets_ast::LineMap;

use crate::codes::ErrorCodeRegistry;
use crate::{Diagnostic, LabelStyle, Severity};

/// A complete JSON diagnostic report for one file.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Schema version for forward compatibility.
    pub version: u32,
    pub file: String,
    /// No errors. Warnings do not count.
    pub success: bool,
    /// The stage that produced these diagnostics (`parse`, `check`, ...).
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

/// A single diagnostic in JSON form, enriched with source context.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Registry category (`Lexical`, `Syntax`, `Lint`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<JsonSuggestion>,
}

/// Primary location, 1-based.
#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
    pub source_line: String,
}

#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub role: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: LineCol,
    pub end: LineCol,
}

/// Line/column pair (1-based).
#[derive(Debug, Serialize)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonSuggestion {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
    /// The full line after applying the fix.
    pub result_line: String,
}

/// Build a report for `diagnostics` found in `source`.
pub fn to_json_report(diagnostics: &[Diagnostic], source: &str, file: &str, phase: &str) -> DiagnosticReport {
    let registry = ErrorCodeRegistry::default();
    let ctx = Context { source, line_map: LineMap::new(source) };

    let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let warning_count = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();

    DiagnosticReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics: diagnostics.iter().map(|d| ctx.convert(d, &registry)).collect(),
        error_count,
        warning_count,
    }
}

/// Serialize a report to pretty JSON.
pub fn to_json_string(report: &DiagnosticReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

struct Context<'a> {
    source: &'a str,
    line_map: LineMap,
}

impl Context<'_> {
    fn line_col(&self, offset: usize) -> LineCol {
        let (line, column) = self.line_map.offset_to_line_col(offset);
        LineCol { line: line as usize, column: column as usize, byte_offset: offset }
    }

    fn line_text(&self, line: usize) -> &str {
        self.line_map.line_text(self.source, line as u32).unwrap_or("")
    }

    fn convert(&self, diag: &Diagnostic, registry: &ErrorCodeRegistry) -> JsonDiagnostic {
        let code = diag.code_str().map(str::to_string);
        let category = diag.code_str().and_then(|c| registry.get(c)).map(|info| info.category.to_string());

        let location = diag.primary_span().map(|span| {
            let at = self.line_col(span.start);
            SourceLocation {
                line: at.line,
                column: at.column,
                byte_offset: span.start,
                source_line: self.line_text(at.line).to_string(),
            }
        });

        let labels = diag
            .labels
            .iter()
            .map(|l| JsonLabel {
                role: l.style,
                message: l.message.clone(),
                start: self.line_col(l.span.start),
                end: self.line_col(l.span.end),
            })
            .collect();

        let suggestion = diag.help.as_ref().and_then(|h| h.suggestion.as_ref()).map(|s| {
            let at = self.line_col(s.span.start);
            let line = self.line_text(at.line);
            let split = (at.column - 1).min(line.len());
            let rest = (split + s.span.len()).min(line.len());
            let result_line = format!(
                "{}{}{}",
                line.get(..split).unwrap_or(line),
                s.replacement,
                line.get(rest..).unwrap_or("")
            );
            JsonSuggestion { start: s.span.start, end: s.span.end, replacement: s.replacement.clone(), result_line }
        });

        JsonDiagnostic {
            severity: diag.severity,
            code,
            category,
            message: diag.message.clone(),
            location,
            labels,
            notes: diag.notes.clone(),
            help: diag.help.as_ref().map(|h| h.message.clone()),
            suggestion,
        }
    }
}
