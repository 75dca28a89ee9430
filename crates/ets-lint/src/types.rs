// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Output types for `ets lint`.

use ets_ast::Span;
use serde::Serialize;

/// Complete lint report for a file.
#[derive(Debug, Serialize)]
pub struct LintReport {
    pub version: u32,
    pub file: String,
    pub success: bool,
    pub diagnostics: Vec<LintDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

/// A single lint finding.
#[derive(Debug, Serialize)]
pub struct LintDiagnostic {
    pub rule: String,
    /// E09xx
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub location: LintLocation,
    pub fix: String,
}

/// Source location.
#[derive(Debug, Serialize)]
pub struct LintLocation {
    pub line: usize,
    pub column: usize,
    pub source_line: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Options for lint.
#[derive(Debug, Default, Clone)]
pub struct LintOpts {
    /// Include rules matching these patterns (e.g. "component/*")
    pub rules: Vec<String>,
    /// Exclude rules matching these patterns
    pub excludes: Vec<String>,
    /// Project decorators accepted in addition to the framework ones
    pub extra_decorators: Vec<String>,
}
