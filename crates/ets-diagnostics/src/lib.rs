// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! ETS front-end diagnostics.
//!
//! Provides a unified diagnostic type that the CLI, the lint pass and the
//! validation harness all consume. Lexer and parser errors are converted to
//! `Diagnostic` via the `ToDiagnostic` trait, keeping those crates free of
//! rendering concerns.

pub mod codes;
pub mod convert;
pub mod formatter;
pub mod json;
pub mod suggestions;

use ets_ast::Span;
use ets_parser::SourceParse;
use serde::Serialize;

// ============================================================================
// Core Types
// ============================================================================

/// A diagnostic with rich context for display.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Option<Help>,
}

/// A labeled source span within a diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct Label {
    pub span: Span,
    pub style: LabelStyle,
    pub message: Option<String>,
}

/// How a label should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// Primary error location (red underline).
    Primary,
    /// Related location (blue underline).
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// An error code like E0103.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorCode(pub String);

/// Actionable help attached to a diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct Help {
    pub message: String,
    pub suggestion: Option<CodeSuggestion>,
}

/// A concrete code change suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct CodeSuggestion {
    pub span: Span,
    pub replacement: String,
}

// ============================================================================
// Builder API
// ============================================================================

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(ErrorCode(code.into()));
        self
    }

    pub fn with_label(mut self, span: Span, style: LabelStyle, msg: impl Into<String>) -> Self {
        self.labels.push(Label { span, style, message: Some(msg.into()) });
        self
    }

    pub fn with_primary(self, span: Span, msg: impl Into<String>) -> Self {
        self.with_label(span, LabelStyle::Primary, msg)
    }

    pub fn with_secondary(self, span: Span, msg: impl Into<String>) -> Self {
        self.with_label(span, LabelStyle::Secondary, msg)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(Help { message: help.into(), suggestion: None });
        self
    }

    pub fn with_suggestion(mut self, span: Span, replacement: impl Into<String>) -> Self {
        if let Some(ref mut help) = self.help {
            help.suggestion = Some(CodeSuggestion { span, replacement: replacement.into() });
        }
        self
    }

    /// Returns the primary span (first primary label, or first label).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|l| l.style == LabelStyle::Primary)
            .or(self.labels.first())
            .map(|l| l.span)
    }

    pub fn code_str(&self) -> Option<&str> {
        self.code.as_ref().map(|c| c.0.as_str())
    }

    /// A `;` the target compiler would insert on its own.
    pub fn is_missing_terminator(&self) -> bool {
        self.code_str() == Some(codes::MISSING_TERMINATOR)
    }
}

// ============================================================================
// Conversion Trait
// ============================================================================

/// Convert a front-end error into a rich diagnostic.
pub trait ToDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic;
}

/// Every diagnostic for one parsed source: lexical errors first, then
/// syntax errors, each group in source order of discovery.
pub fn collect(parse: &SourceParse) -> Vec<Diagnostic> {
    parse
        .lex_errors
        .iter()
        .map(ToDiagnostic::to_diagnostic)
        .chain(parse.errors.iter().map(ToDiagnostic::to_diagnostic))
        .collect()
}

/// Whether every diagnostic in `diagnostics` is a missing terminator.
///
/// True for an empty list.
pub fn only_missing_terminators(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().all(Diagnostic::is_missing_terminator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collect_orders_lexical_before_syntax() {
        let parse = ets_parser::parse_source("let a = #;\nlet b = (1;\n");
        let diags = collect(&parse);
        assert!(diags.len() >= 2);
        assert_eq!(diags[0].code_str(), Some("E0001"));
        assert!(diags[1..].iter().all(|d| d.code_str().is_some_and(|c| c.starts_with("E01"))));
    }

    #[test]
    fn missing_terminators_are_recognized() {
        let parse = ets_parser::parse_source("let x = { a: 1, b: 2 }");
        let diags = collect(&parse);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].is_missing_terminator());
        assert!(only_missing_terminators(&diags));
        assert!(only_missing_terminators(&[]));
    }

    #[test]
    fn primary_span_prefers_primary_label() {
        let diag = Diagnostic::error("x")
            .with_secondary(Span::new(0, 1), "first")
            .with_primary(Span::new(4, 6), "here");
        assert_eq!(diag.primary_span(), Some(Span::new(4, 6)));
    }

    #[test]
    fn suggestion_needs_help() {
        let diag = Diagnostic::error("x").with_suggestion(Span::new(0, 1), ";");
        assert!(diag.help.is_none());
        let diag = Diagnostic::error("x").with_help("add it").with_suggestion(Span::point(3), ";");
        assert_eq!(diag.help.and_then(|h| h.suggestion).map(|s| s.replacement), Some(";".to_string()));
    }
}
