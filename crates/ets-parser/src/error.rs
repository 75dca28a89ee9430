// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parse errors.

use ets_ast::token::TokenKind;
use ets_ast::Span;

/// Broad class of a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Unexpected token or unmatched delimiter.
    #[error("syntax error")]
    Syntax,
    /// A required `;` is absent. Tolerated in compatibility mode.
    #[error("missing terminator")]
    MissingTerminator,
    /// Every ranked alternative at a position failed.
    #[error("no alternative matched")]
    AmbiguityExhausted,
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
    /// What the parser was looking for, when the error is a mismatch.
    pub expected: Option<String>,
}

impl ParseError {
    pub(crate) fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { kind: ParseErrorKind::Syntax, span, message, hint, expected: Some(expected.to_string()) }
    }

    pub(crate) fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self { kind: ParseErrorKind::Syntax, span, message: message.into(), hint: None, expected: None }
    }

    /// Zero-width error at the end of the token that should have been
    /// followed by `;`.
    pub(crate) fn missing_terminator(at: usize) -> Self {
        Self {
            kind: ParseErrorKind::MissingTerminator,
            span: Span::point(at),
            message: "Missing ';' after statement".to_string(),
            hint: Some("the target compiler inserts it automatically; add ';' for strict mode".to_string()),
            expected: Some("';'".to_string()),
        }
    }

    pub(crate) fn ambiguity(what: &str, found: &TokenKind, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::AmbiguityExhausted,
            span,
            message: format!("Expected {}, found {}", what, found.display_name()),
            hint: Some(format!("no form of {} matches here", what)),
            expected: Some(what.to_string()),
        }
    }

    pub(crate) fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_missing_terminator(&self) -> bool {
        self.kind == ParseErrorKind::MissingTerminator
    }

    /// Whether a specific token, rather than a construct, was expected.
    pub fn expected_token(&self) -> bool {
        self.expected.as_deref().is_some_and(|e| e.starts_with('\''))
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "'{'" => format!("Expected '{{' to start block, found {}", found.display_name()),
        "'}'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '{' - missing '}'".to_string()
            } else {
                format!("Expected '}}' to close block, found {}", found.display_name())
            }
        }
        "')'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '(' - missing ')'".to_string()
            } else {
                format!("Expected ')', found {}", found.display_name())
            }
        }
        "']'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '[' - missing ']'".to_string()
            } else {
                format!("Expected ']', found {}", found.display_name())
            }
        }
        "a name" | "identifier" => format!("Expected name, found {}", found.display_name()),
        "expression" => format!("Expected expression, found {}", found.display_name()),
        "type" => format!("Expected type, found {}", found.display_name()),
        "declaration" => format!("Expected declaration, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
