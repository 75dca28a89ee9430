// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from lexer and parser errors to `Diagnostic`.

use ets_lexer::{LexError, LexErrorKind};
use ets_parser::{ParseError, ParseErrorKind};

use crate::codes;
use crate::{Diagnostic, ToDiagnostic};

// ============================================================================
// Lex Errors
// ============================================================================

impl ToDiagnostic for LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match self.kind {
            LexErrorKind::UnexpectedChar(_) => (codes::UNEXPECTED_CHAR, "unexpected character"),
            LexErrorKind::UnterminatedString => (codes::UNTERMINATED_STRING, "string starts here"),
            LexErrorKind::UnterminatedTemplate => (codes::UNTERMINATED_TEMPLATE, "template starts here"),
            LexErrorKind::UnterminatedComment => (codes::UNTERMINATED_COMMENT, "comment starts here"),
            LexErrorKind::InvalidEscape => (codes::INVALID_ESCAPE, "invalid escape"),
            LexErrorKind::InvalidNumber => (codes::INVALID_NUMBER, "invalid number"),
            LexErrorKind::TemplateTooDeep => (codes::TEMPLATE_TOO_DEEP, "nested too deeply"),
        };

        let mut diag = Diagnostic::error(&self.message).with_code(code).with_primary(self.span, label);
        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }
        diag
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

impl ToDiagnostic for ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match self.kind {
            ParseErrorKind::MissingTerminator => (codes::MISSING_TERMINATOR, "expected ';' here"),
            ParseErrorKind::AmbiguityExhausted => (codes::AMBIGUITY_EXHAUSTED, "no alternative matches"),
            ParseErrorKind::Syntax if self.expected_token() => (codes::EXPECTED_TOKEN, "expected here"),
            ParseErrorKind::Syntax if self.expected.is_some() => (codes::UNEXPECTED_TOKEN, "unexpected"),
            ParseErrorKind::Syntax => (codes::INVALID_SYNTAX, "here"),
        };

        let mut diag = Diagnostic::error(&self.message).with_code(code).with_primary(self.span, label);
        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }
        if self.kind == ParseErrorKind::MissingTerminator {
            diag = diag.with_suggestion(self.span, ";");
        }
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_codes(src: &str) -> Vec<String> {
        ets_parser::parse_source(src)
            .errors
            .iter()
            .filter_map(|e| e.to_diagnostic().code.map(|c| c.0))
            .collect()
    }

    #[test]
    fn lexical_codes_follow_the_error_kind() {
        let result = ets_lexer::Lexer::new("let s = 'open").tokenize();
        let diag = result.errors[0].to_diagnostic();
        assert_eq!(diag.code_str(), Some("E0002"));
        assert!(diag.help.is_some());
    }

    #[test]
    fn syntax_codes() {
        assert_eq!(parse_codes("let y = foo(1, 2;"), vec!["E0101"]);
        assert_eq!(parse_codes("let x = ;"), vec!["E0100"]);
        assert_eq!(parse_codes("@Component interface I {}"), vec!["E0102"]);
        assert_eq!(parse_codes("let x = 1"), vec!["E0103"]);
    }

    #[test]
    fn missing_terminator_suggests_semicolon() {
        let parse = ets_parser::parse_source("let x = 1");
        let diag = parse.errors[0].to_diagnostic();
        let suggestion = diag.help.and_then(|h| h.suggestion).unwrap();
        assert_eq!(suggestion.replacement, ";");
        assert_eq!(suggestion.span.start, 9);
    }
}
