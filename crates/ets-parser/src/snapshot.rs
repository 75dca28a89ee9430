// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Speculative parsing.
//!
//! Ambiguous positions are resolved by trying productions in a fixed order.
//! A trial runs from a [`ParserSnapshot`]; if it fails or records any error
//! the parser is put back exactly as it was, node-id counter included, so
//! rolled-back attempts leave no trace in the final tree.

use crate::error::ParseError;
use crate::parser::Parser;

/// Everything a trial parse can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParserSnapshot {
    pos: usize,
    pending_gt: u8,
    error_count: usize,
    next_node_id: u32,
}

/// An ordered alternative for [`Parser::first_of`].
pub(crate) type Alternative<T> = fn(&mut Parser) -> Result<T, ParseError>;

impl Parser {
    pub(crate) fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            pos: self.pos,
            pending_gt: self.pending_gt,
            error_count: self.errors.len(),
            next_node_id: self.next_node_id,
        }
    }

    /// Roll back to `snapshot`. An aborted parse stays where it stopped.
    pub(crate) fn restore(&mut self, snapshot: ParserSnapshot) {
        if self.aborted {
            return;
        }
        self.pos = snapshot.pos;
        self.pending_gt = snapshot.pending_gt;
        self.errors.truncate(snapshot.error_count);
        self.next_node_id = snapshot.next_node_id;
    }

    /// Run `f` as a trial. The result is kept only if `f` succeeds without
    /// recording errors; otherwise the parser is rolled back.
    pub(crate) fn speculate<T>(
        &mut self,
        what: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Option<T> {
        let snapshot = self.snapshot();
        match f(self) {
            Ok(value) if self.errors.len() == snapshot.error_count => {
                tracing::trace!(what, pos = snapshot.pos, "speculation committed");
                Some(value)
            }
            _ => {
                tracing::trace!(what, pos = snapshot.pos, "speculation rolled back");
                self.restore(snapshot);
                None
            }
        }
    }

    /// Answer a question about the upcoming tokens without consuming any.
    pub(crate) fn look_ahead(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let snapshot = self.snapshot();
        let answer = f(self);
        self.restore(snapshot);
        answer
    }

    /// Ranked choice: the first alternative that parses cleanly wins.
    ///
    /// When every alternative fails the error points at the position where
    /// the choice started.
    pub(crate) fn first_of<T>(
        &mut self,
        what: &'static str,
        alternatives: &[Alternative<T>],
    ) -> Result<T, ParseError> {
        for alternative in alternatives {
            if let Some(value) = self.speculate(what, |p| alternative(p)) {
                return Ok(value);
            }
        }
        Err(ParseError::ambiguity(what, self.current_kind(), self.current().span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use ets_ast::token::TokenKind;
    use ets_ast::Span;

    fn parser(src: &str) -> Parser {
        Parser::new(ets_lexer::Lexer::new(src).tokenize().tokens)
    }

    #[test]
    fn failed_speculation_restores_everything() {
        let mut p = parser("a b c");
        let before = p.snapshot();
        let result: Option<()> = p.speculate("test", |p| {
            p.advance();
            p.next_id();
            p.record_error(ParseError::syntax("boom", Span::point(0)));
            Ok(())
        });
        assert!(result.is_none());
        assert_eq!(p.snapshot(), before);
        assert!(p.errors.is_empty());
    }

    #[test]
    fn clean_speculation_commits() {
        let mut p = parser("a b c");
        let name = p.speculate("test", |p| p.expect_ident());
        assert_eq!(name.as_deref(), Some("a"));
        assert!(p.check_word("b"));
    }

    #[test]
    fn look_ahead_never_moves() {
        let mut p = parser("a b");
        assert!(p.look_ahead(|p| {
            p.advance();
            p.check_word("b")
        }));
        assert!(p.check_word("a"));
    }

    #[test]
    fn first_of_takes_alternatives_in_order() {
        fn number(p: &mut Parser) -> Result<&'static str, ParseError> {
            p.expect(&TokenKind::Number(0.0)).map(|_| "number")
        }
        fn name(p: &mut Parser) -> Result<&'static str, ParseError> {
            p.expect_ident().map(|_| "name")
        }

        let mut p = parser("x");
        assert_eq!(p.first_of("atom", &[number, name]).ok(), Some("name"));

        let mut p = parser("(");
        let err = p.first_of("atom", &[number, name]).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::AmbiguityExhausted);
        assert_eq!(err.span, Span::new(0, 1));
    }
}
