// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser state, token navigation and top-level error recovery.
//!
//! The grammar itself lives in [`crate::grammar`]; every production is an
//! `impl Parser` method over the state defined here.

use ets_ast::decl::{Decl, DeclKind};
use ets_ast::token::{Token, TokenKind};
use ets_ast::{Module, NodeId, Span};

use crate::error::ParseError;

/// Maximum number of errors to collect before stopping.
pub const MAX_ERRORS: usize = 64;

/// Deepest nesting of expressions, statements, UI bodies and types accepted.
pub const MAX_DEPTH: usize = 256;

/// Stack left before a nested production switches to a fresh segment.
const RED_ZONE: usize = 100 * 1024;

/// Size of each fresh stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// The parser for ETS source code.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    /// `>` halves still owed after splitting `>>` or `>>>` in a generic list
    pub(crate) pending_gt: u8,
    /// Collected errors during parsing
    pub(crate) errors: Vec<ParseError>,
    /// Counter for generating unique NodeIds
    pub(crate) next_node_id: u32,
    /// For each opening bracket, the index of its matching closer.
    closers: Vec<Option<usize>>,
    /// Productions currently open through [`Parser::nested`]
    pub(crate) depth: usize,
    /// Set once the nesting limit is hit; nothing more is parsed or rolled back.
    pub(crate) aborted: bool,
}

/// Result of parsing: the module plus any errors found.
#[derive(Debug)]
pub struct ParseResult {
    pub module: Module,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_node_ids(tokens, 0)
    }

    /// Parser over a template substitution, continuing the caller's ids.
    pub(crate) fn with_node_ids(mut tokens: Vec<Token>, next_node_id: u32) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::eof(end));
        }
        let closers = match_brackets(&tokens);
        Self { tokens, pos: 0, pending_gt: 0, errors: Vec::new(), next_node_id, closers, depth: 0, aborted: false }
    }

    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Record error, return if should continue.
    ///
    /// Reaching [`MAX_ERRORS`] moves the cursor to end of input so every
    /// production unwinds with what it has.
    pub(crate) fn record_error(&mut self, error: ParseError) -> bool {
        if self.aborted || self.errors.len() >= MAX_ERRORS {
            return false;
        }
        self.errors.push(error);
        if self.errors.len() >= MAX_ERRORS {
            tracing::debug!(limit = MAX_ERRORS, "error limit reached, stopping");
            self.pos = self.tokens.len() - 1;
            self.pending_gt = 0;
            return false;
        }
        true
    }

    /// Run one level of recursive descent.
    ///
    /// Past [`MAX_DEPTH`] the production fails with a syntax error instead
    /// of recursing, and the rest of the file is abandoned. Below it the
    /// stack grows on demand, so a file nested close to the limit still
    /// parses on a small worker-thread stack.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH || self.aborted {
            let error = ParseError::syntax("maximum nesting depth exceeded", self.current().span);
            if !self.aborted {
                tracing::debug!(limit = MAX_DEPTH, pos = self.pos, "nesting limit reached, stopping");
                if self.errors.len() < MAX_ERRORS {
                    self.errors.push(error.clone());
                }
                self.abort();
            }
            return Err(error);
        }
        self.depth += 1;
        let result = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || f(self));
        self.depth -= 1;
        result
    }

    /// Stop parsing: the cursor moves to end of input and stays there.
    pub(crate) fn abort(&mut self) {
        self.aborted = true;
        self.pos = self.tokens.len() - 1;
        self.pending_gt = 0;
    }

    // =========================================================================
    // Entry point
    // =========================================================================

    /// Parse a whole file.
    pub fn parse(&mut self) -> ParseResult {
        let mut decls = Vec::new();

        while !self.at_end() {
            if self.match_token(&TokenKind::Semi) {
                continue;
            }
            let start_pos = self.pos;
            match self.parse_decl() {
                Ok(decl) => decls.push(decl),
                Err(e) => {
                    let message = e.message.clone();
                    if !self.record_error(e) {
                        let start = self.tokens[start_pos].span.start;
                        decls.push(Decl {
                            id: self.next_id(),
                            kind: DeclKind::Error(message),
                            span: Span::new(start, self.current().span.end.max(start)),
                        });
                        break;
                    }
                    decls.push(self.recover_decl(start_pos, message));
                }
            }
        }

        let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
        ParseResult {
            module: Module { decls, span: Span::new(0, end) },
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Skip a malformed declaration and stand an Error node in for it.
    ///
    /// The skipped text runs from the declaration's first token through the
    /// next balanced `}` or `;`, or up to the next declaration keyword at
    /// depth zero.
    fn recover_decl(&mut self, start_pos: usize, message: String) -> Decl {
        self.pos = start_pos;
        self.pending_gt = 0;
        let start = self.current().span.start;
        let mut depth = 0usize;

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    let is_brace = self.check(&TokenKind::RBrace);
                    self.advance();
                    if depth > 0 {
                        depth -= 1;
                        if depth == 0 && is_brace {
                            break;
                        }
                    }
                }
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    break;
                }
                kind if depth == 0 && self.pos > start_pos && kind.starts_declaration() => break,
                _ => {
                    self.advance();
                }
            }
        }

        tracing::trace!(start, end = self.prev_end(), "skipped malformed declaration");
        Decl { id: self.next_id(), kind: DeclKind::Error(message), span: self.span_from(start) }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    pub(crate) fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Consume the current token and return it. At end of input the `Eof`
    /// token is returned and nothing moves.
    pub(crate) fn advance(&mut self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        if !self.at_end() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.error_expected(kind.display_name()))
        }
    }

    pub(crate) fn error_expected(&self, expected: &str) -> ParseError {
        ParseError::expected(expected, self.current_kind(), self.current().span)
    }

    pub(crate) fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error_expected("a name")),
        }
    }

    /// Identifier or reserved word, for property and member names
    /// (`obj.default`, `{ delete: 1 }`).
    pub(crate) fn expect_name(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        match self.current_kind().keyword_str() {
            Some(kw) => {
                self.advance();
                Ok(kw.to_string())
            }
            None => Err(self.error_expected("a name")),
        }
    }

    pub(crate) fn expect_string(&mut self) -> Result<String, ParseError> {
        match self.current_kind() {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(self.error_expected("a module path string")),
        }
    }

    pub(crate) fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Whether the current token is the contextual word `word`.
    pub(crate) fn check_word(&self, word: &str) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(name) if name == word)
    }

    pub(crate) fn match_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        if self.match_word(word) {
            Ok(())
        } else {
            Err(self.error_expected(&format!("'{word}'")))
        }
    }

    pub(crate) fn peek_word(&self, n: usize, word: &str) -> bool {
        matches!(self.peek(n), TokenKind::Ident(name) if name == word)
    }

    /// Whether the token `n` ahead can name a property or member.
    pub(crate) fn peek_is_name(&self, n: usize) -> bool {
        let kind = self.peek(n);
        matches!(kind, TokenKind::Ident(_)) || kind.keyword_str().is_some()
    }

    /// End offset of the last consumed token.
    pub(crate) fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(tok) => tok.span.end,
            None => self.current().span.start,
        }
    }

    pub(crate) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    /// Index of the token closing the bracket at `open`, if balanced.
    pub(crate) fn closer_of(&self, open: usize) -> Option<usize> {
        self.closers.get(open).copied().flatten()
    }

    /// Kind of the token right after the closer of the bracket at `open`.
    pub(crate) fn after_closer(&self, open: usize) -> Option<&TokenKind> {
        let close = self.closer_of(open)?;
        self.tokens.get(close + 1).map(|t| &t.kind)
    }

    /// Source text of a bracketed binding pattern, consumed whole.
    pub(crate) fn take_bracketed_text(&mut self) -> Result<String, ParseError> {
        let Some(close) = self.closer_of(self.pos) else {
            return Err(self.error_expected("a name"));
        };
        let text: String = self.tokens[self.pos..=close].iter().map(|t| t.lexeme.as_str()).collect();
        self.pos = close + 1;
        Ok(text)
    }

    // =========================================================================
    // Generics and terminators
    // =========================================================================

    /// Expect a `>` closing a generic list, splitting `>>` and `>>>`.
    pub(crate) fn expect_gt_in_generic(&mut self) -> Result<(), ParseError> {
        if self.pending_gt > 0 {
            self.pending_gt -= 1;
            return Ok(());
        }
        match self.current_kind() {
            TokenKind::Gt => {
                self.advance();
                Ok(())
            }
            TokenKind::GtGt => {
                self.advance();
                self.pending_gt = 1;
                Ok(())
            }
            TokenKind::GtGtGt => {
                self.advance();
                self.pending_gt = 2;
                Ok(())
            }
            _ => Err(self.error_expected("'>'")),
        }
    }

    /// Consume a required `;`.
    ///
    /// A missing one is recorded as a [`MissingTerminator`] error and parsing
    /// continues in place. Nothing is reported right after a lexical error
    /// token, which already carries its own error.
    ///
    /// [`MissingTerminator`]: crate::ParseErrorKind::MissingTerminator
    pub(crate) fn expect_semi(&mut self) {
        if self.match_token(&TokenKind::Semi) {
            return;
        }
        let after_lex_error = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .is_some_and(|t| matches!(t.kind, TokenKind::Error));
        if after_lex_error {
            return;
        }
        let at = self.prev_end();
        self.record_error(ParseError::missing_terminator(at));
    }
}

/// Pair every opening bracket with its closer.
///
/// Only the innermost open bracket can be closed; a mismatched closer is
/// ignored and leaves its opener unmatched.
fn match_brackets(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut closers = vec![None; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (i, tok) in tokens.iter().enumerate() {
        match tok.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => stack.push(i),
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                let Some(&open) = stack.last() else { continue };
                let pairs = matches!(
                    (&tokens[open].kind, &tok.kind),
                    (TokenKind::LParen, TokenKind::RParen)
                        | (TokenKind::LBracket, TokenKind::RBracket)
                        | (TokenKind::LBrace, TokenKind::RBrace)
                );
                if pairs {
                    stack.pop();
                    closers[open] = Some(i);
                }
            }
            _ => {}
        }
    }
    closers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        ets_lexer::Lexer::new(src).tokenize().tokens
    }

    #[test]
    fn bracket_table_pairs_nested_brackets() {
        let toks = tokens("f((a), [b]) { }");
        let closers = match_brackets(&toks);
        // f ( ( a ) , [ b ] ) { }
        assert_eq!(closers[1], Some(9));
        assert_eq!(closers[2], Some(4));
        assert_eq!(closers[6], Some(8));
        assert_eq!(closers[10], Some(11));
        assert_eq!(closers[0], None);
    }

    #[test]
    fn mismatched_closer_leaves_opener_unmatched() {
        let toks = tokens("( ]");
        let closers = match_brackets(&toks);
        assert_eq!(closers[0], None);
    }

    #[test]
    fn split_shift_in_generic_close() {
        let mut p = Parser::new(tokens(">> x"));
        assert!(p.expect_gt_in_generic().is_ok());
        assert_eq!(p.pending_gt, 1);
        assert!(p.expect_gt_in_generic().is_ok());
        assert_eq!(p.pending_gt, 0);
        assert!(p.check_word("x"));
    }

    #[test]
    fn missing_semicolon_consumes_nothing() {
        let mut p = Parser::new(tokens("a b"));
        p.advance();
        p.expect_semi();
        assert_eq!(p.errors.len(), 1);
        assert!(p.errors[0].is_missing_terminator());
        assert_eq!(p.errors[0].span, Span::point(1));
        assert!(p.check_word("b"));
    }

    #[test]
    fn error_limit_stops_the_parser() {
        let mut p = Parser::new(tokens("a b c"));
        for _ in 0..MAX_ERRORS - 1 {
            assert!(p.record_error(ParseError::syntax("x", Span::point(0))));
        }
        assert!(!p.record_error(ParseError::syntax("x", Span::point(0))));
        assert!(p.at_end());
        assert!(!p.record_error(ParseError::syntax("x", Span::point(0))));
        assert_eq!(p.errors.len(), MAX_ERRORS);
    }

    #[test]
    fn empty_input_gets_eof() {
        let mut p = Parser::new(Vec::new());
        assert!(p.at_end());
        let result = p.parse();
        assert!(result.is_ok());
        assert!(result.module.decls.is_empty());
    }
}
