// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use ets_ast::token::{TemplatePart, Token, TokenKind};
use ets_ast::Span;
use logos::{Filter, Logos};

use crate::scan::{self, ScanError};

/// Deepest allowed nesting of template literals inside substitutions.
pub const MAX_TEMPLATE_DEPTH: usize = 32;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 64;

/// How far a template literal could be scanned.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TemplateScan {
    Closed,
    Unterminated,
    TooDeep,
}

/// Raw token type for logos - values are cooked in a second pass.
///
/// `extras` holds the template nesting depth of the text being lexed.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = usize)]
#[logos(skip r"[ \t\r\n\f\x0B\x{00A0}\x{FEFF}]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    // === Keywords ===
    #[token("import")]
    Import,
    #[token("export")]
    Export,
    #[token("default")]
    Default,
    #[token("function")]
    Function,
    #[token("class")]
    Class,
    #[token("struct")]
    Struct,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("const")]
    Const,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("throw")]
    Throw,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("new")]
    New,
    #[token("typeof")]
    Typeof,
    #[token("void")]
    Void,
    #[token("delete")]
    Delete,
    #[token("instanceof")]
    Instanceof,
    #[token("this")]
    This,
    #[token("super")]
    Super,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!=")]
    BangEq,
    #[token("!==")]
    BangEqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("??")]
    QuestionQuestion,
    #[token("?.")]
    QuestionDot,
    /// `a?.5:1` is a conditional over `.5`, not an optional chain. The
    /// longer match wins over `?.` and is split when cooked.
    #[regex(r"\?\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    QuestionFraction,
    #[token(".")]
    Dot,
    #[token("...")]
    DotDotDot,
    #[token("=>")]
    FatArrow,
    #[token("@")]
    At,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token(">>>")]
    GtGtGt,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("**=")]
    StarStarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    LtLtEq,
    #[token(">>=")]
    GtGtEq,
    #[token(">>>=")]
    GtGtGtEq,
    #[token("&&=")]
    AmpAmpEq,
    #[token("||=")]
    PipePipeEq,
    #[token("??=")]
    QuestionQuestionEq,

    // === Delimiters ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    HexNumber,
    #[regex(r"0[oO][0-7][0-7_]*")]
    OctNumber,
    #[regex(r"0[bB][01][01_]*")]
    BinNumber,
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    DecNumber,
    /// `true` when the closing quote was found on the same line.
    #[token("\"", string_literal)]
    #[token("'", string_literal)]
    Str(bool),
    #[token("`", template_literal)]
    Template(TemplateScan),
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    /// `/*` without a closing `*/`; closed comments are skipped.
    #[token("/*", block_comment)]
    UnterminatedComment,
}

fn string_literal(lexer: &mut logos::Lexer<RawToken>) -> bool {
    let quote = lexer.slice().as_bytes()[0];
    match scan::string_body(lexer.remainder(), quote) {
        Ok(len) => {
            lexer.bump(len);
            true
        }
        Err(len) => {
            lexer.bump(len);
            false
        }
    }
}

fn template_literal(lexer: &mut logos::Lexer<RawToken>) -> TemplateScan {
    let rest = lexer.remainder();
    match scan::template_body(rest, lexer.extras) {
        Ok(len) => {
            lexer.bump(len);
            TemplateScan::Closed
        }
        Err(e) => {
            lexer.bump(scan::line_len(rest));
            match e {
                ScanError::Unterminated => TemplateScan::Unterminated,
                ScanError::TooDeep => TemplateScan::TooDeep,
            }
        }
    }
}

/// Skip a closed block comment; an unclosed one becomes a token that runs
/// to the end of its line.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) -> Filter<()> {
    let rest = lexer.remainder();
    match rest.find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            Filter::Skip
        }
        None => {
            lexer.bump(scan::line_len(rest));
            Filter::Emit(())
        }
    }
}

/// The lexer for ETS source code.
pub struct Lexer<'a> {
    source: &'a str,
    /// Absolute position of `source` in the file (non-zero for template
    /// substitutions).
    offset: usize,
    depth: usize,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self::nested(source, 0, 0)
    }

    fn nested(source: &'a str, offset: usize, depth: usize) -> Self {
        Self { source, offset, depth, errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    ///
    /// The token list always ends with `Eof`.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut raw_lexer = RawToken::lexer_with_extras(self.source, self.depth);

        while let Some(result) = raw_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let range = raw_lexer.span();
            let slice = raw_lexer.slice();
            let span = Span::new(self.offset + range.start, self.offset + range.end);

            let kind = match result {
                Ok(RawToken::QuestionFraction) => {
                    tokens.push(Token::new(TokenKind::Question, &slice[..1], Span::new(span.start, span.start + 1)));
                    let number_span = Span::new(span.start + 1, span.end);
                    let number = self.convert_token(RawToken::QuestionFraction, &slice[1..], number_span);
                    tokens.push(Token::new(number, &slice[1..], number_span));
                    continue;
                }
                Ok(raw) => self.convert_token(raw, slice, span),
                Err(()) => {
                    // Continuation bytes of a character already reported
                    // are not char boundaries and are skipped silently.
                    if let Some(ch) = self.source.get(range.start..).and_then(|s| s.chars().next()) {
                        self.errors.push(LexError::unexpected_char(ch, span.start));
                    }
                    continue;
                }
            };

            tokens.push(Token::new(kind, slice, span));
        }

        tokens.push(Token::eof(self.offset + self.source.len()));

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Convert a raw logos token to our TokenKind, cooking literal values.
    fn convert_token(&mut self, raw: RawToken, slice: &str, span: Span) -> TokenKind {
        match raw {
            // Keywords
            RawToken::Import => TokenKind::Import,
            RawToken::Export => TokenKind::Export,
            RawToken::Default => TokenKind::Default,
            RawToken::Function => TokenKind::Function,
            RawToken::Class => TokenKind::Class,
            RawToken::Struct => TokenKind::Struct,
            RawToken::Interface => TokenKind::Interface,
            RawToken::Enum => TokenKind::Enum,
            RawToken::Extends => TokenKind::Extends,
            RawToken::Implements => TokenKind::Implements,
            RawToken::Const => TokenKind::Const,
            RawToken::Let => TokenKind::Let,
            RawToken::Var => TokenKind::Var,
            RawToken::If => TokenKind::If,
            RawToken::Else => TokenKind::Else,
            RawToken::For => TokenKind::For,
            RawToken::In => TokenKind::In,
            RawToken::While => TokenKind::While,
            RawToken::Return => TokenKind::Return,
            RawToken::Break => TokenKind::Break,
            RawToken::Continue => TokenKind::Continue,
            RawToken::Throw => TokenKind::Throw,
            RawToken::Try => TokenKind::Try,
            RawToken::Catch => TokenKind::Catch,
            RawToken::Finally => TokenKind::Finally,
            RawToken::New => TokenKind::New,
            RawToken::Typeof => TokenKind::Typeof,
            RawToken::Void => TokenKind::Void,
            RawToken::Delete => TokenKind::Delete,
            RawToken::Instanceof => TokenKind::Instanceof,
            RawToken::This => TokenKind::This,
            RawToken::Super => TokenKind::Super,
            RawToken::True => TokenKind::Bool(true),
            RawToken::False => TokenKind::Bool(false),
            RawToken::Null => TokenKind::Null,

            // Operators
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::StarStar => TokenKind::StarStar,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::Eq => TokenKind::Eq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::EqEqEq => TokenKind::EqEqEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::BangEqEq => TokenKind::BangEqEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Question => TokenKind::Question,
            RawToken::QuestionQuestion => TokenKind::QuestionQuestion,
            RawToken::QuestionDot => TokenKind::QuestionDot,
            RawToken::Dot => TokenKind::Dot,
            RawToken::DotDotDot => TokenKind::DotDotDot,
            RawToken::FatArrow => TokenKind::FatArrow,
            RawToken::At => TokenKind::At,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::LtLt => TokenKind::LtLt,
            RawToken::GtGt => TokenKind::GtGt,
            RawToken::GtGtGt => TokenKind::GtGtGt,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::StarStarEq => TokenKind::StarStarEq,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::PercentEq => TokenKind::PercentEq,
            RawToken::AmpEq => TokenKind::AmpEq,
            RawToken::PipeEq => TokenKind::PipeEq,
            RawToken::CaretEq => TokenKind::CaretEq,
            RawToken::LtLtEq => TokenKind::LtLtEq,
            RawToken::GtGtEq => TokenKind::GtGtEq,
            RawToken::GtGtGtEq => TokenKind::GtGtGtEq,
            RawToken::AmpAmpEq => TokenKind::AmpAmpEq,
            RawToken::PipePipeEq => TokenKind::PipePipeEq,
            RawToken::QuestionQuestionEq => TokenKind::QuestionQuestionEq,

            // Delimiters
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Comma => TokenKind::Comma,

            // Literals
            RawToken::DecNumber | RawToken::QuestionFraction => {
                let cleaned: String = slice.chars().filter(|c| *c != '_' && *c != '?').collect();
                match cleaned.parse::<f64>() {
                    Ok(value) => TokenKind::Number(value),
                    Err(_) => self.fail(LexError::invalid_number(span)),
                }
            }
            RawToken::HexNumber => self.radix_number(slice, 16, span),
            RawToken::OctNumber => self.radix_number(slice, 8, span),
            RawToken::BinNumber => self.radix_number(slice, 2, span),
            RawToken::Str(true) => {
                let inner = &slice[1..slice.len() - 1];
                TokenKind::String(self.cook_string(inner, span.start + 1))
            }
            RawToken::Str(false) => self.fail(LexError::new(LexErrorKind::UnterminatedString, span)),
            RawToken::Template(TemplateScan::Closed) => {
                let inner = &slice[1..slice.len() - 1];
                TokenKind::Template(self.template_parts(inner, span.start + 1))
            }
            RawToken::Template(TemplateScan::Unterminated) => {
                self.fail(LexError::new(LexErrorKind::UnterminatedTemplate, span))
            }
            RawToken::Template(TemplateScan::TooDeep) => {
                self.fail(LexError::new(LexErrorKind::TemplateTooDeep, span))
            }
            RawToken::UnterminatedComment => {
                self.fail(LexError::new(LexErrorKind::UnterminatedComment, span))
            }
            RawToken::Ident => TokenKind::Ident(slice.to_string()),
        }
    }

    /// Record `error` and stand in an `Error` token for the bad text.
    fn fail(&mut self, error: LexError) -> TokenKind {
        self.errors.push(error);
        TokenKind::Error
    }

    /// `0x`, `0o` and `0b` literals. Digits are folded into an f64 so wide
    /// literals lose precision instead of overflowing.
    fn radix_number(&mut self, slice: &str, radix: u32, span: Span) -> TokenKind {
        let value = slice[2..]
            .chars()
            .filter(|c| *c != '_')
            .try_fold(0f64, |acc, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)));
        match value {
            Some(value) => TokenKind::Number(value),
            None => self.fail(LexError::invalid_number(span)),
        }
    }

    /// Resolve escapes in a string body starting at absolute offset `base`.
    fn cook_string(&mut self, inner: &str, base: usize) -> String {
        let mut out = String::with_capacity(inner.len());
        let mut i = 0;
        while let Some(ch) = inner[i..].chars().next() {
            if ch == '\\' {
                i += 1 + self.push_escape(&mut out, &inner[i + 1..], base + i);
            } else {
                out.push(ch);
                i += ch.len_utf8();
            }
        }
        out
    }

    /// Split a template body into text chunks and lexed substitutions.
    fn template_parts(&mut self, inner: &str, base: usize) -> Vec<TemplatePart> {
        let mut parts = Vec::new();
        let mut chunk = String::new();
        let mut i = 0;
        while let Some(ch) = inner[i..].chars().next() {
            let rest = &inner[i..];
            if rest.starts_with("${") {
                if !chunk.is_empty() {
                    parts.push(TemplatePart::Chunk(std::mem::take(&mut chunk)));
                }
                // The whole template already scanned closed, so the
                // substitution is closed too; the fallback keeps slicing safe.
                let (text_len, used) = match scan::substitution_body(&rest[2..], self.depth) {
                    Ok(len) => (len - 1, len),
                    Err(_) => (rest.len() - 2, rest.len() - 2),
                };
                let text_start = base + i + 2;
                let mut nested = Lexer::nested(&rest[2..2 + text_len], text_start, self.depth + 1);
                let result = nested.tokenize();
                self.errors.extend(result.errors);
                parts.push(TemplatePart::Subst {
                    tokens: result.tokens,
                    span: Span::new(base + i, text_start + used),
                });
                i += 2 + used;
            } else if ch == '\\' {
                i += 1 + self.push_escape(&mut chunk, &rest[1..], base + i);
            } else {
                chunk.push(ch);
                i += ch.len_utf8();
            }
        }
        if !chunk.is_empty() {
            parts.push(TemplatePart::Chunk(chunk));
        }
        parts
    }

    /// Append one decoded escape to `out`; `rest` starts after the
    /// backslash at absolute offset `pos`. Returns the bytes consumed after
    /// the backslash. Malformed escapes are kept verbatim.
    fn push_escape(&mut self, out: &mut String, rest: &str, pos: usize) -> usize {
        match decode_escape(rest) {
            Ok((ch, used)) => {
                out.extend(ch);
                used
            }
            Err(used) => {
                self.errors.push(LexError::new(
                    LexErrorKind::InvalidEscape,
                    Span::new(pos, pos + 1 + used),
                ));
                out.push('\\');
                out.push_str(&rest[..used]);
                used
            }
        }
    }
}

/// Decode the escape sequence that follows a backslash.
///
/// Returns the character (`None` for a line continuation) and the number of
/// bytes used. `Err` carries the length of the malformed sequence.
fn decode_escape(rest: &str) -> Result<(Option<char>, usize), usize> {
    let bytes = rest.as_bytes();
    let Some(first) = rest.chars().next() else {
        return Err(0);
    };
    let hex_run = |from: usize, max: usize| {
        bytes.get(from..).map_or(0, |b| b.iter().take(max).take_while(|b| b.is_ascii_hexdigit()).count())
    };
    match first {
        'n' => Ok((Some('\n'), 1)),
        'r' => Ok((Some('\r'), 1)),
        't' => Ok((Some('\t'), 1)),
        'b' => Ok((Some('\u{8}'), 1)),
        'f' => Ok((Some('\u{c}'), 1)),
        'v' => Ok((Some('\u{b}'), 1)),
        '\n' => Ok((None, 1)),
        '\r' if bytes.get(1) == Some(&b'\n') => Ok((None, 2)),
        '\r' => Ok((None, 1)),
        '0'..='7' => {
            let mut value = 0u32;
            let mut used = 0;
            while used < 3 {
                match bytes.get(used) {
                    Some(&b @ b'0'..=b'7') if value * 8 + u32::from(b - b'0') <= 0o377 => {
                        value = value * 8 + u32::from(b - b'0');
                        used += 1;
                    }
                    _ => break,
                }
            }
            Ok((char::from_u32(value), used))
        }
        'x' => {
            let digits = hex_run(1, 2);
            if digits < 2 {
                return Err(1 + digits);
            }
            let value = u32::from_str_radix(&rest[1..3], 16).map_err(|_| 3usize)?;
            Ok((char::from_u32(value), 3))
        }
        'u' if bytes.get(1) == Some(&b'{') => {
            let digits = hex_run(2, usize::MAX);
            if !(1..=6).contains(&digits) || bytes.get(2 + digits) != Some(&b'}') {
                return Err(2 + digits);
            }
            let value = u32::from_str_radix(&rest[2..2 + digits], 16).map_err(|_| 3 + digits)?;
            match char::from_u32(value) {
                Some(ch) => Ok((Some(ch), 3 + digits)),
                None if value <= 0x10FFFF => Ok((Some(char::REPLACEMENT_CHARACTER), 3 + digits)),
                None => Err(3 + digits),
            }
        }
        'u' => {
            let digits = hex_run(1, 4);
            if digits < 4 {
                return Err(1 + digits);
            }
            let value = u32::from_str_radix(&rest[1..5], 16).map_err(|_| 5usize)?;
            // Lone surrogate halves have no char of their own.
            Ok((Some(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)), 5))
        }
        other => Ok((Some(other), other.len_utf8())),
    }
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// What went wrong while lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated template literal")]
    UnterminatedTemplate,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid number literal")]
    InvalidNumber,
    #[error("template literal nested too deeply")]
    TemplateTooDeep,
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl LexError {
    fn new(kind: LexErrorKind, span: Span) -> Self {
        let hint = match kind {
            LexErrorKind::UnterminatedString => Some("add the closing quote on the same line".to_string()),
            LexErrorKind::UnterminatedTemplate => Some("add a closing '`'".to_string()),
            LexErrorKind::UnterminatedComment => Some("add a closing '*/'".to_string()),
            LexErrorKind::InvalidEscape => {
                Some("valid: \\n \\r \\t \\b \\f \\v \\0 \\xHH \\uHHHH \\u{...}".to_string())
            }
            LexErrorKind::TemplateTooDeep => {
                Some(format!("at most {} nested template literals are allowed", MAX_TEMPLATE_DEPTH))
            }
            _ => None,
        };
        Self { message: kind.to_string(), kind, span, hint }
    }

    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self::new(LexErrorKind::UnexpectedChar(ch), Span::new(pos, pos + ch.len_utf8()))
    }

    fn invalid_number(span: Span) -> Self {
        Self::new(LexErrorKind::InvalidNumber, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_contextual_words() {
        assert_eq!(
            kinds("struct build as from"),
            vec![
                TokenKind::Struct,
                TokenKind::Ident("build".into()),
                TokenKind::Ident("as".into()),
                TokenKind::Ident("from".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers_in_all_bases() {
        assert_eq!(
            kinds("42 3.5 .5 1e3 1_000 0xFF 0o17 0b101"),
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.5),
                TokenKind::Number(0.5),
                TokenKind::Number(1000.0),
                TokenKind::Number(1000.0),
                TokenKind::Number(255.0),
                TokenKind::Number(15.0),
                TokenKind::Number(5.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(
            kinds("a?.b ?? c >>>= 1 ... =>"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::QuestionDot,
                TokenKind::Ident("b".into()),
                TokenKind::QuestionQuestion,
                TokenKind::Ident("c".into()),
                TokenKind::GtGtGtEq,
                TokenKind::Number(1.0),
                TokenKind::DotDotDot,
                TokenKind::FatArrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn question_before_fraction_is_not_optional_chaining() {
        assert_eq!(
            kinds("a?.5:1"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Question,
                TokenKind::Number(0.5),
                TokenKind::Colon,
                TokenKind::Number(1.0),
                TokenKind::Eof,
            ]
        );
        let result = Lexer::new("x?.25e2").tokenize();
        let spans: Vec<_> = result.tokens.iter().map(|t| (t.lexeme.as_str(), t.span.start, t.span.end)).collect();
        assert_eq!(spans, vec![("x", 0, 1), ("?", 1, 2), (".25e2", 2, 7), ("", 7, 7)]);
    }

    #[test]
    fn comments_are_trivia() {
        assert_eq!(
            kinds("a // line\n/* block\n */ b"),
            vec![TokenKind::Ident("a".into()), TokenKind::Ident("b".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn string_escapes_are_cooked() {
        assert_eq!(
            kinds(r#"'a\n\t\'' "\x41B\u{1F600}\101" 'q\z'"#),
            vec![
                TokenKind::String("a\n\t'".into()),
                TokenKind::String("AB\u{1F600}A".into()),
                TokenKind::String("qz".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_continuation_in_string() {
        assert_eq!(kinds("'ab\\\ncd'"), vec![TokenKind::String("abcd".into()), TokenKind::Eof]);
    }

    #[test]
    fn lexeme_keeps_source_text() {
        let result = Lexer::new("'a\\n'").tokenize();
        assert_eq!(result.tokens[0].lexeme, "'a\\n'");
        assert_eq!(result.tokens[0].span, Span::new(0, 5));
    }

    #[test]
    fn template_with_substitutions() {
        let result = Lexer::new("`a${x + 1}b`").tokenize();
        assert!(result.is_ok());
        let TokenKind::Template(parts) = &result.tokens[0].kind else {
            panic!("expected template, got {:?}", result.tokens[0].kind);
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], TemplatePart::Chunk("a".into()));
        let TemplatePart::Subst { tokens, span } = &parts[1] else {
            panic!("expected substitution");
        };
        assert_eq!(*span, Span::new(2, 10));
        let inner: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            inner,
            vec![TokenKind::Ident("x".into()), TokenKind::Plus, TokenKind::Number(1.0), TokenKind::Eof]
        );
        // Substitution tokens carry file offsets.
        assert_eq!(tokens[0].span, Span::new(4, 5));
        assert_eq!(parts[2], TemplatePart::Chunk("b".into()));
    }

    #[test]
    fn nested_template() {
        let result = Lexer::new("`${`in${y}`}`").tokenize();
        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(result.tokens.len(), 2);
    }

    #[test]
    fn empty_template_has_no_parts() {
        assert_eq!(kinds("``"), vec![TokenKind::Template(Vec::new()), TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_at_eof_is_one_error() {
        let result = Lexer::new("let s = 'abc").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(result.errors[0].span, Span::new(8, 12));
        assert_eq!(result.tokens[3].kind, TokenKind::Error);
        assert_eq!(result.tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn lexing_resumes_on_next_line() {
        let result = Lexer::new("'abc\nfoo").tokenize();
        assert_eq!(result.errors.len(), 1);
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(kinds, vec![TokenKind::Error, TokenKind::Ident("foo".into()), TokenKind::Eof]);
    }

    #[test]
    fn unterminated_block_comment() {
        let result = Lexer::new("a /* never\nclosed").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, LexErrorKind::UnterminatedComment);
    }

    #[test]
    fn unterminated_template() {
        let result = Lexer::new("`abc ${x").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, LexErrorKind::UnterminatedTemplate);
    }

    #[test]
    fn template_depth_limit() {
        let mut src = String::new();
        for _ in 0..40 {
            src.push_str("`${");
        }
        for _ in 0..40 {
            src.push_str("}`");
        }
        let result = Lexer::new(&src).tokenize();
        assert!(result.errors.iter().any(|e| e.kind == LexErrorKind::TemplateTooDeep));
    }

    #[test]
    fn invalid_escape_is_reported_and_kept() {
        let result = Lexer::new(r"'\xZ1'").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, LexErrorKind::InvalidEscape);
        assert_eq!(result.tokens[0].kind, TokenKind::String("\\xZ1".into()));
    }

    #[test]
    fn unexpected_character() {
        let result = Lexer::new("a # b").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, LexErrorKind::UnexpectedChar('#'));
        assert_eq!(result.tokens.len(), 3);
    }

    #[test]
    fn decode_octal_and_surrogates() {
        assert_eq!(decode_escape("101"), Ok((Some('A'), 3)));
        assert_eq!(decode_escape("0"), Ok((Some('\0'), 1)));
        assert_eq!(decode_escape("477"), Ok((Some('\''), 2)));
        assert_eq!(decode_escape("uD800"), Ok((Some(char::REPLACEMENT_CHARACTER), 5)));
        assert_eq!(decode_escape("u{110000}"), Err(9));
    }
}
