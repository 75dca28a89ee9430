// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source slice the token was read from.
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self { kind, lexeme: lexeme.into(), span }
    }

    pub fn eof(pos: usize) -> Self {
        Self { kind: TokenKind::Eof, lexeme: String::new(), span: Span::point(pos) }
    }
}

/// One piece of a template literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TemplatePart {
    /// Literal text with escapes already resolved.
    Chunk(String),
    /// Tokens of a `${...}` substitution, terminated by `Eof`.
    Subst { tokens: Vec<Token>, span: Span },
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenKind {
    // Literals
    Number(f64),
    String(String),
    Template(Vec<TemplatePart>),
    Bool(bool),
    Null,

    // Identifier
    Ident(String),

    // Keywords
    Import,
    Export,
    Default,
    Function,
    Class,
    Struct,
    Interface,
    Enum,
    Extends,
    Implements,
    Const,
    Let,
    Var,
    If,
    Else,
    For,
    In,
    While,
    Return,
    Break,
    Continue,
    Throw,
    Try,
    Catch,
    Finally,
    New,
    Typeof,
    Void,
    Delete,
    Instanceof,
    This,
    Super,

    // Operators
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Eq,
    EqEq,
    EqEqEq,
    BangEq,
    BangEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AmpAmp,
    PipePipe,
    Bang,
    Question,
    QuestionQuestion,
    QuestionDot,  // ?.
    Dot,
    DotDotDot,    // ...
    FatArrow,     // =>
    At,
    Amp,          // &
    Pipe,         // |
    Caret,        // ^
    Tilde,        // ~
    LtLt,         // <<
    GtGt,         // >>
    GtGtGt,       // >>>
    PlusEq,       // +=
    MinusEq,      // -=
    StarEq,       // *=
    StarStarEq,   // **=
    SlashEq,      // /=
    PercentEq,    // %=
    AmpEq,        // &=
    PipeEq,       // |=
    CaretEq,      // ^=
    LtLtEq,       // <<=
    GtGtEq,       // >>=
    GtGtGtEq,     // >>>=
    AmpAmpEq,     // &&=
    PipePipeEq,   // ||=
    QuestionQuestionEq, // ??=

    // Delimiters
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Colon,
    Semi,
    Comma,

    // Special
    /// Placeholder for text the lexer could not read (unterminated literal
    /// or comment). The matching `LexError` carries the details.
    Error,
    Eof,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            // Literals
            TokenKind::Number(_) => "a number",
            TokenKind::String(_) => "a string",
            TokenKind::Template(_) => "a template literal",
            TokenKind::Bool(_) => "'true' or 'false'",
            TokenKind::Null => "'null'",

            // Identifier
            TokenKind::Ident(_) => "a name",

            // Operators
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::StarStar => "'**'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::EqEqEq => "'==='",
            TokenKind::BangEq => "'!='",
            TokenKind::BangEqEq => "'!=='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Question => "'?'",
            TokenKind::QuestionQuestion => "'??'",
            TokenKind::QuestionDot => "'?.'",
            TokenKind::Dot => "'.'",
            TokenKind::DotDotDot => "'...'",
            TokenKind::FatArrow => "'=>'",
            TokenKind::At => "'@'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::LtLt => "'<<'",
            TokenKind::GtGt => "'>>'",
            TokenKind::GtGtGt => "'>>>'",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::StarStarEq => "'**='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::AmpEq => "'&='",
            TokenKind::PipeEq => "'|='",
            TokenKind::CaretEq => "'^='",
            TokenKind::LtLtEq => "'<<='",
            TokenKind::GtGtEq => "'>>='",
            TokenKind::GtGtGtEq => "'>>>='",
            TokenKind::AmpAmpEq => "'&&='",
            TokenKind::PipePipeEq => "'||='",
            TokenKind::QuestionQuestionEq => "'??='",

            // Delimiters
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",

            // Special
            TokenKind::Error => "unreadable input",
            TokenKind::Eof => "end of file",

            // Keywords
            _ => match self.keyword_str() {
                Some(kw) => keyword_display(kw),
                None => "a token",
            },
        }
    }

    /// Source spelling of a reserved word, if this token is one.
    ///
    /// Reserved words are still legal as property names (`obj.default`,
    /// `{ delete: 1 }`), so the parser uses this to recover the text.
    pub fn keyword_str(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Import => "import",
            TokenKind::Export => "export",
            TokenKind::Default => "default",
            TokenKind::Function => "function",
            TokenKind::Class => "class",
            TokenKind::Struct => "struct",
            TokenKind::Interface => "interface",
            TokenKind::Enum => "enum",
            TokenKind::Extends => "extends",
            TokenKind::Implements => "implements",
            TokenKind::Const => "const",
            TokenKind::Let => "let",
            TokenKind::Var => "var",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::New => "new",
            TokenKind::Typeof => "typeof",
            TokenKind::Void => "void",
            TokenKind::Delete => "delete",
            TokenKind::Instanceof => "instanceof",
            TokenKind::This => "this",
            TokenKind::Super => "super",
            TokenKind::Null => "null",
            TokenKind::Bool(true) => "true",
            TokenKind::Bool(false) => "false",
            _ => return None,
        })
    }

    /// Tokens that begin a statement; error recovery stops in front of them.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Let | TokenKind::Const | TokenKind::Var |
            TokenKind::If | TokenKind::For | TokenKind::While |
            TokenKind::Return | TokenKind::Break | TokenKind::Continue |
            TokenKind::Throw | TokenKind::Try
        )
    }

    /// Tokens that begin a top-level declaration.
    pub fn starts_declaration(&self) -> bool {
        matches!(
            self,
            TokenKind::Import | TokenKind::Export | TokenKind::At |
            TokenKind::Struct | TokenKind::Class | TokenKind::Interface |
            TokenKind::Enum | TokenKind::Function | TokenKind::Const |
            TokenKind::Let | TokenKind::Var
        )
    }
}

fn keyword_display(kw: &'static str) -> &'static str {
    match kw {
        "import" => "'import'",
        "export" => "'export'",
        "default" => "'default'",
        "function" => "'function'",
        "class" => "'class'",
        "struct" => "'struct'",
        "interface" => "'interface'",
        "enum" => "'enum'",
        "extends" => "'extends'",
        "implements" => "'implements'",
        "const" => "'const'",
        "let" => "'let'",
        "var" => "'var'",
        "if" => "'if'",
        "else" => "'else'",
        "for" => "'for'",
        "in" => "'in'",
        "while" => "'while'",
        "return" => "'return'",
        "break" => "'break'",
        "continue" => "'continue'",
        "throw" => "'throw'",
        "try" => "'try'",
        "catch" => "'catch'",
        "finally" => "'finally'",
        "new" => "'new'",
        "typeof" => "'typeof'",
        "void" => "'void'",
        "delete" => "'delete'",
        "instanceof" => "'instanceof'",
        "this" => "'this'",
        "super" => "'super'",
        _ => "a keyword",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_to_text() {
        assert_eq!(TokenKind::Default.keyword_str(), Some("default"));
        assert_eq!(TokenKind::Bool(false).keyword_str(), Some("false"));
        assert_eq!(TokenKind::Ident("build".into()).keyword_str(), None);
    }

    #[test]
    fn display_names_quote_punctuation() {
        assert_eq!(TokenKind::QuestionDot.display_name(), "'?.'");
        assert_eq!(TokenKind::Instanceof.display_name(), "'instanceof'");
        assert_eq!(TokenKind::Eof.display_name(), "end of file");
    }
}
