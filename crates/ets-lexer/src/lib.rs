// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for ETS source files.
//!
//! Tokenizes source code into a stream of tokens for the parser. Comments
//! and whitespace are trivia and never reach the token stream.

mod lexer;
mod scan;

pub use lexer::{LexError, LexErrorKind, LexResult, Lexer, MAX_TEMPLATE_DEPTH};
