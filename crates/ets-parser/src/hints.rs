// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use ets_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        // Colon hints
        ("':'", TokenKind::Eq) => Some("use ':' for types, '=' for values"),
        ("':'", _) => None,

        // Block hints
        ("'{'", _) => Some("blocks start with '{'"),
        ("'}'", _) => Some("every '{' needs a matching '}'"),

        // Parentheses hints
        ("'('", _) => Some("function calls need parentheses"),
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", _) => None,

        // Bracket hints
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),

        // Generic angle bracket
        ("'>'", _) => Some("close the type argument list with '>'"),

        // Arrow functions
        ("'=>'", _) => Some("arrow functions look like (x) => x"),

        // Expression hints
        ("expression", TokenKind::Eq) => Some("put the value after '='"),
        ("expression", TokenKind::Semi) => Some("statement is incomplete"),
        ("expression", TokenKind::Dot) => {
            Some("a leading '.' only continues a modifier chain after a UI element")
        }
        ("expression", _) => Some("try a value, variable, or function call"),

        // Name/identifier hints
        ("a name", TokenKind::Number(_)) => Some("names can't start with a number"),
        ("a name", TokenKind::String(_)) => Some("names are not quoted"),
        ("a name", _) => Some("names start with a letter, '_' or '$'"),

        // String hints
        ("a module path string", _) => Some("module paths are quoted, like './utils'"),

        // Type hints
        ("type", _) => Some("try a type like 'number', 'string', or a class name"),

        // Declaration hints
        ("declaration", _) => {
            Some("start with 'import', 'export', 'struct', 'class', 'function', 'const', etc.")
        }

        // Modifier chains
        ("a modifier chain", _) => Some("style bodies contain only '.attribute(value)' calls"),

        _ => None,
    }
}
