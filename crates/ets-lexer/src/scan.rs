// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Raw delimiter scanning for literals whose extent a regex cannot describe.
//!
//! All offsets are byte offsets. Scanning only ever stops on ASCII bytes, so
//! the returned lengths are always on char boundaries.

use crate::lexer::MAX_TEMPLATE_DEPTH;

/// Why a template could not be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanError {
    Unterminated,
    TooDeep,
}

/// Bytes up to (not including) the end of the current line.
pub(crate) fn line_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let end = bytes.iter().position(|&b| b == b'\n').unwrap_or(bytes.len());
    if end > 0 && bytes[end - 1] == b'\r' {
        end - 1
    } else {
        end
    }
}

/// Length of a quoted string body that follows the opening quote, including
/// the closing quote. `Err` carries the length to the end of the line when
/// the string is not closed there.
pub(crate) fn string_body(rest: &str, quote: u8) -> Result<usize, usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                // `\` + CRLF is a single line continuation
                if bytes.get(i + 1) == Some(&b'\r') && bytes.get(i + 2) == Some(&b'\n') {
                    i += 3;
                } else {
                    i += 2;
                }
            }
            b'\n' => return Err(line_len(rest)),
            b if b == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(line_len(rest))
}

/// Length of a template body that follows the opening backtick, including
/// the closing backtick.
pub(crate) fn template_body(rest: &str, depth: usize) -> Result<usize, ScanError> {
    if depth > MAX_TEMPLATE_DEPTH {
        return Err(ScanError::TooDeep);
    }
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Ok(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i += 2 + substitution_body(&rest[i + 2..], depth)?;
            }
            _ => i += 1,
        }
    }
    Err(ScanError::Unterminated)
}

/// Length of a `${...}` substitution that follows the `${`, including the
/// closing brace. Braces, strings, nested templates and comments inside the
/// substitution are balanced.
pub(crate) fn substitution_body(rest: &str, depth: usize) -> Result<usize, ScanError> {
    let bytes = rest.as_bytes();
    let mut braces = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                braces += 1;
                i += 1;
            }
            b'}' => {
                braces -= 1;
                i += 1;
                if braces == 0 {
                    return Ok(i);
                }
            }
            q @ (b'\'' | b'"') => {
                let n = string_body(&rest[i + 1..], q).map_err(|_| ScanError::Unterminated)?;
                i += 1 + n;
            }
            b'`' => i += 1 + template_body(&rest[i + 1..], depth + 1)?,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i += 2 + line_len(&rest[i + 2..]);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => match rest[i + 2..].find("*/") {
                Some(n) => i += 2 + n + 2,
                None => return Err(ScanError::Unterminated),
            },
            _ => i += 1,
        }
    }
    Err(ScanError::Unterminated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_stops_at_matching_quote() {
        assert_eq!(string_body("abc' + x", b'\''), Ok(4));
        assert_eq!(string_body(r#"a\"b" rest"#, b'"'), Ok(5));
        assert_eq!(string_body("it's\"", b'"'), Ok(5));
    }

    #[test]
    fn string_continues_over_escaped_newline() {
        assert_eq!(string_body("ab\\\ncd'", b'\''), Ok(7));
        assert_eq!(string_body("ab\\\r\ncd'", b'\''), Ok(8));
    }

    #[test]
    fn unclosed_string_reports_line_length() {
        assert_eq!(string_body("abc\r\nnext'", b'\''), Err(3));
        assert_eq!(string_body("abc", b'\''), Err(3));
    }

    #[test]
    fn template_skips_nested_substitutions() {
        let src = "a ${ {b: '}'} } c ${`in ${x}`}`tail";
        let n = template_body(src, 0).unwrap();
        assert_eq!(&src[..n], "a ${ {b: '}'} } c ${`in ${x}`}`");
    }

    #[test]
    fn template_depth_is_bounded() {
        let mut src = String::new();
        for _ in 0..=MAX_TEMPLATE_DEPTH + 1 {
            src.push_str("${`");
        }
        assert_eq!(template_body(&src, 0), Err(ScanError::TooDeep));
    }

    #[test]
    fn unclosed_template() {
        assert_eq!(template_body("abc ${x", 0), Err(ScanError::Unterminated));
        assert_eq!(template_body("abc", 0), Err(ScanError::Unterminated));
    }
}
