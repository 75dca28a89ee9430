// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminator pre-pass.
//!
//! A line-oriented heuristic that appends `;` to `var`/`let`/`const`
//! declarations with an initializer when the declaration visibly ends on a
//! closer (`}` `]` `)`), a closed template, or a simple literal. Multi-line
//! initializers are followed until every delimiter is balanced again. A line
//! carrying a `//` comment is never touched.
//!
//! The pass works on text only; callers parse the returned string and leave
//! the file on disk alone.

/// Delimiter balance carried across the lines of one declaration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Balance {
    braces: i32,
    brackets: i32,
    parens: i32,
    in_template: bool,
}

impl Balance {
    fn advance(&mut self, scan: &LineScan) {
        self.braces += scan.braces;
        self.brackets += scan.brackets;
        self.parens += scan.parens;
        self.in_template = scan.in_template;
    }

    fn is_zero(&self) -> bool {
        self.braces == 0 && self.brackets == 0 && self.parens == 0 && !self.in_template
    }

    /// The declaration was cut short by an enclosing closer.
    fn overclosed(&self) -> bool {
        self.braces < 0 || self.brackets < 0 || self.parens < 0
    }
}

/// Per-line delimiter counts, ignoring string and template contents.
#[derive(Debug, Default)]
struct LineScan {
    braces: i32,
    brackets: i32,
    parens: i32,
    in_template: bool,
    open_quote: bool,
    line_comment: bool,
}

fn scan_line(line: &str, in_template: bool) -> LineScan {
    let mut scan = LineScan { in_template, ..LineScan::default() };
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if scan.in_template {
            match c {
                '\\' => {
                    chars.next();
                }
                '`' => scan.in_template = false,
                _ => {}
            }
            continue;
        }
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '`' => scan.in_template = true,
            '/' if chars.peek() == Some(&'/') => {
                scan.line_comment = true;
                break;
            }
            '{' => scan.braces += 1,
            '}' => scan.braces -= 1,
            '[' => scan.brackets += 1,
            ']' => scan.brackets -= 1,
            '(' => scan.parens += 1,
            ')' => scan.parens -= 1,
            _ => {}
        }
    }
    scan.open_quote = quote.is_some();
    scan
}

fn starts_declaration(line: &str) -> bool {
    let trimmed = line.trim_start();
    let keyword = ["const", "let", "var"].into_iter().find(|kw| trimmed.starts_with(kw));
    let Some(keyword) = keyword else {
        return false;
    };
    let boundary = trimmed[keyword.len()..].chars().next().map_or(true, |c| !is_ident_char(c));
    boundary && line.contains('=') && !line.trim_end().ends_with(';')
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// The trailing identifier-like run and the character just before it.
fn trailing_word(text: &str) -> (&str, Option<char>) {
    let start = text
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_ident_char(c))
        .last()
        .map_or(text.len(), |(i, _)| i);
    (&text[start..], text[..start].chars().next_back())
}

fn is_decimal_tail(word: &str) -> bool {
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match word.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => digits(mantissa) && digits(exponent),
        None => digits(word),
    }
}

fn ends_with_simple_literal(text: &str) -> bool {
    if text.ends_with(['"', '\'']) {
        return true;
    }
    let (word, before) = trailing_word(text);
    if is_decimal_tail(word) {
        return true;
    }
    matches!(word, "true" | "false" | "null") && before.map_or(true, |c| c != '.')
}

/// Whether a balanced declaration line can take a `;` at its end.
fn ends_safely(line: &str, scan: &LineScan) -> bool {
    if scan.line_comment || scan.open_quote {
        return false;
    }
    let text = line.trim_end();
    text.ends_with(['}', ']', ')', '`']) || ends_with_simple_literal(text)
}

fn terminate(line: &str) -> String {
    let text = line.trim_end();
    format!("{text};{}", &line[text.len()..])
}

/// Insert `;` after declarations that end without one.
///
/// Line endings are normalized to `\n`.
pub fn insert_terminators(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut pending: Option<Balance> = None;
    let mut inserted = 0usize;

    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        let start = match pending.take() {
            Some(balance) => Some(balance),
            None if starts_declaration(line) => Some(Balance::default()),
            None => None,
        };
        let Some(mut balance) = start else {
            out.push(line.to_string());
            continue;
        };

        let scan = scan_line(line, balance.in_template);
        balance.advance(&scan);

        if balance.overclosed() || (balance.is_zero() && line.trim_end().ends_with(';')) {
            out.push(line.to_string());
        } else if balance.is_zero() && ends_safely(line, &scan) {
            out.push(terminate(line));
            inserted += 1;
        } else {
            out.push(line.to_string());
            pending = Some(balance);
        }
    }

    tracing::trace!(inserted, "terminator pre-pass");
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_literal_on_one_line() {
        assert_eq!(insert_terminators("let x = { a: 1, b: 2 }"), "let x = { a: 1, b: 2 };");
    }

    #[test]
    fn simple_literals() {
        let src = "const a = 1\nconst b = 2.5e3\nlet c = 'c'\nlet d = \"d\"\nvar e = true\nlet f = null\nlet g = `t`";
        let expected = "const a = 1;\nconst b = 2.5e3;\nlet c = 'c';\nlet d = \"d\";\nvar e = true;\nlet f = null;\nlet g = `t`;";
        assert_eq!(insert_terminators(src), expected);
    }

    #[test]
    fn multi_line_initializer_terminated_on_closing_line() {
        let src = "const style = {\n  width: 10,\n  items: [1, 2],\n}\nText('x')";
        let expected = "const style = {\n  width: 10,\n  items: [1, 2],\n};\nText('x')";
        assert_eq!(insert_terminators(src), expected);
    }

    #[test]
    fn arrow_function_initializer() {
        let src = "const add = (a: number, b: number) => {\n  return a + b;\n}";
        assert_eq!(insert_terminators(src), "const add = (a: number, b: number) => {\n  return a + b;\n};");
    }

    #[test]
    fn leaves_terminated_and_unknown_endings_alone() {
        let src = "let a = 1;\nlet b = foo\nlet c = a +";
        assert_eq!(insert_terminators(src), src);
    }

    #[test]
    fn never_appends_after_line_comment() {
        let src = "let a = 1 // one\nlet b = { k: 2 } // two";
        assert_eq!(insert_terminators(src), src);
    }

    #[test]
    fn delimiters_inside_strings_do_not_count() {
        assert_eq!(insert_terminators("let s = '{'"), "let s = '{';");
        assert_eq!(insert_terminators("let url = 'http://host'"), "let url = 'http://host';");
    }

    #[test]
    fn template_spanning_lines() {
        let src = "let t = `line one\nline two`\nlet n = 3";
        assert_eq!(insert_terminators(src), "let t = `line one\nline two`;\nlet n = 3;");
    }

    #[test]
    fn overclosed_declaration_is_dropped() {
        let src = "  build() {\n    let x = foo\n  }\n}";
        assert_eq!(insert_terminators(src), src);
    }

    #[test]
    fn keyword_prefix_must_be_whole_word() {
        assert_eq!(insert_terminators("letter = 1"), "letter = 1");
        assert_eq!(insert_terminators("constant = {}"), "constant = {}");
    }

    #[test]
    fn crlf_is_normalized_and_trailing_space_kept_after_terminator() {
        assert_eq!(insert_terminators("let a = 1  \r\nlet b = 2\r\n"), "let a = 1;  \nlet b = 2;\n");
    }

    #[test]
    fn property_access_is_not_a_keyword_literal() {
        assert_eq!(insert_terminators("let v = flags.null"), "let v = flags.null");
    }
}
