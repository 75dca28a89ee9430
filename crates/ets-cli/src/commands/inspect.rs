// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pipeline inspection: lex, parse.

use std::path::Path;
use std::process;

use colored::Colorize;
use ets_diagnostics::formatter::DiagnosticFormatter;
use ets_diagnostics::json::{to_json_report, DiagnosticReport};
use ets_diagnostics::ToDiagnostic;

use super::read_source;
use crate::{output, Format};

pub fn cmd_lex(path: &Path) {
    let source = read_source(path);
    let name = path.display().to_string();
    let result = ets_lexer::Lexer::new(&source).tokenize();

    let formatter = DiagnosticFormatter::new(&source).with_file_name(&name);
    for error in &result.errors {
        eprint!("{}", formatter.format(&error.to_diagnostic()));
    }

    println!("{}\n", output::section_header(&format!("Tokens ({})", result.tokens.len())));
    for tok in &result.tokens {
        println!("{:5}:{:<5} {:?} {}", tok.span.start, tok.span.end, tok.kind, tok.lexeme.dimmed());
    }
    println!();

    if result.is_ok() {
        println!("{}", output::banner_ok("Lex"));
    } else {
        eprintln!("{}", output::banner_fail("Lex", result.errors.len()));
        process::exit(1);
    }
}

pub fn cmd_parse(path: &Path, format: Format) {
    let source = read_source(path);
    let name = path.display().to_string();
    let parsed = ets_parser::parse_source(&source);
    let diagnostics = ets_diagnostics::collect(&parsed);

    match format {
        Format::Human => {
            let formatter = DiagnosticFormatter::new(&source).with_file_name(&name);
            for diagnostic in &diagnostics {
                eprintln!("{}", formatter.format(diagnostic));
            }
            println!("{}\n", output::section_header(&format!("AST ({} declarations)", parsed.module.decls.len())));
            for (i, decl) in parsed.module.decls.iter().enumerate() {
                println!("--- Declaration {} ---", i + 1);
                println!("{decl:#?}\n");
            }
        }
        Format::Json => {
            let report: DiagnosticReport = to_json_report(&diagnostics, &source, &name, "parse");
            let doc = serde_json::json!({ "module": &parsed.module, "diagnostics": report });
            match serde_json::to_string_pretty(&doc) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    eprintln!("{}: serializing tree: {e}", output::error_label());
                    process::exit(1);
                }
            }
        }
    }

    if !diagnostics.is_empty() {
        if format == Format::Human {
            eprintln!("{}", output::banner_fail("Parse", diagnostics.len()));
        }
        process::exit(1);
    }
    if format == Format::Human {
        println!("{}", output::banner_ok("Parse"));
    }
}
