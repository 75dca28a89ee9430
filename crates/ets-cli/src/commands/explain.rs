// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code documentation.

use std::process;

use colored::Colorize;
use ets_diagnostics::codes::{ErrorCategory, ErrorCodeRegistry};

use crate::output;

pub fn cmd_explain(code: &str) {
    let registry = ErrorCodeRegistry::default();
    let code = code.to_ascii_uppercase();

    let Some(info) = registry.get(&code) else {
        eprintln!("{}: unknown error code `{}`", output::error_label(), code);
        eprintln!();
        let known: Vec<_> = registry.all().map(|i| i.code).collect();
        eprintln!("  {}: known codes are {}", output::hint_label(), known.join(", "));
        process::exit(1);
    };

    let label = match info.category {
        ErrorCategory::Lint => output::warning_label(),
        _ => output::error_label(),
    };
    println!("{}[{}]: {}", label, info.code.bold(), info.title.bold());
    println!();
    println!("  Category: {}", info.category);
    println!();
    for line in info.description.lines() {
        println!("  {line}");
    }
    println!();
    if !info.example.is_empty() {
        println!("  {}:", "Example".bold());
        println!();
        for line in info.example.lines() {
            println!("    {line}");
        }
        println!();
    }
    let command = if info.category == ErrorCategory::Lint { "lint" } else { "check" };
    println!("  Run `ets {command} <file>` to see this in context.");
}
