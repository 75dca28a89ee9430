// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Diagnostics commands: check, lint.

use std::path::Path;
use std::process;

use colored::Colorize;
use ets_diagnostics::formatter::DiagnosticFormatter;
use ets_diagnostics::json::{to_json_report, to_json_string};
use ets_diagnostics::ToDiagnostic;

use super::read_source;
use crate::{output, Format};

pub fn cmd_check(path: &Path, strict: bool, format: Format) {
    let source = read_source(path);
    let name = path.display().to_string();
    let diagnostics = ets_validate::diagnose_source(&source, false);
    let passed = ets_validate::classify(&diagnostics, strict);

    match format {
        Format::Human => {
            let formatter = DiagnosticFormatter::new(&source).with_file_name(&name);
            for diagnostic in &diagnostics {
                eprintln!("{}", formatter.format(diagnostic));
            }
            if !passed {
                eprintln!("{}", output::banner_fail("Check", diagnostics.len()));
            } else if diagnostics.is_empty() {
                println!("{}", output::banner_ok("Check"));
            } else {
                println!(
                    "{} {}",
                    output::banner_ok("Check"),
                    format!("({} missing `;` tolerated, use --strict to reject)", diagnostics.len()).dimmed()
                );
            }
        }
        Format::Json => {
            let mut report = to_json_report(&diagnostics, &source, &name, "check");
            report.success = passed;
            println!("{}", to_json_string(&report));
        }
    }

    if !passed {
        process::exit(1);
    }
}

pub fn cmd_lint(path: &Path, opts: &ets_lint::LintOpts, format: Format) {
    let source = read_source(path);
    let name = path.display().to_string();
    let report = ets_lint::lint(&source, &name, opts);

    match format {
        Format::Human => {
            let formatter = DiagnosticFormatter::new(&source).with_file_name(&name);
            for finding in &report.diagnostics {
                eprintln!("{}", formatter.format(&finding.to_diagnostic()));
            }
            if report.diagnostics.is_empty() {
                println!("{} No lint issues found", output::status_pass());
            } else {
                eprintln!(
                    "{} {} error(s), {} warning(s)",
                    output::status_fail(),
                    report.error_count,
                    report.warning_count
                );
            }
        }
        Format::Json => println!("{}", ets_lint::lint_json(&report)),
    }

    if report.error_count > 0 {
        process::exit(1);
    }
}
