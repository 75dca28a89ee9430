// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Batch validation and run history.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use colored::Colorize;
use ets_validate::{History, Timestamp, ValidateOptions, ValidationReport, ValidationSummary};

use crate::output;

/// Where the results of a run go.
pub struct Persist {
    pub no_report: bool,
    pub output: Option<PathBuf>,
    pub reports_dir: PathBuf,
}

pub fn cmd_validate(dir: &Path, opts: &ValidateOptions, persist: &Persist, verbose: bool) {
    let started = Timestamp::now();
    let summary = ets_validate::validate(dir, opts);
    let report = ValidationReport::new(&summary, dir, started);

    let rendered = if opts.json_output {
        match report.to_json() {
            Ok(json) => json,
            Err(e) => fail(&e.to_string()),
        }
    } else {
        report.to_text(opts.strict)
    };

    match &persist.output {
        Some(path) => {
            if let Err(e) = write_output(path, &rendered) {
                fail(&format!("writing {}: {e}", path.display()));
            }
            if !opts.json_output {
                println!("{} wrote {}", output::status_pass(), output::file_path(&path.display().to_string()));
            }
        }
        None => print!("{rendered}{}", if opts.json_output { "\n" } else { "" }),
    }

    if !opts.json_output {
        print_footer(&summary, verbose);
    }

    if !persist.no_report {
        match ets_validate::persist(&persist.reports_dir, &summary, dir, started) {
            Ok((path, history)) => {
                if !opts.json_output {
                    println!("{} report saved: {}", output::status_pass(), output::file_path(&path.display().to_string()));
                    println!("{} history updated: {} runs recorded", output::status_pass(), history.history.len());
                }
            }
            Err(e) => fail(&e.to_string()),
        }
    }

    if !summary.all_passed() {
        process::exit(1);
    }
}

fn write_output(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}

fn print_footer(summary: &ValidationSummary, verbose: bool) {
    if verbose {
        for outcome in summary.outcomes.iter().filter(|o| !o.passed) {
            let problem = outcome.first_problem.as_deref().unwrap_or("failed");
            println!(
                "  {} {} {}",
                output::status_fail(),
                output::file_path(&outcome.path.display().to_string()),
                format!("({} diagnostics) {problem}", outcome.diagnostics).dimmed()
            );
        }
    }
    println!("{}", output::separator(50));
    println!(
        "{} files, {}, {}, pass rate {}",
        summary.total,
        output::passed_count(summary.passed),
        output::failed_count(summary.failed),
        output::pass_rate(summary.pass_rate)
    );
}

pub fn cmd_history(reports_dir: &Path) {
    match History::load(reports_dir) {
        Ok(history) => print!("{}", history.render_trend()),
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}: {message}", output::error_label());
    process::exit(1);
}
