// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI output formatting with colors and styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.
//! Colors are automatically disabled when output is piped.

use colored::{ColoredString, Colorize};

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

// === Error Output ===

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn warning_label() -> ColoredString {
    "warning".yellow().bold()
}

pub fn hint_label() -> ColoredString {
    "hint".cyan()
}

// === Banners ===

pub fn banner_ok(phase: &str) -> String {
    format!("{} {} {}", "===".dimmed(), format!("{phase} OK").green().bold(), "===".dimmed())
}

pub fn banner_fail(phase: &str, count: usize) -> String {
    let msg = if count == 1 {
        format!("{phase} FAILED: 1 error")
    } else {
        format!("{phase} FAILED: {count} errors")
    };
    format!("{} {} {}", "===".dimmed(), msg.red().bold(), "===".dimmed())
}

// === Status Output ===

pub fn status_pass() -> ColoredString {
    "✓".green()
}

pub fn status_fail() -> ColoredString {
    "✗".red()
}

// === Decorations ===

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

pub fn separator(width: usize) -> ColoredString {
    "─".repeat(width).dimmed()
}

pub fn file_path(path: &str) -> ColoredString {
    path.underline()
}

// === Summaries ===

pub fn passed_count(n: usize) -> ColoredString {
    format!("{n} passed").green()
}

pub fn failed_count(n: usize) -> ColoredString {
    if n == 0 {
        format!("{n} failed").normal()
    } else {
        format!("{n} failed").red()
    }
}

pub fn pass_rate(rate: f64) -> ColoredString {
    let text = format!("{rate:.2}%");
    if rate >= 100.0 {
        text.green().bold()
    } else if rate >= 80.0 {
        text.yellow().bold()
    } else {
        text.red().bold()
    }
}
