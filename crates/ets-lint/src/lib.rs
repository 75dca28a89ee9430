// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `ets lint`: checks that need the tree but not types.
//!
//! The parser accepts any decorator name and any number of `build()`
//! methods; the rules here report what the target toolchain would reject.

pub mod component;
pub mod decorator;
pub mod naming;
pub mod rules;
pub mod types;
mod util;

pub use types::{LintDiagnostic, LintOpts, LintReport, Severity};

use ets_diagnostics::{Diagnostic, ToDiagnostic};

/// Parse source and run lint rules.
///
/// Syntax errors are not reported here; rules see whatever parsed.
pub fn lint(source: &str, file: &str, opts: &LintOpts) -> LintReport {
    let parse = ets_parser::parse_source(source);
    let cx = rules::LintContext { decls: &parse.module.decls, source, opts };
    let diagnostics = rules::run_rules(&cx);

    let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let warning_count = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();

    LintReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        diagnostics,
        error_count,
        warning_count,
    }
}

/// Serialize a lint report to JSON.
pub fn lint_json(report: &LintReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

impl ToDiagnostic for LintDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic {
        let diag = match self.severity {
            Severity::Error => Diagnostic::error(&self.message),
            Severity::Warning => Diagnostic::warning(&self.message),
        };
        diag.with_code(self.code)
            .with_primary(self.span, self.rule.as_str())
            .with_help(self.fix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CLEAN: &str = "\
@Entry
@Component
struct Index {
  @State message: string = 'hi';
  build() {
    Text(this.message)
  }
}
";

    #[test]
    fn clean_component_has_no_findings() {
        let report = lint(CLEAN, "Index.ets", &LintOpts::default());
        assert!(report.success);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn report_counts_by_severity() {
        let src = "@Component struct card { @Stat x: number = 1; }";
        let report = lint(src, "card.ets", &LintOpts::default());
        let rules: Vec<_> = report.diagnostics.iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(rules, vec!["decorator/unknown", "component/missing-build", "naming/component-pascal-case"]);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 2);
        assert!(!report.success);
    }

    #[test]
    fn findings_convert_to_diagnostics() {
        let report = lint("@Component struct A { }", "a.ets", &LintOpts::default());
        let diag = report.diagnostics[0].to_diagnostic();
        assert_eq!(diag.code_str(), Some("E0901"));
        assert_eq!(diag.primary_span(), Some(report.diagnostics[0].span));
    }

    #[test]
    fn json_report_names_rules() {
        let report = lint("@Component struct A { }", "a.ets", &LintOpts::default());
        let value: serde_json::Value = serde_json::from_str(&lint_json(&report)).unwrap();
        assert_eq!(value["diagnostics"][0]["rule"], "component/missing-build");
        assert_eq!(value["diagnostics"][0]["location"]["line"], 1);
    }
}
