// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Component shape rules: exactly one `build()` per `struct`.

use crate::rules::LintContext;
use crate::types::{LintDiagnostic, Severity};
use crate::util;

pub const MISSING_BUILD: &str = "component/missing-build";
pub const MULTIPLE_BUILD: &str = "component/multiple-build";

/// component/missing-build
pub fn check_missing_build(cx: &LintContext<'_>) -> Vec<LintDiagnostic> {
    util::components(cx.decls)
        .filter(|(c, _)| !c.members.iter().any(util::is_build))
        .map(|(c, span)| {
            util::make_diagnostic(
                cx,
                MISSING_BUILD,
                "E0901",
                Severity::Error,
                format!("component `{}` has no `build()` method", c.name),
                "add `build() { ... }` describing the component's UI".to_string(),
                span,
            )
        })
        .collect()
}

/// component/multiple-build: reported at every `build()` after the first.
pub fn check_multiple_build(cx: &LintContext<'_>) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    for (c, _) in util::components(cx.decls) {
        for extra in c.members.iter().filter(|m| util::is_build(m)).skip(1) {
            diags.push(util::make_diagnostic(
                cx,
                MULTIPLE_BUILD,
                "E0902",
                Severity::Error,
                format!("component `{}` defines `build()` more than once", c.name),
                "merge the UI into a single `build()` method".to_string(),
                extra.span,
            ));
        }
    }
    diags
}
