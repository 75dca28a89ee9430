// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rule registry and dispatch.

use ets_ast::decl::Decl;

use crate::types::{LintDiagnostic, LintOpts};
use crate::{component, decorator, naming};

/// What every rule gets to look at.
pub struct LintContext<'a> {
    pub decls: &'a [Decl],
    pub source: &'a str,
    pub opts: &'a LintOpts,
}

/// A lint rule: id, check function.
struct Rule {
    id: &'static str,
    check: fn(&LintContext<'_>) -> Vec<LintDiagnostic>,
}

/// All registered rules, in reporting order.
fn all_rules() -> Vec<Rule> {
    vec![
        Rule { id: decorator::UNKNOWN, check: decorator::check_unknown },
        Rule { id: decorator::ARITY, check: decorator::check_arity },
        Rule { id: component::MISSING_BUILD, check: component::check_missing_build },
        Rule { id: component::MULTIPLE_BUILD, check: component::check_multiple_build },
        Rule { id: naming::COMPONENT_PASCAL_CASE, check: naming::check_component_pascal_case },
    ]
}

/// Ids of every registered rule.
pub fn rule_ids() -> Vec<&'static str> {
    all_rules().into_iter().map(|r| r.id).collect()
}

/// Run selected rules against declarations.
pub fn run_rules(cx: &LintContext<'_>) -> Vec<LintDiagnostic> {
    all_rules()
        .into_iter()
        .filter(|rule| should_run(rule.id, cx.opts))
        .flat_map(|rule| (rule.check)(cx))
        .collect()
}

/// Check if a rule should run based on include/exclude filters.
fn should_run(rule_id: &str, opts: &LintOpts) -> bool {
    // Exclude takes priority
    if opts.excludes.iter().any(|p| matches_rule(rule_id, p)) {
        return false;
    }
    opts.rules.is_empty() || opts.rules.iter().any(|p| matches_rule(rule_id, p))
}

/// Match a rule ID against a pattern: exact id, or `category/*`.
fn matches_rule(rule_id: &str, pattern: &str) -> bool {
    if pattern == rule_id {
        return true;
    }
    match pattern.strip_suffix("/*") {
        Some(prefix) => rule_id.split('/').next() == Some(prefix),
        None => false,
    }
}
