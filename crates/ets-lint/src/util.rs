// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Shared helpers for lint rules.

use ets_ast::decl::{ComponentDecl, Decl, DeclKind, Member, MemberKind};
use ets_ast::{LineMap, Span};

use crate::rules::LintContext;
use crate::types::{LintDiagnostic, LintLocation, Severity};

/// Declarations with their `export` wrappers removed.
pub fn inner_decls(decls: &[Decl]) -> impl Iterator<Item = &Decl> {
    decls.iter().map(Decl::unwrap_export)
}

/// Every component with the span of its declaration.
pub fn components(decls: &[Decl]) -> impl Iterator<Item = (&ComponentDecl, Span)> {
    inner_decls(decls).filter_map(|d| match &d.kind {
        DeclKind::Component(c) => Some((c, d.span)),
        _ => None,
    })
}

/// Members of every component and class.
pub fn members(decls: &[Decl]) -> impl Iterator<Item = &Member> {
    inner_decls(decls).flat_map(|d| match &d.kind {
        DeclKind::Component(c) => c.members.as_slice(),
        DeclKind::Class(c) => c.members.as_slice(),
        _ => &[],
    })
}

pub fn is_build(member: &Member) -> bool {
    matches!(member.kind, MemberKind::Build(_))
}

pub fn make_diagnostic(
    cx: &LintContext<'_>,
    rule: &str,
    code: &'static str,
    severity: Severity,
    message: String,
    fix: String,
    span: Span,
) -> LintDiagnostic {
    let line_map = LineMap::new(cx.source);
    let (line, column) = line_map.offset_to_line_col(span.start);
    let source_line = line_map.line_text(cx.source, line).unwrap_or("").to_string();

    LintDiagnostic {
        rule: rule.to_string(),
        code,
        severity,
        message,
        span,
        location: LintLocation { line: line as usize, column: column as usize, source_line },
        fix,
    }
}
