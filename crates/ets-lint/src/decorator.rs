// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Decorator rules.
//!
//! The grammar accepts `@AnyName(any, args)`. These rules hold decorators
//! to the framework's set and to the argument counts the framework expects.

use ets_ast::decl::{Decl, Decorator, MemberKind};
use ets_diagnostics::suggestions;

use crate::rules::LintContext;
use crate::types::{LintDiagnostic, Severity};
use crate::util;

pub const UNKNOWN: &str = "decorator/unknown";
pub const ARITY: &str = "decorator/arity";

/// Framework decorators and how many arguments each takes, as
/// `(name, min, max)`; `None` means unbounded.
const KNOWN: &[(&str, usize, Option<usize>)] = &[
    // Components
    ("Entry", 0, Some(1)),
    ("Component", 0, Some(1)),
    ("ComponentV2", 0, Some(1)),
    // State management, first generation
    ("State", 0, Some(0)),
    ("Prop", 0, Some(0)),
    ("Link", 0, Some(0)),
    ("Provide", 0, Some(1)),
    ("Consume", 0, Some(1)),
    ("ObjectLink", 0, Some(0)),
    ("Observed", 0, Some(0)),
    ("Watch", 1, Some(1)),
    ("StorageLink", 1, Some(1)),
    ("StorageProp", 1, Some(1)),
    ("LocalStorageLink", 1, Some(1)),
    ("LocalStorageProp", 1, Some(1)),
    // State management, second generation
    ("Local", 0, Some(0)),
    ("Param", 0, Some(0)),
    ("Once", 0, Some(0)),
    ("Event", 0, Some(0)),
    ("Provider", 0, Some(1)),
    ("Consumer", 0, Some(1)),
    ("Monitor", 1, None),
    ("Computed", 0, Some(0)),
    ("Type", 1, Some(1)),
    ("ObservedV2", 0, Some(0)),
    ("Trace", 0, Some(0)),
    // UI building
    ("Builder", 0, Some(0)),
    ("BuilderParam", 0, Some(0)),
    ("LocalBuilder", 0, Some(0)),
    ("Styles", 0, Some(0)),
    ("Extend", 1, Some(1)),
    ("AnimatableExtend", 1, Some(1)),
    // Other
    ("Require", 0, Some(0)),
    ("Reusable", 0, Some(0)),
    ("Concurrent", 0, Some(0)),
    ("Track", 0, Some(0)),
];

fn known(name: &str) -> Option<(usize, Option<usize>)> {
    KNOWN.iter().find(|(n, _, _)| *n == name).map(|&(_, min, max)| (min, max))
}

/// Every decorator in the file, declarations first, then members.
fn all_decorators(decls: &[Decl]) -> Vec<&Decorator> {
    let on_decls = util::inner_decls(decls).flat_map(|d| d.decorators());
    let on_members = util::members(decls).flat_map(|m| match &m.kind {
        MemberKind::Property(p) => p.decorators.as_slice(),
        MemberKind::Method(m) => m.decorators.as_slice(),
        _ => &[],
    });
    let mut all: Vec<&Decorator> = on_decls.chain(on_members).collect();
    all.sort_by_key(|d| d.span.start);
    all
}

/// decorator/unknown: names outside the framework set and the configured
/// extras.
pub fn check_unknown(cx: &LintContext<'_>) -> Vec<LintDiagnostic> {
    let extras = &cx.opts.extra_decorators;
    all_decorators(cx.decls)
        .into_iter()
        .filter(|d| known(&d.name).is_none() && !extras.iter().any(|e| *e == d.name))
        .map(|d| {
            let candidates = KNOWN.iter().map(|(n, _, _)| *n).chain(extras.iter().map(String::as_str));
            let fix = match suggestions::closest(&d.name, candidates) {
                Some(close) => format!("did you mean `@{}`?", close),
                None => format!("add `{}` to the allowed custom decorators", d.name),
            };
            util::make_diagnostic(
                cx,
                UNKNOWN,
                "E0900",
                Severity::Warning,
                format!("unknown decorator `@{}`", d.name),
                fix,
                d.span,
            )
        })
        .collect()
}

/// decorator/arity: argument counts of framework decorators.
pub fn check_arity(cx: &LintContext<'_>) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    for d in all_decorators(cx.decls) {
        let Some((min, max)) = known(&d.name) else { continue };
        let count = d.args.as_ref().map_or(0, Vec::len);
        if count >= min && max.map_or(true, |max| count <= max) {
            continue;
        }
        let expected = match max {
            Some(max) if max == min => format!("exactly {}", min),
            Some(max) => format!("{} to {}", min, max),
            None => format!("at least {}", min),
        };
        diags.push(util::make_diagnostic(
            cx,
            ARITY,
            "E0904",
            Severity::Error,
            format!("`@{}` takes {} argument(s), found {}", d.name, expected, count),
            match max {
                Some(0) => format!("write `@{}` without arguments", d.name),
                _ => format!("pass {} argument(s) to `@{}`", expected, d.name),
            },
            d.span,
        ));
    }
    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LintOpts;
    use pretty_assertions::assert_eq;

    fn run(src: &str, check: fn(&LintContext<'_>) -> Vec<LintDiagnostic>, opts: &LintOpts) -> Vec<String> {
        let parse = ets_parser::parse_source(src);
        let cx = LintContext { decls: &parse.module.decls, source: src, opts };
        check(&cx).into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn unknown_decorators_on_decls_and_members() {
        let src = "@Componnt struct A { @Sate n: number = 0; build() {} }\n@Logged function f() {}";
        let found = run(src, check_unknown, &LintOpts::default());
        assert_eq!(
            found,
            vec!["unknown decorator `@Componnt`", "unknown decorator `@Sate`", "unknown decorator `@Logged`"]
        );
    }

    #[test]
    fn extra_decorators_are_accepted() {
        let opts = LintOpts { extra_decorators: vec!["Logged".to_string()], ..LintOpts::default() };
        assert!(run("@Logged function f() {}", check_unknown, &opts).is_empty());
    }

    #[test]
    fn decorated_export_is_checked_once() {
        let found = run("@Foo export struct A { build() {} }", check_unknown, &LintOpts::default());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn suggestion_names_the_closest_decorator() {
        let src = "@Componnt struct A { build() {} }";
        let parse = ets_parser::parse_source(src);
        let opts = LintOpts::default();
        let cx = LintContext { decls: &parse.module.decls, source: src, opts: &opts };
        assert_eq!(check_unknown(&cx)[0].fix, "did you mean `@Component`?");
    }

    #[test]
    fn argument_counts() {
        let src = "\
@Extend function a() { .width(1) }
@Extend(Text) function b() { .width(1) }
@Component struct C {
  @State(1) x: number = 0;
  @Watch('onChange') @Link y: number;
  @StorageLink() z: string = '';
  @Monitor('a', 'b') onA() {}
  build() {}
}";
        let found = run(src, check_arity, &LintOpts::default());
        assert_eq!(
            found,
            vec![
                "`@Extend` takes exactly 1 argument(s), found 0",
                "`@State` takes exactly 0 argument(s), found 1",
                "`@StorageLink` takes exactly 1 argument(s), found 0",
            ]
        );
    }
}
