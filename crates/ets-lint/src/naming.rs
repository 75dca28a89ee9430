// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Naming conventions.

use crate::rules::LintContext;
use crate::types::{LintDiagnostic, Severity};
use crate::util;

pub const COMPONENT_PASCAL_CASE: &str = "naming/component-pascal-case";

fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// naming/component-pascal-case: component names start uppercase and have
/// no underscores.
pub fn check_component_pascal_case(cx: &LintContext<'_>) -> Vec<LintDiagnostic> {
    util::components(cx.decls)
        .filter(|(c, _)| !c.name.starts_with(|ch: char| ch.is_ascii_uppercase()) || c.name.contains('_'))
        .map(|(c, span)| {
            util::make_diagnostic(
                cx,
                COMPONENT_PASCAL_CASE,
                "E0903",
                Severity::Warning,
                format!("component name `{}` should be PascalCase", c.name),
                format!("rename to `{}`", to_pascal_case(&c.name)),
                span,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LintOpts;
    use pretty_assertions::assert_eq;

    #[test]
    fn pascal_case_conversion() {
        assert_eq!(to_pascal_case("my_card"), "MyCard");
        assert_eq!(to_pascal_case("card"), "Card");
        assert_eq!(to_pascal_case("Card"), "Card");
    }

    #[test]
    fn flags_lowercase_and_snake_case_names() {
        let src = "@Component struct card { build() {} }\n@Component struct Good_Name { build() {} }\n@Component struct Fine { build() {} }";
        let parse = ets_parser::parse_source(src);
        let opts = LintOpts::default();
        let cx = LintContext { decls: &parse.module.decls, source: src, opts: &opts };
        let fixes: Vec<_> = check_component_pascal_case(&cx).into_iter().map(|d| d.fix).collect();
        assert_eq!(fixes, vec!["rename to `Card`", "rename to `GoodName`"]);
    }
}
