// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Properties that must hold for any input, valid or not.

use ets_parser::{parse_source, MAX_ERRORS};
use proptest::prelude::*;

/// Fragments that steer random input toward interesting grammar.
fn ets_soup() -> impl Strategy<Value = String> {
    let atoms = prop::sample::select(vec![
        "@Component", "struct", "S", "build", "(", ")", "{", "}", "[", "]", "<", ">", ">>", "=>", ".", ",",
        ";", ":", "=", "let", "x", "if", "else", "ForEach", "Text", "'s'", "`t${", "1", "as", "new", "?",
        "function", "class", "import", "export", "from", "$x", "$r", "\n",
    ]);
    prop::collection::vec(atoms, 0..60).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn never_panics_on_arbitrary_text(src in "\\PC{0,200}") {
        let result = parse_source(&src);
        prop_assert!(result.errors.len() <= MAX_ERRORS);
    }

    #[test]
    fn never_panics_on_token_soup(src in ets_soup()) {
        let result = parse_source(&src);
        prop_assert!(result.errors.len() <= MAX_ERRORS);
        for decl in &result.module.decls {
            prop_assert!(decl.span.start <= decl.span.end);
            prop_assert!(decl.span.end <= src.len());
        }
    }

    #[test]
    fn parsing_is_deterministic(src in ets_soup()) {
        let first = parse_source(&src);
        let second = parse_source(&src);
        prop_assert_eq!(format!("{:?}", first.module), format!("{:?}", second.module));
        prop_assert_eq!(format!("{:?}", first.errors), format!("{:?}", second.errors));
    }
}
