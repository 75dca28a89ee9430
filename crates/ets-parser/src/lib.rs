// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for ETS source files.
//!
//! Transforms a token stream into an abstract syntax tree. Malformed input
//! never aborts the file: failed declarations, members, statements and UI
//! items become Error nodes and the errors are collected alongside the tree.

mod error;
mod grammar;
mod hints;
mod parser;
mod snapshot;

pub use error::{ParseError, ParseErrorKind};
pub use parser::{ParseResult, Parser, MAX_DEPTH, MAX_ERRORS};

use ets_ast::Module;
use ets_lexer::{LexError, Lexer};

/// Everything produced from one source text.
#[derive(Debug)]
pub struct SourceParse {
    pub module: Module,
    pub lex_errors: Vec<LexError>,
    pub errors: Vec<ParseError>,
}

impl SourceParse {
    pub fn is_ok(&self) -> bool {
        self.lex_errors.is_empty() && self.errors.is_empty()
    }
}

/// Lex and parse `source` in one step.
pub fn parse_source(source: &str) -> SourceParse {
    let lexed = Lexer::new(source).tokenize();
    tracing::trace!(tokens = lexed.tokens.len(), lex_errors = lexed.errors.len(), "lexed");
    let parsed = Parser::new(lexed.tokens).parse();
    SourceParse { module: parsed.module, lex_errors: lexed.errors, errors: parsed.errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ets_ast::decl::{DeclKind, DecoratedExportItem, ExportDecl, FnBody, MemberKind};
    use ets_ast::expr::{ArrowBody, ExprKind};
    use ets_ast::ui::{UiArgs, UiItemKind};
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> SourceParse {
        let result = parse_source(src);
        assert!(result.is_ok(), "{src}\nlex: {:?}\nparse: {:?}", result.lex_errors, result.errors);
        result
    }

    const COUNTER: &str = r#"
import { Header } from './header';

@Entry
@Component
struct Counter {
  @State count: number = 0;
  private step: number = 1;

  build() {
    Column({ space: 10 }) {
      Header({ title: 'Counter' });
      Text(`Count: ${this.count}`)
        .fontSize(24)
        .fontWeight(FontWeight.Bold)
      Button('+')
        .onClick(() => {
          this.count += this.step;
        })
    }
    .width('100%')
  }
}
"#;

    #[test]
    fn component_with_build() {
        let result = parse(COUNTER);
        assert_eq!(result.module.decls.len(), 2);
        let DeclKind::Component(component) = &result.module.decls[1].kind else {
            panic!("expected component, got {:?}", result.module.decls[1].kind);
        };
        assert_eq!(component.name, "Counter");
        let names: Vec<_> = component.decorators.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Entry", "Component"]);
        assert_eq!(component.members.len(), 3);

        let MemberKind::Build(build) = &component.members[2].kind else {
            panic!("expected build method");
        };
        let UiItemKind::Element(column) = &build.body.items[0].kind else {
            panic!("expected Column element");
        };
        assert_eq!(column.modifiers.as_ref().map(|m| m.names()), Some(vec!["width"]));
        let children = &column.body.as_ref().map(|b| b.items.len());
        assert_eq!(*children, Some(3));
    }

    #[test]
    fn decorated_export_keeps_decorators_outside() {
        let result = parse("@Component\nexport struct Card {\n  build() { Text('card') }\n}\n");
        match &result.module.decls[0].kind {
            DeclKind::DecoratedExport(export) => {
                assert_eq!(export.decorators[0].name, "Component");
                assert!(matches!(&export.item, DecoratedExportItem::Decl(decl) if matches!(decl.kind, DeclKind::Component(_))));
            }
            other => panic!("expected decorated export, got {other:?}"),
        }
    }

    #[test]
    fn decorated_function_bodies_are_ranked() {
        let src = "\
@Builder function row(label: string) { Text(label).fontSize(12) }
@Extend(Text) function title() { .fontSize(20).fontWeight(FontWeight.Bold) }
@Concurrent function work(n: number): number { return n * 2; }
function plain() { Text('not ui') }
";
        let result = parse(src);
        let bodies: Vec<_> = result
            .module
            .decls
            .iter()
            .map(|d| match &d.kind {
                DeclKind::Function(f) => match f.body {
                    FnBody::Builder(_) => "builder",
                    FnBody::Extend(_) => "extend",
                    FnBody::Block(_) => "block",
                },
                other => panic!("expected function, got {other:?}"),
            })
            .collect();
        assert_eq!(bodies, vec!["builder", "extend", "block", "block"]);
    }

    #[test]
    fn imports_and_exports() {
        let src = "\
import router from '@ohos.router';
import * as util from './util';
import { a, b as c } from './m';
import './side-effect';
export { a, c as d };
export * from './all';
export default class Store {}
export const LIMIT: number = 3;
";
        let result = parse(src);
        let kinds: Vec<_> = result
            .module
            .decls
            .iter()
            .map(|d| match &d.kind {
                DeclKind::Import(i) if i.default.is_some() => "default-import",
                DeclKind::Import(i) if i.namespace.is_some() => "namespace-import",
                DeclKind::Import(i) if !i.named.is_empty() => "named-import",
                DeclKind::Import(_) => "bare-import",
                DeclKind::Export(ExportDecl::Named { .. }) => "named-export",
                DeclKind::Export(ExportDecl::All { .. }) => "star-export",
                DeclKind::Export(ExportDecl::Default(_)) => "default-export",
                DeclKind::Export(ExportDecl::Decl(_)) => "decl-export",
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "default-import",
                "namespace-import",
                "named-import",
                "bare-import",
                "named-export",
                "star-export",
                "default-export",
                "decl-export",
            ]
        );
    }

    #[test]
    fn broken_declaration_is_replaced_and_parsing_resumes() {
        let result = parse_source("function (x) { }\nclass Ok {}\n");
        assert!(!result.errors.is_empty());
        assert!(matches!(result.module.decls[0].kind, DeclKind::Error(_)));
        assert!(matches!(result.module.decls.last().map(|d| &d.kind), Some(DeclKind::Class(c)) if c.name == "Ok"));
    }

    #[test]
    fn object_initializer_without_semicolon() {
        let result = parse_source("let x = { a: 1, b: 2 }");
        assert!(result.lex_errors.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].is_missing_terminator());
        assert!(matches!(result.module.decls[0].kind, DeclKind::Variable(_)));
    }

    #[test]
    fn modifier_chain_nests_right() {
        let result = parse("@Component struct A { build() { Text(\"hi\").fontSize(10).margin(5) } }");
        let DeclKind::Component(c) = &result.module.decls[0].kind else { panic!() };
        let MemberKind::Build(build) = &c.members[0].kind else { panic!() };
        let UiItemKind::Element(text) = &build.body.items[0].kind else { panic!() };
        let chain = text.modifiers.as_ref().expect("modifier chain");
        assert_eq!(chain.name, "fontSize");
        let rest = chain.rest.as_ref().expect("second segment");
        assert_eq!(rest.name, "margin");
        assert!(rest.rest.is_none());
    }

    #[test]
    fn for_each_arrow_body_is_an_element() {
        let result = parse("@Component struct L { build() { ForEach(items, (item) => Text(item)) } }");
        let DeclKind::Component(c) = &result.module.decls[0].kind else { panic!() };
        let MemberKind::Build(build) = &c.members[0].kind else { panic!() };
        let UiItemKind::ForEach(for_each) = &build.body.items[0].kind else { panic!() };
        let ExprKind::Arrow(arrow) = &for_each.item_builder.kind else { panic!() };
        assert!(matches!(&arrow.body, ArrowBody::Element(el) if el.name == "Text"));
    }

    #[test]
    fn custom_component_with_params() {
        let result = parse("@Component struct P { build() { Child({ a: 1, b: this.b, }); } }");
        let DeclKind::Component(c) = &result.module.decls[0].kind else { panic!() };
        let MemberKind::Build(build) = &c.members[0].kind else { panic!() };
        match &build.body.items[0].kind {
            UiItemKind::CustomComponent { name, args: UiArgs::Params(params) } => {
                assert_eq!(name, "Child");
                let keys: Vec<_> = params.entries.iter().map(|e| e.name.as_str()).collect();
                assert_eq!(keys, vec!["a", "b"]);
            }
            other => panic!("expected custom component, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_at_eof() {
        let result = parse_source("let a = 1;\nlet b = 'open");
        assert_eq!(result.lex_errors.len(), 1);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert!(matches!(&result.module.decls[0].kind, DeclKind::Variable(v) if v.declarators[0].name == "a"));
    }

    #[test]
    fn class_members_and_accessors() {
        let src = "\
export abstract class Repo<T> extends Base implements Store {
  private static readonly cache: Map<string, T> = new Map();
  constructor(private name: string) { super(); }
  get size(): number { return this.cache.size; }
  abstract load(id: string): Promise<T>;
  async save(item: T): Promise<void> { await this.flush(); }
}
";
        let result = parse(src);
        let DeclKind::Export(ExportDecl::Decl(inner)) = &result.module.decls[0].kind else { panic!() };
        let DeclKind::Class(class) = &inner.kind else { panic!() };
        assert!(class.is_abstract);
        assert_eq!(class.members.len(), 5);
        assert!(matches!(class.members[1].kind, MemberKind::Constructor(_)));
    }

    #[test]
    fn nesting_limit_ends_the_file_with_one_error() {
        let src = format!("const deep = {}1{};\nconst after = 2;", "(".repeat(10_000), ")".repeat(10_000));
        let result = parse_source(&src);
        assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
        assert_eq!(result.errors[0].message, "maximum nesting depth exceeded");
        assert!(matches!(result.module.decls.last().map(|d| &d.kind), Some(DeclKind::Error(_))));
    }

    #[test]
    fn nesting_limit_reaches_into_template_substitutions() {
        let src = format!("const t = `${{{}x{}}}`;", "[".repeat(400), "]".repeat(400));
        let result = parse_source(&src);
        assert!(result.lex_errors.is_empty(), "{:?}", result.lex_errors);
        assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
        assert!(result.errors[0].message.contains("nesting depth"));
    }

    #[test]
    fn error_limit_caps_collected_errors() {
        let src = "@ ".repeat(200);
        let result = parse_source(&src);
        assert!(result.errors.len() <= MAX_ERRORS);
    }
}
