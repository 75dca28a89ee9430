// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The UI sublanguage: build bodies, elements, modifier chains and UI-scoped
//! control flow.
//!
//! Items in a UI body are tried in a fixed order: UI `if`, `ForEach` and
//! `LazyForEach`, element or custom-component invocation, and finally a
//! plain expression statement.

use ets_ast::expr::{ArrowBody, ArrowFn, Expr, ExprKind};
use ets_ast::token::TokenKind;
use ets_ast::ui::{
    ComponentParam, ComponentParams, ForEach, ModifierChain, UiArgs, UiBody, UiElement, UiElse, UiIf, UiItem,
    UiItemKind,
};

use crate::error::ParseError;
use crate::parser::Parser;

impl Parser {
    /// `{ item* }` in a build method, container, builder or UI branch.
    pub(crate) fn parse_ui_body(&mut self) -> Result<UiBody, ParseError> {
        self.nested(Self::parse_ui_body_inner)
    }

    fn parse_ui_body_inner(&mut self) -> Result<UiBody, ParseError> {
        let start = self.current().span.start;
        self.expect(&TokenKind::LBrace)?;
        let mut items = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.match_token(&TokenKind::Semi) {
                continue;
            }
            let item_pos = self.pos;
            let item_start = self.current().span.start;
            match self.parse_ui_item() {
                Ok(item) => items.push(item),
                Err(e) => {
                    let message = e.message.clone();
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize_in_block(item_pos);
                    items.push(UiItem {
                        id: self.next_id(),
                        kind: UiItemKind::Error(message),
                        span: self.span_from(item_start),
                    });
                }
            }
        }

        self.close_brace()?;
        Ok(UiBody { items, span: self.span_from(start) })
    }

    fn parse_ui_item(&mut self) -> Result<UiItem, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind() {
            TokenKind::If => UiItemKind::If(self.parse_ui_if()?),
            TokenKind::Ident(name)
                if (name == "ForEach" || name == "LazyForEach") && matches!(self.peek(1), TokenKind::LParen) =>
            {
                match self.speculate("ForEach", Self::parse_for_each) {
                    Some(for_each) => UiItemKind::ForEach(for_each),
                    None => UiItemKind::Expr(self.parse_expr_stmt()?),
                }
            }
            TokenKind::Ident(_) if matches!(self.peek(1), TokenKind::LParen | TokenKind::LBrace) => {
                self.parse_ui_invocation(start)?
            }
            _ => UiItemKind::Expr(self.parse_expr_stmt()?),
        };

        Ok(UiItem { id: self.next_id(), kind, span: self.span_from(start) })
    }

    /// `Name(args);` is a custom component statement; anything else headed
    /// by `Name(` or `Name {` is an element.
    fn parse_ui_invocation(&mut self, start: usize) -> Result<UiItemKind, ParseError> {
        let name = self.expect_ident()?;

        if self.check(&TokenKind::LParen) && matches!(self.after_closer(self.pos), Some(TokenKind::Semi)) {
            let args = self.parse_ui_args()?;
            self.expect(&TokenKind::Semi)?;
            return Ok(UiItemKind::CustomComponent { name, args });
        }

        let element = self.parse_ui_element_rest(name, start)?;
        self.match_token(&TokenKind::Semi);
        Ok(UiItemKind::Element(element))
    }

    /// Everything after an element's name: arguments, child body, modifiers.
    fn parse_ui_element_rest(&mut self, name: String, start: usize) -> Result<UiElement, ParseError> {
        let args = if self.check(&TokenKind::LParen) { Some(self.parse_ui_args()?) } else { None };
        let body = if self.check(&TokenKind::LBrace) { Some(self.parse_ui_body()?) } else { None };
        let modifiers = self.parse_modifier_chain()?;
        Ok(UiElement { name, args, body, modifiers, span: self.span_from(start) })
    }

    /// A lone `{...}` argument is read as component parameters when it fits
    /// that restricted shape, otherwise as ordinary arguments.
    fn parse_ui_args(&mut self) -> Result<UiArgs, ParseError> {
        let single_object = matches!(self.peek(1), TokenKind::LBrace)
            && self
                .closer_of(self.pos + 1)
                .and_then(|close| self.tokens.get(close + 1))
                .is_some_and(|t| matches!(t.kind, TokenKind::RParen));
        if single_object {
            if let Some(params) = self.speculate("component parameters", Self::parse_component_params) {
                return Ok(UiArgs::Params(params));
            }
        }
        Ok(UiArgs::Exprs(self.parse_args()?))
    }

    /// `({ key: value, ... })`: values only, trailing comma allowed.
    fn parse_component_params(&mut self) -> Result<ComponentParams, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let start = self.current().span.start;
        self.expect(&TokenKind::LBrace)?;

        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let entry_start = self.current().span.start;
            let name = self.expect_name()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_expr()?;
            entries.push(ComponentParam { name, value, span: self.span_from(entry_start) });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        let span = self.span_from(start);
        self.expect(&TokenKind::RParen)?;
        Ok(ComponentParams { entries, span })
    }

    /// Greedy `.name(args?)` segments; `None` when there are none.
    pub(crate) fn parse_modifier_chain(&mut self) -> Result<Option<ModifierChain>, ParseError> {
        let mut segments = Vec::new();
        while self.check(&TokenKind::Dot) {
            let start = self.current().span.start;
            self.advance();
            let name = self.expect_name()?;
            let args = if self.check(&TokenKind::LParen) { Some(self.parse_args()?) } else { None };
            segments.push((name, args, self.span_from(start)));
        }
        Ok(ModifierChain::from_segments(segments))
    }

    /// Body of an `@Extend`/`@Styles` function: one or more modifier chains,
    /// each optionally followed by `;`.
    pub(crate) fn parse_extend_body(&mut self) -> Result<Vec<ModifierChain>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut chains = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            match self.parse_modifier_chain()? {
                Some(chain) => chains.push(chain),
                None => return Err(self.error_expected("a modifier chain")),
            }
            self.match_token(&TokenKind::Semi);
        }
        if chains.is_empty() {
            return Err(self.error_expected("a modifier chain"));
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(chains)
    }

    fn parse_ui_if(&mut self) -> Result<UiIf, ParseError> {
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let then_body = self.parse_ui_body()?;

        let else_branch = if self.match_token(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                Some(UiElse::If(Box::new(self.parse_ui_if()?)))
            } else {
                Some(UiElse::Body(self.parse_ui_body()?))
            }
        } else {
            None
        };
        Ok(UiIf { cond, then_body, else_branch })
    }

    /// `ForEach(source, itemBuilder, key?)`, with or without `Lazy`.
    fn parse_for_each(&mut self) -> Result<ForEach, ParseError> {
        let lazy = self.check_word("LazyForEach");
        self.advance();
        self.expect(&TokenKind::LParen)?;

        let source = self.parse_expr()?;
        self.expect(&TokenKind::Comma)?;
        let item_builder = self.parse_item_builder()?;
        let key = if self.match_token(&TokenKind::Comma) && !self.check(&TokenKind::RParen) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.match_token(&TokenKind::Comma);
        self.expect(&TokenKind::RParen)?;
        self.match_token(&TokenKind::Semi);

        Ok(ForEach { lazy, source, item_builder, key })
    }

    /// The item builder arrow. Its body is a UI body, a single element, or
    /// failing both an ordinary expression.
    fn parse_item_builder(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        let is_async = self.check_word("async") && matches!(self.peek(1), TokenKind::Ident(_) | TokenKind::LParen);
        let head = if is_async { self.pos + 1 } else { self.pos };
        let is_arrow = match self.tokens.get(head).map(|t| &t.kind) {
            Some(TokenKind::Ident(_)) => matches!(self.tokens.get(head + 1).map(|t| &t.kind), Some(TokenKind::FatArrow)),
            Some(TokenKind::LParen) => self.paren_starts_arrow(head),
            _ => false,
        };
        if !is_arrow {
            return Err(self.error_expected("an item builder arrow function"));
        }
        if is_async {
            self.advance();
        }

        let (params, ret_ty) = self.parse_arrow_head()?;
        let body = if self.check(&TokenKind::LBrace) {
            ArrowBody::Ui(self.parse_ui_body()?)
        } else if let Some(element) = self.speculate("element arrow body", Self::parse_single_element) {
            ArrowBody::Element(Box::new(element))
        } else {
            ArrowBody::Expr(Box::new(self.parse_expr()?))
        };

        let arrow = ArrowFn { is_async, params, ret_ty, body };
        Ok(Expr { id: self.next_id(), kind: ExprKind::Arrow(Box::new(arrow)), span: self.span_from(start) })
    }

    /// One element that must end right where the builder argument ends.
    fn parse_single_element(&mut self) -> Result<UiElement, ParseError> {
        let start = self.current().span.start;
        let name = self.expect_ident()?;
        if !self.check(&TokenKind::LParen) && !self.check(&TokenKind::LBrace) {
            return Err(self.error_expected("'('"));
        }
        let element = self.parse_ui_element_rest(name, start)?;
        if !matches!(self.current_kind(), TokenKind::Comma | TokenKind::RParen) {
            return Err(self.error_expected("',' or ')'"));
        }
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ui(src: &str) -> UiBody {
        let mut p = Parser::new(ets_lexer::Lexer::new(src).tokenize().tokens);
        let body = p.parse_ui_body().unwrap_or_else(|e| panic!("{src}: {e}"));
        assert!(p.errors.is_empty(), "{src}: {:?}", p.errors);
        body
    }

    fn element(item: &UiItem) -> &UiElement {
        match &item.kind {
            UiItemKind::Element(el) => el,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn element_with_children_and_modifiers() {
        let body = ui("{ Column({ space: 8 }) { Text('a') } .width('100%').height(40) }");
        let column = element(&body.items[0]);
        assert_eq!(column.name, "Column");
        assert!(matches!(column.args, Some(UiArgs::Params(ref p)) if p.entries[0].name == "space"));
        assert_eq!(column.body.as_ref().map(|b| b.items.len()), Some(1));
        assert_eq!(column.modifiers.as_ref().map(|m| m.names()), Some(vec!["width", "height"]));
    }

    #[test]
    fn call_followed_by_semicolon_is_a_custom_component() {
        let body = ui("{ Child({ count: this.count }); Text('x').fontSize(1); }");
        assert!(matches!(&body.items[0].kind, UiItemKind::CustomComponent { name, .. } if name == "Child"));
        assert!(matches!(&body.items[1].kind, UiItemKind::Element(_)));
    }

    #[test]
    fn object_argument_with_shorthand_falls_back_to_expressions() {
        let body = ui("{ Child({ count }) }");
        let child = element(&body.items[0]);
        match &child.args {
            Some(UiArgs::Exprs(args)) => assert!(matches!(args[0].kind, ExprKind::Object(_))),
            other => panic!("expected plain arguments, got {other:?}"),
        }
    }

    #[test]
    fn ui_if_chains() {
        let body = ui("{ if (a) { Text('a') } else if (b) { Text('b') } else { Text('c') } }");
        match &body.items[0].kind {
            UiItemKind::If(ui_if) => match &ui_if.else_branch {
                Some(UiElse::If(inner)) => assert!(matches!(inner.else_branch, Some(UiElse::Body(_)))),
                other => panic!("expected else-if, got {other:?}"),
            },
            other => panic!("expected UI if, got {other:?}"),
        }
    }

    #[test]
    fn for_each_with_ui_body_and_key() {
        let body = ui("{ ForEach(this.items, (item: string, i: number) => { Text(item) }, (item: string) => item) }");
        match &body.items[0].kind {
            UiItemKind::ForEach(fe) => {
                assert!(!fe.lazy);
                assert!(fe.key.is_some());
                assert!(matches!(&fe.item_builder.kind, ExprKind::Arrow(a) if matches!(a.body, ArrowBody::Ui(_))));
            }
            other => panic!("expected ForEach, got {other:?}"),
        }
    }

    #[test]
    fn async_item_builder() {
        let body = ui("{ ForEach(this.xs, async (x) => { Text(x) }) ForEach(this.ys, async y => Text(y)) }");
        for item in &body.items {
            match &item.kind {
                UiItemKind::ForEach(fe) => match &fe.item_builder.kind {
                    ExprKind::Arrow(a) => {
                        assert!(a.is_async);
                        assert_eq!(a.params.len(), 1);
                    }
                    other => panic!("expected arrow, got {other:?}"),
                },
                other => panic!("expected ForEach, got {other:?}"),
            }
        }
        let first = &body.items[0];
        assert!(matches!(first.kind, UiItemKind::ForEach(ref fe) if matches!(&fe.item_builder.kind, ExprKind::Arrow(a) if matches!(a.body, ArrowBody::Ui(_)))));
    }

    #[test]
    fn parameter_named_async_is_not_a_modifier() {
        let body = ui("{ ForEach(this.xs, async => Text(async)) }");
        match &body.items[0].kind {
            UiItemKind::ForEach(fe) => {
                assert!(matches!(&fe.item_builder.kind, ExprKind::Arrow(a) if !a.is_async && a.params[0].name == "async"));
            }
            other => panic!("expected ForEach, got {other:?}"),
        }
    }

    #[test]
    fn deeply_nested_builders_stop_at_the_limit() {
        let n = 400;
        let src = format!("{{ {} Text('x') {} }}", "Row() { ForEach(a, (i) => Row() {".repeat(n), "}) }".repeat(n));
        let mut p = Parser::new(ets_lexer::Lexer::new(&src).tokenize().tokens);
        let _ = p.parse_ui_body();
        assert_eq!(p.errors.len(), 1, "{:?}", p.errors);
        assert!(p.errors[0].message.contains("nesting depth"));
        assert_eq!(p.depth, 0);
    }

    #[test]
    fn lazy_for_each_with_expression_body() {
        let body = ui("{ LazyForEach(this.source, item => this.renderRow(item)) }");
        match &body.items[0].kind {
            UiItemKind::ForEach(fe) => {
                assert!(fe.lazy);
                assert!(matches!(&fe.item_builder.kind, ExprKind::Arrow(a) if matches!(a.body, ArrowBody::Expr(_))));
            }
            other => panic!("expected ForEach, got {other:?}"),
        }
    }

    #[test]
    fn expression_statements_inside_ui_bodies() {
        let body = ui("{ this.header(); Divider() }");
        assert!(matches!(body.items[0].kind, UiItemKind::Expr(_)));
        assert!(matches!(body.items[1].kind, UiItemKind::Element(_)));
    }

    #[test]
    fn extend_body_holds_chains() {
        let mut p = Parser::new(ets_lexer::Lexer::new("{ .fontSize(12).fontColor(Color.Red); .margin(4) }").tokenize().tokens);
        let chains = p.parse_extend_body().unwrap();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].names(), vec!["fontSize", "fontColor"]);
    }

    #[test]
    fn bad_item_becomes_error_item() {
        let mut p = Parser::new(ets_lexer::Lexer::new("{ Text('a') ) oops; Text('b') }").tokenize().tokens);
        let body = p.parse_ui_body().unwrap();
        assert_eq!(p.errors.len(), 1);
        assert!(matches!(body.items[1].kind, UiItemKind::Error(_)));
        assert!(matches!(body.items.last().map(|i| &i.kind), Some(UiItemKind::Element(_))));
    }
}
