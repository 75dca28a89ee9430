// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type annotations.
//!
//! Precedence, loosest first: conditional, union, array suffix, primary.
//! While a split `>>` still owes a `>`, no suffix may attach: the type that
//! just ended is closed by that pending `>`.

use ets_ast::token::TokenKind;
use ets_ast::ty::{TypeExpr, TypeKind, TypeLiteral, TypeMember, TypeMemberKind, TypeParam};

use crate::error::ParseError;
use crate::parser::Parser;

impl Parser {
    /// A complete type, outside of any generic list.
    pub fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let ty = self.parse_type_arg()?;
        if self.pending_gt > 0 {
            self.pending_gt = 0;
            return Err(ParseError::syntax("Unexpected '>' after type", ty.span));
        }
        Ok(ty)
    }

    fn mk_type(&mut self, kind: TypeKind, start: usize) -> TypeExpr {
        TypeExpr { id: self.next_id(), kind, span: self.span_from(start) }
    }

    /// A type that may sit inside `<...>`.
    pub(crate) fn parse_type_arg(&mut self) -> Result<TypeExpr, ParseError> {
        self.nested(Self::parse_type_arg_inner)
    }

    fn parse_type_arg_inner(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current().span.start;
        let check = self.parse_union_type()?;
        if self.pending_gt > 0 || !self.check(&TokenKind::Extends) {
            return Ok(check);
        }

        self.advance();
        let extends = self.parse_union_type()?;
        self.expect(&TokenKind::Question)?;
        let then_ty = self.parse_type_arg()?;
        self.expect(&TokenKind::Colon)?;
        let else_ty = self.parse_type_arg()?;
        Ok(self.mk_type(
            TypeKind::Conditional {
                check: Box::new(check),
                extends: Box::new(extends),
                then_ty: Box::new(then_ty),
                else_ty: Box::new(else_ty),
            },
            start,
        ))
    }

    fn parse_union_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current().span.start;
        self.match_token(&TokenKind::Pipe);
        let first = self.parse_array_type()?;
        if self.pending_gt > 0 || !self.check(&TokenKind::Pipe) {
            return Ok(first);
        }

        let mut members = vec![first];
        while self.pending_gt == 0 && self.match_token(&TokenKind::Pipe) {
            members.push(self.parse_array_type()?);
        }
        Ok(self.mk_type(TypeKind::Union(members), start))
    }

    fn parse_array_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current().span.start;
        let mut ty = self.parse_primary_type()?;
        while self.pending_gt == 0
            && self.check(&TokenKind::LBracket)
            && matches!(self.peek(1), TokenKind::RBracket)
        {
            self.advance();
            self.advance();
            ty = self.mk_type(TypeKind::Array(Box::new(ty)), start);
        }
        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind().clone() {
            // `(a: A) => R` is tried before `(T)`.
            TokenKind::LParen => {
                return self.first_of("type", &[Self::parse_function_type, Self::parse_paren_type]);
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.check(&TokenKind::RBracket) && !self.at_end() {
                    elements.push(self.parse_type()?);
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBracket)?;
                TypeKind::Tuple(elements)
            }
            TokenKind::LBrace => TypeKind::Object(self.parse_type_members()?),
            TokenKind::String(s) => {
                self.advance();
                TypeKind::Literal(TypeLiteral::String(s))
            }
            TokenKind::Number(n) => {
                self.advance();
                TypeKind::Literal(TypeLiteral::Number(n))
            }
            TokenKind::Minus if matches!(self.peek(1), TokenKind::Number(_)) => {
                self.advance();
                let n = match self.advance().kind {
                    TokenKind::Number(n) => n,
                    _ => 0.0,
                };
                TypeKind::Literal(TypeLiteral::Number(-n))
            }
            TokenKind::Bool(b) => {
                self.advance();
                TypeKind::Literal(TypeLiteral::Bool(b))
            }
            TokenKind::Null | TokenKind::Void | TokenKind::This => {
                let name = self.expect_name()?;
                TypeKind::Named { path: vec![name], args: Vec::new() }
            }
            TokenKind::Typeof => {
                self.advance();
                let mut path = vec![self.expect_name()?];
                while self.check(&TokenKind::Dot) && self.peek_is_name(1) {
                    self.advance();
                    path.push(self.expect_name()?);
                }
                TypeKind::Typeof(path)
            }
            TokenKind::Ident(word) if word == "keyof" && !matches!(self.peek(1), TokenKind::Dot | TokenKind::Lt) && self.peek_starts_type(1) => {
                self.advance();
                TypeKind::Keyof(Box::new(self.nested(Self::parse_array_type)?))
            }
            TokenKind::Ident(first) => {
                self.advance();
                let mut path = vec![first];
                while self.check(&TokenKind::Dot) && self.peek_is_name(1) {
                    self.advance();
                    path.push(self.expect_name()?);
                }
                let args = if self.check(&TokenKind::Lt) { self.parse_type_args()? } else { Vec::new() };
                TypeKind::Named { path, args }
            }
            _ => return Err(self.error_expected("type")),
        };

        Ok(self.mk_type(kind, start))
    }

    fn peek_starts_type(&self, n: usize) -> bool {
        matches!(
            self.peek(n),
            TokenKind::Ident(_) | TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace |
            TokenKind::Typeof | TokenKind::This
        )
    }

    /// `(a: A, b?: B) => R`
    fn parse_function_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current().span.start;
        if !matches!(self.after_closer(self.pos), Some(TokenKind::FatArrow)) {
            return Err(self.error_expected("'=>'"));
        }
        let params = self.parse_params()?;
        self.expect(&TokenKind::FatArrow)?;
        let ret = self.parse_type_arg()?;
        Ok(self.mk_type(TypeKind::Function { params, ret: Box::new(ret) }, start))
    }

    fn parse_paren_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current().span.start;
        self.expect(&TokenKind::LParen)?;
        let inner = self.parse_type()?;
        self.expect(&TokenKind::RParen)?;
        Ok(self.mk_type(TypeKind::Paren(Box::new(inner)), start))
    }

    /// `<A, B<C>>`, starting at the `<`.
    pub(crate) fn parse_type_args(&mut self) -> Result<Vec<TypeExpr>, ParseError> {
        self.expect(&TokenKind::Lt)?;
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type_arg()?);
            if self.pending_gt > 0 || !self.match_token(&TokenKind::Comma) {
                break;
            }
            if self.check(&TokenKind::Gt) {
                break;
            }
        }
        self.expect_gt_in_generic()?;
        Ok(args)
    }

    /// Optional `<T extends U = D, ...>` on a declaration.
    pub(crate) fn parse_type_params(&mut self) -> Result<Vec<TypeParam>, ParseError> {
        if !self.match_token(&TokenKind::Lt) {
            return Ok(Vec::new());
        }

        let mut params = Vec::new();
        loop {
            let start = self.current().span.start;
            let name = self.expect_ident()?;
            let constraint = if self.match_token(&TokenKind::Extends) { Some(self.parse_type_arg()?) } else { None };
            let default = if self.pending_gt == 0 && self.match_token(&TokenKind::Eq) {
                Some(self.parse_type_arg()?)
            } else {
                None
            };
            params.push(TypeParam { name, constraint, default, span: self.span_from(start) });

            if self.pending_gt > 0 || !self.match_token(&TokenKind::Comma) {
                break;
            }
            if self.check(&TokenKind::Gt) {
                break;
            }
        }
        self.expect_gt_in_generic()?;
        Ok(params)
    }

    /// `: Type` after a signature, also accepting a predicate `x is T`.
    pub(crate) fn parse_return_type(&mut self) -> Result<Option<TypeExpr>, ParseError> {
        if !self.match_token(&TokenKind::Colon) {
            return Ok(None);
        }
        if self.check_ident() && self.peek_word(1, "is") {
            self.advance();
            self.advance();
        }
        Ok(Some(self.parse_type()?))
    }

    /// `{ a: T; readonly b?: U, m(x: X): R; [key: string]: V }`
    pub(crate) fn parse_type_members(&mut self) -> Result<Vec<TypeMember>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();
        loop {
            while self.match_token(&TokenKind::Semi) || self.match_token(&TokenKind::Comma) {}
            if self.check(&TokenKind::RBrace) || self.at_end() {
                break;
            }
            members.push(self.parse_type_member()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(members)
    }

    fn parse_type_member(&mut self) -> Result<TypeMember, ParseError> {
        let start = self.current().span.start;
        let readonly = self.check_word("readonly")
            && (self.peek_is_name(1) || matches!(self.peek(1), TokenKind::LBracket | TokenKind::String(_)));
        if readonly {
            self.advance();
        }

        let name = match self.current_kind().clone() {
            // Index signature, kept under its bracketed spelling.
            TokenKind::LBracket => {
                self.advance();
                let key = self.expect_name()?;
                self.expect(&TokenKind::Colon)?;
                self.parse_type()?;
                self.expect(&TokenKind::RBracket)?;
                format!("[{key}]")
            }
            TokenKind::String(s) => {
                self.advance();
                s
            }
            TokenKind::Number(n) => {
                self.advance();
                n.to_string()
            }
            _ => self.expect_name()?,
        };
        let optional = self.match_token(&TokenKind::Question);

        let kind = if self.check(&TokenKind::LParen) || self.check(&TokenKind::Lt) {
            let type_params = self.parse_type_params()?;
            let params = self.parse_params()?;
            let ret_ty = self.parse_return_type()?;
            TypeMemberKind::Method { name, optional, type_params, params, ret_ty }
        } else {
            let ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type()?) } else { None };
            TypeMemberKind::Property { name, readonly, optional, ty }
        };
        Ok(TypeMember { kind, span: self.span_from(start) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use pretty_assertions::assert_eq;

    fn parser(src: &str) -> Parser {
        Parser::new(ets_lexer::Lexer::new(src).tokenize().tokens)
    }

    fn ty(src: &str) -> TypeExpr {
        let mut p = parser(src);
        let t = p.parse_type().unwrap_or_else(|e| panic!("{src}: {e}"));
        assert!(p.at_end(), "{src}: trailing input");
        t
    }

    fn show(t: &TypeExpr) -> String {
        match &t.kind {
            TypeKind::Named { path, args } if args.is_empty() => path.join("."),
            TypeKind::Named { path, args } => {
                format!("{}<{}>", path.join("."), args.iter().map(show).collect::<Vec<_>>().join(", "))
            }
            TypeKind::Array(inner) => format!("{}[]", show(inner)),
            TypeKind::Union(members) => format!("({})", members.iter().map(show).collect::<Vec<_>>().join(" | ")),
            TypeKind::Function { params, ret } => format!("fn/{} -> {}", params.len(), show(ret)),
            TypeKind::Paren(inner) => format!("[{}]", show(inner)),
            TypeKind::Literal(TypeLiteral::String(s)) => format!("{s:?}"),
            TypeKind::Literal(TypeLiteral::Number(n)) => n.to_string(),
            TypeKind::Keyof(inner) => format!("keyof {}", show(inner)),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn nested_generics_split_shift_tokens() {
        assert_eq!(show(&ty("Map<string, Array<number>>")), "Map<string, Array<number>>");
        assert_eq!(show(&ty("A<B<C<D>>>")), "A<B<C<D>>>");
    }

    #[test]
    fn union_and_array_suffix() {
        assert_eq!(show(&ty("string | number[] | null")), "(string | number[] | null)");
        assert_eq!(show(&ty("| 'a' | 'b'")), "(\"a\" | \"b\")");
        assert_eq!(show(&ty("(string | number)[]")), "[(string | number)][]");
    }

    #[test]
    fn paren_type_against_function_type() {
        assert_eq!(show(&ty("(a: number, b?: string) => void")), "fn/2 -> void");
        assert_eq!(show(&ty("() => Promise<void>")), "fn/0 -> Promise<void>");
        assert_eq!(show(&ty("(T)")), "[T]");
    }

    #[test]
    fn unparseable_parenthesized_type_exhausts_alternatives() {
        let err = parser("(=)").parse_type().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::AmbiguityExhausted);
        assert_eq!(err.span.start, 0);
    }

    #[test]
    fn conditional_and_keyof() {
        let t = ty("T extends string ? 'y' : 'n'");
        assert!(matches!(t.kind, TypeKind::Conditional { .. }));
        assert_eq!(show(&ty("keyof T")), "keyof T");
        assert_eq!(show(&ty("keyof")), "keyof");
    }

    #[test]
    fn literal_and_qualified_types() {
        assert_eq!(show(&ty("-1")), "-1");
        assert_eq!(show(&ty("ns.Inner.Type")), "ns.Inner.Type");
        assert!(matches!(ty("typeof a.b").kind, TypeKind::Typeof(ref p) if p.len() == 2));
        assert!(matches!(ty("[number, string]").kind, TypeKind::Tuple(ref e) if e.len() == 2));
    }

    #[test]
    fn object_type_members() {
        let t = ty("{ readonly a: number; b?: string, m(x: number): void; [key: string]: any }");
        let TypeKind::Object(members) = t.kind else { panic!("expected object type") };
        assert_eq!(members.len(), 4);
        assert!(matches!(members[0].kind, TypeMemberKind::Property { readonly: true, .. }));
        assert!(matches!(members[1].kind, TypeMemberKind::Property { optional: true, .. }));
        assert!(matches!(members[2].kind, TypeMemberKind::Method { .. }));
        assert!(matches!(members[3].kind, TypeMemberKind::Property { ref name, .. } if name == "[key]"));
    }

    #[test]
    fn stray_closing_angle_is_rejected() {
        let err = parser("A<B>>").parse_type().unwrap_err();
        assert_eq!(err.message, "Unexpected '>' after type");
    }

    #[test]
    fn type_params_with_constraint_and_default() {
        let mut p = parser("<T extends Base = Default, U>");
        let params = p.parse_type_params().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].constraint.as_ref().and_then(|c| c.simple_name()).as_deref(), Some("Base"));
        assert_eq!(params[0].default.as_ref().and_then(|c| c.simple_name()).as_deref(), Some("Default"));
        assert!(p.at_end());
    }
}
