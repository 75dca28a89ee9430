// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expressions: a Pratt loop over the binding powers below.
//!
//! Each precedence level `n` binds at `2n` on the left and `2n + 1` for the
//! right operand of a left-associative operator. Right-associative levels
//! use the same power on both sides. `as` sits at 33, between relational
//! (32/33) and shift (34/35).

use ets_ast::decl::Param;
use ets_ast::expr::{
    ArrowBody, ArrowFn, AssignOp, BinOp, Expr, ExprKind, FnExpr, ObjectMember, PropKey,
    TemplateElement, UnaryOp, UpdateOp,
};
use ets_ast::token::{TemplatePart, TokenKind};
use ets_ast::ty::{TypeExpr, TypeKind};
use ets_ast::Span;

use crate::error::ParseError;
use crate::parser::Parser;

const ASSIGN_BP: u8 = 2;
const AS_BP: u8 = 33;
const PREFIX_BP: u8 = 42;

impl Parser {
    /// Parse one expression.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    pub(crate) fn mk_expr(&mut self, kind: ExprKind, start: usize) -> Expr {
        Expr { id: self.next_id(), kind, span: self.span_from(start) }
    }

    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.nested(|p| p.parse_expr_bp_inner(min_bp))
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        let mut lhs = self.parse_prefix()?;

        loop {
            // `f<T>(x)` against `a < b`: the type-argument reading has to
            // run all the way to a `(` or it is dropped.
            if self.check(&TokenKind::Lt) && is_call_target(&lhs) {
                if let Some(type_args) = self.speculate("call type arguments", Self::parse_call_type_args) {
                    let args = self.parse_args()?;
                    lhs = self.mk_expr(
                        ExprKind::Call { callee: Box::new(lhs), type_args, args, optional: false },
                        start,
                    );
                    continue;
                }
            }

            if self.at_postfix() {
                lhs = self.parse_postfix(lhs, start)?;
                continue;
            }

            if self.check_word("as") {
                if AS_BP < min_bp {
                    break;
                }
                self.advance();
                let ty = self.parse_type()?;
                lhs = self.mk_expr(ExprKind::As { expr: Box::new(lhs), ty }, start);
                continue;
            }

            let Some((l_bp, r_bp)) = self.infix_bp() else { break };
            if l_bp < min_bp {
                break;
            }

            if self.match_token(&TokenKind::Question) {
                let then_expr = self.parse_expr_bp(0)?;
                self.expect(&TokenKind::Colon)?;
                let else_expr = self.parse_expr_bp(ASSIGN_BP)?;
                lhs = self.mk_expr(
                    ExprKind::Conditional {
                        cond: Box::new(lhs),
                        then_expr: Box::new(then_expr),
                        else_expr: Box::new(else_expr),
                    },
                    start,
                );
                continue;
            }

            if let Some(op) = assign_op(self.current_kind()) {
                self.advance();
                let value = self.parse_expr_bp(r_bp)?;
                lhs = self.mk_expr(ExprKind::Assign { op, target: Box::new(lhs), value: Box::new(value) }, start);
                continue;
            }

            let op = self.parse_binop()?;
            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = self.mk_expr(ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) }, start);
        }

        Ok(lhs)
    }

    fn infix_bp(&self) -> Option<(u8, u8)> {
        if assign_op(self.current_kind()).is_some() {
            return Some((ASSIGN_BP, ASSIGN_BP));
        }
        Some(match self.current_kind() {
            TokenKind::Question => (8, 8),
            TokenKind::PipePipe | TokenKind::QuestionQuestion => (20, 21),
            TokenKind::AmpAmp => (22, 23),
            TokenKind::Pipe => (24, 25),
            TokenKind::Caret => (26, 27),
            TokenKind::Amp => (28, 29),
            TokenKind::EqEq | TokenKind::BangEq | TokenKind::EqEqEq | TokenKind::BangEqEq => (30, 31),
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq |
            TokenKind::Instanceof | TokenKind::In => (32, 33),
            TokenKind::LtLt | TokenKind::GtGt | TokenKind::GtGtGt => (34, 35),
            TokenKind::Plus | TokenKind::Minus => (36, 37),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => (38, 39),
            TokenKind::StarStar => (40, 40),
            _ => return None,
        })
    }

    fn parse_binop(&mut self) -> Result<BinOp, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::StarStar => BinOp::Exp,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::Ne,
            TokenKind::EqEqEq => BinOp::StrictEq,
            TokenKind::BangEqEq => BinOp::StrictNe,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::LtEq => BinOp::Le,
            TokenKind::GtEq => BinOp::Ge,
            TokenKind::Instanceof => BinOp::InstanceOf,
            TokenKind::In => BinOp::In,
            TokenKind::AmpAmp => BinOp::And,
            TokenKind::PipePipe => BinOp::Or,
            TokenKind::QuestionQuestion => BinOp::Nullish,
            TokenKind::Amp => BinOp::BitAnd,
            TokenKind::Pipe => BinOp::BitOr,
            TokenKind::Caret => BinOp::BitXor,
            TokenKind::LtLt => BinOp::Shl,
            TokenKind::GtGt => BinOp::Shr,
            TokenKind::GtGtGt => BinOp::UShr,
            _ => return Err(self.error_expected("an operator")),
        };
        self.advance();
        Ok(op)
    }

    // =========================================================================
    // Prefix
    // =========================================================================

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;

        match self.current_kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(self.mk_expr(ExprKind::Number(n), start))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(self.mk_expr(ExprKind::String(s), start))
            }
            TokenKind::Template(parts) => {
                self.advance();
                self.parse_template(parts, start)
            }
            TokenKind::Bool(b) => {
                self.advance();
                Ok(self.mk_expr(ExprKind::Bool(b), start))
            }
            TokenKind::Null => {
                self.advance();
                Ok(self.mk_expr(ExprKind::Null, start))
            }
            TokenKind::This => {
                self.advance();
                Ok(self.mk_expr(ExprKind::This, start))
            }
            TokenKind::Super => {
                self.advance();
                Ok(self.mk_expr(ExprKind::Super, start))
            }
            TokenKind::Ident(name) => self.parse_ident_expr(name, start),
            TokenKind::LParen => {
                if self.paren_starts_arrow(self.pos) {
                    self.parse_arrow(false, start)
                } else {
                    self.advance();
                    let inner = self.parse_expr()?;
                    self.expect(&TokenKind::RParen)?;
                    Ok(self.mk_expr(ExprKind::Paren(Box::new(inner)), start))
                }
            }
            TokenKind::LBracket => self.parse_array_literal(start),
            TokenKind::LBrace => self.parse_object_literal(start),
            TokenKind::Function => {
                self.advance();
                let func = self.parse_fn_expr_rest(false)?;
                Ok(self.mk_expr(ExprKind::Function(Box::new(func)), start))
            }
            TokenKind::New => self.parse_new(start),
            TokenKind::Bang | TokenKind::Tilde | TokenKind::Minus | TokenKind::Plus |
            TokenKind::Typeof | TokenKind::Void | TokenKind::Delete => {
                let op = match self.advance().kind {
                    TokenKind::Bang => UnaryOp::Not,
                    TokenKind::Tilde => UnaryOp::BitNot,
                    TokenKind::Minus => UnaryOp::Neg,
                    TokenKind::Plus => UnaryOp::Plus,
                    TokenKind::Typeof => UnaryOp::Typeof,
                    TokenKind::Void => UnaryOp::Void,
                    _ => UnaryOp::Delete,
                };
                let operand = self.parse_expr_bp(PREFIX_BP)?;
                Ok(self.mk_expr(ExprKind::Unary { op, operand: Box::new(operand) }, start))
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if self.check(&TokenKind::PlusPlus) { UpdateOp::Inc } else { UpdateOp::Dec };
                self.advance();
                let operand = self.parse_expr_bp(PREFIX_BP)?;
                Ok(self.mk_expr(ExprKind::Update { op, prefix: true, operand: Box::new(operand) }, start))
            }
            // The lexer already reported this token.
            TokenKind::Error => {
                self.advance();
                Ok(self.mk_expr(ExprKind::Error("unreadable input".to_string()), start))
            }
            _ => Err(self.error_expected("expression")),
        }
    }

    fn parse_ident_expr(&mut self, name: String, start: usize) -> Result<Expr, ParseError> {
        if matches!(self.peek(1), TokenKind::FatArrow) {
            return self.parse_arrow(false, start);
        }

        match name.as_str() {
            "async" => {
                let is_arrow = match self.peek(1) {
                    TokenKind::Ident(_) => matches!(self.peek(2), TokenKind::FatArrow),
                    TokenKind::LParen => self.paren_starts_arrow(self.pos + 1),
                    _ => false,
                };
                if is_arrow {
                    self.advance();
                    return self.parse_arrow(true, start);
                }
                if matches!(self.peek(1), TokenKind::Function) {
                    self.advance();
                    self.advance();
                    let func = self.parse_fn_expr_rest(true)?;
                    return Ok(self.mk_expr(ExprKind::Function(Box::new(func)), start));
                }
            }
            "await" if starts_expr(self.peek(1)) => {
                self.advance();
                let operand = self.parse_expr_bp(PREFIX_BP)?;
                return Ok(self.mk_expr(ExprKind::Await(Box::new(operand)), start));
            }
            "$r" if matches!(self.peek(1), TokenKind::LParen) => {
                self.advance();
                let args = self.parse_args()?;
                return Ok(self.mk_expr(ExprKind::Resource(args), start));
            }
            _ => {}
        }

        self.advance();
        let kind = if name.len() > 1 && name.starts_with('$') {
            ExprKind::StateBinding(name[1..].to_string())
        } else {
            ExprKind::Ident(name)
        };
        Ok(self.mk_expr(kind, start))
    }

    /// Whether the `(` at `open` begins an arrow function's parameter list.
    ///
    /// Decided from the bracket table: the matching `)` is followed by `=>`,
    /// or by `:` plus a return type and then `=>`.
    pub(crate) fn paren_starts_arrow(&mut self, open: usize) -> bool {
        let Some(close) = self.closer_of(open) else { return false };
        match self.tokens.get(close + 1).map(|t| &t.kind) {
            Some(TokenKind::FatArrow) => true,
            Some(TokenKind::Colon) => self.look_ahead(|p| {
                p.pos = close + 2;
                p.parse_type().is_ok() && p.check(&TokenKind::FatArrow)
            }),
            _ => false,
        }
    }

    // =========================================================================
    // Postfix
    // =========================================================================

    fn at_postfix(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::LParen | TokenKind::Dot | TokenKind::QuestionDot | TokenKind::LBracket |
            TokenKind::Bang | TokenKind::PlusPlus | TokenKind::MinusMinus
        )
    }

    fn parse_postfix(&mut self, lhs: Expr, start: usize) -> Result<Expr, ParseError> {
        let kind = match self.current_kind() {
            TokenKind::LParen => {
                let args = self.parse_args()?;
                ExprKind::Call { callee: Box::new(lhs), type_args: Vec::new(), args, optional: false }
            }
            TokenKind::Dot => {
                self.advance();
                let property = self.expect_name()?;
                ExprKind::Member { object: Box::new(lhs), property, optional: false }
            }
            TokenKind::QuestionDot => {
                self.advance();
                match self.current_kind() {
                    TokenKind::LParen => {
                        let args = self.parse_args()?;
                        ExprKind::Call { callee: Box::new(lhs), type_args: Vec::new(), args, optional: true }
                    }
                    TokenKind::LBracket => {
                        self.advance();
                        let index = self.parse_expr()?;
                        self.expect(&TokenKind::RBracket)?;
                        ExprKind::Index { object: Box::new(lhs), index: Box::new(index), optional: true }
                    }
                    _ => {
                        let property = self.expect_name()?;
                        ExprKind::Member { object: Box::new(lhs), property, optional: true }
                    }
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let index = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                ExprKind::Index { object: Box::new(lhs), index: Box::new(index), optional: false }
            }
            TokenKind::Bang => {
                self.advance();
                ExprKind::NonNull(Box::new(lhs))
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if self.check(&TokenKind::PlusPlus) { UpdateOp::Inc } else { UpdateOp::Dec };
                self.advance();
                ExprKind::Update { op, prefix: false, operand: Box::new(lhs) }
            }
            _ => return Ok(lhs),
        };
        Ok(self.mk_expr(kind, start))
    }

    /// `<T, U>` directly before a call's `(`.
    ///
    /// Literal types are refused so `a < 1 > (c)` stays a comparison.
    fn parse_call_type_args(&mut self) -> Result<Vec<TypeExpr>, ParseError> {
        let args = self.parse_explicit_type_args()?;
        if !self.check(&TokenKind::LParen) {
            return Err(self.error_expected("'('"));
        }
        Ok(args)
    }

    /// `<T, U>` after a call or `new` target, fully closed.
    fn parse_explicit_type_args(&mut self) -> Result<Vec<TypeExpr>, ParseError> {
        let start = self.current().span.start;
        let args = self.parse_type_args()?;
        if self.pending_gt > 0 {
            return Err(ParseError::syntax("Unbalanced '>' in type arguments", self.span_from(start)));
        }
        if args.iter().any(|a| matches!(a.kind, TypeKind::Literal(_))) {
            return Err(ParseError::syntax("Literal types are not call type arguments", self.span_from(start)));
        }
        Ok(args)
    }

    pub(crate) fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            args.push(self.parse_element()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    /// An argument or array element: expression or `...spread`.
    fn parse_element(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        if self.match_token(&TokenKind::DotDotDot) {
            let inner = self.parse_expr_bp(ASSIGN_BP)?;
            return Ok(self.mk_expr(ExprKind::Spread(Box::new(inner)), start));
        }
        self.parse_expr_bp(ASSIGN_BP)
    }

    // =========================================================================
    // Compound literals
    // =========================================================================

    fn parse_array_literal(&mut self, start: usize) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.at_end() {
            if self.match_token(&TokenKind::Comma) {
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_element()?));
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(self.mk_expr(ExprKind::Array(elements), start))
    }

    pub(crate) fn parse_object_literal(&mut self, start: usize) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            members.push(self.parse_object_member()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.mk_expr(ExprKind::Object(members), start))
    }

    fn parse_object_member(&mut self) -> Result<ObjectMember, ParseError> {
        if self.match_token(&TokenKind::DotDotDot) {
            return Ok(ObjectMember::Spread(self.parse_expr_bp(ASSIGN_BP)?));
        }

        // `get x() {}`, `set x(v) {}`, `async m() {}`
        let is_async = self.check_word("async") && self.prop_key_ahead(1);
        let is_accessor = (self.check_word("get") || self.check_word("set")) && self.prop_key_ahead(1);
        if is_async || is_accessor {
            self.advance();
        }

        let key = self.parse_prop_key()?;
        if is_async || is_accessor || self.check(&TokenKind::LParen) || self.check(&TokenKind::Lt) {
            let func = self.parse_fn_tail(None, is_async)?;
            return Ok(ObjectMember::Method { key, func });
        }
        if self.match_token(&TokenKind::Colon) {
            let value = self.parse_expr_bp(ASSIGN_BP)?;
            return Ok(ObjectMember::KeyValue { key, value });
        }
        match key {
            PropKey::Ident(name) => Ok(ObjectMember::Shorthand(name)),
            _ => Err(self.error_expected("':'")),
        }
    }

    fn prop_key_ahead(&self, n: usize) -> bool {
        self.peek_is_name(n)
            || matches!(self.peek(n), TokenKind::String(_) | TokenKind::Number(_) | TokenKind::LBracket)
    }

    pub(crate) fn parse_prop_key(&mut self) -> Result<PropKey, ParseError> {
        match self.current_kind().clone() {
            TokenKind::String(s) => {
                self.advance();
                Ok(PropKey::String(s))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(PropKey::Number(n))
            }
            TokenKind::LBracket => {
                self.advance();
                let key = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                Ok(PropKey::Computed(Box::new(key)))
            }
            _ => Ok(PropKey::Ident(self.expect_name()?)),
        }
    }

    fn parse_template(&mut self, parts: Vec<TemplatePart>, start: usize) -> Result<Expr, ParseError> {
        let mut elements = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                TemplatePart::Chunk(text) => elements.push(TemplateElement::Chunk(text)),
                TemplatePart::Subst { tokens, span } => {
                    let expr = self.parse_substitution(tokens, span);
                    elements.push(TemplateElement::Subst(expr));
                }
            }
        }
        Ok(self.mk_expr(ExprKind::Template(elements), start))
    }

    /// Parse `${...}` contents with a nested parser that continues this
    /// parser's node ids and hands its errors back.
    fn parse_substitution(&mut self, tokens: Vec<ets_ast::token::Token>, span: Span) -> Expr {
        let mut inner = Parser::with_node_ids(tokens, self.next_node_id);
        inner.depth = self.depth;
        let parsed = inner.parse_expr().and_then(|expr| {
            if inner.at_end() {
                Ok(expr)
            } else {
                Err(inner.error_expected("'}' to close the substitution"))
            }
        });
        let expr = match parsed {
            Ok(expr) => expr,
            Err(e) => {
                let message = e.message.clone();
                inner.record_error(e);
                Expr { id: inner.next_id(), kind: ExprKind::Error(message), span }
            }
        };
        self.next_node_id = inner.next_node_id;
        for error in inner.errors {
            if !self.record_error(error) {
                break;
            }
        }
        if inner.aborted {
            self.abort();
        }
        expr
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// After `function`: optional name, then signature and body.
    fn parse_fn_expr_rest(&mut self, is_async: bool) -> Result<FnExpr, ParseError> {
        let name = if self.check_ident() { Some(self.expect_ident()?) } else { None };
        self.parse_fn_tail(name, is_async)
    }

    /// `<T>(params): R { body }`
    pub(crate) fn parse_fn_tail(&mut self, name: Option<String>, is_async: bool) -> Result<FnExpr, ParseError> {
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let ret_ty = self.parse_return_type()?;
        let body = self.parse_block_body()?;
        Ok(FnExpr { name, is_async, type_params, params, ret_ty, body })
    }

    pub(crate) fn parse_arrow(&mut self, is_async: bool, start: usize) -> Result<Expr, ParseError> {
        let (params, ret_ty) = self.parse_arrow_head()?;
        let body = if self.check(&TokenKind::LBrace) {
            ArrowBody::Block(self.parse_block_body()?)
        } else {
            ArrowBody::Expr(Box::new(self.parse_expr_bp(ASSIGN_BP)?))
        };
        Ok(self.mk_expr(ExprKind::Arrow(Box::new(ArrowFn { is_async, params, ret_ty, body })), start))
    }

    /// Parameters, optional return type and the `=>`.
    pub(crate) fn parse_arrow_head(&mut self) -> Result<(Vec<Param>, Option<TypeExpr>), ParseError> {
        let params = if let TokenKind::Ident(name) = self.current_kind() {
            let name = name.clone();
            let span = self.advance().span;
            vec![Param { name, rest: false, optional: false, ty: None, default: None, span }]
        } else {
            self.parse_params()?
        };
        let ret_ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        self.expect(&TokenKind::FatArrow)?;
        Ok((params, ret_ty))
    }

    pub(crate) fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            params.push(self.parse_param()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let start = self.current().span.start;

        // Constructor parameter properties: `private readonly x: T`
        while is_param_modifier(self.current_kind()) && self.peek_is_name(1) {
            self.advance();
        }

        let rest = self.match_token(&TokenKind::DotDotDot);
        let name = match self.current_kind() {
            TokenKind::LBrace | TokenKind::LBracket => self.take_bracketed_text()?,
            _ => self.expect_name()?,
        };
        let optional = self.match_token(&TokenKind::Question);
        let ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        let default = if self.match_token(&TokenKind::Eq) { Some(self.parse_expr_bp(ASSIGN_BP)?) } else { None };

        Ok(Param { name, rest, optional, ty, default, span: self.span_from(start) })
    }

    // =========================================================================
    // new
    // =========================================================================

    fn parse_new(&mut self, start: usize) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::New)?;
        let callee_start = self.current().span.start;

        let mut callee = match self.current_kind().clone() {
            TokenKind::New => self.parse_new(callee_start)?,
            TokenKind::Ident(name) => {
                self.advance();
                self.mk_expr(ExprKind::Ident(name), callee_start)
            }
            TokenKind::This => {
                self.advance();
                self.mk_expr(ExprKind::This, callee_start)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                self.mk_expr(ExprKind::Paren(Box::new(inner)), callee_start)
            }
            _ => return Err(self.error_expected("a constructor")),
        };

        // Member accesses belong to the callee, calls do not.
        loop {
            if self.match_token(&TokenKind::Dot) {
                let property = self.expect_name()?;
                callee = self.mk_expr(
                    ExprKind::Member { object: Box::new(callee), property, optional: false },
                    callee_start,
                );
            } else if self.match_token(&TokenKind::LBracket) {
                let index = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                callee = self.mk_expr(
                    ExprKind::Index { object: Box::new(callee), index: Box::new(index), optional: false },
                    callee_start,
                );
            } else {
                break;
            }
        }

        let type_args = if self.check(&TokenKind::Lt) {
            self.speculate("constructor type arguments", Self::parse_explicit_type_args)
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        let args = if self.check(&TokenKind::LParen) { Some(self.parse_args()?) } else { None };

        Ok(self.mk_expr(ExprKind::New { callee: Box::new(callee), type_args, args }, start))
    }
}

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::StarStarEq => AssignOp::Exp,
        TokenKind::LtLtEq => AssignOp::Shl,
        TokenKind::GtGtEq => AssignOp::Shr,
        TokenKind::GtGtGtEq => AssignOp::UShr,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::AmpAmpEq => AssignOp::And,
        TokenKind::PipePipeEq => AssignOp::Or,
        TokenKind::QuestionQuestionEq => AssignOp::Nullish,
        _ => return None,
    })
}

/// Expressions a `<` may open type arguments for.
fn is_call_target(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Call { .. })
}

fn is_param_modifier(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Ident(w) if matches!(w.as_str(), "public" | "private" | "protected" | "readonly"))
}

/// Tokens that can begin an expression.
pub(crate) fn starts_expr(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number(_) | TokenKind::String(_) | TokenKind::Template(_) | TokenKind::Bool(_) |
        TokenKind::Null | TokenKind::Ident(_) | TokenKind::This | TokenKind::Super |
        TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace | TokenKind::Function |
        TokenKind::New | TokenKind::Bang | TokenKind::Tilde | TokenKind::Minus | TokenKind::Plus |
        TokenKind::Typeof | TokenKind::Void | TokenKind::Delete |
        TokenKind::PlusPlus | TokenKind::MinusMinus
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expr(src: &str) -> Expr {
        let tokens = ets_lexer::Lexer::new(src).tokenize().tokens;
        let mut p = Parser::new(tokens);
        let e = p.parse_expr().unwrap_or_else(|e| panic!("{src}: {e}"));
        assert!(p.errors.is_empty(), "{src}: {:?}", p.errors);
        assert!(p.at_end(), "{src}: trailing input at {}", p.pos);
        e
    }

    /// Fully parenthesized rendering, enough to check tree shape.
    fn show(e: &Expr) -> String {
        match &e.kind {
            ExprKind::Number(n) => n.to_string(),
            ExprKind::String(s) => format!("{s:?}"),
            ExprKind::Ident(n) => n.clone(),
            ExprKind::Bool(b) => b.to_string(),
            ExprKind::StateBinding(n) => format!("${n}"),
            ExprKind::Binary { op, left, right } => format!("({} {} {})", show(left), op.as_str(), show(right)),
            ExprKind::Assign { target, value, .. } => format!("({} = {})", show(target), show(value)),
            ExprKind::Conditional { cond, then_expr, else_expr } => {
                format!("({} ? {} : {})", show(cond), show(then_expr), show(else_expr))
            }
            ExprKind::As { expr, ty } => format!("({} as {})", show(expr), ty.simple_name().unwrap_or_default()),
            ExprKind::Unary { operand, .. } => format!("(-{})", show(operand)),
            ExprKind::Call { callee, type_args, args, optional } => format!(
                "{}{}{}({})",
                show(callee),
                if *optional { "?." } else { "" },
                if type_args.is_empty() { String::new() } else { format!("<{}>", type_args.len()) },
                args.iter().map(show).collect::<Vec<_>>().join(", ")
            ),
            ExprKind::Member { object, property, optional } => {
                format!("{}{}{}", show(object), if *optional { "?." } else { "." }, property)
            }
            ExprKind::Paren(inner) => format!("[{}]", show(inner)),
            ExprKind::NonNull(inner) => format!("{}!", show(inner)),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn precedence_levels() {
        assert_eq!(show(&expr("a + b * c")), "(a + (b * c))");
        assert_eq!(show(&expr("a || b && c")), "(a || (b && c))");
        assert_eq!(show(&expr("a ?? b || c")), "((a ?? b) || c)");
        assert_eq!(show(&expr("a == b < c")), "(a == (b < c))");
        assert_eq!(show(&expr("a | b ^ c & d")), "(a | (b ^ (c & d)))");
        assert_eq!(show(&expr("a << b + c")), "(a << (b + c))");
    }

    #[test]
    fn associativity() {
        assert_eq!(show(&expr("a - b - c")), "((a - b) - c)");
        assert_eq!(show(&expr("a ** b ** c")), "(a ** (b ** c))");
        assert_eq!(show(&expr("a = b = c")), "(a = (b = c))");
        assert_eq!(show(&expr("a ? b : c ? d : e")), "(a ? b : (c ? d : e))");
    }

    #[test]
    fn conditional_else_branch_takes_an_assignment() {
        assert_eq!(show(&expr("x = a ? b : c = d")), "(x = (a ? b : (c = d)))");
        assert_eq!(show(&expr("a ? b : c = d ? e : f")), "(a ? b : (c = (d ? e : f)))");
        assert_eq!(show(&expr("a ? b = 1 : c")), "(a ? (b = 1) : c)");
    }

    #[test]
    fn as_binds_between_relational_and_shift() {
        assert_eq!(show(&expr("a as T + b")), "((a as T) + b)");
        assert_eq!(show(&expr("a + b as T")), "((a + b) as T)");
        assert_eq!(show(&expr("a < b as T")), "(a < (b as T))");
    }

    #[test]
    fn generic_call_needs_closing_angle_and_paren() {
        assert_eq!(show(&expr("a<b>(c)")), "a<1>(c)");
        assert_eq!(show(&expr("f<Array<T>>(x)")), "f<1>(x)");
        assert_eq!(show(&expr("a < 1 > (c)")), "((a < 1) > [c])");
        assert_eq!(show(&expr("a < b > c")), "((a < b) > c)");
        assert_eq!(show(&expr("a < b")), "(a < b)");
    }

    #[test]
    fn optional_chain_is_postfix() {
        assert_eq!(show(&expr("a?.b?.(c)")), "a?.b?.(c)");
        assert_eq!(show(&expr("x ? .5 : 1")), "(x ? 0.5 : 1)");
        assert_eq!(show(&expr("a?.5:1")), "(a ? 0.5 : 1)");
        assert_eq!(show(&expr("a?.5e1:b?.b")), "(a ? 50 : b?.b)");
    }

    #[test]
    fn nesting_limit_fails_instead_of_overflowing() {
        let src = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let tokens = ets_lexer::Lexer::new(&src).tokenize().tokens;
        let mut p = Parser::new(tokens);
        let err = p.parse_expr().expect_err("nesting past the limit must fail");
        assert!(err.message.contains("nesting depth"), "{}", err.message);
        assert_eq!(p.errors.len(), 1);
        assert_eq!(p.depth, 0);
        assert!(p.at_end());
    }

    #[test]
    fn nesting_below_limit_parses() {
        let depth = crate::MAX_DEPTH - 8;
        let src = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        assert!(matches!(expr(&src).kind, ExprKind::Paren(_)));
        let prefix = format!("{}x", "!".repeat(depth));
        assert!(matches!(expr(&prefix).kind, ExprKind::Unary { .. }));
    }

    #[test]
    fn arrow_detection() {
        assert!(matches!(expr("(a, b) => a + b").kind, ExprKind::Arrow(_)));
        assert!(matches!(expr("x => x").kind, ExprKind::Arrow(_)));
        assert!(matches!(expr("(a: number): string => 'x'").kind, ExprKind::Arrow(_)));
        assert!(matches!(expr("async (a) => { await a; }").kind, ExprKind::Arrow(ref f) if f.is_async));
        assert!(matches!(expr("(a + b)").kind, ExprKind::Paren(_)));
    }

    #[test]
    fn state_bindings_and_resources() {
        assert_eq!(show(&expr("$count")), "$count");
        match expr("$r('app.string.title')").kind {
            ExprKind::Resource(args) => assert_eq!(args.len(), 1),
            other => panic!("expected resource, got {other:?}"),
        }
    }

    #[test]
    fn object_literal_members() {
        let e = expr("{ a: 1, b, 'c': 2, [k]: 3, m() { return 1; }, get g() { return 2; }, ...rest }");
        let ExprKind::Object(members) = e.kind else { panic!("expected object") };
        assert_eq!(members.len(), 7);
        assert!(matches!(members[1], ObjectMember::Shorthand(ref n) if n == "b"));
        assert!(matches!(members[3], ObjectMember::KeyValue { key: PropKey::Computed(_), .. }));
        assert!(matches!(members[4], ObjectMember::Method { .. }));
        assert!(matches!(members[5], ObjectMember::Method { key: PropKey::Ident(ref n), .. } if n == "g"));
        assert!(matches!(members[6], ObjectMember::Spread(_)));
    }

    #[test]
    fn array_holes_and_spread() {
        let ExprKind::Array(elems) = expr("[a, , ...b]").kind else { panic!("expected array") };
        assert_eq!(elems.len(), 3);
        assert!(elems[1].is_none());
        assert!(matches!(elems[2].as_ref().map(|e| &e.kind), Some(ExprKind::Spread(_))));
    }

    #[test]
    fn new_with_member_callee_and_type_args() {
        match expr("new a.Map<string, number>()").kind {
            ExprKind::New { callee, type_args, args } => {
                assert_eq!(show(&callee), "a.Map");
                assert_eq!(type_args.len(), 2);
                assert_eq!(args.map(|a| a.len()), Some(0));
            }
            other => panic!("expected new, got {other:?}"),
        }
        assert!(matches!(expr("new Foo").kind, ExprKind::New { args: None, .. }));
    }

    #[test]
    fn non_null_and_updates() {
        assert_eq!(show(&expr("a!.b")), "a!.b");
        assert!(matches!(expr("i++").kind, ExprKind::Update { prefix: false, .. }));
        assert!(matches!(expr("--i").kind, ExprKind::Update { prefix: true, .. }));
    }

    #[test]
    fn template_substitutions_are_parsed() {
        let ExprKind::Template(parts) = expr("`a${x + 1}b`").kind else { panic!("expected template") };
        assert_eq!(parts.len(), 3);
        match &parts[1] {
            TemplateElement::Subst(e) => assert_eq!(show(e), "(x + 1)"),
            other => panic!("expected substitution, got {other:?}"),
        }
    }

    #[test]
    fn leading_dot_is_an_error() {
        let tokens = ets_lexer::Lexer::new(".width(10)").tokenize().tokens;
        let err = Parser::new(tokens).parse_expr().unwrap_err();
        assert_eq!(err.message, "Expected expression, found '.'");
        assert!(err.hint.as_deref().is_some_and(|h| h.contains("modifier chain")));
    }

    #[test]
    fn node_ids_are_unique() {
        let e = expr("f(a, b)[c]");
        let mut ids = Vec::new();
        fn collect(e: &Expr, ids: &mut Vec<u32>) {
            ids.push(e.id.0);
            match &e.kind {
                ExprKind::Call { callee, args, .. } => {
                    collect(callee, ids);
                    args.iter().for_each(|a| collect(a, ids));
                }
                ExprKind::Index { object, index, .. } => {
                    collect(object, ids);
                    collect(index, ids);
                }
                _ => {}
            }
        }
        collect(&e, &mut ids);
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }
}
