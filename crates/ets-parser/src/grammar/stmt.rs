// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statements and block bodies.

use ets_ast::expr::Expr;
use ets_ast::stmt::{CatchClause, ForHead, ForInit, Stmt, StmtKind, VarDecl, VarDeclarator, VarKind};
use ets_ast::token::TokenKind;

use crate::error::ParseError;
use crate::parser::Parser;

impl Parser {
    fn mk_stmt(&mut self, kind: StmtKind, start: usize) -> Stmt {
        Stmt { id: self.next_id(), kind, span: self.span_from(start) }
    }

    /// `{ stmt* }`. A statement that fails to parse is replaced by an Error
    /// statement and parsing resumes after it.
    pub(crate) fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let stmt_pos = self.pos;
            let start = self.current().span.start;
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    let message = e.message.clone();
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize_in_block(stmt_pos);
                    stmts.push(self.mk_stmt(StmtKind::Error(message), start));
                }
            }
        }

        self.close_brace()?;
        Ok(stmts)
    }

    /// The `}` ending a body. Running out of input is recorded, not
    /// propagated, so the content parsed so far is kept.
    pub(crate) fn close_brace(&mut self) -> Result<(), ParseError> {
        if self.match_token(&TokenKind::RBrace) {
            return Ok(());
        }
        if self.at_end() {
            let err = self.error_expected("'}'");
            self.record_error(err);
            return Ok(());
        }
        Err(self.error_expected("'}'"))
    }

    /// Skip to the next statement boundary in a block: after a `;`, or in
    /// front of `}` or a statement keyword. Bracketed groups are stepped
    /// over whole.
    pub(crate) fn synchronize_in_block(&mut self, stmt_pos: usize) {
        self.pending_gt = 0;
        if self.pos == stmt_pos {
            self.advance();
        }

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Semi => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace => return,
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => {
                    match self.closer_of(self.pos) {
                        Some(close) => self.pos = close + 1,
                        None => {
                            self.advance();
                        }
                    }
                }
                kind if kind.starts_statement() => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.nested(Self::parse_stmt_inner)
    }

    fn parse_stmt_inner(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind() {
            TokenKind::LBrace => StmtKind::Block(self.parse_block_body()?),
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let decl = self.parse_var_decl()?;
                self.expect_semi();
                StmtKind::Var(decl)
            }
            TokenKind::If => self.parse_if_stmt()?,
            TokenKind::For => self.parse_for_stmt()?,
            TokenKind::While => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                let body = self.parse_stmt()?;
                StmtKind::While { cond, body: Box::new(body) }
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.at_stmt_end() { None } else { Some(self.parse_expr()?) };
                self.expect_semi();
                StmtKind::Return(value)
            }
            TokenKind::Break | TokenKind::Continue => {
                let is_break = self.check(&TokenKind::Break);
                self.advance();
                let label = if self.check_ident() { Some(self.expect_ident()?) } else { None };
                self.expect_semi();
                if is_break { StmtKind::Break(label) } else { StmtKind::Continue(label) }
            }
            TokenKind::Throw => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect_semi();
                StmtKind::Throw(value)
            }
            TokenKind::Try => self.parse_try_stmt()?,
            TokenKind::Semi => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::Ident(_) if matches!(self.peek(1), TokenKind::Colon) => {
                let label = self.expect_ident()?;
                self.advance();
                let body = self.parse_stmt()?;
                StmtKind::Labeled { label, body: Box::new(body) }
            }
            _ => {
                let expr = self.parse_expr()?;
                self.match_token(&TokenKind::Semi);
                StmtKind::Expr(expr)
            }
        };

        Ok(self.mk_stmt(kind, start))
    }

    fn at_stmt_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof)
    }

    /// `var|let|const` declarators, without the terminator.
    pub(crate) fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let kind = self.parse_var_kind()?;
        let mut declarators = Vec::new();
        loop {
            let start = self.current().span.start;
            let name = self.parse_binding_name()?;
            // Definite assignment `x!: T`
            self.match_token(&TokenKind::Bang);
            let ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type()?) } else { None };
            let init = if self.match_token(&TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
            declarators.push(VarDeclarator { name, ty, init, span: self.span_from(start) });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Ok(VarDecl { kind, declarators })
    }

    fn parse_var_kind(&mut self) -> Result<VarKind, ParseError> {
        let kind = match self.current_kind() {
            TokenKind::Var => VarKind::Var,
            TokenKind::Let => VarKind::Let,
            TokenKind::Const => VarKind::Const,
            _ => return Err(self.error_expected("'let', 'const' or 'var'")),
        };
        self.advance();
        Ok(kind)
    }

    /// A declared name or a destructuring pattern, kept as source text.
    fn parse_binding_name(&mut self) -> Result<String, ParseError> {
        match self.current_kind() {
            TokenKind::LBrace | TokenKind::LBracket => self.take_bracketed_text(),
            _ => self.expect_ident(),
        }
    }

    fn parse_if_stmt(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.match_token(&TokenKind::Else) { Some(Box::new(self.parse_stmt()?)) } else { None };
        Ok(StmtKind::If { cond, then_branch, else_branch })
    }

    fn parse_for_stmt(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LParen)?;

        // `of`/`in` heads share their prefix with a classic declaration
        // initializer, so they are tried first.
        let mut head = None;
        if matches!(self.current_kind(), TokenKind::Var | TokenKind::Let | TokenKind::Const) {
            head = self.speculate("for-of/in head", Self::parse_for_each_head);
        }
        let head = match head {
            Some(head) => head,
            None => self.parse_classic_for_head()?,
        };

        let body = self.parse_stmt()?;
        Ok(StmtKind::For { head, body: Box::new(body) })
    }

    /// `let x of xs)` or `const k in obj)`
    fn parse_for_each_head(&mut self) -> Result<ForHead, ParseError> {
        let kind = self.parse_var_kind()?;
        let binding = self.parse_binding_name()?;
        let head = if self.match_word("of") {
            ForHead::Of { kind, binding, iter: self.parse_expr()? }
        } else if self.match_token(&TokenKind::In) {
            ForHead::In { kind, binding, object: self.parse_expr()? }
        } else {
            return Err(self.error_expected("'of' or 'in'"));
        };
        self.expect(&TokenKind::RParen)?;
        Ok(head)
    }

    /// `init; test; update)` with every clause optional.
    fn parse_classic_for_head(&mut self) -> Result<ForHead, ParseError> {
        let init = if self.check(&TokenKind::Semi) {
            None
        } else if matches!(self.current_kind(), TokenKind::Var | TokenKind::Let | TokenKind::Const) {
            Some(ForInit::Var(self.parse_var_decl()?))
        } else {
            Some(ForInit::Expr(self.parse_expr()?))
        };
        self.expect(&TokenKind::Semi)?;
        let test = if self.check(&TokenKind::Semi) { None } else { Some(self.parse_expr()?) };
        self.expect(&TokenKind::Semi)?;
        let update = if self.check(&TokenKind::RParen) { None } else { Some(self.parse_expr()?) };
        self.expect(&TokenKind::RParen)?;
        Ok(ForHead::Classic { init, test, update })
    }

    fn parse_try_stmt(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(&TokenKind::Try)?;
        let block = self.parse_block_body()?;

        let catch = if self.match_token(&TokenKind::Catch) {
            let (param, ty) = if self.match_token(&TokenKind::LParen) {
                let param = self.parse_binding_name()?;
                let ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type()?) } else { None };
                self.expect(&TokenKind::RParen)?;
                (Some(param), ty)
            } else {
                (None, None)
            };
            let body = self.parse_block_body()?;
            Some(CatchClause { param, ty, body })
        } else {
            None
        };

        let finally = if self.match_token(&TokenKind::Finally) { Some(self.parse_block_body()?) } else { None };
        if catch.is_none() && finally.is_none() {
            return Err(self.error_expected("'catch' or 'finally'"));
        }
        Ok(StmtKind::Try { block, catch, finally })
    }

    /// Expression statement used when a UI body holds ordinary code.
    pub(crate) fn parse_expr_stmt(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        self.match_token(&TokenKind::Semi);
        Ok(expr)
    }
}
