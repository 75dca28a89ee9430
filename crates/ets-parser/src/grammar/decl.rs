// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Top-level declarations and class/component members.

use ets_ast::decl::{
    Access, BuildMethod, ClassDecl, ComponentDecl, ConstructorDecl, Decl, DeclKind, DecoratedExport,
    DecoratedExportItem, Decorator, EnumDecl, EnumMember, ExportDecl, ExportDefault, FnBody, FnDecl,
    ImportDecl, ImportSpecifier, InterfaceDecl, Member, MemberKind, MethodDecl, Modifiers, PropertyDecl,
    TypeAliasDecl,
};
use ets_ast::token::TokenKind;
use ets_ast::ty::TypeExpr;

use crate::error::ParseError;
use crate::parser::Parser;

impl Parser {
    pub(crate) fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.current().span.start;
        let decorators = self.parse_decorators()?;

        let kind = if !decorators.is_empty() && self.check(&TokenKind::Export) {
            self.parse_decorated_export_decl(decorators)?
        } else {
            self.parse_decl_kind(decorators)?
        };
        Ok(Decl { id: self.next_id(), kind, span: self.span_from(start) })
    }

    fn parse_decl_kind(&mut self, decorators: Vec<Decorator>) -> Result<DeclKind, ParseError> {
        // Ambient declarations parse like ordinary ones.
        if self.check_word("declare") && !matches!(self.peek(1), TokenKind::Eof) {
            self.advance();
        }

        let decoratable = matches!(self.current_kind(), TokenKind::Struct | TokenKind::Class | TokenKind::Function)
            || (self.check_word("abstract") && matches!(self.peek(1), TokenKind::Class))
            || (self.check_word("async") && matches!(self.peek(1), TokenKind::Function));
        if !decorators.is_empty() && !decoratable {
            return Err(ParseError::syntax(
                "Decorators must precede a struct, class, or function",
                self.current().span,
            )
            .with_hint("remove the decorator or move it onto a declaration that accepts one"));
        }

        let kind = match self.current_kind() {
            TokenKind::Import => DeclKind::Import(self.parse_import_decl()?),
            TokenKind::Export => DeclKind::Export(self.parse_export_decl()?),
            TokenKind::Struct => DeclKind::Component(self.parse_component_decl(decorators, false)?),
            TokenKind::Class => DeclKind::Class(self.parse_class_decl(decorators)?),
            TokenKind::Ident(w) if w == "abstract" => DeclKind::Class(self.parse_class_decl(decorators)?),
            TokenKind::Interface => DeclKind::Interface(self.parse_interface_decl()?),
            TokenKind::Ident(w) if w == "type" && matches!(self.peek(1), TokenKind::Ident(_)) => {
                DeclKind::TypeAlias(self.parse_type_alias_decl()?)
            }
            TokenKind::Enum => DeclKind::Enum(self.parse_enum_decl()?),
            TokenKind::Const if matches!(self.peek(1), TokenKind::Enum) => DeclKind::Enum(self.parse_enum_decl()?),
            TokenKind::Function => DeclKind::Function(self.parse_function_decl(decorators)?),
            TokenKind::Ident(w) if w == "async" => DeclKind::Function(self.parse_function_decl(decorators)?),
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let decl = self.parse_var_decl()?;
                self.expect_semi();
                DeclKind::Variable(decl)
            }
            _ => return Err(self.error_expected("declaration")),
        };
        Ok(kind)
    }

    // =========================================================================
    // Decorators
    // =========================================================================

    pub(crate) fn parse_decorators(&mut self) -> Result<Vec<Decorator>, ParseError> {
        let mut decorators = Vec::new();
        while self.check(&TokenKind::At) {
            decorators.push(self.parse_decorator()?);
        }
        Ok(decorators)
    }

    /// `@Name` or `@Name(args)`. Names are not checked here.
    fn parse_decorator(&mut self) -> Result<Decorator, ParseError> {
        let start = self.current().span.start;
        self.expect(&TokenKind::At)?;
        let name = self.expect_name()?;
        let args = if self.check(&TokenKind::LParen) { Some(self.parse_args()?) } else { None };
        Ok(Decorator { name, args, span: self.span_from(start) })
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    pub(crate) fn parse_import_decl(&mut self) -> Result<ImportDecl, ParseError> {
        self.expect(&TokenKind::Import)?;
        // `import type { A } from 'm'`
        if self.check_word("type")
            && (matches!(self.peek(1), TokenKind::LBrace | TokenKind::Star)
                || (matches!(self.peek(1), TokenKind::Ident(_)) && !self.peek_word(1, "from")))
        {
            self.advance();
        }

        let mut decl = ImportDecl { default: None, namespace: None, named: Vec::new(), source: String::new() };

        // Side-effect import
        if let TokenKind::String(source) = self.current_kind() {
            decl.source = source.clone();
            self.advance();
            self.match_token(&TokenKind::Semi);
            return Ok(decl);
        }

        if self.check_ident() {
            decl.default = Some(self.expect_ident()?);
            if !self.match_token(&TokenKind::Comma) {
                return self.finish_import(decl);
            }
        }
        if self.match_token(&TokenKind::Star) {
            self.expect_word("as")?;
            decl.namespace = Some(self.expect_ident()?);
        } else if self.check(&TokenKind::LBrace) {
            decl.named = self.parse_specifiers()?;
        } else {
            return Err(self.error_expected("an import clause"));
        }
        self.finish_import(decl)
    }

    fn finish_import(&mut self, mut decl: ImportDecl) -> Result<ImportDecl, ParseError> {
        self.expect_word("from")?;
        decl.source = self.expect_string()?;
        self.match_token(&TokenKind::Semi);
        Ok(decl)
    }

    /// `{ a, b as c, }`
    fn parse_specifiers(&mut self) -> Result<Vec<ImportSpecifier>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut specifiers = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            // `{ type A }`
            if self.check_word("type") && self.peek_is_name(1) && !self.peek_word(1, "as") {
                self.advance();
            }
            let name = self.expect_name()?;
            let alias = if self.match_word("as") { Some(self.expect_name()?) } else { None };
            specifiers.push(ImportSpecifier { name, alias });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(specifiers)
    }

    pub(crate) fn parse_export_decl(&mut self) -> Result<ExportDecl, ParseError> {
        self.expect(&TokenKind::Export)?;

        if self.match_token(&TokenKind::Default) {
            return Ok(ExportDecl::Default(self.parse_export_default(Vec::new())?));
        }

        if self.check_word("type") && matches!(self.peek(1), TokenKind::LBrace) {
            self.advance();
        }
        if self.check(&TokenKind::LBrace) {
            let specifiers = self.parse_specifiers()?;
            let source = if self.match_word("from") { Some(self.expect_string()?) } else { None };
            self.match_token(&TokenKind::Semi);
            return Ok(ExportDecl::Named { specifiers, source });
        }
        if self.match_token(&TokenKind::Star) {
            let alias = if self.match_word("as") { Some(self.expect_name()?) } else { None };
            self.expect_word("from")?;
            let source = self.expect_string()?;
            self.match_token(&TokenKind::Semi);
            return Ok(ExportDecl::All { alias, source });
        }

        let start = self.current().span.start;
        let mut kind = self.parse_decl_kind(Vec::new())?;
        if let DeclKind::Component(component) = &mut kind {
            component.exported = true;
        }
        Ok(ExportDecl::Decl(Box::new(Decl { id: self.next_id(), kind, span: self.span_from(start) })))
    }

    /// After `export default`.
    fn parse_export_default(&mut self, decorators: Vec<Decorator>) -> Result<ExportDefault, ParseError> {
        let start = self.current().span.start;
        let kind = match self.current_kind() {
            TokenKind::Struct => DeclKind::Component(self.parse_component_decl(decorators, true)?),
            TokenKind::Class => DeclKind::Class(self.parse_class_decl(decorators)?),
            TokenKind::Ident(w) if w == "abstract" && matches!(self.peek(1), TokenKind::Class) => {
                DeclKind::Class(self.parse_class_decl(decorators)?)
            }
            TokenKind::Function => DeclKind::Function(self.parse_function_decl(decorators)?),
            TokenKind::Ident(w) if w == "async" && matches!(self.peek(1), TokenKind::Function) => {
                DeclKind::Function(self.parse_function_decl(decorators)?)
            }
            _ if decorators.is_empty() => {
                let expr = self.parse_expr()?;
                self.match_token(&TokenKind::Semi);
                return Ok(ExportDefault::Expr(expr));
            }
            _ => return Err(self.error_expected("'struct', 'class', or 'function'")),
        };
        Ok(ExportDefault::Decl(Box::new(Decl { id: self.next_id(), kind, span: self.span_from(start) })))
    }

    /// `@Deco export ...`: the decorators stay on the wrapper and are also
    /// given to the declaration inside it.
    pub(crate) fn parse_decorated_export_decl(&mut self, decorators: Vec<Decorator>) -> Result<DeclKind, ParseError> {
        self.expect(&TokenKind::Export)?;

        let item = if self.match_token(&TokenKind::Default) {
            DecoratedExportItem::Default(self.parse_export_default(decorators.clone())?)
        } else {
            let start = self.current().span.start;
            let kind = match self.current_kind() {
                TokenKind::Struct => DeclKind::Component(self.parse_component_decl(decorators.clone(), true)?),
                TokenKind::Class => DeclKind::Class(self.parse_class_decl(decorators.clone())?),
                TokenKind::Ident(w) if w == "abstract" && matches!(self.peek(1), TokenKind::Class) => {
                    DeclKind::Class(self.parse_class_decl(decorators.clone())?)
                }
                TokenKind::Function => DeclKind::Function(self.parse_function_decl(decorators.clone())?),
                TokenKind::Ident(w) if w == "async" && matches!(self.peek(1), TokenKind::Function) => {
                    DeclKind::Function(self.parse_function_decl(decorators.clone())?)
                }
                _ => return Err(self.error_expected("'struct', 'class', or 'function'")),
            };
            DecoratedExportItem::Decl(Box::new(Decl { id: self.next_id(), kind, span: self.span_from(start) }))
        };

        Ok(DeclKind::DecoratedExport(DecoratedExport { decorators, item }))
    }

    // =========================================================================
    // Components and classes
    // =========================================================================

    /// `struct Name<T> { members }`, decorators already read.
    pub(crate) fn parse_component_decl(
        &mut self,
        decorators: Vec<Decorator>,
        exported: bool,
    ) -> Result<ComponentDecl, ParseError> {
        self.expect(&TokenKind::Struct)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        let members = self.parse_members(true)?;
        Ok(ComponentDecl { decorators, exported, name, type_params, members })
    }

    pub(crate) fn parse_class_decl(&mut self, decorators: Vec<Decorator>) -> Result<ClassDecl, ParseError> {
        let is_abstract = self.match_word("abstract");
        self.expect(&TokenKind::Class)?;
        // Anonymous only after `export default`.
        let name = if self.check_ident() { self.expect_ident()? } else { String::new() };
        let type_params = self.parse_type_params()?;
        let extends = if self.match_token(&TokenKind::Extends) { self.parse_type_list()? } else { Vec::new() };
        let implements = if self.match_token(&TokenKind::Implements) { self.parse_type_list()? } else { Vec::new() };
        let members = self.parse_members(false)?;
        Ok(ClassDecl { decorators, is_abstract, name, type_params, extends, implements, members })
    }

    fn parse_type_list(&mut self) -> Result<Vec<TypeExpr>, ParseError> {
        let mut types = vec![self.parse_type()?];
        while self.match_token(&TokenKind::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    /// `{ member* }` of a class (`in_component == false`) or component.
    fn parse_members(&mut self, in_component: bool) -> Result<Vec<Member>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.match_token(&TokenKind::Semi) {
                continue;
            }
            let member_pos = self.pos;
            let start = self.current().span.start;
            match self.parse_member(in_component) {
                Ok(kind) => members.push(Member { id: self.next_id(), kind, span: self.span_from(start) }),
                Err(e) => {
                    let message = e.message.clone();
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize_member(member_pos);
                    members.push(Member { id: self.next_id(), kind: MemberKind::Error(message), span: self.span_from(start) });
                }
            }
        }

        self.close_brace()?;
        Ok(members)
    }

    /// Skip past a malformed member: through a `;` or one braced body, or up
    /// to the next decorator or the closing `}`.
    fn synchronize_member(&mut self, member_pos: usize) {
        self.pending_gt = 0;
        if self.pos == member_pos {
            self.advance();
        }
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Semi => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace | TokenKind::At => return,
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => {
                    let is_body = self.check(&TokenKind::LBrace);
                    match self.closer_of(self.pos) {
                        Some(close) => self.pos = close + 1,
                        None => {
                            self.advance();
                        }
                    }
                    if is_body {
                        return;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn parse_member(&mut self, in_component: bool) -> Result<MemberKind, ParseError> {
        let decorators = self.parse_decorators()?;
        let modifiers = self.parse_modifiers();

        if !in_component && self.check_word("constructor") && matches!(self.peek(1), TokenKind::LParen) {
            self.advance();
            let params = self.parse_params()?;
            let body = self.parse_block_body()?;
            return Ok(MemberKind::Constructor(ConstructorDecl { access: modifiers.access, params, body }));
        }
        if in_component && self.check_word("build") && matches!(self.peek(1), TokenKind::LParen) {
            self.advance();
            self.parse_params()?;
            let ret_ty = self.parse_return_type()?;
            let body = self.parse_ui_body()?;
            return Ok(MemberKind::Build(BuildMethod { ret_ty, body }));
        }

        // Accessors parse as methods.
        if (self.check_word("get") || self.check_word("set")) && self.member_name_ahead(1) {
            self.advance();
        }

        let name = match self.current_kind().clone() {
            TokenKind::String(s) => {
                self.advance();
                s
            }
            TokenKind::Number(n) => {
                self.advance();
                n.to_string()
            }
            TokenKind::LBracket => self.take_bracketed_text()?,
            _ => self.expect_name()?,
        };
        let optional = self.match_token(&TokenKind::Question);
        // Definite assignment `x!: T`
        self.match_token(&TokenKind::Bang);

        if self.check(&TokenKind::LParen) || self.check(&TokenKind::Lt) {
            let type_params = self.parse_type_params()?;
            let params = self.parse_params()?;
            let ret_ty = self.parse_return_type()?;
            let body = if self.check(&TokenKind::LBrace) {
                Some(if decorators.is_empty() {
                    FnBody::Block(self.parse_block_body()?)
                } else {
                    self.parse_ranked_body()?
                })
            } else {
                self.expect_semi();
                None
            };
            return Ok(MemberKind::Method(MethodDecl { decorators, modifiers, name, type_params, params, ret_ty, body }));
        }

        let ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        let init = if self.match_token(&TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
        self.expect_semi();
        Ok(MemberKind::Property(PropertyDecl { decorators, modifiers, name, optional, ty, init }))
    }

    /// Modifier words count only when a member name follows them, so
    /// `static: number` is a property called `static`.
    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            let TokenKind::Ident(word) = self.current_kind() else { break };
            let word = word.clone();
            if !is_member_modifier(&word) || !self.member_name_ahead(1) {
                break;
            }
            self.advance();
            match word.as_str() {
                "public" => modifiers.access = Some(Access::Public),
                "private" => modifiers.access = Some(Access::Private),
                "protected" => modifiers.access = Some(Access::Protected),
                "static" => modifiers.is_static = true,
                "abstract" => modifiers.is_abstract = true,
                "readonly" => modifiers.is_readonly = true,
                "async" => modifiers.is_async = true,
                // `override`, `declare`
                _ => {}
            }
        }
        modifiers
    }

    fn member_name_ahead(&self, n: usize) -> bool {
        self.peek_is_name(n)
            || matches!(self.peek(n), TokenKind::String(_) | TokenKind::Number(_) | TokenKind::LBracket)
    }

    // =========================================================================
    // Functions
    // =========================================================================

    pub(crate) fn parse_function_decl(&mut self, decorators: Vec<Decorator>) -> Result<FnDecl, ParseError> {
        let is_async = self.match_word("async");
        self.expect(&TokenKind::Function)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let ret_ty = self.parse_return_type()?;

        let body = if self.match_token(&TokenKind::Semi) {
            // Overload or ambient signature
            FnBody::Block(Vec::new())
        } else if decorators.is_empty() {
            FnBody::Block(self.parse_block_body()?)
        } else {
            self.parse_ranked_body()?
        };

        Ok(FnDecl { decorators, is_async, name, type_params, params, ret_ty, body })
    }

    /// Body of a decorated function or method, by ranked choice: a builder
    /// body, then an extend body, then a plain block parsed for real.
    pub(crate) fn parse_ranked_body(&mut self) -> Result<FnBody, ParseError> {
        match self.first_of("function body", &[Self::parse_builder_fn_body, Self::parse_extend_fn_body]) {
            Ok(body) => Ok(body),
            Err(_) => Ok(FnBody::Block(self.parse_block_body()?)),
        }
    }

    fn parse_builder_fn_body(&mut self) -> Result<FnBody, ParseError> {
        Ok(FnBody::Builder(self.parse_ui_body()?))
    }

    fn parse_extend_fn_body(&mut self) -> Result<FnBody, ParseError> {
        Ok(FnBody::Extend(self.parse_extend_body()?))
    }

    // =========================================================================
    // Interfaces, aliases, enums
    // =========================================================================

    pub(crate) fn parse_interface_decl(&mut self) -> Result<InterfaceDecl, ParseError> {
        self.expect(&TokenKind::Interface)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        let extends = if self.match_token(&TokenKind::Extends) { self.parse_type_list()? } else { Vec::new() };
        let members = self.parse_type_members()?;
        Ok(InterfaceDecl { name, type_params, extends, members })
    }

    pub(crate) fn parse_type_alias_decl(&mut self) -> Result<TypeAliasDecl, ParseError> {
        self.expect_word("type")?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        self.expect(&TokenKind::Eq)?;
        let ty = self.parse_type()?;
        self.expect_semi();
        Ok(TypeAliasDecl { name, type_params, ty })
    }

    pub(crate) fn parse_enum_decl(&mut self) -> Result<EnumDecl, ParseError> {
        let is_const = self.match_token(&TokenKind::Const);
        self.expect(&TokenKind::Enum)?;
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let start = self.current().span.start;
            let member_name = match self.current_kind() {
                TokenKind::String(s) => {
                    let s = s.clone();
                    self.advance();
                    s
                }
                _ => self.expect_name()?,
            };
            let init = if self.match_token(&TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
            members.push(EnumMember { name: member_name, init, span: self.span_from(start) });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(EnumDecl { is_const, name, members })
    }
}

fn is_member_modifier(word: &str) -> bool {
    matches!(
        word,
        "public" | "private" | "protected" | "static" | "readonly" | "abstract" | "async" | "override" | "declare"
    )
}
