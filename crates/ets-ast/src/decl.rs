// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declaration AST nodes.

use crate::expr::Expr;
use crate::stmt::{Stmt, VarDecl};
use crate::ty::{TypeExpr, TypeMember, TypeParam};
use crate::ui::{ModifierChain, UiBody};
use crate::{NodeId, Span};

/// A top-level declaration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Decl {
    pub id: NodeId,
    pub kind: DeclKind,
    pub span: Span,
}

/// The kind of declaration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DeclKind {
    Import(ImportDecl),
    Export(ExportDecl),
    /// `@Deco export ...`, kept apart from plain `export`
    DecoratedExport(DecoratedExport),
    /// `struct` UI component
    Component(ComponentDecl),
    Class(ClassDecl),
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Enum(EnumDecl),
    /// Function declaration, decorated or not
    Function(FnDecl),
    /// Top-level `var`/`let`/`const`
    Variable(VarDecl),
    /// Declaration that failed to parse; spans the skipped text
    Error(String),
}

/// `@Name` or `@Name(args)`.
///
/// Names are not checked here; any identifier is accepted.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Decorator {
    pub name: String,
    pub args: Option<Vec<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImportDecl {
    /// `import Foo from 'm'`
    pub default: Option<String>,
    /// `import * as ns from 'm'`
    pub namespace: Option<String>,
    /// `import { a, b as c } from 'm'`
    pub named: Vec<ImportSpecifier>,
    pub source: String,
}

/// `name` or `name as alias`, shared by imports and re-exports.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImportSpecifier {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ExportDecl {
    /// `export { a, b as c } [from 'm']`
    Named {
        specifiers: Vec<ImportSpecifier>,
        source: Option<String>,
    },
    /// `export * [as ns] from 'm'`
    All {
        alias: Option<String>,
        source: String,
    },
    /// `export <declaration>`
    Decl(Box<Decl>),
    /// `export default ...`
    Default(ExportDefault),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ExportDefault {
    Decl(Box<Decl>),
    Expr(Expr),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecoratedExport {
    pub decorators: Vec<Decorator>,
    pub item: DecoratedExportItem,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DecoratedExportItem {
    /// Function, class or component
    Decl(Box<Decl>),
    Default(ExportDefault),
}

/// A UI component: `@Component struct Name { ... }`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComponentDecl {
    pub decorators: Vec<Decorator>,
    /// `@Component export struct` without going through `DecoratedExport`
    pub exported: bool,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClassDecl {
    pub decorators: Vec<Decorator>,
    pub is_abstract: bool,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeExpr>,
    pub implements: Vec<TypeExpr>,
    pub members: Vec<Member>,
}

/// A class or component member.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Member {
    pub id: NodeId,
    pub kind: MemberKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MemberKind {
    Property(PropertyDecl),
    Method(MethodDecl),
    /// Class only
    Constructor(ConstructorDecl),
    /// Component only: `build() { ... }`
    Build(BuildMethod),
    /// Member that failed to parse
    Error(String),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PropertyDecl {
    pub decorators: Vec<Decorator>,
    pub modifiers: Modifiers,
    pub name: String,
    pub optional: bool,
    pub ty: Option<TypeExpr>,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MethodDecl {
    pub decorators: Vec<Decorator>,
    pub modifiers: Modifiers,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub ret_ty: Option<TypeExpr>,
    /// `None` for `abstract m(): void;`
    pub body: Option<FnBody>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConstructorDecl {
    pub access: Option<Access>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BuildMethod {
    pub ret_ty: Option<TypeExpr>,
    pub body: UiBody,
}

/// Member modifiers, in the order they may appear.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Modifiers {
    pub access: Option<Access>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_readonly: bool,
    pub is_async: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Access {
    Public,
    Private,
    Protected,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeExpr>,
    pub members: Vec<TypeMember>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeAliasDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumDecl {
    pub is_const: bool,
    pub name: String,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumMember {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

/// A function declaration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FnDecl {
    /// `@Builder`, `@Extend(Text)`, `@Styles`, ...
    pub decorators: Vec<Decorator>,
    pub is_async: bool,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub ret_ty: Option<TypeExpr>,
    pub body: FnBody,
}

/// The three body shapes a function or method can take.
///
/// Only decorated functions and methods get `Builder` or `Extend`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FnBody {
    /// Ordinary statement block
    Block(Vec<Stmt>),
    /// UI-producing body (`@Builder`)
    Builder(UiBody),
    /// Modifier-chain-only body (`@Extend`, `@Styles`)
    Extend(Vec<ModifierChain>),
}

/// A function parameter.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Param {
    pub name: String,
    /// `...rest`
    pub rest: bool,
    /// `name?`
    pub optional: bool,
    pub ty: Option<TypeExpr>,
    pub default: Option<Expr>,
    pub span: Span,
}

impl Decl {
    /// Decorators written on this declaration, wherever they are stored.
    pub fn decorators(&self) -> &[Decorator] {
        match &self.kind {
            DeclKind::DecoratedExport(d) => &d.decorators,
            DeclKind::Component(c) => &c.decorators,
            DeclKind::Class(c) => &c.decorators,
            DeclKind::Function(f) => &f.decorators,
            _ => &[],
        }
    }

    /// The declaration underneath any `export` wrapper.
    pub fn unwrap_export(&self) -> &Decl {
        match &self.kind {
            DeclKind::Export(ExportDecl::Decl(inner))
            | DeclKind::Export(ExportDecl::Default(ExportDefault::Decl(inner)))
            | DeclKind::DecoratedExport(DecoratedExport { item: DecoratedExportItem::Decl(inner), .. })
            | DeclKind::DecoratedExport(DecoratedExport {
                item: DecoratedExportItem::Default(ExportDefault::Decl(inner)),
                ..
            }) => inner.unwrap_export(),
            _ => self,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, DeclKind::Error(_))
    }
}

impl Decorator {
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}
