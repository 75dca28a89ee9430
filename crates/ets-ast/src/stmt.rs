// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement AST nodes.

use crate::expr::Expr;
use crate::ty::TypeExpr;
use crate::{NodeId, Span};

/// A statement in the AST.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StmtKind {
    /// Expression statement
    Expr(Expr),
    /// `var`/`let`/`const` declaration
    Var(VarDecl),
    /// `{ ... }`
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    For {
        head: ForHead,
        body: Box<Stmt>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    /// Break statement with optional label
    Break(Option<String>),
    /// Continue statement with optional label
    Continue(Option<String>),
    Throw(Expr),
    /// `outer: for (...) { ... break outer; }`
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    Try {
        block: Vec<Stmt>,
        catch: Option<CatchClause>,
        finally: Option<Vec<Stmt>>,
    },
    /// Lone `;`
    Empty,
    /// Placeholder left by error recovery
    Error(String),
}

/// The parenthesized head of a `for` loop.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ForHead {
    /// `for (const x of xs)`
    Of { kind: VarKind, binding: String, iter: Expr },
    /// `for (let k in obj)`
    In { kind: VarKind, binding: String, object: Expr },
    /// Three-clause loop; any clause may be omitted
    Classic {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
    },
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ForInit {
    Var(VarDecl),
    Expr(Expr),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CatchClause {
    pub param: Option<String>,
    pub ty: Option<TypeExpr>,
    pub body: Vec<Stmt>,
}

/// A `var`/`let`/`const` declaration with one or more declarators.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<VarDeclarator>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VarDeclarator {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}
