// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression AST nodes.

use crate::decl::Param;
use crate::stmt::Stmt;
use crate::ty::{TypeExpr, TypeParam};
use crate::ui::{UiBody, UiElement};
use crate::{NodeId, Span};

/// An expression in the AST.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ExprKind {
    /// Numeric literal (all bases)
    Number(f64),
    /// String literal with escapes resolved
    String(String),
    /// Template literal
    Template(Vec<TemplateElement>),
    /// Boolean literal
    Bool(bool),
    /// `null`
    Null,
    /// Identifier
    Ident(String),
    /// `this`
    This,
    /// `super`
    Super,
    /// State binding `$name`; the stored name has the `$` removed
    StateBinding(String),
    /// Resource reference `$r('app.string.title', ...)`
    Resource(Vec<Expr>),
    /// Array literal; `None` entries are holes (`[a, , b]`)
    Array(Vec<Option<Expr>>),
    /// Object literal
    Object(Vec<ObjectMember>),
    /// Function expression
    Function(Box<FnExpr>),
    /// Arrow function
    Arrow(Box<ArrowFn>),
    /// Call, `f(x)`, `f<T>(x)`, `f?.(x)`
    Call {
        callee: Box<Expr>,
        type_args: Vec<TypeExpr>,
        args: Vec<Expr>,
        optional: bool,
    },
    /// Member access `a.b` or `a?.b`
    Member {
        object: Box<Expr>,
        property: String,
        optional: bool,
    },
    /// Index access `a[i]` or `a?.[i]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        optional: bool,
    },
    /// `new C<T>(args)`; the argument list may be omitted
    New {
        callee: Box<Expr>,
        type_args: Vec<TypeExpr>,
        args: Option<Vec<Expr>>,
    },
    /// Prefix unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `await expr`
    Await(Box<Expr>),
    /// `++x`, `x--`
    Update {
        op: UpdateOp,
        prefix: bool,
        operand: Box<Expr>,
    },
    /// Binary operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Assignment, plain or compound
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// `cond ? a : b`
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// Type assertion `x as T`
    As {
        expr: Box<Expr>,
        ty: TypeExpr,
    },
    /// Non-null assertion `x!`
    NonNull(Box<Expr>),
    /// Parenthesized expression
    Paren(Box<Expr>),
    /// Spread `...x` (array elements and call arguments)
    Spread(Box<Expr>),
    /// Placeholder left by error recovery
    Error(String),
}

/// A piece of a template literal.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TemplateElement {
    Chunk(String),
    Subst(Expr),
}

/// An object literal member.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ObjectMember {
    KeyValue { key: PropKey, value: Expr },
    Shorthand(String),
    Method { key: PropKey, func: FnExpr },
    Spread(Expr),
}

/// A property name in an object literal.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PropKey {
    Ident(String),
    String(String),
    Number(f64),
    Computed(Box<Expr>),
}

/// Function expression, also the payload of object-literal methods.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FnExpr {
    pub name: Option<String>,
    pub is_async: bool,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub ret_ty: Option<TypeExpr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArrowFn {
    pub is_async: bool,
    pub params: Vec<Param>,
    pub ret_ty: Option<TypeExpr>,
    pub body: ArrowBody,
}

/// Body of an arrow function.
///
/// The UI shapes only appear for item builders of `ForEach`/`LazyForEach`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
    Ui(UiBody),
    Element(Box<UiElement>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    // Comparison
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Gt,
    Le,
    Ge,
    InstanceOf,
    In,
    // Logical
    And,
    Or,
    Nullish,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Exp => "**",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNe => "!==",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::InstanceOf => "instanceof",
            BinOp::In => "in",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Nullish => "??",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::UShr => ">>>",
        }
    }
}

/// Assignment operators; `Assign` is plain `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Nullish,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UnaryOp {
    /// Logical not (!)
    Not,
    /// Bitwise not (~)
    BitNot,
    /// Negation (-)
    Neg,
    /// Numeric plus (+)
    Plus,
    Typeof,
    Void,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UpdateOp {
    Inc,
    Dec,
}

impl Expr {
    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr {
        match &self.kind {
            ExprKind::Paren(inner) => inner.unparen(),
            _ => self,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::Error(_))
    }
}
