// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type annotation nodes.

use crate::decl::Param;
use crate::{NodeId, Span};

/// A type annotation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeExpr {
    pub id: NodeId,
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeKind {
    /// `number`, `Foo`, `ns.Foo`, `Array<T>`
    Named { path: Vec<String>, args: Vec<TypeExpr> },
    /// `'a'`, `1`, `true`
    Literal(TypeLiteral),
    /// `T[]`
    Array(Box<TypeExpr>),
    /// `[A, B]`
    Tuple(Vec<TypeExpr>),
    /// `A | B | C`
    Union(Vec<TypeExpr>),
    /// `(a: A) => R`
    Function { params: Vec<Param>, ret: Box<TypeExpr> },
    /// `(T)`
    Paren(Box<TypeExpr>),
    /// `T extends U ? X : Y`
    Conditional {
        check: Box<TypeExpr>,
        extends: Box<TypeExpr>,
        then_ty: Box<TypeExpr>,
        else_ty: Box<TypeExpr>,
    },
    /// `{ a: T; m(): R }`
    Object(Vec<TypeMember>),
    /// `typeof x.y`
    Typeof(Vec<String>),
    /// `keyof T`
    Keyof(Box<TypeExpr>),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeLiteral {
    String(String),
    Number(f64),
    Bool(bool),
}

/// A member of an object type or interface body.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeMember {
    pub kind: TypeMemberKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeMemberKind {
    Property {
        name: String,
        readonly: bool,
        optional: bool,
        ty: Option<TypeExpr>,
    },
    Method {
        name: String,
        optional: bool,
        type_params: Vec<TypeParam>,
        params: Vec<Param>,
        ret_ty: Option<TypeExpr>,
    },
}

/// A generic parameter declaration: `T extends U = D`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
    pub span: Span,
}

impl TypeExpr {
    /// Dotted name of a plain named type without arguments (`a.B`).
    pub fn simple_name(&self) -> Option<String> {
        match &self.kind {
            TypeKind::Named { path, args } if args.is_empty() => Some(path.join(".")),
            _ => None,
        }
    }
}
