// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for ETS source files.
//!
//! This crate defines the tokens and AST nodes shared between the lexer,
//! parser, lint pass, and validation harness. Every node family follows the
//! same `{ id, kind, span }` layout; UI constructs live in [`ui`].

pub mod span;
pub mod token;
pub mod expr;
pub mod stmt;
pub mod decl;
pub mod ty;
pub mod ui;

pub use span::{Span, LineMap};

/// Unique identifier for AST nodes.
///
/// Assigned in construction order, so two parses of the same text produce
/// the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

/// A parsed source file.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Module {
    pub decls: Vec<decl::Decl>,
    pub span: Span,
}
