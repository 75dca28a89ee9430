// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! UI sublanguage nodes: build bodies, elements, modifier chains and
//! UI-scoped control flow.

use crate::expr::Expr;
use crate::{NodeId, Span};

/// Brace-delimited list of UI items (build body, child content, builder
/// body, UI arrow body, UI `if` branch).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UiBody {
    pub items: Vec<UiItem>,
    pub span: Span,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UiItem {
    pub id: NodeId,
    pub kind: UiItemKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UiItemKind {
    Element(UiElement),
    /// `Child({ a: 1 });`, a bare invocation with its terminator
    CustomComponent { name: String, args: UiArgs },
    If(UiIf),
    ForEach(ForEach),
    /// Anything else that parses as an expression statement
    Expr(Expr),
    /// Item that failed to parse
    Error(String),
}

/// `Name(args) { children }.modifier(...)...`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UiElement {
    pub name: String,
    pub args: Option<UiArgs>,
    pub body: Option<UiBody>,
    pub modifiers: Option<ModifierChain>,
    pub span: Span,
}

/// Parenthesized arguments of a UI element.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UiArgs {
    /// Single `{ key: value, ... }` parameter object
    Params(ComponentParams),
    Exprs(Vec<Expr>),
}

/// Restricted object literal passed to a component: keys with values only,
/// trailing comma allowed.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComponentParams {
    pub entries: Vec<ComponentParam>,
    pub span: Span,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComponentParam {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// One `.name(args?)` segment plus the rest of the chain.
///
/// `.a(1).b().c` is stored as `a -> b -> c`, each segment owning the next.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModifierChain {
    pub name: String,
    pub args: Option<Vec<Expr>>,
    pub rest: Option<Box<ModifierChain>>,
    /// From this segment's `.` to the end of the chain.
    pub span: Span,
}

impl ModifierChain {
    /// Segments from first to last.
    pub fn segments(&self) -> Segments<'_> {
        Segments { next: Some(self) }
    }

    pub fn names(&self) -> Vec<&str> {
        self.segments().map(|s| s.name.as_str()).collect()
    }

    /// Build a right-nested chain from segments in source order.
    pub fn from_segments(segments: Vec<(String, Option<Vec<Expr>>, Span)>) -> Option<ModifierChain> {
        let mut chain: Option<ModifierChain> = None;
        for (name, args, span) in segments.into_iter().rev() {
            let span = match &chain {
                Some(rest) => span.to(rest.span),
                None => span,
            };
            chain = Some(ModifierChain { name, args, rest: chain.map(Box::new), span });
        }
        chain
    }
}

pub struct Segments<'a> {
    next: Option<&'a ModifierChain>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a ModifierChain;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.rest.as_deref();
        Some(current)
    }
}

/// UI `if` whose branches hold UI items only.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UiIf {
    pub cond: Expr,
    pub then_body: UiBody,
    pub else_branch: Option<UiElse>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UiElse {
    If(Box<UiIf>),
    Body(UiBody),
}

/// `ForEach(source, itemBuilder, key?)` or the `LazyForEach` variant.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ForEach {
    pub lazy: bool,
    pub source: Expr,
    /// Always an arrow function
    pub item_builder: Expr,
    pub key: Option<Expr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_segments_nests_to_the_right() {
        let chain = ModifierChain::from_segments(vec![
            ("fontSize".into(), Some(vec![]), Span::new(10, 22)),
            ("margin".into(), None, Span::new(22, 29)),
        ])
        .unwrap();
        assert_eq!(chain.names(), vec!["fontSize", "margin"]);
        assert_eq!(chain.span, Span::new(10, 29));
        let rest = chain.rest.as_ref().unwrap();
        assert_eq!(rest.name, "margin");
        assert!(rest.rest.is_none());
    }

    #[test]
    fn empty_segments_give_no_chain() {
        assert!(ModifierChain::from_segments(Vec::new()).is_none());
    }
}
