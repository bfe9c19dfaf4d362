//! Rule-authored visitor trees.
//!
//! A rule declares interest in node types as a tree keyed by type name:
//!
//! ```
//! use apistyle::visitor::{NestedVisitor, RootVisitor, TypeVisitor};
//!
//! // Root -> Operation -> Response, with no callbacks on Root itself.
//! let visitor = RootVisitor::new().on(
//!     "Operation",
//!     NestedVisitor::new().child(
//!         "Response",
//!         TypeVisitor::enter(|_node, ctx| ctx.report("response visited")),
//!     ),
//! );
//! assert!(visitor.types.contains_key("Operation"));
//! ```
//!
//! The two reserved slots (`any` and `ref`) only exist on [`RootVisitor`];
//! nested levels cannot declare them.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::lint::{RuleInstanceConfig, UserContext};

/// Key under which a node sits in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKey<'a> {
    Name(&'a str),
    Index(usize),
}

/// An enter or leave callback.
#[derive(Clone)]
pub struct VisitFn(Arc<dyn Fn(&Value, &mut UserContext<'_>) + Send + Sync>);

impl VisitFn {
    pub fn new(f: impl Fn(&Value, &mut UserContext<'_>) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A callback that does nothing.
    pub fn noop() -> Self {
        Self::new(|_, _| {})
    }

    pub fn call(&self, node: &Value, ctx: &mut UserContext<'_>) {
        (self.0)(node, ctx)
    }
}

impl std::fmt::Debug for VisitFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VisitFn")
    }
}

/// Predicate deciding whether a node is skipped for one rule.
#[derive(Clone)]
pub struct SkipFn(Arc<dyn Fn(&Value, NodeKey<'_>) -> bool + Send + Sync>);

impl SkipFn {
    pub fn new(f: impl Fn(&Value, NodeKey<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, node: &Value, key: NodeKey<'_>) -> bool {
        (self.0)(node, key)
    }
}

impl std::fmt::Debug for SkipFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SkipFn")
    }
}

/// Visitor for one node type: a bare enter callback or a nested object.
#[derive(Debug, Clone)]
pub enum TypeVisitor {
    Function(VisitFn),
    Object(NestedVisitor),
}

impl TypeVisitor {
    /// Enter-only visitor.
    pub fn enter(f: impl Fn(&Value, &mut UserContext<'_>) + Send + Sync + 'static) -> Self {
        TypeVisitor::Function(VisitFn::new(f))
    }
}

impl From<NestedVisitor> for TypeVisitor {
    fn from(nested: NestedVisitor) -> Self {
        TypeVisitor::Object(nested)
    }
}

/// Visitor object below the root: callbacks plus visitors for child types.
#[derive(Debug, Clone, Default)]
pub struct NestedVisitor {
    pub enter: Option<VisitFn>,
    pub leave: Option<VisitFn>,
    pub skip: Option<SkipFn>,
    pub children: IndexMap<String, TypeVisitor>,
}

impl NestedVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter(
        mut self,
        f: impl Fn(&Value, &mut UserContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.enter = Some(VisitFn::new(f));
        self
    }

    pub fn on_leave(
        mut self,
        f: impl Fn(&Value, &mut UserContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.leave = Some(VisitFn::new(f));
        self
    }

    pub fn skip_when(
        mut self,
        f: impl Fn(&Value, NodeKey<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.skip = Some(SkipFn::new(f));
        self
    }

    /// Declare a visitor for a child type name.
    pub fn child(mut self, type_name: impl Into<String>, visitor: impl Into<TypeVisitor>) -> Self {
        self.children.insert(type_name.into(), visitor.into());
        self
    }
}

/// Top level of a rule's visitor tree.
#[derive(Debug, Clone, Default)]
pub struct RootVisitor {
    /// Matches every node regardless of type.
    pub any: Option<TypeVisitor>,
    /// Matches reference nodes before they are dereferenced. Skip predicates
    /// are not supported here.
    pub reference: Option<TypeVisitor>,
    pub types: IndexMap<String, TypeVisitor>,
}

impl RootVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a visitor for a type name.
    pub fn on(mut self, type_name: impl Into<String>, visitor: impl Into<TypeVisitor>) -> Self {
        self.types.insert(type_name.into(), visitor.into());
        self
    }

    pub fn any(mut self, visitor: impl Into<TypeVisitor>) -> Self {
        self.any = Some(visitor.into());
        self
    }

    pub fn reference(mut self, visitor: impl Into<TypeVisitor>) -> Self {
        self.reference = Some(visitor.into());
        self
    }
}

/// A visitor tree together with the rule it belongs to.
#[derive(Debug, Clone)]
pub struct RuleVisitor {
    pub config: RuleInstanceConfig,
    pub visitor: RootVisitor,
}

impl RuleVisitor {
    pub fn new(config: RuleInstanceConfig, visitor: RootVisitor) -> Self {
        Self { config, visitor }
    }
}
