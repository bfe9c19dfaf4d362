//! Visitor normalization.
//!
//! Rules author arbitrarily deep [`RootVisitor`] trees keyed by node-type
//! name. [`normalize_visitors`] flattens all of them into one
//! [`DispatchTable`] that a single-pass walker executes:
//!
//! - [`tree`] - visitor tree types authored by rules
//! - [`dispatch`] - the flattened, sorted table
//! - [`normalize`] - the compilation step, including weak-entry synthesis

pub mod dispatch;
pub mod normalize;
pub mod tree;

pub use dispatch::{DispatchTable, LevelId, VisitorBucket, VisitorEntry, VisitorLevel};
pub use normalize::normalize_visitors;
pub use tree::{
    NestedVisitor, NodeKey, RootVisitor, RuleVisitor, SkipFn, TypeVisitor, VisitFn,
};
