//! The flattened dispatch table a document walker executes against.

use std::collections::HashMap;

use serde_json::Value;

use super::tree::{NodeKey, SkipFn, VisitFn};
use crate::lint::{Location, Problem, Severity, UserContext};
use crate::types::{NodeTypeId, TypeRegistry};

/// Index of a [`VisitorLevel`] inside its [`DispatchTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(usize);

impl LevelId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One nesting level of a rule's visitor tree.
///
/// Walkers keep their own per-level state (which node activated a level,
/// which nodes a skipped level has already seen) in side tables indexed by
/// [`LevelId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitorLevel {
    /// A level the rule declared. `node_type` is `None` for the reserved
    /// `any` and `ref` slots.
    Declared {
        node_type: Option<NodeTypeId>,
        parent: Option<LevelId>,
    },
    /// A pass-through level synthesized between `parent` and a deeper
    /// declared type.
    Skipped { parent: LevelId },
}

impl VisitorLevel {
    pub fn parent(&self) -> Option<LevelId> {
        match self {
            VisitorLevel::Declared { parent, .. } => *parent,
            VisitorLevel::Skipped { parent } => Some(*parent),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, VisitorLevel::Skipped { .. })
    }

    pub fn node_type(&self) -> Option<NodeTypeId> {
        match self {
            VisitorLevel::Declared { node_type, .. } => *node_type,
            VisitorLevel::Skipped { .. } => None,
        }
    }
}

/// A single callback registration.
#[derive(Debug, Clone)]
pub struct VisitorEntry {
    pub rule_id: String,
    pub severity: Severity,
    pub visit: VisitFn,
    pub skip: Option<SkipFn>,
    /// Nesting depth of the declaration inside its rule (0 = top level).
    pub depth: usize,
    pub level: LevelId,
}

impl VisitorEntry {
    /// Run the callback; reported problems carry this entry's rule and severity.
    pub fn visit(&self, node: &Value, location: &Location, problems: &mut Vec<Problem>) {
        let mut ctx = UserContext::new(&self.rule_id, self.severity, location, problems);
        self.visit.call(node, &mut ctx);
    }

    /// Run a `ref` callback with the dereferenced target available.
    pub fn visit_ref(
        &self,
        node: &Value,
        resolved: &Value,
        location: &Location,
        problems: &mut Vec<Problem>,
    ) {
        let mut ctx = UserContext::new(&self.rule_id, self.severity, location, problems)
            .with_resolved(resolved);
        self.visit.call(node, &mut ctx);
    }

    /// Whether the skip predicate (if any) excludes this node.
    pub fn should_skip(&self, node: &Value, key: NodeKey<'_>) -> bool {
        self.skip.as_ref().is_some_and(|skip| skip.call(node, key))
    }
}

/// Enter and leave entries for one type (or reserved slot).
#[derive(Debug, Clone, Default)]
pub struct VisitorBucket {
    pub enter: Vec<VisitorEntry>,
    pub leave: Vec<VisitorEntry>,
}

impl VisitorBucket {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.leave.is_empty()
    }

    pub(crate) fn sort_by_depth(&mut self) {
        self.enter.sort_by(|a, b| b.depth.cmp(&a.depth));
        self.leave.sort_by(|a, b| a.depth.cmp(&b.depth));
    }
}

/// Type-indexed table of sorted visitor entries.
///
/// Built once per lint run by [`normalize_visitors`](super::normalize_visitors)
/// and read-only afterwards.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    pub(crate) any: VisitorBucket,
    pub(crate) reference: VisitorBucket,
    pub(crate) types: Vec<VisitorBucket>,
    pub(crate) levels: Vec<VisitorLevel>,
    names: HashMap<String, NodeTypeId>,
}

impl DispatchTable {
    pub(crate) fn empty(registry: &TypeRegistry) -> Self {
        Self {
            any: VisitorBucket::default(),
            reference: VisitorBucket::default(),
            types: vec![VisitorBucket::default(); registry.len()],
            levels: Vec::new(),
            names: registry
                .iter()
                .map(|(id, node_type)| (node_type.name().to_string(), id))
                .collect(),
        }
    }

    pub(crate) fn push_level(&mut self, level: VisitorLevel) -> LevelId {
        self.levels.push(level);
        LevelId(self.levels.len() - 1)
    }

    pub(crate) fn bucket_mut(&mut self, id: NodeTypeId) -> &mut VisitorBucket {
        &mut self.types[id.index()]
    }

    pub(crate) fn sort_all(&mut self) {
        self.any.sort_by_depth();
        self.reference.sort_by_depth();
        for bucket in &mut self.types {
            bucket.sort_by_depth();
        }
    }

    /// Entries matching every node.
    pub fn any(&self) -> &VisitorBucket {
        &self.any
    }

    /// Entries matching reference nodes before dereferencing.
    pub fn reference(&self) -> &VisitorBucket {
        &self.reference
    }

    /// Entries for a node type.
    pub fn for_type(&self, id: NodeTypeId) -> &VisitorBucket {
        &self.types[id.index()]
    }

    /// Entries for a type name, or for the reserved `any` / `ref` keys.
    pub fn by_name(&self, name: &str) -> Option<&VisitorBucket> {
        match name {
            "any" => Some(&self.any),
            "ref" => Some(&self.reference),
            _ => self.names.get(name).map(|id| self.for_type(*id)),
        }
    }

    pub fn level(&self, id: LevelId) -> &VisitorLevel {
        &self.levels[id.0]
    }

    /// Whether an entry is a synthesized pass-through entry.
    pub fn is_weak(&self, entry: &VisitorEntry) -> bool {
        self.level(entry.level).is_skipped()
    }

    /// Number of levels (declared and skipped) across all rules.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
