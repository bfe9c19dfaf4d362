//! Compiles rule visitor trees into a [`DispatchTable`].
//!
//! Every rule is walked once from its root. Each declared type produces an
//! enter entry (and a leave entry if the rule supplies one) at the depth it
//! was declared. When a nested declaration sits several type-graph hops
//! below its parent declaration, every type on the way gets a weak entry
//! so the walker keeps descending for that rule.

use indexmap::IndexMap;

use super::dispatch::{DispatchTable, LevelId, VisitorEntry, VisitorLevel};
use super::tree::{RuleVisitor, TypeVisitor, VisitFn};
use crate::error::{Result, StyleguideError};
use crate::lint::RuleInstanceConfig;
use crate::types::{NodeTypeId, TypeRegistry};

const ANY_KEY: &str = "any";
const REF_KEY: &str = "ref";

/// Historical spellings of renamed node types; the first one present wins.
const LEGACY_TYPE_NAMES: &[(&str, &[&str])] = &[
    ("Root", &["DefinitionRoot"]),
    ("ServerVariablesMap", &["ServerVariableMap"]),
    ("Paths", &["PathMap", "PathsMap"]),
    ("CallbacksMap", &["CallbackMap"]),
    ("MediaTypesMap", &["MediaTypeMap"]),
    ("ExamplesMap", &["ExampleMap"]),
    ("EncodingMap", &["EncodingsMap"]),
    ("HeadersMap", &["HeaderMap"]),
    ("LinksMap", &["LinkMap"]),
    ("OAuth2Flows", &["SecuritySchemeFlows"]),
    ("Responses", &["ResponsesMap"]),
];

/// Build the dispatch table for one dialect.
///
/// Rules are registered in the given order; within one type the enter list
/// ends up sorted by descending declaration depth and the leave list by
/// ascending depth, ties keeping registration order.
pub fn normalize_visitors(rules: &[RuleVisitor], registry: &TypeRegistry) -> Result<DispatchTable> {
    let mut normalizer = Normalizer {
        registry,
        table: DispatchTable::empty(registry),
    };

    for rule in rules {
        normalizer.normalize_root(rule)?;
    }

    let mut table = normalizer.table;
    table.sort_all();

    tracing::trace!(
        rules = rules.len(),
        levels = table.level_count(),
        "normalized visitors"
    );
    Ok(table)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Type(NodeTypeId),
    Any,
    Ref,
}

impl Slot {
    fn node_type(self) -> Option<NodeTypeId> {
        match self {
            Slot::Type(id) => Some(id),
            Slot::Any | Slot::Ref => None,
        }
    }
}

struct Normalizer<'r> {
    registry: &'r TypeRegistry,
    table: DispatchTable,
}

impl Normalizer<'_> {
    fn normalize_root(&mut self, rule: &RuleVisitor) -> Result<()> {
        let root = &rule.visitor;
        let registry = self.registry;

        for (id, node_type) in registry.iter() {
            if let Some(visitor) = find_visitor(&root.types, node_type.name()) {
                self.register(&rule.config, Slot::Type(id), visitor, None, 0)?;
            }
        }

        if let Some(visitor) = root.any.as_ref().or_else(|| root.types.get(ANY_KEY)) {
            self.register(&rule.config, Slot::Any, visitor, None, 0)?;
        }

        if let Some(visitor) = root.reference.as_ref().or_else(|| root.types.get(REF_KEY)) {
            if matches!(visitor, TypeVisitor::Object(nested) if nested.skip.is_some()) {
                return Err(StyleguideError::RefVisitorSkip);
            }
            self.register(&rule.config, Slot::Ref, visitor, None, 0)?;
        }

        Ok(())
    }

    fn normalize_nested(
        &mut self,
        rule: &RuleInstanceConfig,
        children: &IndexMap<String, TypeVisitor>,
        level: LevelId,
        depth: usize,
    ) -> Result<()> {
        for key in [ANY_KEY, REF_KEY] {
            if children.contains_key(key) {
                return Err(StyleguideError::ReservedKeyBelowRoot {
                    key: key.to_string(),
                });
            }
        }

        let registry = self.registry;
        for (id, node_type) in registry.iter() {
            if let Some(visitor) = find_visitor(children, node_type.name()) {
                self.register(rule, Slot::Type(id), visitor, Some(level), depth)?;
            }
        }
        Ok(())
    }

    fn register(
        &mut self,
        rule: &RuleInstanceConfig,
        slot: Slot,
        visitor: &TypeVisitor,
        parent: Option<LevelId>,
        depth: usize,
    ) -> Result<()> {
        let (enter, leave, skip, nested) = match visitor {
            TypeVisitor::Function(enter) => (Some(enter), None, None, None),
            TypeVisitor::Object(nested) => (
                nested.enter.as_ref(),
                nested.leave.as_ref(),
                nested.skip.as_ref(),
                Some(nested),
            ),
        };

        let level = self.table.push_level(VisitorLevel::Declared {
            node_type: slot.node_type(),
            parent,
        });

        // Objects without an enter callback still need an entry so the
        // walker activates the level for their children.
        let enter_entry = VisitorEntry {
            rule_id: rule.rule_id.clone(),
            severity: rule.severity,
            visit: enter.cloned().unwrap_or_else(VisitFn::noop),
            skip: skip.cloned(),
            depth,
            level,
        };
        self.bucket(slot).enter.push(enter_entry);

        if let Some(leave) = leave {
            let leave_entry = VisitorEntry {
                rule_id: rule.rule_id.clone(),
                severity: rule.severity,
                visit: leave.clone(),
                skip: None,
                depth,
                level,
            };
            self.bucket(slot).leave.push(leave_entry);
        }

        if let (Some(parent), Slot::Type(to)) = (parent, slot) {
            if let Some(from) = self.table.level(parent).node_type() {
                self.add_weak_nodes(rule, from, to, parent);
            }
        }

        if let Some(nested) = nested {
            self.normalize_nested(rule, &nested.children, level, depth + 1)?;
        }

        Ok(())
    }

    fn bucket(&mut self, slot: Slot) -> &mut super::dispatch::VisitorBucket {
        match slot {
            Slot::Type(id) => self.table.bucket_mut(id),
            Slot::Any => &mut self.table.any,
            Slot::Ref => &mut self.table.reference,
        }
    }

    /// Add weak entries for every type strictly between `from` and `to` on
    /// every path through the type graph.
    fn add_weak_nodes(
        &mut self,
        rule: &RuleInstanceConfig,
        from: NodeTypeId,
        to: NodeTypeId,
        parent: LevelId,
    ) {
        let mut stack = Vec::new();
        let before = self.table.level_count();
        self.search_paths(rule, from, to, parent, &mut stack);

        let added = self.table.level_count() - before;
        if added > 0 {
            tracing::trace!(
                rule = %rule.rule_id,
                from = self.registry.get(from).name(),
                to = self.registry.get(to).name(),
                added,
                "synthesized weak entries"
            );
        }
    }

    fn search_paths(
        &mut self,
        rule: &RuleInstanceConfig,
        from: NodeTypeId,
        to: NodeTypeId,
        parent: LevelId,
        stack: &mut Vec<NodeTypeId>,
    ) {
        if stack.contains(&from) {
            return;
        }
        stack.push(from);

        let registry = self.registry;
        let node_type = registry.get(from);
        let mut candidates: Vec<NodeTypeId> = Vec::new();

        for child in node_type.child_types() {
            if child == to {
                self.add_weak_from_stack(rule, &stack[1..], parent);
            } else if !candidates.contains(&child) {
                candidates.push(child);
            }
        }

        if node_type.extensions_prefix().is_some() {
            let extension = registry.spec_extension();
            if extension == to {
                self.add_weak_from_stack(rule, &stack[1..], parent);
            } else if !candidates.contains(&extension) {
                candidates.push(extension);
            }
        }

        for candidate in candidates {
            self.search_paths(rule, candidate, to, parent, stack);
        }

        stack.pop();
    }

    fn add_weak_from_stack(
        &mut self,
        rule: &RuleInstanceConfig,
        intermediates: &[NodeTypeId],
        parent: LevelId,
    ) {
        for &inter in intermediates {
            let level = self.table.push_level(VisitorLevel::Skipped { parent });
            self.table.bucket_mut(inter).enter.push(VisitorEntry {
                rule_id: rule.rule_id.clone(),
                severity: rule.severity,
                visit: VisitFn::noop(),
                skip: None,
                depth: 0,
                level,
            });
        }
    }
}

fn find_visitor<'v>(
    visitors: &'v IndexMap<String, TypeVisitor>,
    type_name: &str,
) -> Option<&'v TypeVisitor> {
    visitors.get(type_name).or_else(|| {
        LEGACY_TYPE_NAMES
            .iter()
            .find(|(canonical, _)| *canonical == type_name)
            .and_then(|(_, aliases)| aliases.iter().find_map(|alias| visitors.get(*alias)))
    })
}
