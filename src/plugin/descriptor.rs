//! Plugin descriptors and their resolved form.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::RawStyleguideConfig;
use crate::lint::Location;
use crate::types::SpecMajor;
use crate::visitor::RootVisitor;

/// Which family of rule-like extension a factory belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Rule,
    Preprocessor,
    Decorator,
}

impl RuleKind {
    pub const ALL: [RuleKind; 3] = [RuleKind::Rule, RuleKind::Preprocessor, RuleKind::Decorator];

    /// Plural name as used in config documents.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Rule => "rules",
            RuleKind::Preprocessor => "preprocessors",
            RuleKind::Decorator => "decorators",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns a rule's options into one or more visitor trees.
#[derive(Clone)]
pub struct RuleFactory(Arc<dyn Fn(&Map<String, Value>) -> Vec<RootVisitor> + Send + Sync>);

impl RuleFactory {
    pub fn new(
        f: impl Fn(&Map<String, Value>) -> Vec<RootVisitor> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// A factory producing a single visitor tree.
    pub fn single(f: impl Fn(&Map<String, Value>) -> RootVisitor + Send + Sync + 'static) -> Self {
        Self::new(move |options| vec![f(options)])
    }

    pub fn create(&self, options: &Map<String, Value>) -> Vec<RootVisitor> {
        (self.0)(options)
    }
}

impl fmt::Debug for RuleFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RuleFactory")
    }
}

/// A failed check reported by a custom assertion function.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionResult {
    pub message: String,
    pub location: Location,
}

/// Custom assertion function exported by a plugin.
///
/// Called with the asserted value, the assertion's options and the location
/// of the value.
#[derive(Clone)]
pub struct AssertionFn(
    Arc<dyn Fn(&Value, &Value, &Location) -> Vec<AssertionResult> + Send + Sync>,
);

impl AssertionFn {
    pub fn new(
        f: impl Fn(&Value, &Value, &Location) -> Vec<AssertionResult> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(
        &self,
        value: &Value,
        options: &Value,
        location: &Location,
    ) -> Vec<AssertionResult> {
        (self.0)(value, options, location)
    }
}

impl fmt::Debug for AssertionFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AssertionFn")
    }
}

/// Factories keyed by rule id, one map per major version family.
#[derive(Debug, Clone, Default)]
pub struct DialectBuckets {
    pub oas2: Option<IndexMap<String, RuleFactory>>,
    pub oas3: Option<IndexMap<String, RuleFactory>>,
    pub async2: Option<IndexMap<String, RuleFactory>>,
}

impl DialectBuckets {
    pub fn get(&self, major: SpecMajor) -> Option<&IndexMap<String, RuleFactory>> {
        match major {
            SpecMajor::Oas2 => self.oas2.as_ref(),
            SpecMajor::Oas3 => self.oas3.as_ref(),
            SpecMajor::Async2 => self.async2.as_ref(),
        }
    }

    fn get_mut(&mut self, major: SpecMajor) -> &mut IndexMap<String, RuleFactory> {
        let slot = match major {
            SpecMajor::Oas2 => &mut self.oas2,
            SpecMajor::Oas3 => &mut self.oas3,
            SpecMajor::Async2 => &mut self.async2,
        };
        slot.get_or_insert_with(IndexMap::new)
    }

    /// Whether no version family is declared at all.
    pub fn has_no_dialect(&self) -> bool {
        self.oas2.is_none() && self.oas3.is_none() && self.async2.is_none()
    }

    pub(crate) fn map_ids(
        &self,
        f: impl Fn(&IndexMap<String, RuleFactory>) -> IndexMap<String, RuleFactory>,
    ) -> Self {
        Self {
            oas2: self.oas2.as_ref().map(&f),
            oas3: self.oas3.as_ref().map(&f),
            async2: self.async2.as_ref().map(&f),
        }
    }
}

/// A plugin as supplied by the host or a manifest, before validation.
///
/// ```
/// use apistyle::plugin::{PluginDescriptor, RuleFactory};
/// use apistyle::types::SpecMajor;
/// use apistyle::visitor::RootVisitor;
///
/// let acme = PluginDescriptor::new("acme")
///     .rule(SpecMajor::Oas3, "no-foo", RuleFactory::single(|_| RootVisitor::new()));
/// assert_eq!(acme.id.as_deref(), Some("acme"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginDescriptor {
    pub id: Option<String>,
    pub rules: Option<DialectBuckets>,
    pub preprocessors: Option<DialectBuckets>,
    pub decorators: Option<DialectBuckets>,
    pub presets: IndexMap<String, RawStyleguideConfig>,
    pub assertions: IndexMap<String, AssertionFn>,
}

impl PluginDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    fn buckets_mut(&mut self, kind: RuleKind) -> &mut DialectBuckets {
        let slot = match kind {
            RuleKind::Rule => &mut self.rules,
            RuleKind::Preprocessor => &mut self.preprocessors,
            RuleKind::Decorator => &mut self.decorators,
        };
        slot.get_or_insert_with(DialectBuckets::default)
    }

    /// Register a factory of the given kind for one version family.
    pub fn factory(
        mut self,
        kind: RuleKind,
        major: SpecMajor,
        id: impl Into<String>,
        factory: RuleFactory,
    ) -> Self {
        self.buckets_mut(kind).get_mut(major).insert(id.into(), factory);
        self
    }

    pub fn rule(self, major: SpecMajor, id: impl Into<String>, factory: RuleFactory) -> Self {
        self.factory(RuleKind::Rule, major, id, factory)
    }

    pub fn preprocessor(
        self,
        major: SpecMajor,
        id: impl Into<String>,
        factory: RuleFactory,
    ) -> Self {
        self.factory(RuleKind::Preprocessor, major, id, factory)
    }

    pub fn decorator(self, major: SpecMajor, id: impl Into<String>, factory: RuleFactory) -> Self {
        self.factory(RuleKind::Decorator, major, id, factory)
    }

    pub fn preset(mut self, name: impl Into<String>, config: RawStyleguideConfig) -> Self {
        self.presets.insert(name.into(), config);
        self
    }

    pub fn assertion(mut self, name: impl Into<String>, f: AssertionFn) -> Self {
        self.assertions.insert(name.into(), f);
        self
    }
}

/// A validated plugin with namespaced rule ids.
#[derive(Debug, Clone, Default)]
pub struct Plugin {
    pub id: String,
    pub rules: Option<DialectBuckets>,
    pub preprocessors: Option<DialectBuckets>,
    pub decorators: Option<DialectBuckets>,
    pub presets: IndexMap<String, RawStyleguideConfig>,
    pub assertions: IndexMap<String, AssertionFn>,
}

impl Plugin {
    pub fn buckets(&self, kind: RuleKind) -> Option<&DialectBuckets> {
        match kind {
            RuleKind::Rule => self.rules.as_ref(),
            RuleKind::Preprocessor => self.preprocessors.as_ref(),
            RuleKind::Decorator => self.decorators.as_ref(),
        }
    }

    /// Factories of one kind for one version family.
    pub fn factories(
        &self,
        kind: RuleKind,
        major: SpecMajor,
    ) -> Option<&IndexMap<String, RuleFactory>> {
        self.buckets(kind).and_then(|b| b.get(major))
    }
}

/// Entry of a `plugins` list.
#[derive(Clone)]
pub enum PluginRef {
    /// A manifest path, relative to the declaring config.
    Path(String),
    /// A descriptor supplied directly by the host.
    Inline(Arc<PluginDescriptor>),
}

impl PluginRef {
    pub fn inline(descriptor: PluginDescriptor) -> Self {
        PluginRef::Inline(Arc::new(descriptor))
    }

    pub fn as_path(&self) -> Option<&str> {
        match self {
            PluginRef::Path(path) => Some(path),
            PluginRef::Inline(_) => None,
        }
    }
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginRef::Path(path) => f.write_str(path),
            PluginRef::Inline(descriptor) => match &descriptor.id {
                Some(id) => write!(f, "inline plugin \"{}\"", id),
                None => f.write_str("inline plugin"),
            },
        }
    }
}

impl fmt::Debug for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginRef({})", self)
    }
}

impl From<PluginDescriptor> for PluginRef {
    fn from(descriptor: PluginDescriptor) -> Self {
        PluginRef::inline(descriptor)
    }
}

impl Serialize for PluginRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PluginRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(PluginRef::Path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_dialect_buckets() {
        let plugin = PluginDescriptor::new("acme")
            .rule(SpecMajor::Oas3, "no-foo", RuleFactory::single(|_| RootVisitor::new()))
            .decorator(SpecMajor::Async2, "strip", RuleFactory::new(|_| vec![]));

        let rules = plugin.rules.as_ref().unwrap();
        assert!(rules.oas3.as_ref().unwrap().contains_key("no-foo"));
        assert!(rules.oas2.is_none());
        assert!(plugin.preprocessors.is_none());
        assert!(plugin.decorators.as_ref().unwrap().async2.is_some());
    }

    #[test]
    fn factory_single_wraps_one_tree() {
        let factory = RuleFactory::single(|_| RootVisitor::new());
        assert_eq!(factory.create(&Map::new()).len(), 1);
    }

    #[test]
    fn empty_buckets_have_no_dialect() {
        assert!(DialectBuckets::default().has_no_dialect());
    }

    #[test]
    fn plugin_ref_display() {
        assert_eq!(PluginRef::Path("./a.yaml".into()).to_string(), "./a.yaml");
        assert_eq!(
            PluginRef::inline(PluginDescriptor::new("acme")).to_string(),
            "inline plugin \"acme\""
        );
        assert_eq!(
            PluginRef::inline(PluginDescriptor::default()).to_string(),
            "inline plugin"
        );
    }

    #[test]
    fn rule_kind_names() {
        assert_eq!(RuleKind::Preprocessor.to_string(), "preprocessors");
    }
}
