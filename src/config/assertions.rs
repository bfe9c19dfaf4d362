//! Configurable assertion rules.
//!
//! Rules whose id starts with `rule/` (or the deprecated `assert/`) and
//! whose setting is an object are not plugin rules but declarative
//! assertions. They are moved out of the rules map into
//! [`ResolvedStyleguideConfig::assertions`], and any custom functions they
//! reference as `pluginId/functionName` are looked up once and kept in the
//! config's own [`AssertionRegistry`].

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::warn;

use super::resolved::ResolvedStyleguideConfig;
use crate::error::{Result, StyleguideError};
use crate::lint::Severity;
use crate::plugin::{AssertionFn, Plugin};

const ASSERTION_PREFIX: &str = "rule/";
const DEPRECATED_ASSERTION_PREFIX: &str = "assert/";

/// A declarative assertion taken from the rules map.
#[derive(Debug, Clone, PartialEq)]
pub struct Assertion {
    /// The rule id it was declared under, e.g. `rule/operation-summary`.
    pub assertion_id: String,
    pub definition: Map<String, Value>,
}

impl Assertion {
    pub fn severity(&self) -> Severity {
        self.definition
            .get("severity")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(Severity::Error)
    }

    pub fn subject(&self) -> Option<&Value> {
        self.definition.get("subject")
    }

    pub fn message(&self) -> Option<&str> {
        self.definition.get("message").and_then(Value::as_str)
    }

    /// Assertion keys of the assertion itself and of every `where` clause.
    pub fn assertion_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = object_keys(self.definition.get("assertions"));
        if let Some(Value::Array(clauses)) = self.definition.get("where") {
            for clause in clauses {
                keys.extend(object_keys(clause.get("assertions")));
            }
        }
        keys
    }
}

fn object_keys(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_object)
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Custom assertion functions in use by one resolved config, keyed by the
/// `pluginId/functionName` reference.
#[derive(Debug, Clone, Default)]
pub struct AssertionRegistry {
    functions: IndexMap<String, AssertionFn>,
}

impl AssertionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, reference: impl Into<String>, f: AssertionFn) {
        self.functions.insert(reference.into(), f);
    }

    pub fn get(&self, reference: &str) -> Option<&AssertionFn> {
        self.functions.get(reference)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.functions.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

/// Move assertion rules out of the agnostic rules map and register the
/// custom functions they reference.
pub(crate) fn group_assertion_rules(config: &mut ResolvedStyleguideConfig) -> Result<()> {
    let rules = std::mem::take(&mut config.rules.agnostic);
    let mut kept = IndexMap::with_capacity(rules.len());

    for (rule_id, setting) in rules {
        let is_assertion_id = rule_id.starts_with(ASSERTION_PREFIX)
            || rule_id.starts_with(DEPRECATED_ASSERTION_PREFIX);

        match setting.as_object() {
            Some(definition) if is_assertion_id => {
                if rule_id.starts_with(DEPRECATED_ASSERTION_PREFIX) {
                    warn!(rule = %rule_id, "the `assert/` prefix is deprecated; use `rule/`");
                }
                let assertion = Assertion {
                    assertion_id: rule_id,
                    definition: definition.clone(),
                };
                for key in assertion.assertion_keys() {
                    register_custom_assertion(&config.plugins, &mut config.custom_assertions, key)?;
                }
                config.assertions.push(assertion);
            }
            _ => {
                kept.insert(rule_id, setting);
            }
        }
    }

    config.rules.agnostic = kept;
    Ok(())
}

fn register_custom_assertion(
    plugins: &[Arc<Plugin>],
    registry: &mut AssertionRegistry,
    key: &str,
) -> Result<()> {
    let Some((plugin_id, name)) = key.split_once('/') else {
        return Ok(());
    };
    if plugin_id.is_empty() || name.is_empty() {
        return Ok(());
    }

    let plugin = plugins
        .iter()
        .find(|p| p.id == plugin_id)
        .ok_or_else(|| StyleguideError::AssertionPluginNotFound {
            plugin_id: plugin_id.to_string(),
        })?;

    let f = plugin
        .assertions
        .get(name)
        .ok_or_else(|| StyleguideError::AssertionFunctionNotFound {
            plugin_id: plugin_id.to_string(),
            name: name.to_string(),
        })?;

    registry.register(key, f.clone());
    Ok(())
}
