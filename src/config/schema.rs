//! Raw configuration schema.
//!
//! These types mirror the document format. They are deserialized from YAML
//! or JSON and then handed to the [`StyleguideResolver`](super::StyleguideResolver).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StyleguideError};
use crate::lint::RuleSetting;
use crate::plugin::PluginRef;
use crate::types::Dialect;

/// Ordered map of rule id to setting.
pub type RuleMap = IndexMap<String, RuleSetting>;

/// A styleguide fragment as written in a config file or exported as a preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStyleguideConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginRef>,

    /// Presets and extended documents. Entries must be strings; this is
    /// checked at resolution time so the error names the problem precisely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rules: RuleMap,
    #[serde(default, rename = "oas2Rules", skip_serializing_if = "IndexMap::is_empty")]
    pub oas2_rules: RuleMap,
    #[serde(default, rename = "oas3_0Rules", skip_serializing_if = "IndexMap::is_empty")]
    pub oas3_0_rules: RuleMap,
    #[serde(default, rename = "oas3_1Rules", skip_serializing_if = "IndexMap::is_empty")]
    pub oas3_1_rules: RuleMap,
    #[serde(default, rename = "async2Rules", skip_serializing_if = "IndexMap::is_empty")]
    pub async2_rules: RuleMap,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub preprocessors: RuleMap,
    #[serde(default, rename = "oas2Preprocessors", skip_serializing_if = "IndexMap::is_empty")]
    pub oas2_preprocessors: RuleMap,
    #[serde(default, rename = "oas3_0Preprocessors", skip_serializing_if = "IndexMap::is_empty")]
    pub oas3_0_preprocessors: RuleMap,
    #[serde(default, rename = "oas3_1Preprocessors", skip_serializing_if = "IndexMap::is_empty")]
    pub oas3_1_preprocessors: RuleMap,
    #[serde(default, rename = "async2Preprocessors", skip_serializing_if = "IndexMap::is_empty")]
    pub async2_preprocessors: RuleMap,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub decorators: RuleMap,
    #[serde(default, rename = "oas2Decorators", skip_serializing_if = "IndexMap::is_empty")]
    pub oas2_decorators: RuleMap,
    #[serde(default, rename = "oas3_0Decorators", skip_serializing_if = "IndexMap::is_empty")]
    pub oas3_0_decorators: RuleMap,
    #[serde(default, rename = "oas3_1Decorators", skip_serializing_if = "IndexMap::is_empty")]
    pub oas3_1_decorators: RuleMap,
    #[serde(default, rename = "async2Decorators", skip_serializing_if = "IndexMap::is_empty")]
    pub async2_decorators: RuleMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_fallback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_not_resolve_examples: Option<bool>,
}

impl RawStyleguideConfig {
    /// The `extends` entries as strings.
    pub fn extends_names(&self) -> Result<Vec<&str>> {
        self.extends
            .iter()
            .flatten()
            .map(|item| item.as_str().ok_or(StyleguideError::ExtendsNotString))
            .collect()
    }

    pub fn has_extends(&self) -> bool {
        self.extends.is_some()
    }

    pub fn rule_maps(&self) -> DialectMaps {
        DialectMaps {
            agnostic: self.rules.clone(),
            oas2: self.oas2_rules.clone(),
            oas3_0: self.oas3_0_rules.clone(),
            oas3_1: self.oas3_1_rules.clone(),
            async2: self.async2_rules.clone(),
        }
    }

    pub fn preprocessor_maps(&self) -> DialectMaps {
        DialectMaps {
            agnostic: self.preprocessors.clone(),
            oas2: self.oas2_preprocessors.clone(),
            oas3_0: self.oas3_0_preprocessors.clone(),
            oas3_1: self.oas3_1_preprocessors.clone(),
            async2: self.async2_preprocessors.clone(),
        }
    }

    pub fn decorator_maps(&self) -> DialectMaps {
        DialectMaps {
            agnostic: self.decorators.clone(),
            oas2: self.oas2_decorators.clone(),
            oas3_0: self.oas3_0_decorators.clone(),
            oas3_1: self.oas3_1_decorators.clone(),
            async2: self.async2_decorators.clone(),
        }
    }

    /// Overlay an API's own styleguide on top of this (root) one.
    ///
    /// Every rule map is merged key by key with the API winning. Plugins and
    /// `extends` are taken from the API when it declares them. An API with
    /// its own `extends` never falls back to the recommended preset.
    pub fn overlay(&self, api: &RawStyleguideConfig) -> RawStyleguideConfig {
        fn merged(root: &RuleMap, api: &RuleMap) -> RuleMap {
            let mut out = root.clone();
            out.extend(api.iter().map(|(k, v)| (k.clone(), v.clone())));
            out
        }

        RawStyleguideConfig {
            plugins: if api.plugins.is_empty() {
                self.plugins.clone()
            } else {
                api.plugins.clone()
            },
            extends: api.extends.clone().or_else(|| self.extends.clone()),
            rules: merged(&self.rules, &api.rules),
            oas2_rules: merged(&self.oas2_rules, &api.oas2_rules),
            oas3_0_rules: merged(&self.oas3_0_rules, &api.oas3_0_rules),
            oas3_1_rules: merged(&self.oas3_1_rules, &api.oas3_1_rules),
            async2_rules: merged(&self.async2_rules, &api.async2_rules),
            preprocessors: merged(&self.preprocessors, &api.preprocessors),
            oas2_preprocessors: merged(&self.oas2_preprocessors, &api.oas2_preprocessors),
            oas3_0_preprocessors: merged(&self.oas3_0_preprocessors, &api.oas3_0_preprocessors),
            oas3_1_preprocessors: merged(&self.oas3_1_preprocessors, &api.oas3_1_preprocessors),
            async2_preprocessors: merged(&self.async2_preprocessors, &api.async2_preprocessors),
            decorators: merged(&self.decorators, &api.decorators),
            oas2_decorators: merged(&self.oas2_decorators, &api.oas2_decorators),
            oas3_0_decorators: merged(&self.oas3_0_decorators, &api.oas3_0_decorators),
            oas3_1_decorators: merged(&self.oas3_1_decorators, &api.oas3_1_decorators),
            async2_decorators: merged(&self.async2_decorators, &api.async2_decorators),
            recommended_fallback: if api.has_extends() {
                Some(false)
            } else {
                self.recommended_fallback
            },
            do_not_resolve_examples: api
                .do_not_resolve_examples
                .or(self.do_not_resolve_examples),
        }
    }
}

/// A dialect-agnostic rule map plus one map per dialect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialectMaps {
    pub agnostic: RuleMap,
    pub oas2: RuleMap,
    pub oas3_0: RuleMap,
    pub oas3_1: RuleMap,
    pub async2: RuleMap,
}

impl DialectMaps {
    pub fn dialect(&self, dialect: Dialect) -> &RuleMap {
        match dialect {
            Dialect::Oas2 => &self.oas2,
            Dialect::Oas3_0 => &self.oas3_0,
            Dialect::Oas3_1 => &self.oas3_1,
            Dialect::Async2 => &self.async2,
        }
    }

    pub fn dialect_mut(&mut self, dialect: Dialect) -> &mut RuleMap {
        match dialect {
            Dialect::Oas2 => &mut self.oas2,
            Dialect::Oas3_0 => &mut self.oas3_0,
            Dialect::Oas3_1 => &mut self.oas3_1,
            Dialect::Async2 => &mut self.async2,
        }
    }

    /// Settings in effect for one dialect: the agnostic map overlaid with
    /// the dialect's own map.
    pub fn effective(&self, dialect: Dialect) -> RuleMap {
        let mut out = self.agnostic.clone();
        out.extend(
            self.dialect(dialect)
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        out
    }

    pub fn is_empty(&self) -> bool {
        self.agnostic.is_empty() && Dialect::ALL.iter().all(|d| self.dialect(*d).is_empty())
    }
}

/// An API entry of a config document.
#[derive(Debug, Clone, Default)]
pub struct RawApi {
    /// Path to the API description.
    pub root: String,
    pub styleguide: Option<RawStyleguideConfig>,
}

/// A whole config document: the root styleguide plus per-API overrides.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub styleguide: Option<RawStyleguideConfig>,
    pub apis: IndexMap<String, RawApi>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Severity;

    fn parse(yaml: &str) -> RawStyleguideConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn parses_dialect_specific_maps() {
        let raw = parse(
            r#"
rules:
  info-contact: warn
oas3_0Rules:
  no-empty-servers: error
async2Decorators:
  remove-x-internal: on
recommendedFallback: true
"#,
        );

        assert_eq!(raw.rules["info-contact"].severity(), Severity::Warn);
        assert_eq!(raw.oas3_0_rules["no-empty-servers"].severity(), Severity::Error);
        assert_eq!(raw.async2_decorators["remove-x-internal"].severity(), Severity::Error);
        assert_eq!(raw.recommended_fallback, Some(true));
    }

    #[test]
    fn parses_plugins_as_paths() {
        let raw = parse("plugins:\n  - ./plugins/acme.yaml\n");
        assert_eq!(raw.plugins.len(), 1);
        assert_eq!(raw.plugins[0].to_string(), "./plugins/acme.yaml");
    }

    #[test]
    fn extends_names_rejects_non_strings() {
        let raw = parse("extends:\n  - recommended\n  - 42\n");
        assert!(matches!(
            raw.extends_names(),
            Err(StyleguideError::ExtendsNotString)
        ));
    }

    #[test]
    fn extends_names_without_extends_is_empty() {
        assert!(parse("rules: {}").extends_names().unwrap().is_empty());
    }

    #[test]
    fn effective_overlays_dialect_on_agnostic() {
        let raw = parse(
            r#"
rules:
  a: warn
  b: warn
oas2Rules:
  b: error
"#,
        );
        let maps = raw.rule_maps();
        let oas2 = maps.effective(Dialect::Oas2);
        assert_eq!(oas2["a"].severity(), Severity::Warn);
        assert_eq!(oas2["b"].severity(), Severity::Error);
        assert_eq!(maps.effective(Dialect::Oas3_0)["b"].severity(), Severity::Warn);
    }

    #[test]
    fn overlay_merges_maps_and_disables_fallback() {
        let root = parse(
            r#"
recommendedFallback: true
rules:
  a: warn
  b: warn
"#,
        );
        let api = parse(
            r#"
extends: [minimal]
rules:
  b: off
"#,
        );

        let merged = root.overlay(&api);
        assert_eq!(merged.rules["a"].severity(), Severity::Warn);
        assert_eq!(merged.rules["b"].severity(), Severity::Off);
        assert_eq!(merged.recommended_fallback, Some(false));
        assert_eq!(merged.extends_names().unwrap(), vec!["minimal"]);
    }

    #[test]
    fn overlay_without_api_extends_keeps_root_fallback() {
        let root = parse("recommendedFallback: true\n");
        let merged = root.overlay(&RawStyleguideConfig::default());
        assert_eq!(merged.recommended_fallback, Some(true));
    }

    #[test]
    fn empty_dialect_maps() {
        assert!(DialectMaps::default().is_empty());
        assert!(!parse("async2Rules: {x: warn}").rule_maps().is_empty());
    }
}
