//! Fully resolved configuration.

use std::sync::Arc;

use indexmap::IndexMap;

use super::assertions::{Assertion, AssertionRegistry};
use super::schema::{DialectMaps, RawStyleguideConfig, RuleMap};
use crate::error::{Result, StyleguideError};
use crate::plugin::{Plugin, RuleKind};
use crate::types::Dialect;

/// A styleguide with every `extends` entry merged in.
///
/// Immutable once produced by the resolver.
#[derive(Debug, Clone, Default)]
pub struct ResolvedStyleguideConfig {
    pub plugins: Vec<Arc<Plugin>>,
    pub rules: DialectMaps,
    pub preprocessors: DialectMaps,
    pub decorators: DialectMaps,
    /// Assertion rules extracted from the agnostic rules map.
    pub assertions: Vec<Assertion>,
    /// Custom assertion functions referenced by `assertions`.
    pub custom_assertions: AssertionRegistry,
    /// Config files that contributed, in traversal order.
    pub extend_paths: Vec<String>,
    /// Resolved paths of plugins referenced by path.
    pub plugin_paths: Vec<String>,
    pub recommended_fallback: Option<bool>,
    pub do_not_resolve_examples: Option<bool>,
}

impl ResolvedStyleguideConfig {
    /// A preset as a merge layer. Presets cannot extend anything.
    pub fn from_preset(name: &str, preset: &RawStyleguideConfig) -> Result<Self> {
        if preset.has_extends() {
            let fragment = serde_json::to_string(preset).unwrap_or_else(|_| name.to_string());
            return Err(StyleguideError::ExtendsInSharedConfig { fragment });
        }
        Ok(Self::from_raw(preset))
    }

    /// Rule maps and flags of a raw fragment, ignoring its plugins and extends.
    pub(crate) fn from_raw(raw: &RawStyleguideConfig) -> Self {
        Self {
            rules: raw.rule_maps(),
            preprocessors: raw.preprocessor_maps(),
            decorators: raw.decorator_maps(),
            recommended_fallback: raw.recommended_fallback,
            do_not_resolve_examples: raw.do_not_resolve_examples,
            ..Self::default()
        }
    }

    pub fn maps(&self, kind: RuleKind) -> &DialectMaps {
        match kind {
            RuleKind::Rule => &self.rules,
            RuleKind::Preprocessor => &self.preprocessors,
            RuleKind::Decorator => &self.decorators,
        }
    }

    pub(crate) fn maps_mut(&mut self, kind: RuleKind) -> &mut DialectMaps {
        match kind {
            RuleKind::Rule => &mut self.rules,
            RuleKind::Preprocessor => &mut self.preprocessors,
            RuleKind::Decorator => &mut self.decorators,
        }
    }

    /// Settings in effect for one kind and dialect.
    pub fn effective(&self, kind: RuleKind, dialect: Dialect) -> RuleMap {
        self.maps(kind).effective(dialect)
    }

    pub fn plugin(&self, id: &str) -> Option<&Arc<Plugin>> {
        self.plugins.iter().find(|p| p.id == id)
    }
}

/// A resolved API entry.
#[derive(Debug, Clone)]
pub struct ResolvedApi {
    pub root: String,
    pub styleguide: ResolvedStyleguideConfig,
}

/// A resolved config document.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path the document was loaded from; empty for in-memory configs.
    pub config_path: String,
    pub styleguide: ResolvedStyleguideConfig,
    pub apis: IndexMap<String, ResolvedApi>,
}

impl Config {
    /// The styleguide for an API, or the root one when the API is unknown.
    pub fn styleguide_for(&self, api: Option<&str>) -> &ResolvedStyleguideConfig {
        api.and_then(|name| self.apis.get(name))
            .map(|api| &api.styleguide)
            .unwrap_or(&self.styleguide)
    }

    /// The styleguide for `api` carrying the provenance of the whole document.
    ///
    /// `extend_paths` and `plugin_paths` become those of every API in order,
    /// followed by the root's. Duplicates are kept.
    pub fn merged_for(&self, api: &str) -> ResolvedStyleguideConfig {
        let mut merged = self.styleguide_for(Some(api)).clone();
        let sources = self
            .apis
            .values()
            .map(|api| &api.styleguide)
            .chain(std::iter::once(&self.styleguide));

        merged.extend_paths.clear();
        merged.plugin_paths.clear();
        for styleguide in sources {
            merged.extend_paths.extend(styleguide.extend_paths.iter().cloned());
            merged.plugin_paths.extend(styleguide.plugin_paths.iter().cloned());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Severity;

    #[test]
    fn preset_with_extends_is_rejected() {
        let preset: RawStyleguideConfig =
            serde_yaml::from_str("extends: [recommended]\nrules: {a: warn}\n").unwrap();
        let err = ResolvedStyleguideConfig::from_preset("acme/strict", &preset).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("'extends' is not supported in shared configs yet"));
    }

    #[test]
    fn preset_layer_keeps_maps() {
        let preset: RawStyleguideConfig =
            serde_yaml::from_str("decorators: {strip: on}\noas2Rules: {a: warn}\n").unwrap();
        let layer = ResolvedStyleguideConfig::from_preset("p", &preset).unwrap();
        assert_eq!(layer.decorators.agnostic["strip"].severity(), Severity::Error);
        assert_eq!(layer.rules.oas2["a"].severity(), Severity::Warn);
        assert!(layer.plugins.is_empty());
    }

    #[test]
    fn styleguide_for_falls_back_to_root() {
        let mut config = Config::default();
        config.styleguide.recommended_fallback = Some(true);
        config.apis.insert(
            "main".into(),
            ResolvedApi {
                root: "openapi.yaml".into(),
                styleguide: ResolvedStyleguideConfig::default(),
            },
        );

        assert_eq!(
            config.styleguide_for(Some("missing")).recommended_fallback,
            Some(true)
        );
        assert_eq!(config.styleguide_for(Some("main")).recommended_fallback, None);
        assert_eq!(config.styleguide_for(None).recommended_fallback, Some(true));
    }

    #[test]
    fn merged_for_collects_provenance_of_every_api() {
        let mut config = Config::default();
        config.styleguide.extend_paths = vec!["/root.yaml".into()];
        config.styleguide.plugin_paths = vec!["/plugins/root.yaml".into()];
        for (name, path) in [("public", "/public.yaml"), ("internal", "/internal.yaml")] {
            let mut styleguide = ResolvedStyleguideConfig {
                recommended_fallback: Some(name == "internal"),
                ..Default::default()
            };
            styleguide.extend_paths = vec![path.to_string(), "/root.yaml".into()];
            config.apis.insert(
                name.into(),
                ResolvedApi {
                    root: format!("{name}.yaml"),
                    styleguide,
                },
            );
        }

        let merged = config.merged_for("internal");
        assert_eq!(merged.recommended_fallback, Some(true));
        assert_eq!(
            merged.extend_paths,
            vec![
                "/public.yaml",
                "/root.yaml",
                "/internal.yaml",
                "/root.yaml",
                "/root.yaml"
            ]
        );
        assert_eq!(merged.plugin_paths, vec!["/plugins/root.yaml"]);

        let unknown = config.merged_for("missing");
        assert_eq!(unknown.recommended_fallback, None);
        assert_eq!(unknown.extend_paths.len(), 5);
    }
}
