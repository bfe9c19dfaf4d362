//! Styleguide inheritance resolution.
//!
//! This module resolves the `extends:` list of a styleguide. Entries are
//! either preset names (`recommended`, `acme/strict`) or paths to other
//! config documents, which may extend further documents in turn.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::assertions::group_assertion_rules;
use super::loader::{
    raw_config_from_document, styleguide_from_document, DocumentResolver, FsDocumentResolver,
};
use super::merger::merge_extends;
use super::paths::{canonical_config_path, is_absolute_url, resolve_relative};
use super::resolved::{Config, ResolvedApi, ResolvedStyleguideConfig};
use super::schema::{RawConfig, RawStyleguideConfig};
use crate::error::{Result, StyleguideError};
use crate::plugin::{
    default_plugin, resolve_plugins, resolve_preset, unique_plugins, ManifestPluginLoader,
    PluginDescriptor, PluginLoader, PluginRef,
};

/// Resolves styleguide inheritance chains.
///
/// # Example
///
/// ```
/// use apistyle::config::{RawStyleguideConfig, StyleguideResolver};
/// use apistyle::lint::Severity;
///
/// let raw: RawStyleguideConfig = serde_yaml::from_str(r#"
/// extends: [minimal]
/// rules:
///   operation-summary: error
/// "#).unwrap();
///
/// let resolved = StyleguideResolver::new().resolve_styleguide(Some(&raw), "").unwrap();
/// assert_eq!(resolved.rules.agnostic["operation-summary"].severity(), Severity::Error);
/// assert_eq!(resolved.rules.agnostic["spec"].severity(), Severity::Error);
/// ```
pub struct StyleguideResolver {
    documents: Box<dyn DocumentResolver>,
    plugin_loader: Box<dyn PluginLoader>,
    default_plugin: Option<Arc<PluginDescriptor>>,
}

impl StyleguideResolver {
    /// Create a resolver reading documents and plugin manifests from disk.
    pub fn new() -> Self {
        Self {
            documents: Box::new(FsDocumentResolver),
            plugin_loader: Box::new(ManifestPluginLoader),
            default_plugin: None,
        }
    }

    /// Use a custom document resolver for extended configs.
    pub fn with_document_resolver(mut self, documents: impl DocumentResolver + 'static) -> Self {
        self.documents = Box::new(documents);
        self
    }

    /// Use a custom loader for plugins referenced by path.
    pub fn with_plugin_loader(mut self, loader: impl PluginLoader + 'static) -> Self {
        self.plugin_loader = Box::new(loader);
        self
    }

    /// Replace the built-in default plugin, e.g. with one that carries
    /// built-in rule factories. Its id must be empty.
    pub fn with_default_plugin(mut self, plugin: PluginDescriptor) -> Self {
        self.default_plugin = Some(Arc::new(plugin));
        self
    }

    fn default_plugin(&self) -> Result<Arc<PluginDescriptor>> {
        match &self.default_plugin {
            Some(plugin) => Ok(Arc::clone(plugin)),
            None => default_plugin(),
        }
    }

    /// Resolve a styleguide and everything it extends.
    ///
    /// `config_path` is the path of the document the styleguide came from,
    /// or empty for in-memory configs.
    pub fn resolve_styleguide(
        &self,
        raw: Option<&RawStyleguideConfig>,
        config_path: &str,
    ) -> Result<ResolvedStyleguideConfig> {
        let mut resolved = self.resolve_nested(raw, config_path, &[])?;
        group_assertion_rules(&mut resolved)?;
        Ok(resolved)
    }

    /// Resolve a config document: the root styleguide and one styleguide
    /// per API, each API overlaid on the root.
    pub fn resolve_config(&self, raw: &RawConfig, config_path: &str) -> Result<Config> {
        let styleguide = self.resolve_styleguide(raw.styleguide.as_ref(), config_path)?;
        let root = raw.styleguide.clone().unwrap_or_default();

        let mut apis = IndexMap::with_capacity(raw.apis.len());
        for (name, api) in &raw.apis {
            let merged = match &api.styleguide {
                Some(own) => root.overlay(own),
                None => root.clone(),
            };
            debug!(api = %name, "resolving api styleguide");
            apis.insert(
                name.clone(),
                ResolvedApi {
                    root: api.root.clone(),
                    styleguide: self.resolve_styleguide(Some(&merged), config_path)?,
                },
            );
        }

        Ok(Config {
            config_path: config_path.to_string(),
            styleguide,
            apis,
        })
    }

    /// Load and resolve a config document by path.
    pub fn load_config(&self, config_path: &str) -> Result<Config> {
        if config_path.is_empty() {
            return Err(StyleguideError::ConfigPathRequired);
        }
        let document = self.documents.resolve_document(config_path).map_err(|e| {
            StyleguideError::ExtendLoadFailed {
                path: config_path.to_string(),
                message: format!("{:#}", e),
            }
        })?;
        let raw = raw_config_from_document(&document)?;
        self.resolve_config(&raw, config_path)
    }

    fn resolve_nested(
        &self,
        raw: Option<&RawStyleguideConfig>,
        config_path: &str,
        parents: &[String],
    ) -> Result<ResolvedStyleguideConfig> {
        let resolved_path = canonical_config_path(config_path)?;
        if parents.contains(&resolved_path) {
            return Err(StyleguideError::CircularExtends {
                path: resolved_path,
            });
        }

        let empty = RawStyleguideConfig::default();
        let raw = raw.unwrap_or(&empty);
        let extends = raw.extends_names()?;

        let mut plugin_refs = raw.plugins.clone();
        plugin_refs.push(PluginRef::Inline(self.default_plugin()?));
        let plugins = unique_plugins(resolve_plugins(
            &plugin_refs,
            config_path,
            self.plugin_loader.as_ref(),
        )?);

        let plugin_paths = raw
            .plugins
            .iter()
            .filter_map(PluginRef::as_path)
            .filter(|path| !is_absolute_url(path))
            .map(|path| resolve_relative(config_path, path))
            .collect::<Result<Vec<_>>>()?;

        let mut chain = parents.to_vec();
        chain.push(resolved_path);

        let mut layers = Vec::with_capacity(extends.len() + 1);
        for item in extends {
            if !is_absolute_url(item) && Path::new(item).extension().is_none() {
                debug!(preset = item, "resolving preset");
                let preset = resolve_preset(item, &plugins)?;
                layers.push(ResolvedStyleguideConfig::from_preset(item, preset)?);
            } else {
                let path = resolve_relative(config_path, item)?;
                debug!(path = %path, "resolving extended config");
                let extended = self.load_extended(&path)?;
                layers.push(self.resolve_nested(Some(&extended), &path, &chain)?);
            }
        }

        let mut own = ResolvedStyleguideConfig::from_raw(raw);
        own.plugins = plugins;
        own.extend_paths = chain;
        own.plugin_paths = plugin_paths;
        layers.push(own);

        let mut merged = merge_extends(layers);
        merged
            .extend_paths
            .retain(|path| !path.is_empty() && !is_absolute_url(path));
        merged.plugins = unique_plugins(merged.plugins);
        merged.recommended_fallback = raw.recommended_fallback;
        merged.do_not_resolve_examples = raw.do_not_resolve_examples;

        Ok(merged)
    }

    fn load_extended(&self, path: &str) -> Result<RawStyleguideConfig> {
        let load_failed = |message: String| StyleguideError::ExtendLoadFailed {
            path: path.to_string(),
            message,
        };

        let document = self
            .documents
            .resolve_document(path)
            .map_err(|e| load_failed(format!("{:#}", e)))?;
        styleguide_from_document(&document).map_err(|e| load_failed(e.to_string()))
    }
}

impl Default for StyleguideResolver {
    fn default() -> Self {
        Self::new()
    }
}
