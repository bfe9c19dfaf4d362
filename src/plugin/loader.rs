//! Loading plugins referenced by path.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use indexmap::IndexMap;
use super::descriptor::{DialectBuckets, PluginDescriptor};
use crate::config::RawStyleguideConfig;

/// Turns a `plugins` path entry into a descriptor.
pub trait PluginLoader {
    /// `reference` is the entry as written, `resolved` is that entry
    /// resolved against the declaring config's directory.
    fn load(&self, reference: &str, resolved: &Path) -> anyhow::Result<Arc<PluginDescriptor>>;
}

/// Reads data-only plugin manifests (YAML or JSON).
///
/// A manifest carries an `id` and named presets under `configs`
/// (or `presets`). Rule factories cannot be expressed in a manifest;
/// register those through [`StaticPluginLoader`] or an inline reference.
/// A `rules`, `preprocessors` or `decorators` key is therefore an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestPluginLoader;

impl ManifestPluginLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse a manifest document.
    pub fn parse(content: &str) -> anyhow::Result<PluginDescriptor> {
        let doc: serde_yaml::Value =
            serde_yaml::from_str(content).context("plugin manifest is not valid YAML")?;

        // A non-string id is left unset so resolution reports it.
        let id = doc.get("id").and_then(|v| v.as_str()).map(str::to_string);

        let rules = declared_buckets(&doc, "rules")?;
        let preprocessors = declared_buckets(&doc, "preprocessors")?;
        let decorators = declared_buckets(&doc, "decorators")?;

        let presets_value = doc.get("configs").or_else(|| doc.get("presets"));
        let presets: IndexMap<String, RawStyleguideConfig> = match presets_value {
            Some(value) => serde_yaml::from_value(value.clone())
                .context("plugin presets must map names to styleguide configs")?,
            None => IndexMap::new(),
        };

        Ok(PluginDescriptor {
            id,
            rules,
            preprocessors,
            decorators,
            presets,
            ..PluginDescriptor::default()
        })
    }
}

/// A declared `rules`/`preprocessors`/`decorators` map without any version
/// family comes back as empty buckets so resolution rejects it. Factories
/// themselves cannot be written in a manifest.
fn declared_buckets(
    doc: &serde_yaml::Value,
    key: &str,
) -> anyhow::Result<Option<DialectBuckets>> {
    let Some(value) = doc.get(key) else {
        return Ok(None);
    };

    let families = ["oas2", "oas3", "async2"];
    if families.iter().any(|family| value.get(*family).is_some()) {
        anyhow::bail!("plugin manifests cannot declare {} factories", key);
    }
    Ok(Some(DialectBuckets::default()))
}

impl PluginLoader for ManifestPluginLoader {
    fn load(&self, _reference: &str, resolved: &Path) -> anyhow::Result<Arc<PluginDescriptor>> {
        let content = fs::read_to_string(resolved)
            .with_context(|| format!("cannot read {}", resolved.display()))?;
        Self::parse(&content).map(Arc::new)
    }
}

/// Serves descriptors compiled into the host, keyed by reference.
///
/// Lookups try the reference as written first, then the resolved path, and
/// fall back to an optional loader for anything unregistered.
#[derive(Default)]
pub struct StaticPluginLoader {
    plugins: HashMap<String, Arc<PluginDescriptor>>,
    fallback: Option<Box<dyn PluginLoader>>,
}

impl StaticPluginLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, reference: impl Into<String>, descriptor: PluginDescriptor) -> Self {
        self.plugins.insert(reference.into(), Arc::new(descriptor));
        self
    }

    pub fn with_fallback(mut self, loader: impl PluginLoader + 'static) -> Self {
        self.fallback = Some(Box::new(loader));
        self
    }
}

impl PluginLoader for StaticPluginLoader {
    fn load(&self, reference: &str, resolved: &Path) -> anyhow::Result<Arc<PluginDescriptor>> {
        let by_path = resolved.to_string_lossy();
        if let Some(found) = self
            .plugins
            .get(reference)
            .or_else(|| self.plugins.get(by_path.as_ref()))
        {
            return Ok(Arc::clone(found));
        }

        match &self.fallback {
            Some(loader) => loader.load(reference, resolved),
            None => anyhow::bail!("no plugin registered for {}", reference),
        }
    }
}
