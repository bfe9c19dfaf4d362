//! Plugin list resolution.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::descriptor::{DialectBuckets, Plugin, PluginDescriptor, PluginRef, RuleKind};
use super::loader::PluginLoader;
use crate::config::paths::{is_absolute_url, resolve_relative};
use crate::error::{Result, StyleguideError};

/// Resolve a `plugins` list into validated plugins with namespaced rule ids.
///
/// `config_path` is the path of the declaring config; relative references
/// are resolved against its directory.
pub fn resolve_plugins(
    refs: &[PluginRef],
    config_path: &str,
    loader: &dyn PluginLoader,
) -> Result<Vec<Arc<Plugin>>> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut plugins = Vec::with_capacity(refs.len());

    for plugin_ref in refs {
        let descriptor = load_descriptor(plugin_ref, config_path, loader)?;
        let reference = plugin_ref.to_string();

        let id = descriptor
            .id
            .clone()
            .ok_or_else(|| StyleguideError::InvalidPluginId {
                reference: reference.clone(),
            })?;

        if let Some(seen_in) = seen.get(&id) {
            return Err(StyleguideError::DuplicatePluginId {
                id,
                reference,
                seen_in: seen_in.clone(),
            });
        }
        seen.insert(id.clone(), reference.clone());

        debug!(plugin = %id, reference = %reference, "resolved plugin");
        plugins.push(Arc::new(Plugin {
            rules: namespaced(&descriptor, RuleKind::Rule, &id, &reference)?,
            preprocessors: namespaced(&descriptor, RuleKind::Preprocessor, &id, &reference)?,
            decorators: namespaced(&descriptor, RuleKind::Decorator, &id, &reference)?,
            presets: descriptor.presets.clone(),
            assertions: descriptor.assertions.clone(),
            id,
        }));
    }

    Ok(plugins)
}

fn load_descriptor(
    plugin_ref: &PluginRef,
    config_path: &str,
    loader: &dyn PluginLoader,
) -> Result<Arc<PluginDescriptor>> {
    match plugin_ref {
        PluginRef::Inline(descriptor) => Ok(Arc::clone(descriptor)),
        PluginRef::Path(reference) => {
            if is_absolute_url(reference) || is_absolute_url(config_path) {
                return Err(StyleguideError::RemotePluginUnsupported {
                    reference: reference.clone(),
                });
            }
            let resolved = resolve_relative(config_path, reference)?;
            loader
                .load(reference, Path::new(&resolved))
                .map_err(|e| StyleguideError::PluginLoadFailed {
                    reference: reference.clone(),
                    message: format!("{:#}", e),
                })
        }
    }
}

fn namespaced(
    descriptor: &PluginDescriptor,
    kind: RuleKind,
    id: &str,
    reference: &str,
) -> Result<Option<DialectBuckets>> {
    let buckets = match kind {
        RuleKind::Rule => &descriptor.rules,
        RuleKind::Preprocessor => &descriptor.preprocessors,
        RuleKind::Decorator => &descriptor.decorators,
    };

    match buckets {
        None => Ok(None),
        Some(buckets) if buckets.has_no_dialect() => Err(StyleguideError::MissingDialectBucket {
            kind: kind.to_string(),
            reference: reference.to_string(),
        }),
        Some(buckets) => Ok(Some(buckets.map_ids(|rules| prefix_rules(rules, id)))),
    }
}

/// Rewrite every key to `<prefix>/<key>`. An empty prefix leaves keys as is.
pub fn prefix_rules<V: Clone>(rules: &IndexMap<String, V>, prefix: &str) -> IndexMap<String, V> {
    if prefix.is_empty() {
        return rules.clone();
    }
    rules
        .iter()
        .map(|(key, value)| (format!("{}/{}", prefix, key), value.clone()))
        .collect()
}

/// Drop plugins whose id was already seen, keeping the first occurrence.
pub fn unique_plugins(plugins: Vec<Arc<Plugin>>) -> Vec<Arc<Plugin>> {
    let mut seen = std::collections::HashSet::new();
    let mut unique = Vec::with_capacity(plugins.len());

    for plugin in plugins {
        if seen.insert(plugin.id.clone()) {
            unique.push(plugin);
        } else if !plugin.id.is_empty() {
            warn!(plugin = %plugin.id, "duplicate plugin id; keeping the first occurrence");
        }
    }

    unique
}
