//! Preset lookup.

use std::sync::Arc;

use super::descriptor::Plugin;
use crate::config::RawStyleguideConfig;
use crate::error::{Result, StyleguideError};

/// Split `pluginId/presetName` on its first `/`.
///
/// A name without `/` refers to the default plugin, whose id is empty.
///
/// ```
/// use apistyle::plugin::parse_preset_name;
///
/// assert_eq!(parse_preset_name("acme/strict"), ("acme", "strict"));
/// assert_eq!(parse_preset_name("recommended"), ("", "recommended"));
/// ```
pub fn parse_preset_name(name: &str) -> (&str, &str) {
    name.split_once('/').unwrap_or(("", name))
}

/// Find the preset `name` among `plugins`.
pub fn resolve_preset<'a>(
    name: &str,
    plugins: &'a [Arc<Plugin>],
) -> Result<&'a RawStyleguideConfig> {
    let (plugin_id, preset_name) = parse_preset_name(name);

    let Some(plugin) = plugins.iter().find(|p| p.id == plugin_id) else {
        return Err(if plugin_id.is_empty() {
            StyleguideError::NoBuiltinPreset {
                preset: name.to_string(),
            }
        } else {
            StyleguideError::PluginNotIncluded {
                preset: name.to_string(),
                plugin_id: plugin_id.to_string(),
            }
        });
    };

    plugin.presets.get(preset_name).ok_or_else(|| {
        if plugin_id.is_empty() {
            StyleguideError::NoBuiltinPreset {
                preset: name.to_string(),
            }
        } else {
            StyleguideError::PresetNotFound {
                preset: name.to_string(),
                plugin_id: plugin_id.to_string(),
                name: preset_name.to_string(),
            }
        }
    })
}
