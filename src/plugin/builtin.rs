//! The implicit default plugin and its embedded presets.

use std::sync::{Arc, LazyLock};

use include_dir::{include_dir, Dir};
use indexmap::IndexMap;

use super::descriptor::PluginDescriptor;
use crate::config::RawStyleguideConfig;
use crate::error::{Result, StyleguideError};

/// Embedded presets directory.
static PRESETS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/presets");

static DEFAULT_PLUGIN: LazyLock<std::result::Result<Arc<PluginDescriptor>, (String, String)>> =
    LazyLock::new(|| {
        load_presets()
            .map(|presets| {
                Arc::new(PluginDescriptor {
                    presets,
                    ..PluginDescriptor::new("")
                })
            })
            .map_err(|e| match e {
                StyleguideError::ConfigParseError { path, message } => {
                    (path.display().to_string(), message)
                }
                other => ("presets".to_string(), other.to_string()),
            })
    });

/// The default plugin: empty id, built-in presets, no rule factories.
///
/// Hosts that ship built-in rules construct their own default plugin
/// (reusing [`load_presets`]) and hand it to the resolver.
pub fn default_plugin() -> Result<Arc<PluginDescriptor>> {
    DEFAULT_PLUGIN
        .clone()
        .map_err(|(path, message)| StyleguideError::ConfigParseError {
            path: path.into(),
            message,
        })
}

/// Parse every embedded preset, keyed by file stem.
pub fn load_presets() -> Result<IndexMap<String, RawStyleguideConfig>> {
    let mut files: Vec<_> = PRESETS_DIR
        .files()
        .filter(|file| {
            file.path()
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml")
        })
        .collect();
    files.sort_by(|a, b| a.path().cmp(b.path()));

    let mut presets = IndexMap::new();
    for file in files {
        let name = file
            .path()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content = file
            .contents_utf8()
            .ok_or_else(|| StyleguideError::ConfigParseError {
                path: file.path().to_path_buf(),
                message: "Invalid UTF-8".to_string(),
            })?;

        let preset: RawStyleguideConfig =
            serde_yaml::from_str(content).map_err(|e| StyleguideError::ConfigParseError {
                path: file.path().to_path_buf(),
                message: e.to_string(),
            })?;
        presets.insert(name, preset);
    }

    Ok(presets)
}

/// Names of the built-in presets.
pub fn builtin_preset_names() -> Vec<String> {
    load_presets()
        .map(|presets| presets.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Severity;

    #[test]
    fn embeds_all_presets() {
        let presets = load_presets().unwrap();
        assert_eq!(
            presets.keys().collect::<Vec<_>>(),
            vec!["all", "minimal", "recommended"]
        );
    }

    #[test]
    fn presets_have_no_extends() {
        for (name, preset) in load_presets().unwrap() {
            assert!(preset.extends.is_none(), "{name} must not extend");
        }
    }

    #[test]
    fn recommended_sets_spec_to_error() {
        let presets = load_presets().unwrap();
        assert_eq!(presets["recommended"].rules["spec"].severity(), Severity::Error);
    }

    #[test]
    fn default_plugin_has_empty_id() {
        let plugin = default_plugin().unwrap();
        assert_eq!(plugin.id.as_deref(), Some(""));
        assert!(plugin.presets.contains_key("minimal"));
        assert!(plugin.rules.is_none());
    }

    #[test]
    fn lists_builtin_names() {
        assert!(builtin_preset_names().contains(&"recommended".to_string()));
    }
}
