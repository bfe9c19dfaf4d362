//! Merge algorithm for resolved styleguide layers.
//!
//! Layers are merged in order, later layers overriding earlier ones.
//!
//! # Merge Rules
//!
//! For each of `rules`, `preprocessors` and `decorators`, and for each dialect:
//!
//! 1. The layer's agnostic map is assigned into the agnostic accumulator
//! 2. The layer's dialect map is assigned into that dialect's accumulator
//! 3. Every key already present in the dialect accumulator is overwritten
//!    from the layer's agnostic map when that map also defines it
//!
//! Step 3 means an agnostic setting in a later layer shadows a
//! dialect-specific setting from an earlier one.
//!
//! Plugins and plugin paths are concatenated. Extend paths are concatenated
//! keeping the first occurrence of each path.

use super::resolved::ResolvedStyleguideConfig;
use super::schema::{DialectMaps, RuleMap};
use crate::plugin::RuleKind;
use crate::types::Dialect;

/// Merge layers in order; the last layer has final priority.
pub fn merge_extends(
    layers: impl IntoIterator<Item = ResolvedStyleguideConfig>,
) -> ResolvedStyleguideConfig {
    let mut result = ResolvedStyleguideConfig::default();

    for layer in layers {
        for kind in RuleKind::ALL {
            merge_maps(result.maps_mut(kind), layer.maps(kind));
        }

        result.plugins.extend(layer.plugins);
        result.plugin_paths.extend(layer.plugin_paths);
        for path in layer.extend_paths {
            if !result.extend_paths.contains(&path) {
                result.extend_paths.push(path);
            }
        }
    }

    result
}

fn merge_maps(target: &mut DialectMaps, layer: &DialectMaps) {
    assign(&mut target.agnostic, &layer.agnostic);
    for dialect in Dialect::ALL {
        let accumulator = target.dialect_mut(dialect);
        assign(accumulator, layer.dialect(dialect));
        assign_existing(accumulator, &layer.agnostic);
    }
}

fn assign(target: &mut RuleMap, source: &RuleMap) {
    target.extend(source.iter().map(|(k, v)| (k.clone(), v.clone())));
}

/// Overwrite keys of `target` that `source` also defines. Keys only in
/// `source` are not added.
pub fn assign_existing(target: &mut RuleMap, source: &RuleMap) {
    for (key, value) in source {
        if let Some(slot) = target.get_mut(key) {
            *slot = value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawStyleguideConfig;
    use crate::lint::{RuleSetting, Severity};

    fn layer(yaml: &str) -> ResolvedStyleguideConfig {
        let raw: RawStyleguideConfig = serde_yaml::from_str(yaml).unwrap();
        ResolvedStyleguideConfig::from_raw(&raw)
    }

    fn severity(map: &RuleMap, key: &str) -> Severity {
        map[key].severity()
    }

    #[test]
    fn later_layers_override_earlier() {
        let merged = merge_extends([
            layer("rules: {a: warn, b: warn}"),
            layer("rules: {a: error}"),
        ]);
        assert_eq!(severity(&merged.rules.agnostic, "a"), Severity::Error);
        assert_eq!(severity(&merged.rules.agnostic, "b"), Severity::Warn);
    }

    #[test]
    fn later_agnostic_shadows_earlier_dialect_setting() {
        let merged = merge_extends([
            layer("oas3_0Rules: {a: error}"),
            layer("rules: {a: warn}"),
        ]);
        assert_eq!(severity(&merged.rules.oas3_0, "a"), Severity::Warn);
        assert!(!merged.rules.oas2.contains_key("a"));
    }

    #[test]
    fn agnostic_in_same_layer_shadows_dialect_setting() {
        let merged = merge_extends([layer("rules: {a: warn}\noas2Rules: {a: error}\n")]);
        assert_eq!(severity(&merged.rules.oas2, "a"), Severity::Warn);
    }

    #[test]
    fn later_dialect_setting_overrides_earlier_agnostic() {
        let merged = merge_extends([layer("rules: {a: warn}"), layer("oas2Rules: {a: off}")]);
        assert_eq!(severity(&merged.rules.oas2, "a"), Severity::Off);
        assert_eq!(merged.rules.effective(Dialect::Oas2)["a"].severity(), Severity::Off);
        assert_eq!(merged.rules.effective(Dialect::Oas3_1)["a"].severity(), Severity::Warn);
    }

    #[test]
    fn preprocessors_and_decorators_merge_independently() {
        let merged = merge_extends([
            layer("async2Decorators: {d: on}\nrules: {d: off}\n"),
            layer("decorators: {d: off}"),
        ]);
        assert_eq!(severity(&merged.decorators.async2, "d"), Severity::Off);
        assert_eq!(severity(&merged.rules.agnostic, "d"), Severity::Off);
        assert!(merged.preprocessors.is_empty());
    }

    #[test]
    fn extend_paths_keep_first_occurrence() {
        let mut a = ResolvedStyleguideConfig::default();
        a.extend_paths = vec!["/root.yaml".into(), "/a.yaml".into()];
        let mut own = ResolvedStyleguideConfig::default();
        own.extend_paths = vec!["/root.yaml".into()];

        let merged = merge_extends([a, own]);
        assert_eq!(merged.extend_paths, vec!["/root.yaml", "/a.yaml"]);
    }

    #[test]
    fn assign_existing_only_touches_present_keys() {
        let mut target = RuleMap::new();
        target.insert("a".into(), RuleSetting::from(Severity::Error));
        let mut source = RuleMap::new();
        source.insert("a".into(), RuleSetting::from(Severity::Off));
        source.insert("b".into(), RuleSetting::from(Severity::Warn));

        assign_existing(&mut target, &source);
        assert_eq!(target.len(), 1);
        assert_eq!(severity(&target, "a"), Severity::Off);
    }

    #[test]
    fn empty_input_is_empty() {
        let merged = merge_extends(Vec::new());
        assert!(merged.rules.is_empty());
        assert!(merged.plugins.is_empty());
    }
}
