//! Turning a resolved styleguide into active rule instances.

use tracing::debug;

use super::rule::RuleInstanceConfig;
use crate::config::ResolvedStyleguideConfig;
use crate::error::Result;
use crate::plugin::RuleKind;
use crate::types::{Dialect, TypeRegistry};
use crate::visitor::{normalize_visitors, DispatchTable, RuleVisitor};

/// Instantiate every enabled rule of `kind` for `dialect`.
///
/// Plugins are walked in order, factories in declaration order. A rule with
/// no setting, or set to `off`, is not instantiated. A factory returning
/// several visitor trees yields one [`RuleVisitor`] per tree.
pub fn instantiate_rules(
    config: &ResolvedStyleguideConfig,
    kind: RuleKind,
    dialect: Dialect,
) -> Vec<RuleVisitor> {
    let settings = config.effective(kind, dialect);
    let mut instances = Vec::new();

    for plugin in &config.plugins {
        let Some(factories) = plugin.factories(kind, dialect.major()) else {
            continue;
        };

        for (rule_id, factory) in factories {
            let Some(setting) = settings.get(rule_id) else {
                continue;
            };
            let severity = setting.severity();
            if !severity.is_enabled() {
                continue;
            }

            let options = setting.options();
            for visitor in factory.create(&options) {
                instances.push(RuleVisitor::new(
                    RuleInstanceConfig::new(rule_id.clone(), severity),
                    visitor,
                ));
            }
        }
    }

    debug!(%kind, %dialect, count = instances.len(), "instantiated rules");
    instances
}

/// Instantiate and normalize in one step.
pub fn build_dispatch_table(
    config: &ResolvedStyleguideConfig,
    kind: RuleKind,
    dialect: Dialect,
    registry: &TypeRegistry,
) -> Result<DispatchTable> {
    normalize_visitors(&instantiate_rules(config, kind, dialect), registry)
}
