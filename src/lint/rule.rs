//! Rule severities and settings.
//!
//! - [`Severity`] - configured severity of a rule (`off` excludes it)
//! - [`RuleSetting`] - one entry of a `rules` map in a config document
//! - [`RuleInstanceConfig`] - the `(rule id, severity)` pair carried into
//!   every normalized visitor entry

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Severity of a rule.
///
/// `on` is accepted as an alias of `error`; preprocessors and decorators
/// are usually switched with `on`/`off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rule is disabled and never normalized.
    Off,
    /// Findings are reported as warnings.
    Warn,
    /// Findings are reported as errors.
    #[serde(alias = "on")]
    Error,
}

impl Severity {
    /// Whether a rule with this severity takes part in a lint run.
    pub fn is_enabled(self) -> bool {
        self != Severity::Off
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Off => write!(f, "off"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Value of one rule key in a configuration document.
///
/// ```
/// use apistyle::lint::{RuleSetting, Severity};
///
/// let bare: RuleSetting = serde_yaml::from_str("warn").unwrap();
/// assert_eq!(bare.severity(), Severity::Warn);
///
/// let with_options: RuleSetting = serde_yaml::from_str("{ maxLength: 20 }").unwrap();
/// assert_eq!(with_options.severity(), Severity::Error);
/// assert_eq!(with_options.options()["maxLength"], 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// Bare severity: `rule-id: warn`.
    Severity(Severity),
    /// Options object with an optional `severity` key.
    Options(Map<String, Value>),
}

impl RuleSetting {
    /// Effective severity. An options object without `severity` means `error`.
    pub fn severity(&self) -> Severity {
        match self {
            RuleSetting::Severity(severity) => *severity,
            RuleSetting::Options(options) => options
                .get("severity")
                .and_then(|value| Severity::deserialize(value).ok())
                .unwrap_or(Severity::Error),
        }
    }

    /// Options handed to the rule factory, without the `severity` key.
    pub fn options(&self) -> Map<String, Value> {
        match self {
            RuleSetting::Severity(_) => Map::new(),
            RuleSetting::Options(options) => {
                let mut options = options.clone();
                options.remove("severity");
                options
            }
        }
    }

    /// The raw options object, if this setting is one.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            RuleSetting::Options(options) => Some(options),
            RuleSetting::Severity(_) => None,
        }
    }
}

impl From<Severity> for RuleSetting {
    fn from(severity: Severity) -> Self {
        RuleSetting::Severity(severity)
    }
}

/// The identity and severity a rule runs with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleInstanceConfig {
    pub rule_id: String,
    pub severity: Severity,
}

impl RuleInstanceConfig {
    pub fn new(rule_id: impl Into<String>, severity: Severity) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
        }
    }
}
