//! Document loading and styleguide section detection.
//!
//! A config document carries its styleguide in one of three shapes:
//!
//! - a `styleguide:` section
//! - a deprecated `lint:` section
//! - flat top-level keys (`rules:`, `extends:`, `plugins:` ...)
//!
//! Mixing shapes in one document is an error. The same detection applies
//! to every entry under `apis:`. In flat syntax `doNotResolveExamples` is
//! read from the `resolve:` section.

use std::fs;
use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use super::paths::is_absolute_url;
use super::schema::{RawApi, RawConfig, RawStyleguideConfig};
use crate::error::{Result, StyleguideError};

/// Keys that mark flat styleguide syntax.
const FLAT_KEYS: &[&str] = &[
    "plugins",
    "extends",
    "rules",
    "oas2Rules",
    "oas3_0Rules",
    "oas3_1Rules",
    "async2Rules",
    "preprocessors",
    "oas2Preprocessors",
    "oas3_0Preprocessors",
    "oas3_1Preprocessors",
    "async2Preprocessors",
    "decorators",
    "oas2Decorators",
    "oas3_0Decorators",
    "oas3_1Decorators",
    "async2Decorators",
];

/// A fetched and parsed document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Identity of the source (path or URL).
    pub source: String,
    pub parsed: Value,
}

/// Fetches and parses documents referenced from `extends`.
pub trait DocumentResolver {
    fn resolve_document(&self, path: &str) -> anyhow::Result<Document>;
}

/// Reads local YAML or JSON files. Remote URLs are refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentResolver;

impl FsDocumentResolver {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentResolver for FsDocumentResolver {
    fn resolve_document(&self, path: &str) -> anyhow::Result<Document> {
        if is_absolute_url(path) {
            anyhow::bail!("fetching remote documents is not supported");
        }

        let content = fs::read_to_string(Path::new(path))
            .with_context(|| format!("cannot read {}", path))?;
        let parsed = serde_yaml::from_str(&content).context("invalid YAML")?;

        Ok(Document {
            source: path.to_string(),
            parsed,
        })
    }
}

/// Extract the styleguide section of a loaded document.
pub fn styleguide_from_document(document: &Document) -> Result<RawStyleguideConfig> {
    let mapping = document.parsed.as_mapping();
    extract_styleguide(mapping, &document.source)?.ok_or_else(|| {
        StyleguideError::StyleguideNotDetected {
            path: document.source.clone(),
        }
    })
}

/// Parse a whole config document: root styleguide and `apis`.
pub fn raw_config_from_document(document: &Document) -> Result<RawConfig> {
    let mapping = document.parsed.as_mapping();
    let styleguide = extract_styleguide(mapping, &document.source)?;

    let apis_section = mapping.and_then(|m| m.get("apis"));
    let definitions = mapping.and_then(|m| m.get("apiDefinitions"));
    if definitions.is_some() {
        if apis_section.is_some() {
            return Err(StyleguideError::DeprecatedFieldConflict {
                deprecated: "apiDefinitions".into(),
                replacement: "apis".into(),
            });
        }
        warn!(source = %document.source, "`apiDefinitions` is deprecated; use `apis`");
    }

    let mut apis = IndexMap::new();
    if let Some(Value::Mapping(entries)) = definitions {
        for (name, root) in entries {
            if let (Some(name), Some(root)) = (name.as_str(), root.as_str()) {
                apis.insert(
                    name.to_string(),
                    RawApi {
                        root: root.to_string(),
                        styleguide: None,
                    },
                );
            }
        }
    }
    if let Some(Value::Mapping(entries)) = apis_section {
        for (name, entry) in entries {
            let Some(name) = name.as_str() else {
                continue;
            };
            let entry = entry.as_mapping();
            let root = entry
                .and_then(|m| m.get("root"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            apis.insert(
                name.to_string(),
                RawApi {
                    root,
                    styleguide: extract_styleguide(entry, &document.source)?,
                },
            );
        }
    }

    Ok(RawConfig { styleguide, apis })
}

/// Parse a config document from a string.
pub fn parse_config(content: &str, source: &str) -> Result<RawConfig> {
    let parsed = serde_yaml::from_str(content).map_err(|e| StyleguideError::ConfigParseError {
        path: source.into(),
        message: e.to_string(),
    })?;
    raw_config_from_document(&Document {
        source: source.to_string(),
        parsed,
    })
}

fn extract_styleguide(
    mapping: Option<&Mapping>,
    source: &str,
) -> Result<Option<RawStyleguideConfig>> {
    let Some(mapping) = mapping else {
        return Ok(None);
    };

    let no_resolve_examples = mapping
        .get("resolve")
        .and_then(|resolve| resolve.get("doNotResolveExamples"));
    let has_flat =
        FLAT_KEYS.iter().any(|key| mapping.contains_key(*key)) || no_resolve_examples.is_some();
    let styleguide = mapping.get("styleguide");
    let lint = mapping.get("lint");

    let section = match (has_flat, styleguide, lint) {
        (false, None, None) => return Ok(None),
        (true, None, None) => {
            let mut flat: Mapping = mapping
                .iter()
                .filter(|(key, _)| key.as_str().is_some_and(|k| FLAT_KEYS.contains(&k)))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            if let Some(value) = no_resolve_examples {
                flat.insert("doNotResolveExamples".into(), value.clone());
            }
            Value::Mapping(flat)
        }
        (false, Some(section), None) => section.clone(),
        (false, None, Some(section)) => {
            warn!(source, "the `lint` section is deprecated; use `styleguide`");
            section.clone()
        }
        _ => return Err(StyleguideError::MixedConfigSyntax),
    };

    let raw = serde_yaml::from_value(section).map_err(|e| StyleguideError::ConfigParseError {
        path: source.into(),
        message: e.to_string(),
    })?;
    Ok(Some(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Severity;
    use tempfile::TempDir;

    fn document(yaml: &str) -> Document {
        Document {
            source: "redocly.yaml".into(),
            parsed: serde_yaml::from_str(yaml).unwrap(),
        }
    }

    #[test]
    fn detects_styleguide_section() {
        let raw =
            styleguide_from_document(&document("styleguide:\n  rules: {a: warn}\n")).unwrap();
        assert_eq!(raw.rules["a"].severity(), Severity::Warn);
    }

    #[test]
    fn detects_deprecated_lint_section() {
        let raw = styleguide_from_document(&document("lint:\n  extends: [minimal]\n")).unwrap();
        assert_eq!(raw.extends_names().unwrap(), vec!["minimal"]);
    }

    #[test]
    fn detects_flat_syntax() {
        let raw = styleguide_from_document(&document(
            "rules: {a: error}\nresolve: {doNotResolveExamples: true}\nunrelated: 1\n",
        ))
        .unwrap();
        assert_eq!(raw.rules["a"].severity(), Severity::Error);
        assert_eq!(raw.do_not_resolve_examples, Some(true));
    }

    #[test]
    fn top_level_fallback_flag_is_not_flat_syntax() {
        let raw = styleguide_from_document(&document(
            "styleguide:\n  rules: {a: warn}\nrecommendedFallback: true\n",
        ))
        .unwrap();
        assert_eq!(raw.rules["a"].severity(), Severity::Warn);
        assert_eq!(raw.recommended_fallback, None);
    }

    #[test]
    fn resolve_section_alongside_styleguide_is_mixed() {
        let err = styleguide_from_document(&document(
            "styleguide: {}\nresolve: {doNotResolveExamples: true}\n",
        ))
        .unwrap_err();
        assert!(matches!(err, StyleguideError::MixedConfigSyntax));
    }

    #[test]
    fn api_definitions_become_apis() {
        let config = parse_config(
            "extends: [minimal]\napiDefinitions:\n  main: openapi.yaml\n",
            "redocly.yaml",
        )
        .unwrap();
        assert_eq!(config.apis["main"].root, "openapi.yaml");
        assert!(config.apis["main"].styleguide.is_none());
    }

    #[test]
    fn api_definitions_with_apis_conflict() {
        let err = parse_config(
            "apiDefinitions: {main: a.yaml}\napis: {main: {root: a.yaml}}\n",
            "redocly.yaml",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Do not use 'apiDefinitions' field. Use 'apis' instead"
        );
    }

    #[test]
    fn mixed_syntax_is_rejected() {
        let err =
            styleguide_from_document(&document("rules: {}\nstyleguide: {}\n")).unwrap_err();
        assert!(matches!(err, StyleguideError::MixedConfigSyntax));

        let err =
            styleguide_from_document(&document("lint: {}\nstyleguide: {}\n")).unwrap_err();
        assert!(matches!(err, StyleguideError::MixedConfigSyntax));
    }

    #[test]
    fn missing_section_names_the_document() {
        let err = styleguide_from_document(&document("apis: {}\n")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Styleguide configuration format not detected: \"redocly.yaml\""
        );
    }

    #[test]
    fn parses_apis_with_their_own_styleguide() {
        let config = parse_config(
            r#"
styleguide:
  rules: {a: warn}
apis:
  main:
    root: openapi.yaml
    rules: {a: error}
  other:
    root: other.yaml
"#,
            "redocly.yaml",
        )
        .unwrap();

        assert!(config.styleguide.is_some());
        assert_eq!(config.apis["main"].root, "openapi.yaml");
        assert_eq!(
            config.apis["main"].styleguide.as_ref().unwrap().rules["a"].severity(),
            Severity::Error
        );
        assert!(config.apis["other"].styleguide.is_none());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = parse_config("rules: [", "bad.yaml").unwrap_err();
        assert!(matches!(err, StyleguideError::ConfigParseError { .. }));
    }

    #[test]
    fn fs_resolver_reads_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("base.yaml");
        fs::write(&path, "rules:\n  a: warn\n").unwrap();

        let doc = FsDocumentResolver
            .resolve_document(path.to_str().unwrap())
            .unwrap();
        assert!(doc.parsed.get("rules").is_some());
    }

    #[test]
    fn fs_resolver_refuses_urls() {
        assert!(FsDocumentResolver
            .resolve_document("https://example.com/base.yaml")
            .is_err());
    }
}
