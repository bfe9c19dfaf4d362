//! Integration tests for config module public API.

use apistyle::config::{
    parse_config, RawStyleguideConfig, ResolvedStyleguideConfig, StyleguideResolver,
};
use apistyle::lint::Severity;
use apistyle::plugin::{PluginDescriptor, RuleFactory, StaticPluginLoader};
use apistyle::types::SpecMajor;
use apistyle::visitor::RootVisitor;
use apistyle::StyleguideError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

fn resolve_file(path: &Path) -> apistyle::Result<ResolvedStyleguideConfig> {
    let config = StyleguideResolver::new().load_config(&path_str(path))?;
    Ok(config.styleguide)
}

#[test]
fn public_api_is_accessible() {
    let _raw = RawStyleguideConfig::default();
    let _resolved = ResolvedStyleguideConfig::default();
    let _resolver = StyleguideResolver::default();
}

#[test]
fn extends_chain_records_each_file_once() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    fs::write(dir.join("root.yaml"), "extends: [./one.yaml]\nrules:\n  a: error\n").unwrap();
    fs::write(dir.join("one.yaml"), "extends: [two.yaml]\nrules:\n  b: warn\n").unwrap();
    fs::write(dir.join("two.yaml"), "extends: [nested/three.yaml]\nrules:\n  c: warn\n").unwrap();
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("nested/three.yaml"), "rules:\n  a: warn\n  d: off\n").unwrap();

    let resolved = resolve_file(&dir.join("root.yaml")).unwrap();

    let names: Vec<_> = resolved
        .extend_paths
        .iter()
        .map(|p| Path::new(p).file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["root.yaml", "one.yaml", "two.yaml", "three.yaml"]);

    let rules = &resolved.rules.agnostic;
    assert_eq!(rules["a"].severity(), Severity::Error);
    assert_eq!(rules["b"].severity(), Severity::Warn);
    assert_eq!(rules["c"].severity(), Severity::Warn);
    assert_eq!(rules["d"].severity(), Severity::Off);
}

#[test]
fn circular_extends_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    fs::write(dir.join("a.yaml"), "extends: [b.yaml]\n").unwrap();
    fs::write(dir.join("b.yaml"), "extends: [a.yaml]\n").unwrap();

    let err = resolve_file(&dir.join("a.yaml")).unwrap_err();
    match err {
        StyleguideError::CircularExtends { path } => assert!(path.ends_with("a.yaml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn self_extends_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("a.yaml"), "extends: [./a.yaml]\n").unwrap();

    let err = resolve_file(&dir.join("a.yaml")).unwrap_err();
    assert!(matches!(err, StyleguideError::CircularExtends { .. }));
}

#[test]
fn extending_an_identical_copy_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let body = "rules:\n  a: warn\noas3_1Preprocessors:\n  p: on\ndecorators:\n  d: off\n";

    fs::write(dir.join("copy.yaml"), body).unwrap();
    fs::write(dir.join("root.yaml"), format!("extends: [copy.yaml]\n{body}")).unwrap();

    let standalone = resolve_file(&dir.join("copy.yaml")).unwrap();
    let extended = resolve_file(&dir.join("root.yaml")).unwrap();

    assert_eq!(extended.rules, standalone.rules);
    assert_eq!(extended.preprocessors, standalone.preprocessors);
    assert_eq!(extended.decorators, standalone.decorators);
    assert_eq!(extended.plugins.len(), 1);
    assert_eq!(extended.plugins[0].id, "");
}

#[test]
fn plugin_preset_example() {
    let acme = PluginDescriptor::new("acme")
        .rule(
            SpecMajor::Oas3,
            "no-foo",
            RuleFactory::single(|_| RootVisitor::new()),
        )
        .preset(
            "strict",
            serde_yaml::from_str("rules:\n  acme/no-foo: error\n").unwrap(),
        );

    let mut raw: RawStyleguideConfig = serde_yaml::from_str("extends: [acme/strict]\n").unwrap();
    raw.plugins.push(acme.into());

    let resolved = StyleguideResolver::new()
        .resolve_styleguide(Some(&raw), "")
        .unwrap();
    assert_eq!(
        resolved.rules.agnostic["acme/no-foo"].severity(),
        Severity::Error
    );
}

#[test]
fn plugins_from_manifests_and_host() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::create_dir_all(dir.join("plugins")).unwrap();
    fs::write(
        dir.join("plugins/house.yaml"),
        "id: house\nconfigs:\n  base:\n    rules:\n      tag-description: error\n",
    )
    .unwrap();
    fs::write(
        dir.join("redocly.yaml"),
        r#"
styleguide:
  plugins:
    - ./plugins/house.yaml
    - ./plugins/acme.js
  extends:
    - house/base
  rules:
    acme/no-foo: warn
"#,
    )
    .unwrap();

    let loader = StaticPluginLoader::new()
        .register(
            "./plugins/acme.js",
            PluginDescriptor::new("acme").rule(
                SpecMajor::Oas2,
                "no-foo",
                RuleFactory::single(|_| RootVisitor::new()),
            ),
        )
        .with_fallback(apistyle::plugin::ManifestPluginLoader);

    let config = StyleguideResolver::new()
        .with_plugin_loader(loader)
        .load_config(&path_str(&dir.join("redocly.yaml")))
        .unwrap();
    let styleguide = &config.styleguide;

    let ids: Vec<_> = styleguide.plugins.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["house", "acme", ""]);
    assert_eq!(styleguide.plugin_paths.len(), 2);
    assert!(styleguide.plugin_paths[0].ends_with("house.yaml"));
    assert_eq!(
        styleguide.rules.agnostic["tag-description"].severity(),
        Severity::Error
    );
}

#[test]
fn duplicate_plugin_ids_in_one_list_fail() {
    let mut raw = RawStyleguideConfig::default();
    raw.plugins.push(PluginDescriptor::new("acme").into());
    raw.plugins.push(PluginDescriptor::new("acme").into());

    let err = StyleguideResolver::new()
        .resolve_styleguide(Some(&raw), "")
        .unwrap_err();
    assert!(matches!(err, StyleguideError::DuplicatePluginId { .. }));
}

#[test]
fn duplicate_plugin_across_levels_keeps_first() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("acme.yaml"), "id: acme\n").unwrap();
    fs::write(dir.join("base.yaml"), "plugins: [./acme.yaml]\n").unwrap();
    fs::write(dir.join("root.yaml"), "plugins: [./acme.yaml]\nextends: [base.yaml]\n").unwrap();

    let resolved = resolve_file(&dir.join("root.yaml")).unwrap();
    let ids: Vec<_> = resolved.plugins.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["acme", ""]);
}

#[test]
fn preset_with_extends_is_rejected() {
    let house = PluginDescriptor::new("house").preset(
        "base",
        serde_yaml::from_str("extends: [recommended]\n").unwrap(),
    );
    let mut raw: RawStyleguideConfig = serde_yaml::from_str("extends: [house/base]\n").unwrap();
    raw.plugins.push(house.into());

    let err = StyleguideResolver::new()
        .resolve_styleguide(Some(&raw), "")
        .unwrap_err();
    assert!(matches!(err, StyleguideError::ExtendsInSharedConfig { .. }));
}

#[test]
fn agnostic_rule_in_later_layer_wins_over_dialect_rule() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("base.yaml"), "oas3_0Rules:\n  x: error\n").unwrap();
    fs::write(dir.join("root.yaml"), "extends: [base.yaml]\nrules:\n  x: warn\n").unwrap();

    let resolved = resolve_file(&dir.join("root.yaml")).unwrap();
    assert_eq!(resolved.rules.oas3_0["x"].severity(), Severity::Warn);
}

#[test]
fn assertions_are_grouped_after_resolution() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(
        dir.join("base.yaml"),
        concat!(
            "rules:\n",
            "  rule/summary:\n",
            "    subject: {type: Operation, property: summary}\n",
            "    assertions: {defined: true}\n",
        ),
    )
    .unwrap();
    fs::write(dir.join("root.yaml"), "extends: [base.yaml]\n").unwrap();

    let resolved = resolve_file(&dir.join("root.yaml")).unwrap();
    assert_eq!(resolved.assertions.len(), 1);
    assert_eq!(resolved.assertions[0].assertion_id, "rule/summary");
    assert!(!resolved.rules.agnostic.contains_key("rule/summary"));
}

#[test]
fn per_api_styleguides() {
    let raw = parse_config(
        r#"
styleguide:
  extends: [recommended]
  recommendedFallback: true
apis:
  public:
    root: public.yaml
    styleguide:
      rules:
        operation-summary: off
  internal:
    root: internal.yaml
    extends: [minimal]
"#,
        "",
    )
    .unwrap();

    let config = StyleguideResolver::new().resolve_config(&raw, "").unwrap();

    let public = config.styleguide_for(Some("public"));
    assert_eq!(
        public.rules.agnostic["operation-summary"].severity(),
        Severity::Off
    );
    assert_eq!(public.recommended_fallback, Some(true));

    let internal = config.styleguide_for(Some("internal"));
    assert_eq!(internal.recommended_fallback, Some(false));
    assert_eq!(
        internal.rules.agnostic["operation-4xx-response"].severity(),
        Severity::Off
    );

    assert_eq!(config.apis["internal"].root, "internal.yaml");
}

#[test]
fn missing_extended_file_names_path() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("root.yaml"), "extends: [missing.yaml]\n").unwrap();

    let err = resolve_file(&dir.join("root.yaml")).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Failed to load"));
    assert!(message.contains("missing.yaml"));
}
