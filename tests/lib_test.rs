//! Library integration tests.

use apistyle::StyleguideError;

#[test]
fn error_types_are_public() {
    let err = StyleguideError::CircularExtends {
        path: "a.yaml".into(),
    };
    assert!(err.to_string().contains("a.yaml"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> apistyle::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn anyhow_errors_convert() {
    fn fails() -> apistyle::Result<()> {
        Err(anyhow::anyhow!("collaborator failed"))?;
        Ok(())
    }
    assert_eq!(fails().unwrap_err().to_string(), "collaborator failed");
}

#[test]
fn top_level_reexports() {
    let resolver = apistyle::StyleguideResolver::new();
    let resolved: apistyle::ResolvedStyleguideConfig =
        resolver.resolve_styleguide(None, "").unwrap();
    let config = apistyle::Config {
        styleguide: resolved,
        ..Default::default()
    };
    assert!(config.apis.is_empty());
}
