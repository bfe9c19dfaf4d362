//! Path and URL handling for config references.

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::error::{Result, StyleguideError};

/// Whether a reference is a remote (http/https) location.
pub fn is_absolute_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Canonical form of a config path used for provenance and cycle checks.
///
/// Remote URLs are kept verbatim, the empty (in-memory) path stays empty,
/// everything else becomes an absolute, lexically normalized path.
pub fn canonical_config_path(config_path: &str) -> Result<String> {
    if config_path.is_empty() || is_absolute_url(config_path) {
        return Ok(config_path.to_string());
    }
    absolutize(Path::new(config_path))
}

/// Resolve `reference` relative to the config file at `config_path`.
pub fn resolve_relative(config_path: &str, reference: &str) -> Result<String> {
    if is_absolute_url(reference) {
        return Ok(reference.to_string());
    }

    if is_absolute_url(config_path) {
        let joined = Url::parse(config_path).and_then(|base| base.join(reference));
        return joined
            .map(|url| url.to_string())
            .map_err(|e| StyleguideError::ExtendLoadFailed {
                path: reference.to_string(),
                message: e.to_string(),
            });
    }

    let base_dir = Path::new(config_path).parent().unwrap_or(Path::new(""));
    absolutize(&base_dir.join(reference))
}

fn absolutize(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)?;
    Ok(normalize(&absolute).to_string_lossy().into_owned())
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
