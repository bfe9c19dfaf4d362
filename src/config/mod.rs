//! Styleguide configuration loading and resolution.
//!
//! This module handles all aspects of configuration:
//! - Document schema in [`schema`]
//! - Document loading and section detection in [`loader`]
//! - Inheritance (`extends:`) resolution in [`resolver`]
//! - Layer merging in [`merger`]
//! - Assertion rule extraction in [`assertions`]
//!
//! # Example
//!
//! ```
//! use apistyle::config::StyleguideResolver;
//! use apistyle::lint::Severity;
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("base.yaml"), "rules:\n  tag-description: warn\n").unwrap();
//! fs::write(
//!     temp.path().join("redocly.yaml"),
//!     "styleguide:\n  extends: [base.yaml]\n  rules:\n    info-contact: error\n",
//! )
//! .unwrap();
//!
//! let path = temp.path().join("redocly.yaml");
//! let config = StyleguideResolver::new().load_config(path.to_str().unwrap()).unwrap();
//! let rules = &config.styleguide.rules.agnostic;
//! assert_eq!(rules["tag-description"].severity(), Severity::Warn);
//! assert_eq!(rules["info-contact"].severity(), Severity::Error);
//! assert_eq!(config.styleguide.extend_paths.len(), 2);
//! ```

pub mod assertions;
pub mod loader;
pub mod merger;
pub mod paths;
pub mod resolved;
pub mod resolver;
pub mod schema;

pub use assertions::{Assertion, AssertionRegistry};
pub use loader::{
    parse_config, raw_config_from_document, styleguide_from_document, Document, DocumentResolver,
    FsDocumentResolver,
};
pub use merger::{assign_existing, merge_extends};
pub use paths::{is_absolute_url, resolve_relative};
pub use resolved::{Config, ResolvedApi, ResolvedStyleguideConfig};
pub use resolver::StyleguideResolver;
pub use schema::{DialectMaps, RawApi, RawConfig, RawStyleguideConfig, RuleMap};
