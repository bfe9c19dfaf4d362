//! Apistyle - styleguide resolution and visitor normalization for API
//! description linting.
//!
//! Apistyle turns a layered styleguide configuration (presets, plugins and
//! `extends:` chains) into the set of active rules for one OpenAPI or
//! AsyncAPI dialect, and compiles the rules' nested visitor trees into a
//! flat dispatch table a single-pass document walker can execute.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading, inheritance and merging
//! - [`error`] - Error types and result aliases
//! - [`lint`] - Severities, problems and rule instantiation
//! - [`plugin`] - Plugins, presets and the default plugin
//! - [`types`] - Node-type registry and dialects
//! - [`visitor`] - Visitor trees and their normalization
//!
//! # Example
//!
//! ```
//! use apistyle::config::{RawStyleguideConfig, StyleguideResolver};
//! use apistyle::lint::{build_dispatch_table, Severity};
//! use apistyle::plugin::{PluginDescriptor, RuleFactory, RuleKind};
//! use apistyle::types::{Dialect, SpecMajor, TypeDefinition, TypeRegistry};
//! use apistyle::visitor::{RootVisitor, TypeVisitor};
//!
//! let registry = TypeRegistry::builder()
//!     .define("Root", TypeDefinition::new().property("info", "Info"))
//!     .define("Info", TypeDefinition::new().scalar("title"))
//!     .build()
//!     .unwrap();
//!
//! let acme = PluginDescriptor::new("acme").rule(
//!     SpecMajor::Oas3,
//!     "info-title",
//!     RuleFactory::single(|_| {
//!         RootVisitor::new().on("Info", TypeVisitor::enter(|node, ctx| {
//!             if node.get("title").is_none() {
//!                 ctx.report("Info object should contain `title` field");
//!             }
//!         }))
//!     }),
//! );
//!
//! let mut raw: RawStyleguideConfig =
//!     serde_yaml::from_str("rules:\n  acme/info-title: warn\n").unwrap();
//! raw.plugins.push(acme.into());
//!
//! let styleguide = StyleguideResolver::new().resolve_styleguide(Some(&raw), "").unwrap();
//! let table =
//!     build_dispatch_table(&styleguide, RuleKind::Rule, Dialect::Oas3_1, &registry).unwrap();
//!
//! let info = table.by_name("Info").unwrap();
//! assert_eq!(info.enter.len(), 1);
//! assert_eq!(info.enter[0].severity, Severity::Warn);
//! ```

pub mod config;
pub mod error;
pub mod lint;
pub mod plugin;
pub mod types;
pub mod visitor;

pub use config::{Config, ResolvedStyleguideConfig, StyleguideResolver};
pub use error::{Result, StyleguideError};
