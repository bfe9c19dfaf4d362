//! Plugins and presets.
//!
//! A plugin contributes rule, preprocessor and decorator factories, named
//! presets, and custom assertion functions. This module provides:
//!
//! - [`PluginDescriptor`] - a plugin as supplied by the host or a manifest
//! - [`resolve_plugins`] - validation and id namespacing
//! - [`resolve_preset`] - `pluginId/presetName` lookup
//! - [`default_plugin`] - the implicit plugin carrying built-in presets
//!
//! # Example
//!
//! ```
//! use apistyle::plugin::{resolve_plugins, resolve_preset, PluginDescriptor, PluginRef,
//!     StaticPluginLoader};
//!
//! let acme = PluginDescriptor::new("acme")
//!     .preset("strict", serde_yaml::from_str("rules: {acme/no-foo: error}").unwrap());
//!
//! let plugins =
//!     resolve_plugins(&[PluginRef::inline(acme)], "", &StaticPluginLoader::new()).unwrap();
//! let strict = resolve_preset("acme/strict", &plugins).unwrap();
//! assert!(strict.rules.contains_key("acme/no-foo"));
//! ```

pub mod builtin;
pub mod descriptor;
pub mod loader;
pub mod preset;
pub mod resolve;

pub use builtin::{builtin_preset_names, default_plugin, load_presets};
pub use descriptor::{
    AssertionFn, AssertionResult, DialectBuckets, Plugin, PluginDescriptor, PluginRef,
    RuleFactory, RuleKind,
};
pub use loader::{ManifestPluginLoader, PluginLoader, StaticPluginLoader};
pub use preset::{parse_preset_name, resolve_preset};
pub use resolve::{prefix_rules, resolve_plugins, unique_plugins};
