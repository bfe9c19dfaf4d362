//! Error types for styleguide resolution.
//!
//! This module defines [`StyleguideError`], the error type returned by every
//! fallible operation in the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every failure is fatal to the configuration build; no partially
//!   resolved configuration is ever returned
//! - Messages name the offending plugin, preset or path
//! - Collaborator failures (document fetching) arrive as `anyhow::Error`
//!   and are wrapped with the path that was being loaded

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for configuration resolution and visitor normalization.
#[derive(Debug, Error)]
pub enum StyleguideError {
    /// A plugin descriptor has no `id`, or the `id` is not a string.
    #[error("Plugin must define `id` property in {reference}")]
    InvalidPluginId { reference: String },

    /// Two plugins in one plugin list share an id.
    #[error(
        "Plugin \"id\" must be unique. Plugin {reference} uses id \"{id}\" already seen in {seen_in}"
    )]
    DuplicatePluginId {
        id: String,
        reference: String,
        seen_in: String,
    },

    /// A plugin declares `rules`, `preprocessors` or `decorators` without any dialect bucket.
    #[error("Plugin {kind} must have `oas3`, `oas2` or `async2` {kind} \"{reference}\"")]
    MissingDialectBucket { kind: String, reference: String },

    /// Plugins cannot be loaded from remote locations.
    #[error("Remote plugins are not supported: {reference}")]
    RemotePluginUnsupported { reference: String },

    /// A plugin reference could not be loaded.
    #[error("Failed to load plugin \"{reference}\": {message}")]
    PluginLoadFailed { reference: String, message: String },

    /// A preset names a plugin that is not part of the plugin list.
    #[error("Invalid config {preset}: plugin {plugin_id} is not included")]
    PluginNotIncluded { preset: String, plugin_id: String },

    /// The plugin exists but does not export the named preset.
    #[error("Invalid config {preset}: plugin {plugin_id} doesn't export config with name {name}")]
    PresetNotFound {
        preset: String,
        plugin_id: String,
        name: String,
    },

    /// An unprefixed preset name matches no built-in preset.
    #[error("Invalid config {preset}: there is no such built-in config")]
    NoBuiltinPreset { preset: String },

    /// A custom assertion references a plugin that is not loaded.
    #[error("Plugin {plugin_id} isn't found")]
    AssertionPluginNotFound { plugin_id: String },

    /// A custom assertion references a function the plugin does not export.
    #[error("Plugin {plugin_id} doesn't export assertions function with name {name}")]
    AssertionFunctionNotFound { plugin_id: String, name: String },

    /// An `extends` chain loops back onto one of its own ancestors.
    #[error("Circular dependency in config file: \"{path}\"")]
    CircularExtends { path: String },

    /// A preset or shared fragment carries its own `extends`.
    #[error("'extends' is not supported in shared configs yet: {fragment}")]
    ExtendsInSharedConfig { fragment: String },

    /// An `extends` list contains something other than strings.
    #[error("Error configuration format not detected in extends value must contain strings")]
    ExtendsNotString,

    /// A config path is required but none was given.
    #[error("Reference to a config is required")]
    ConfigPathRequired,

    /// A loaded document has no recognizable styleguide section.
    #[error("Styleguide configuration format not detected: \"{path}\"")]
    StyleguideNotDetected { path: String },

    /// `lint`, `styleguide` and flat syntax were combined in one document.
    #[error("Do not use 'lint', 'styleguide' and flat syntax together")]
    MixedConfigSyntax,

    /// A deprecated field was combined with its replacement.
    #[error("Do not use '{deprecated}' field. Use '{replacement}' instead")]
    DeprecatedFieldConflict {
        deprecated: String,
        replacement: String,
    },

    /// An extended config could not be fetched or parsed.
    #[error("Failed to load \"{path}\": {message}")]
    ExtendLoadFailed { path: String, message: String },

    /// `any` or `ref` used inside a nested visitor.
    #[error("{key}() is allowed only on top level")]
    ReservedKeyBelowRoot { key: String },

    /// A `ref` visitor declared a skip predicate.
    #[error("ref() visitor does not support skip")]
    RefVisitorSkip,

    /// A type definition references a type that was never defined.
    #[error("Unknown node type \"{name}\" referenced from \"{referenced_from}\"")]
    UnknownNodeType {
        name: String,
        referenced_from: String,
    },

    /// Failed to parse a configuration document.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for styleguide operations.
pub type Result<T> = std::result::Result<T, StyleguideError>;
