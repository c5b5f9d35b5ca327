//! Error types for the preference generator.

use thiserror::Error;

use crate::classifier::Role;
use crate::diagnostics::Attribution;

/// Errors that can occur during code generation.
///
/// The first group is attributed to a declaration and collected per root
/// interface without aborting the batch. The second group covers inputs,
/// configuration and output.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A method is neither a getter nor a putter.
    #[error("No valid getter or putter detected for `{method}` in '{interface}': {reason}")]
    InvalidAccessor {
        interface: String,
        method: String,
        reason: String,
        at: Attribution,
    },

    /// A key was registered twice in the same role within one root hierarchy.
    #[error("Duplicate {role} for key '{key}': `{method}` repeats `{first}`")]
    DuplicateKey {
        key: String,
        role: Role,
        /// The method registered first.
        first: String,
        /// The method that collided (the one this error is attributed to).
        method: String,
        at: Attribution,
    },

    /// A supertrait could be found neither in-source nor in the external registry.
    #[error("Could not load interface '{ancestor}' for generation of '{root}'")]
    UnresolvableAncestor {
        ancestor: String,
        root: String,
        at: Attribution,
    },

    /// A value type needs serialization but no serializer is configured.
    #[error(
        "Type `{ty}` of `{method}` needs a serializer, but none is configured (set `serializer` in prefs-gen.toml or pass --serializer)"
    )]
    UnresolvedSerialization {
        ty: String,
        method: String,
        at: Attribution,
    },

    /// The derived or overridden key is empty.
    #[error("Derived preference key for `{method}` is empty")]
    InvalidKey { method: String, at: Attribution },

    /// An explicit default does not fit the accessor's value kind.
    #[error("Invalid default for `{method}`: {reason}")]
    InvalidDefault {
        method: String,
        reason: String,
        at: Attribution,
    },

    /// A `#[preferences]` or `#[pref]` attribute is malformed.
    #[error("Malformed attribute in '{interface}': {message}")]
    InvalidAttribute {
        interface: String,
        message: String,
        at: Attribution,
    },

    /// Failed to parse a source file
    #[error("Failed to parse '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Failed to read a source or manifest file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An external manifest is malformed
    #[error("Invalid external manifest '{path}': {message}")]
    ManifestError { path: String, message: String },

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl GeneratorError {
    /// The declaration this error is attributed to, if any.
    pub fn attribution(&self) -> Option<&Attribution> {
        match self {
            GeneratorError::InvalidAccessor { at, .. }
            | GeneratorError::DuplicateKey { at, .. }
            | GeneratorError::UnresolvableAncestor { at, .. }
            | GeneratorError::UnresolvedSerialization { at, .. }
            | GeneratorError::InvalidKey { at, .. }
            | GeneratorError::InvalidDefault { at, .. }
            | GeneratorError::InvalidAttribute { at, .. } => Some(at),
            _ => None,
        }
    }
}
