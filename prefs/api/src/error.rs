//! Error types for the runtime helpers.

use thiserror::Error;

/// Errors raised while converting values to and from their stored form.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// A value could not be converted to its stored string form.
    #[error("Failed to serialize value for storage: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A stored string could not be converted back into a value.
    #[error("Failed to deserialize stored value: {0}")]
    Deserialize(#[source] serde_json::Error),
}
