//! Serializer access point for non-primitive preference values.
//!
//! Values whose type does not map onto a store primitive are stored as JSON
//! strings. Generated accessors call [`serialize`] and [`deserialize`]; both
//! log and swallow failures so a corrupt entry reads as the getter's default
//! instead of failing the caller.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::PrefsError;

/// Converts `value` into its stored string form.
///
/// ## Errors
///
/// Returns [`PrefsError::Serialize`] if the value cannot be represented as JSON
/// (for example a map with non-string keys).
pub fn try_serialize<T: Serialize>(value: &T) -> Result<String, PrefsError> {
    serde_json::to_string(value).map_err(PrefsError::Serialize)
}

/// Converts a stored string back into a value.
///
/// ## Errors
///
/// Returns [`PrefsError::Deserialize`] if `raw` is not valid JSON for `T`.
pub fn try_deserialize<T: DeserializeOwned>(raw: &str) -> Result<T, PrefsError> {
    serde_json::from_str(raw).map_err(PrefsError::Deserialize)
}

/// Serializes `value`, returning `None` and logging on failure.
pub fn serialize<T: Serialize>(value: &T) -> Option<String> {
    match try_serialize(value) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

/// Deserializes `raw`, returning `None` and logging on failure.
pub fn deserialize<T: DeserializeOwned>(raw: &str) -> Option<T> {
    match try_deserialize(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}
