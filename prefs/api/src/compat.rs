//! String-set fallback for platform levels without native set values.
//!
//! Below [`crate::build::HONEYCOMB`] a store cannot hold a set of strings, so
//! generated code stores the set as a JSON array string instead. Members are
//! sorted so the stored form is stable across writes.

use std::collections::HashSet;

use crate::error::PrefsError;

/// Encodes a set of strings as a sorted JSON array.
///
/// ## Errors
///
/// Never fails for string members; the `Result` mirrors [`decode_string_set`].
pub fn encode_string_set(values: &HashSet<String>) -> Result<String, PrefsError> {
    let mut members: Vec<&String> = values.iter().collect();
    members.sort();
    serde_json::to_string(&members).map_err(PrefsError::Serialize)
}

/// Decodes a set previously written by [`encode_string_set`].
///
/// ## Errors
///
/// Returns [`PrefsError::Deserialize`] if `raw` is not a JSON array of strings.
pub fn decode_string_set(raw: &str) -> Result<HashSet<String>, PrefsError> {
    serde_json::from_str::<Vec<String>>(raw)
        .map(|members| members.into_iter().collect())
        .map_err(PrefsError::Deserialize)
}
