//! Naming of generated implementation structs and files.

use std::path::PathBuf;

use crate::model::InterfaceDecl;

/// Suffix appended to the root trait name to form the implementation struct.
pub const IMPL_SUFFIX: &str = "Impl";

/// Name of the generated struct, e.g. `SettingsImpl` for `Settings`.
pub fn impl_struct_name(trait_name: &str) -> String {
    format!("{trait_name}{IMPL_SUFFIX}")
}

/// Converts a CamelCase identifier to snake_case.
///
/// ## Examples
///
/// ```
/// use prefs_gen::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("SettingsImpl"), "settings_impl");
/// assert_eq!(to_snake_case("HTTPSettingsImpl"), "http_settings_impl");
/// ```
pub fn to_snake_case(s: &str) -> String {
    split_camel_case(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Output path of the unit generated for `root`, relative to the output
/// directory: one directory per module segment plus `<snake>_impl.rs`.
pub fn unit_path(root: &InterfaceDecl) -> PathBuf {
    let mut path: PathBuf = root.module_path().iter().collect();
    path.push(format!(
        "{}.rs",
        to_snake_case(&impl_struct_name(root.simple_name()))
    ));
    path
}

/// Splits a CamelCase string into words.
///
/// An uppercase letter starts a new word when it follows a lowercase letter
/// or digit, or when it begins a capitalized word after an acronym
/// (`HTTPClient` -> `HTTP`, `Client`).
fn split_camel_case(s: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut words = Vec::new();
    let mut word_start = 0;

    for i in 1..chars.len() {
        let (offset, current) = chars[i];
        let prev = chars[i - 1].1;

        let is_new_word = current.is_uppercase()
            && (prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase()
                    && chars.get(i + 1).is_some_and(|(_, next)| next.is_lowercase())));

        if current == '_' || prev == '_' {
            if offset > word_start && prev != '_' {
                words.push(&s[word_start..offset]);
            }
            word_start = if current == '_' { offset + 1 } else { offset };
            continue;
        }

        if is_new_word {
            if offset > word_start {
                words.push(&s[word_start..offset]);
            }
            word_start = offset;
        }
    }

    if word_start < s.len() {
        words.push(&s[word_start..]);
    }

    words
}
