//! Validation, formatting and writing of generated units.

use std::fs;
use std::path::Path;

use proc_macro2::TokenStream;

use crate::codegen::GeneratedUnit;
use crate::errors::GeneratorError;

/// Notice placed at the top of every generated file.
pub const GENERATED_NOTICE: &str =
    "// This code was automatically generated by prefs-gen. Do not edit manually.";

/// Validates generated code using syn.
///
/// Parses the token stream as a complete Rust file to ensure it's syntactically
/// valid before writing to disk.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease, prepending the generated notice.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{GENERATED_NOTICE}\n\n{formatted}")
}

/// Renders, validates and formats a unit.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the unit does not render to a
/// valid Rust file.
pub fn render_unit(unit: &GeneratedUnit) -> Result<String, GeneratorError> {
    let file = validate_code(&unit.to_tokens())?;
    Ok(format_code(&file))
}

/// Writes content to a file atomically using temp file + rename.
///
/// The file is never left in a partially-written state: readers see either
/// the old or the new content.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("rs.tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        GeneratorError::WriteError {
            path: path.display().to_string(),
            source: e,
        }
    })?;

    Ok(())
}
