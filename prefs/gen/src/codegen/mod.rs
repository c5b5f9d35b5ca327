//! Code generation for preference implementations.
//!
//! Generation builds a structured [`GeneratedUnit`] first (imports, the
//! implementation struct, and one method list per `impl` block) and renders
//! it to tokens in one pass at the end. Classification never touches tokens,
//! and each piece can be tested on its own.
//!
//! ## Submodules
//!
//! - [`constructor`] - the implementation struct and its `new` constructor
//! - [`accessors`] - one getter or putter method per [`AccessorSpec`]
//! - [`actions`] - the fixed `PreferenceActions` methods
//! - [`assembler`] - combines the above into a [`GeneratedUnit`]
//! - [`unit`] - the unit representation and its rendering
//!
//! ## Output Format
//!
//! Rendered units are validated with `syn::parse2` and formatted with
//! `prettyplease`; see [`crate::output`].
//!
//! [`AccessorSpec`]: crate::classifier::AccessorSpec

pub mod accessors;
pub mod actions;
pub mod assembler;
pub mod constructor;
pub mod unit;

pub use assembler::ImplementationAssembler;
pub use unit::{GeneratedMethod, GeneratedUnit, TraitImpl};

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::context::GenerationContext;
use crate::errors::GeneratorError;
use crate::model::TypeRef;
use crate::type_mapper::STRING_SET_API_LEVEL;

/// Platform level from which editors support asynchronous `apply`.
pub const APPLY_API_LEVEL: u32 = 9;

/// What the generated code runs on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationTarget {
    /// Lowest platform level the generated code must support. `None` means
    /// a modern platform: no level checks are emitted.
    pub min_api_level: Option<u32>,
    /// Module path of the serializer access point, e.g. `prefs_api::serializer`.
    pub serializer: Option<String>,
}

impl GenerationTarget {
    /// True when writes need a runtime check before using `apply`.
    pub fn needs_apply_guard(&self) -> bool {
        self.min_api_level.is_some_and(|level| level < APPLY_API_LEVEL)
    }

    /// True when string sets need a runtime check and a string fallback.
    pub fn needs_string_set_guard(&self) -> bool {
        self.min_api_level
            .is_some_and(|level| level < STRING_SET_API_LEVEL)
    }
}

/// Name of the editor local in write bodies. Must not collide with a putter
/// parameter name.
pub(crate) const EDITOR_LOCAL: &str = "__prefs_editor";

pub(crate) fn editor_ident() -> Ident {
    format_ident!("{}", EDITOR_LOCAL)
}

/// Statement opening the editor local.
pub(crate) fn open_editor() -> TokenStream {
    let editor = editor_ident();
    quote! { let mut #editor = self.preferences.edit(); }
}

/// Statement publishing the editor local, with a `commit` fallback for platforms
/// without `apply`.
pub(crate) fn publish_editor(target: &GenerationTarget, ctx: &mut GenerationContext) -> TokenStream {
    let editor = editor_ident();
    if target.needs_apply_guard() {
        ctx.require_import("prefs_api::build");
        quote! {
            if build::sdk_int() >= build::GINGERBREAD {
                #editor.apply();
            } else {
                let _ = #editor.commit();
            }
        }
    } else {
        quote! { #editor.apply(); }
    }
}

/// The serializer module as referenced in generated code.
///
/// A multi-segment path is imported and referred to by its last segment.
pub(crate) fn serializer_module(
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> Result<TokenStream, GeneratorError> {
    let path = target.serializer.as_deref().ok_or_else(|| {
        GeneratorError::CodeGenError("serialized accessor without a serializer".to_string())
    })?;
    let last = path.rsplit("::").next().unwrap_or(path);
    if path.contains("::") {
        ctx.require_import(path);
    }
    let ident = format_ident!("{}", last);
    Ok(quote! { #ident })
}

/// Parses a type for emission.
pub(crate) fn type_tokens(ty: &TypeRef) -> Result<syn::Type, GeneratorError> {
    syn::parse_str(&ty.to_string())
        .map_err(|e| GeneratorError::CodeGenError(format!("cannot emit type `{ty}`: {e}")))
}

/// Parses a qualified trait or module path for emission.
pub(crate) fn path_tokens(path: &str) -> Result<syn::Path, GeneratorError> {
    syn::parse_str(path)
        .map_err(|e| GeneratorError::CodeGenError(format!("cannot emit path `{path}`: {e}")))
}
