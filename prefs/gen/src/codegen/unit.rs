//! The generated unit before rendering.

use std::path::PathBuf;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// One method: its signature and body statements.
#[derive(Debug, Clone)]
pub struct GeneratedMethod {
    pub name: String,
    /// `fn name(&self, ...) -> T`, without body.
    pub signature: TokenStream,
    pub body: Vec<TokenStream>,
}

impl GeneratedMethod {
    pub fn to_tokens(&self) -> TokenStream {
        let signature = &self.signature;
        let body = &self.body;
        quote! {
            #signature {
                #(#body)*
            }
        }
    }
}

/// An `impl <Trait> for <Struct>` block.
#[derive(Debug, Clone)]
pub struct TraitImpl {
    /// Qualified name of the implemented trait.
    pub interface: String,
    pub trait_path: syn::Path,
    pub methods: Vec<GeneratedMethod>,
}

/// A complete generated file for one root trait.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    /// Qualified name of the root trait.
    pub root: String,
    pub struct_name: String,
    /// Output path relative to the output directory.
    pub path: PathBuf,
    /// Imports beyond the core set, sorted.
    pub imports: Vec<syn::Path>,
    /// The struct declaration and its inherent `impl` with the constructor.
    pub definition: TokenStream,
    /// Methods of `impl PreferenceActions`.
    pub actions: Vec<GeneratedMethod>,
    /// One block per traversed interface, in traversal order.
    pub impls: Vec<TraitImpl>,
}

impl GeneratedUnit {
    /// Renders the unit as a file.
    ///
    /// The file is meant to be included as a child module of the root
    /// trait's module, so it starts with `use super::*;`.
    pub fn to_tokens(&self) -> TokenStream {
        let struct_name = format_ident!("{}", self.struct_name);
        let imports = &self.imports;
        let definition = &self.definition;
        let actions = self.actions.iter().map(GeneratedMethod::to_tokens);
        let impls = self.impls.iter().map(|block| {
            let trait_path = &block.trait_path;
            let methods = block.methods.iter().map(GeneratedMethod::to_tokens);
            quote! {
                impl #trait_path for #struct_name {
                    #(#methods)*
                }
            }
        });

        quote! {
            #[allow(unused_imports)]
            use super::*;

            use std::sync::Arc;

            use prefs_api::{Context, OnChangeListener, PreferenceActions, SharedPreferences};
            #(use #imports;)*

            #definition

            impl PreferenceActions for #struct_name {
                #(#actions)*
            }

            #(#impls)*
        }
    }

    /// Number of generated accessor methods across all trait impls.
    pub fn accessor_count(&self) -> usize {
        self.impls.iter().map(|block| block.methods.len()).sum()
    }
}
