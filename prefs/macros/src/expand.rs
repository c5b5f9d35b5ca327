//! Expansion of `#[preferences]`.

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Attribute, Error, ItemTrait, Result, TraitItem, parse_quote, parse2};

use crate::parse::{PreferencesArgs, is_pref_attr, validate_pref_attr};

/// Validates the annotation and re-emits the trait without `#[pref]` helpers.
pub fn preferences_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    match preferences_inner(attr, item) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn preferences_inner(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let _args: PreferencesArgs = parse2(attr)?;
    let mut item: ItemTrait = parse2(item).map_err(|e| {
        Error::new(
            e.span(),
            "#[preferences] can only be applied to trait declarations",
        )
    })?;

    let mut errors: Option<Error> = None;
    for trait_item in &mut item.items {
        if let TraitItem::Fn(method) = trait_item {
            for attr in method.attrs.iter().filter(|a| is_pref_attr(a)) {
                if let Err(e) = validate_pref_attr(attr) {
                    match errors.as_mut() {
                        Some(existing) => existing.combine(e),
                        None => errors = Some(e),
                    }
                }
            }
            method.attrs.retain(|a| !is_pref_attr(a));
        }
    }

    if let Some(errors) = errors {
        return Err(errors);
    }

    Ok(item.into_token_stream())
}

/// Validates a standalone `#[pref(...)]` and re-emits the method untouched.
pub fn pref_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let helper: Attribute = parse_quote!(#[pref(#attr)]);
    match validate_pref_attr(&helper) {
        Ok(()) => item,
        Err(err) => {
            let mut tokens = err.to_compile_error();
            tokens.extend(item);
            tokens
        }
    }
}
