//! Implementation struct and constructor generation.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::context::GenerationContext;
use crate::model::StoreConfig;

/// Generates the implementation struct and its constructor.
///
/// The struct holds the opened store. The constructor opens the store by
/// name and mode, or the default-scoped store when no name was given.
///
/// ## Examples
///
/// For `#[preferences(name = "app")] trait Settings`:
/// ```ignore
/// // Generated code:
/// pub struct SettingsImpl {
///     preferences: Arc<dyn SharedPreferences>,
/// }
///
/// impl SettingsImpl {
///     pub fn new(context: &dyn Context) -> Self {
///         Self {
///             preferences: context.shared_preferences("app", StoreMode::Private),
///         }
///     }
/// }
/// ```
pub fn generate_definition(
    struct_name: &str,
    trait_name: &str,
    store: &StoreConfig,
    ctx: &mut GenerationContext,
) -> TokenStream {
    let struct_ident = format_ident!("{}", struct_name);
    let description = format!("Preference store implementation of `{trait_name}`.");

    let open = match &store.name {
        Some(name) => {
            ctx.require_import("prefs_api::StoreMode");
            let mode = format_ident!("{}", store.mode.variant());
            quote! { context.shared_preferences(#name, StoreMode::#mode) }
        }
        None => quote! { context.default_shared_preferences() },
    };

    quote! {
        #[doc = #description]
        pub struct #struct_ident {
            preferences: Arc<dyn SharedPreferences>,
        }

        impl #struct_ident {
            /// Opens the backing store through `context`.
            pub fn new(context: &dyn Context) -> Self {
                Self {
                    preferences: #open,
                }
            }
        }
    }
}
