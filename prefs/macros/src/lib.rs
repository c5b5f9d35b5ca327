//! Marker attribute for preference accessor traits.
//!
//! `#[preferences]` does not generate anything by itself. The `prefs-gen`
//! build step reads the annotated trait from source and writes the
//! implementation. The attribute exists so the annotation and the per-method
//! `#[pref(...)]` helpers compile, and so malformed arguments are reported by
//! the compiler at the declaration site.
//!
//! ## Examples
//!
//! ```ignore
//! use prefs_api::preferences;
//!
//! #[preferences(name = "app", mode = "multi_process_readable")]
//! pub trait Settings {
//!     #[pref(key = "user_name", default = "guest")]
//!     fn username(&self) -> String;
//!     fn set_username(&self, username: String);
//! }
//! ```

use proc_macro::TokenStream;

mod expand;
mod parse;

/// Marks a trait as a preference accessor interface.
///
/// ## Attributes
///
/// On the trait:
/// - `name = "..."` - store name (optional; the default-scoped store is used when absent)
/// - `mode = "private" | "multi_process_readable" | "multi_process_writable"` (optional)
///
/// On each method:
/// - `#[pref(key = "...")]` - overrides the key derived from the method name
/// - `#[pref(default = <literal>)]` - explicit getter default
/// - `#[pref(default_expr = "<expression>")]` - explicit getter default as an expression
#[proc_macro_attribute]
pub fn preferences(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::preferences_impl(attr.into(), item.into()).into()
}

/// Attaches key and default metadata to a method of an ancestor trait.
///
/// Inside a `#[preferences]` trait the helpers are consumed by that
/// attribute. Traits that are only inherited from carry no annotation of
/// their own, so there the helper validates its arguments and leaves the
/// method unchanged.
#[proc_macro_attribute]
pub fn pref(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::pref_impl(attr.into(), item.into()).into()
}
