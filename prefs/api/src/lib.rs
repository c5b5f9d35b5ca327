//! Runtime contract for generated preference accessors.
//!
//! `prefs-gen` turns annotated accessor traits into implementation structs.
//! The code it emits compiles against the types in this crate:
//!
//! - [`SharedPreferences`] / [`Editor`] - the key-value store boundary
//! - [`Context`] - opens named or default-scoped stores
//! - [`PreferenceActions`] - the fixed accessor contract every generated struct implements
//! - [`serializer`] - the serializer access point for non-primitive values
//! - [`build`] - the platform level query used by guarded code paths
//! - [`compat`] - string-set fallback for platform levels without native sets
//! - [`memory`] - an in-memory store for tests and hosts without a platform store
//!
//! ## Examples
//!
//! Declaring an accessor trait:
//!
//! ```
//! use prefs_api::preferences;
//!
//! #[preferences(name = "app", mode = "private")]
//! pub trait Settings {
//!     #[pref(default = "guest")]
//!     fn username(&self) -> String;
//!     fn set_username(&self, username: String);
//! }
//! ```
//!
//! The generator then emits a `SettingsImpl` struct implementing both
//! `Settings` and [`PreferenceActions`].

pub mod actions;
pub mod build;
pub mod common;
pub mod compat;
pub mod error;
pub mod memory;
pub mod serializer;
pub mod store;

pub use actions::PreferenceActions;
pub use error::PrefsError;
pub use prefs_macros::{pref, preferences};
pub use store::{Context, Editor, OnChangeListener, SharedPreferences, StoreMode};
