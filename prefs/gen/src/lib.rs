//! Preference accessor generator library.
//!
//! This crate reads Rust traits annotated with `#[preferences]` and generates
//! implementation structs that read and write a key-value preference store
//! through the `prefs-api` runtime contract. For a trait declaring
//!
//! ```ignore
//! #[preferences(name = "app")]
//! pub trait Settings: ThemePreferences {
//!     fn username(&self) -> String;
//!     fn set_username(&self, username: String);
//! }
//! ```
//!
//! the generator writes a `SettingsImpl` struct holding the opened store,
//! one method per accessor of `Settings` and every ancestor trait, and the
//! fixed `PreferenceActions` (including `clear_defined` and `init_defaults`).
//!
//! ## Pipeline
//!
//! 1. [`source`] discovers trait declarations in a source tree
//! 2. [`hierarchy`] walks each root's supertraits, resolving ancestors in-source
//!    or through the [`registry`] of external signatures
//! 3. [`classifier`] turns every method into an [`AccessorSpec`] using the
//!    [`key_resolver`] and [`type_mapper`], registering keys in the
//!    [`context::KeySpace`]
//! 4. [`codegen`] assembles the generated unit, and [`output`] validates,
//!    formats and writes it
//! 5. [`consistency`] reports getters without putters and vice versa
//!
//! [`generator::Generator`] drives the pipeline for a whole batch; each root
//! trait is processed independently.
//!
//! ## Modules
//!
//! - [`config`] - `prefs-gen.toml` loading
//! - [`diagnostics`] - attributed errors and warnings
//! - [`errors`] - error types for the generator
//! - [`model`] - the declaration model shared by both resolution strategies
//! - [`naming`] - implementation struct and file naming

pub mod classifier;
pub mod codegen;
pub mod config;
pub mod consistency;
pub mod context;
pub mod diagnostics;
pub mod errors;
pub mod generator;
pub mod hierarchy;
pub mod key_resolver;
pub mod model;
pub mod naming;
pub mod output;
pub mod parser;
pub mod registry;
pub mod source;
pub mod type_mapper;

#[cfg(test)]
pub(crate) mod test_utils;

pub use classifier::{AccessorClassifier, AccessorSpec, Role};
pub use config::GeneratorConfig;
pub use diagnostics::{Attribution, Diagnostic, Severity, Warning};
pub use errors::GeneratorError;
pub use generator::{BatchReport, Generator, UnitReport};
pub use type_mapper::{PrimitiveKind, TypeMapper, ValueKind};
