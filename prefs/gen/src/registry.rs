//! Static registry of external trait signatures.
//!
//! Traits defined outside the scanned source tree (in dependencies) cannot be
//! parsed, so their signatures are described ahead of time in TOML manifests.
//! A manifest lists each trait with its supertraits and methods:
//!
//! ```toml
//! [[interface]]
//! name = "prefs_api::common::ThemePreferences"
//! extends = []
//!
//! [[interface.method]]
//! name = "set_theme"
//! params = [{ name = "theme", type = "String" }]
//! ```
//!
//! Manifest methods carry signatures only: no key overrides and no explicit
//! defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::errors::GeneratorError;
use crate::model::{MethodDecl, Param, TypeRef};
use crate::parser::parse_type;

/// The manifest bundled with the generator, describing `prefs_api::common`.
pub const BUNDLED_MANIFEST: &str = include_str!("../manifest/external.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    interface: Vec<ManifestInterface>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestInterface {
    name: String,
    #[serde(default)]
    extends: Vec<String>,
    #[serde(default)]
    method: Vec<ManifestMethod>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestMethod {
    name: String,
    #[serde(default)]
    returns: Option<String>,
    #[serde(default)]
    params: Vec<ManifestParam>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestParam {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

/// Signatures of one external trait.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalInterface {
    pub qualified_name: String,
    /// Fully qualified supertrait names.
    pub extends: Vec<String>,
    /// `&self` methods without `#[pref]` metadata.
    pub methods: Vec<MethodDecl>,
}

/// External trait signatures keyed by qualified name.
#[derive(Debug, Default, Clone)]
pub struct ExternalRegistry {
    interfaces: BTreeMap<String, ExternalInterface>,
}

impl ExternalRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the bundled manifest.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ManifestError`] if the bundled manifest is
    /// malformed.
    pub fn bundled() -> Result<Self, GeneratorError> {
        let mut registry = Self::new();
        registry.load_str(BUNDLED_MANIFEST, "<bundled>")?;
        Ok(registry)
    }

    /// Loads a manifest file. Entries override earlier ones with the same name.
    ///
    /// Returns the number of interfaces loaded.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ReadError`] if the file cannot be read and
    /// [`GeneratorError::ManifestError`] if it is malformed.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, GeneratorError> {
        let content = std::fs::read_to_string(path).map_err(|source| GeneratorError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        self.load_str(&content, &path.display().to_string())
    }

    /// Loads manifest content. `origin` names the manifest in errors.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ManifestError`] for invalid TOML, unknown
    /// fields or types that are not valid Rust.
    pub fn load_str(&mut self, content: &str, origin: &str) -> Result<usize, GeneratorError> {
        let manifest_error = |message: String| GeneratorError::ManifestError {
            path: origin.to_string(),
            message,
        };

        let manifest: Manifest = toml::from_str(content).map_err(|e| manifest_error(e.to_string()))?;

        let count = manifest.interface.len();
        for interface in manifest.interface {
            let mut methods = Vec::with_capacity(interface.method.len());
            for method in &interface.method {
                let ty = |source: &str| {
                    parse_type(source).map_err(|e| {
                        manifest_error(format!(
                            "{}::{}: invalid type `{}`: {}",
                            interface.name, method.name, source, e
                        ))
                    })
                };
                let returns = match &method.returns {
                    Some(returns) => ty(returns)?,
                    None => TypeRef::Unit,
                };
                let params = method
                    .params
                    .iter()
                    .map(|p| {
                        Ok(Param {
                            name: p.name.clone(),
                            ty: ty(&p.ty)?,
                        })
                    })
                    .collect::<Result<Vec<_>, GeneratorError>>()?;
                methods.push(MethodDecl::new(&method.name, params, returns));
            }

            debug!(interface = %interface.name, origin, "registered external interface");
            self.insert(ExternalInterface {
                qualified_name: interface.name,
                extends: interface.extends,
                methods,
            });
        }

        Ok(count)
    }

    pub fn insert(&mut self, interface: ExternalInterface) {
        self.interfaces
            .insert(interface.qualified_name.clone(), interface);
    }

    pub fn get(&self, qualified_name: &str) -> Option<&ExternalInterface> {
        self.interfaces.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.interfaces.contains_key(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}
