//! `prefs-gen.toml` configuration.
//!
//! ```toml
//! source = "src"
//! output = "src/generated"
//! min_api_level = 8
//! serializer = "prefs_api::serializer"
//! manifests = ["prefs/external.toml"]
//! ```
//!
//! Every key is optional. CLI flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codegen::GenerationTarget;
use crate::errors::GeneratorError;

/// Name of the configuration file picked up from the working directory.
pub const CONFIG_FILE: &str = "prefs-gen.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Source root scanned for `*.rs` files.
    pub source: PathBuf,
    /// Directory receiving the generated units.
    pub output: PathBuf,
    /// Lowest platform level the generated code must run on.
    pub min_api_level: Option<u32>,
    /// Module path of the serializer access point.
    pub serializer: Option<String>,
    /// Additional external signature manifests, loaded after the bundled one.
    pub manifests: Vec<PathBuf>,
    /// Whether to load the bundled `prefs_api::common` manifest.
    pub bundled_manifest: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            source: PathBuf::from("src"),
            output: PathBuf::from("target/prefs-gen"),
            min_api_level: None,
            serializer: None,
            manifests: Vec::new(),
            bundled_manifest: true,
        }
    }
}

impl GeneratorConfig {
    /// Loads a configuration file.
    ///
    /// Relative `source`, `output` and `manifests` paths stay relative to the
    /// working directory, not to the file.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ReadError`] if the file cannot be read and
    /// [`GeneratorError::ConfigError`] if it is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let content = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| GeneratorError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parses configuration from TOML text.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] for malformed TOML, unknown
    /// keys or an empty serializer path.
    pub fn from_toml_str(content: &str) -> Result<Self, GeneratorError> {
        let config: GeneratorConfig =
            toml::from_str(content).map_err(|e| GeneratorError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] if the serializer path is not
    /// a valid Rust path.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if let Some(serializer) = &self.serializer
            && syn::parse_str::<syn::Path>(serializer).is_err()
        {
            return Err(GeneratorError::ConfigError(format!(
                "serializer '{serializer}' is not a module path"
            )));
        }
        Ok(())
    }

    /// The platform settings the generated code is built for.
    pub fn target(&self) -> GenerationTarget {
        GenerationTarget {
            min_api_level: self.min_api_level,
            serializer: self.serializer.clone(),
        }
    }
}
