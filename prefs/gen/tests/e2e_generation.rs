//! End-to-end tests: generate units into a scratch crate, verify they
//! compile against `prefs-api`, and run the generated accessors over the
//! in-memory store.
//!
//! The cargo-driven tests are slow and ignored by default.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use prefs_gen::{Generator, GeneratorConfig};

const LIB_RS: &str = r#"
use std::collections::HashSet;

use prefs_api::common::ThemePreferences;
use prefs_api::{PreferenceActions, pref, preferences};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub width: u32,
    pub height: u32,
}

pub trait Audio {
    #[pref(default = 50)]
    fn volume(&self) -> i32;
    fn set_volume(&self, volume: i32) -> &Self;
}

#[preferences(name = "app")]
pub trait Settings: Audio + ThemePreferences + PreferenceActions {
    #[pref(default = "guest")]
    fn get_username(&self) -> String;
    fn set_username(&self, username: String);

    fn is_onboarded(&self) -> bool;
    fn put_onboarded(&self, onboarded: bool);

    #[pref(key = "ratio", default = 1)]
    fn scale(&self) -> f32;
    #[pref(key = "ratio")]
    fn set_scale(&self, scale: f32);

    fn last_seen(&self) -> i64;

    fn tags(&self) -> HashSet<String>;
    fn set_tags(&self, tags: HashSet<String>);

    fn window(&self) -> Window;
    fn set_window(&self, window: Window);
}

mod settings_impl;
pub use settings_impl::SettingsImpl;
"#;

/// Integration tests of the scratch crate, run against its generated
/// `SettingsImpl`.
const BEHAVIOR_RS: &str = r#"
use prefs_api::memory::{MemoryContext, StoredValue};
use prefs_api::PreferenceActions;
use prefs_scratch::{Audio, Settings, SettingsImpl};

fn username(value: &str) -> Option<StoredValue> {
    Some(StoredValue::String(value.to_string()))
}

#[test]
fn init_defaults_stores_getter_values_and_is_idempotent() {
    let context = MemoryContext::new();
    let settings = SettingsImpl::new(&context);
    let store = context.store("app").expect("store should be opened");
    assert!(store.is_empty());

    settings.init_defaults();
    assert_eq!(store.value("username"), username("guest"));
    assert_eq!(store.value("volume"), Some(StoredValue::Int(50)));
    assert_eq!(store.value("ratio"), Some(StoredValue::Float(1.0)));
    assert_eq!(store.value("onboarded"), Some(StoredValue::Bool(false)));
    assert!(matches!(store.value("window"), Some(StoredValue::String(_))));
    assert_eq!(store.value("last_seen"), None);
    let keys = store.keys();

    settings.init_defaults();
    assert_eq!(store.value("username"), username("guest"));
    assert_eq!(store.keys(), keys);
}

#[test]
fn init_defaults_keeps_stored_values() {
    let context = MemoryContext::new();
    let settings = SettingsImpl::new(&context);
    settings.set_username("ada".to_string());
    settings.set_volume(7).set_volume(8);

    settings.init_defaults();
    assert_eq!(settings.get_username(), "ada");
    assert_eq!(settings.volume(), 8);
}

#[test]
fn clear_defined_leaves_foreign_keys() {
    let context = MemoryContext::new();
    let settings = SettingsImpl::new(&context);
    settings.init_defaults();
    let mut editor = settings.get().edit();
    editor.put_string("foreign", "kept");
    editor.apply();

    settings.clear_defined();
    let store = context.store("app").expect("store should be opened");
    assert_eq!(store.keys(), vec!["foreign".to_string()]);
    assert_eq!(settings.get_username(), "guest");
    assert!(!settings.contains("username"));
}
"#;

fn api_crate_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../api")
}

/// Writes the scratch crate and generates its units into `src/`.
fn scaffold(dir: &Path, min_api_level: Option<u32>) -> PathBuf {
    let crate_dir = dir.join("scratch");
    let src = crate_dir.join("src");
    fs::create_dir_all(&src).expect("Failed to create scratch crate");
    fs::write(src.join("lib.rs"), LIB_RS).expect("Failed to write lib.rs");
    fs::write(
        crate_dir.join("Cargo.toml"),
        format!(
            r#"[package]
name = "prefs-scratch"
version = "0.1.0"
edition = "2024"

[dependencies]
prefs-api = {{ path = "{}" }}
serde = {{ version = "1.0", features = ["derive"] }}

[workspace]
"#,
            api_crate_path().display()
        ),
    )
    .expect("Failed to write Cargo.toml");

    let config = GeneratorConfig {
        source: src.clone(),
        output: src,
        min_api_level,
        serializer: Some("prefs_api::serializer".to_string()),
        ..GeneratorConfig::default()
    };
    let report = Generator::from_config(config)
        .expect("generator should load")
        .generate_all(false);
    let rendered: Vec<String> = report
        .units
        .iter()
        .flat_map(|u| u.diagnostics.iter().map(|d| d.render()))
        .collect();
    assert!(!report.has_errors(), "generation failed:\n{}", rendered.join("\n"));

    crate_dir
}

fn cargo(crate_dir: &Path, subcommand: &str) {
    let output = Command::new("cargo")
        .args([subcommand, "--manifest-path"])
        .arg(crate_dir.join("Cargo.toml"))
        .output()
        .unwrap_or_else(|e| panic!("Failed to run cargo {subcommand}: {e}"));

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "cargo {} failed on generated code:\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
            subcommand, stdout, stderr
        );
    }
}

#[test]
#[ignore = "slow: compiles generated code"]
fn generated_code_compiles() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let crate_dir = scaffold(temp_dir.path(), None);
    cargo(&crate_dir, "check");
}

#[test]
#[ignore = "slow: compiles generated code"]
fn guarded_code_compiles() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let crate_dir = scaffold(temp_dir.path(), Some(4));
    cargo(&crate_dir, "check");
}

#[test]
#[ignore = "slow: compiles and runs generated code"]
fn generated_code_behaves() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let crate_dir = scaffold(temp_dir.path(), None);
    let tests = crate_dir.join("tests");
    fs::create_dir_all(&tests).expect("Failed to create tests directory");
    fs::write(tests.join("generated_behavior.rs"), BEHAVIOR_RS)
        .expect("Failed to write generated_behavior.rs");
    cargo(&crate_dir, "test");
}

/// Verifies the generated unit exists and has the expected structure.
#[test]
fn generated_unit_has_expected_structure() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let crate_dir = scaffold(temp_dir.path(), None);

    let content = fs::read_to_string(crate_dir.join("src/settings_impl.rs"))
        .expect("Failed to read generated unit");

    assert!(content.contains("use super::*;"));
    assert!(content.contains("use prefs_api::serializer;"));
    assert!(content.contains("pub struct SettingsImpl"));
    assert!(content.contains("context.shared_preferences(\"app\", StoreMode::Private)"));

    // One impl block per traversed trait, in traversal order.
    let settings = content
        .find("impl crate::Settings for SettingsImpl")
        .expect("root impl");
    let audio = content.find("impl crate::Audio for SettingsImpl").expect("Audio impl");
    let theme = content
        .find("impl prefs_api::common::ThemePreferences for SettingsImpl")
        .expect("ThemePreferences impl");
    assert!(settings < audio && audio < theme);

    assert!(content.contains("self.preferences.get_string(\"username\", \"guest\")"));
    assert!(content.contains("self.preferences.get_bool(\"onboarded\", false)"));
    assert!(content.contains("self.preferences.get_f32(\"ratio\", (1 as f32))"));
    assert!(content.contains("self.preferences.get_i32(\"volume\", 50)"));
    assert!(content.contains("serializer::deserialize::<Window>(&raw)"));
    assert!(content.contains("<Self as crate::Settings>::put_onboarded("));
    assert!(content.contains("<Self as crate::Settings>::is_onboarded(self)"));
    assert!(content.contains("<Self as prefs_api::common::ThemePreferences>::set_theme("));
    assert!(!content.contains("set_last_seen"));
}
