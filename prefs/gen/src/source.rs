//! Declaration source: discovers trait declarations in a source tree.
//!
//! Every trait in the scanned files becomes an [`InterfaceDecl`], whether or
//! not it is annotated. Annotated traits are generation roots; the rest are
//! candidates for in-source ancestor resolution.
//!
//! Module paths follow Cargo's conventions relative to the source root:
//! `lib.rs` and `main.rs` are the crate root, `a/mod.rs` and `a.rs` are module
//! `a`, and inline `mod` blocks nest further.

use std::collections::HashMap;
use std::path::Path;

use syn::{Item, UseTree};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::errors::GeneratorError;
use crate::model::InterfaceDecl;
use crate::parser;

/// Directories never scanned for declarations.
const EXCLUDED_DIRS: &[&str] = &["target", ".git"];

/// The immutable snapshot of declarations for one generation run.
#[derive(Debug, Default, Clone)]
pub struct DeclarationSet {
    interfaces: Vec<InterfaceDecl>,
    index: HashMap<String, usize>,
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans every `*.rs` file below `root`.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ReadError`] if `root` or a file cannot be
    /// read, and [`GeneratorError::ParseError`] if a file is not valid Rust.
    pub fn from_dir(root: &Path) -> Result<Self, GeneratorError> {
        if !root.is_dir() {
            return Err(GeneratorError::ReadError {
                path: root.display().to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "source directory does not exist",
                ),
            });
        }

        let mut set = DeclarationSet::new();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_excluded_dir(e))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!("Failed to read directory entry: {}", err);
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "rs") {
                continue;
            }

            let content =
                std::fs::read_to_string(path).map_err(|source| GeneratorError::ReadError {
                    path: path.display().to_string(),
                    source,
                })?;
            set.add_source(&module_path_for(root, path), Some(path), &content)?;
        }

        debug!(count = set.len(), root = %root.display(), "discovered trait declarations");
        Ok(set)
    }

    /// Adds the traits of one file whose items live in `module_path`.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ParseError`] if `content` is not valid Rust.
    /// Malformed attributes are recorded on their trait instead.
    pub fn add_source(
        &mut self,
        module_path: &[String],
        file: Option<&Path>,
        content: &str,
    ) -> Result<(), GeneratorError> {
        let display = file
            .map(|f| f.display().to_string())
            .unwrap_or_else(|| format!("crate::{}", module_path.join("::")));
        let parsed = syn::parse_file(content).map_err(|e| GeneratorError::ParseError {
            path: display,
            message: e.to_string(),
        })?;
        self.add_items(&parsed.items, module_path.to_vec(), file);
        Ok(())
    }

    fn add_items(&mut self, items: &[Item], module: Vec<String>, file: Option<&Path>) {
        let scope = UseScope::from_items(items, module.clone());

        for item in items {
            match item {
                Item::Trait(item) => {
                    let qualified = qualify(&module, &item.ident.to_string());
                    let decl = parser::interface_decl(item, &qualified, file, &|written: &str| {
                        scope.resolve(written)
                    });
                    if !decl.attribute_issues.is_empty() {
                        warn!(
                            interface = %decl.qualified_name,
                            issues = decl.attribute_issues.len(),
                            "malformed preference attributes"
                        );
                    }
                    self.insert(decl);
                }
                Item::Mod(item) => {
                    if let Some((_, content)) = &item.content {
                        let mut nested = module.clone();
                        nested.push(item.ident.to_string());
                        self.add_items(content, nested, file);
                    }
                }
                _ => {}
            }
        }
    }

    /// Adds a declaration. The first declaration of a qualified name wins.
    pub fn insert(&mut self, decl: InterfaceDecl) {
        if self.index.contains_key(&decl.qualified_name) {
            warn!(
                interface = %decl.qualified_name,
                "ignoring repeated declaration of the same trait"
            );
            return;
        }
        self.index
            .insert(decl.qualified_name.clone(), self.interfaces.len());
        self.interfaces.push(decl);
    }

    pub fn get(&self, qualified_name: &str) -> Option<&InterfaceDecl> {
        self.index
            .get(qualified_name)
            .map(|&i| &self.interfaces[i])
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.index.contains_key(qualified_name)
    }

    /// Traits annotated with `#[preferences]`, in discovery order.
    pub fn roots(&self) -> impl Iterator<Item = &InterfaceDecl> {
        self.interfaces.iter().filter(|decl| decl.is_root())
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceDecl> {
        self.interfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

/// Module path of `file` relative to the source `root`.
pub fn module_path_for(root: &Path, file: &Path) -> Vec<String> {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut segments: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let is_crate_root = segments.is_empty() && (stem == "lib" || stem == "main");
    if stem != "mod" && !is_crate_root {
        segments.push(stem);
    }
    segments
}

fn qualify(module: &[String], name: &str) -> String {
    let mut segments = vec!["crate".to_string()];
    segments.extend(module.iter().cloned());
    segments.push(name.to_string());
    segments.join("::")
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

/// The `use` declarations visible in one module.
#[derive(Debug, Default)]
struct UseScope {
    module: Vec<String>,
    aliases: HashMap<String, Vec<String>>,
    globs: Vec<Vec<String>>,
}

impl UseScope {
    fn from_items(items: &[Item], module: Vec<String>) -> Self {
        let mut scope = UseScope {
            module,
            ..Default::default()
        };
        for item in items {
            if let Item::Use(item) = item {
                scope.collect(&item.tree, &mut Vec::new());
            }
        }
        scope
    }

    fn collect(&mut self, tree: &UseTree, prefix: &mut Vec<String>) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.collect(&path.tree, prefix);
                prefix.pop();
            }
            UseTree::Name(name) => {
                let ident = name.ident.to_string();
                if ident == "self" {
                    if let Some(last) = prefix.last() {
                        self.aliases.insert(last.clone(), prefix.clone());
                    }
                } else {
                    let mut full = prefix.clone();
                    full.push(ident.clone());
                    self.aliases.insert(ident, full);
                }
            }
            UseTree::Rename(rename) => {
                let mut full = prefix.clone();
                if rename.ident != "self" {
                    full.push(rename.ident.to_string());
                }
                self.aliases.insert(rename.rename.to_string(), full);
            }
            UseTree::Glob(_) => self.globs.push(prefix.clone()),
            UseTree::Group(group) => {
                for tree in &group.items {
                    self.collect(tree, prefix);
                }
            }
        }
    }

    /// Candidate qualified names for a supertrait path, most likely first.
    fn resolve(&self, written: &str) -> Vec<String> {
        let segments: Vec<String> = written.split("::").map(String::from).collect();
        let mut candidates: Vec<Vec<String>> = Vec::new();

        match segments.first().map(String::as_str) {
            Some("crate" | "self" | "super") => candidates.push(self.absolutize(&segments)),
            Some(first) => {
                if let Some(target) = self.aliases.get(first) {
                    let mut full = target.clone();
                    full.extend(segments[1..].iter().cloned());
                    candidates.extend(self.anchored(&full));
                } else if segments.len() == 1 {
                    candidates.push(self.in_module(&segments));
                    for glob in &self.globs {
                        let mut full = glob.clone();
                        full.extend(segments.iter().cloned());
                        candidates.extend(self.anchored(&full));
                    }
                } else {
                    candidates.extend(self.anchored(&segments));
                }
            }
            None => {}
        }

        let mut names: Vec<String> = Vec::new();
        for candidate in candidates {
            let name = candidate.join("::");
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Absolute forms of a path: itself when anchored at `crate`, `self` or
    /// `super`, otherwise relative to this module and then as an external
    /// crate path.
    fn anchored(&self, segments: &[String]) -> Vec<Vec<String>> {
        match segments.first().map(String::as_str) {
            Some("crate" | "self" | "super") => vec![self.absolutize(segments)],
            _ => vec![self.in_module(segments), segments.to_vec()],
        }
    }

    fn in_module(&self, segments: &[String]) -> Vec<String> {
        let mut full = vec!["crate".to_string()];
        full.extend(self.module.iter().cloned());
        full.extend(segments.iter().cloned());
        full
    }

    fn absolutize(&self, segments: &[String]) -> Vec<String> {
        match segments.first().map(String::as_str) {
            Some("self") => self.in_module(&segments[1..]),
            Some("super") => {
                let mut base = self.module.clone();
                let mut rest = segments;
                while rest.first().is_some_and(|s| s == "super") {
                    base.pop();
                    rest = &rest[1..];
                }
                let mut full = vec!["crate".to_string()];
                full.extend(base);
                full.extend(rest.iter().cloned());
                full
            }
            _ => segments.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn module(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    fn scope(source: &str, at: &[&str]) -> UseScope {
        let file = syn::parse_file(source).unwrap();
        UseScope::from_items(&file.items, module(at))
    }

    #[test]
    fn module_paths_follow_cargo_layout() {
        let root = Path::new("src");
        assert!(module_path_for(root, Path::new("src/lib.rs")).is_empty());
        assert!(module_path_for(root, Path::new("src/main.rs")).is_empty());
        assert_eq!(module_path_for(root, Path::new("src/settings.rs")), module(&["settings"]));
        assert_eq!(
            module_path_for(root, Path::new("src/app/mod.rs")),
            module(&["app"])
        );
        assert_eq!(
            module_path_for(root, Path::new("src/app/theme.rs")),
            module(&["app", "theme"])
        );
        assert_eq!(
            module_path_for(root, Path::new("src/app/lib.rs")),
            module(&["app", "lib"])
        );
    }

    #[test]
    fn resolves_use_aliases() {
        let scope = scope(
            "use crate::theme::ThemePreferences; use prefs_api::common::SyncPreferences as Sync2;",
            &["settings"],
        );
        assert_eq!(scope.resolve("ThemePreferences"), vec!["crate::theme::ThemePreferences"]);
        assert_eq!(
            scope.resolve("Sync2"),
            vec![
                "crate::settings::prefs_api::common::SyncPreferences",
                "prefs_api::common::SyncPreferences"
            ]
        );
    }

    #[test]
    fn resolves_same_module_then_globs() {
        let scope = scope("use super::*; use prefs_api::common::*;", &["app", "settings"]);
        assert_eq!(
            scope.resolve("Base"),
            vec![
                "crate::app::settings::Base",
                "crate::app::Base",
                "crate::app::settings::prefs_api::common::Base",
                "prefs_api::common::Base",
            ]
        );
    }

    #[test]
    fn resolves_anchored_paths() {
        let scope = scope("", &["app", "settings"]);
        assert_eq!(scope.resolve("super::Base"), vec!["crate::app::Base"]);
        assert_eq!(scope.resolve("self::Base"), vec!["crate::app::settings::Base"]);
        assert_eq!(scope.resolve("crate::Base"), vec!["crate::Base"]);
        assert_eq!(
            scope.resolve("prefs_api::common::ThemePreferences"),
            vec![
                "crate::app::settings::prefs_api::common::ThemePreferences",
                "prefs_api::common::ThemePreferences"
            ]
        );
    }

    #[test]
    fn resolves_grouped_and_module_imports() {
        let scope = scope("use prefs_api::{common, PreferenceActions};", &[]);
        assert_eq!(
            scope.resolve("common::ThemePreferences"),
            vec![
                "crate::prefs_api::common::ThemePreferences",
                "prefs_api::common::ThemePreferences"
            ]
        );
        assert_eq!(
            scope.resolve("PreferenceActions"),
            vec!["crate::prefs_api::PreferenceActions", "prefs_api::PreferenceActions"]
        );
    }

    #[test]
    fn add_source_collects_nested_modules() {
        let mut set = DeclarationSet::new();
        set.add_source(
            &module(&["app"]),
            None,
            r#"
                #[preferences(name = "app")]
                pub trait Settings: Base {
                    fn volume(&self) -> i32;
                }

                pub mod base {
                    pub trait Base {}
                }
                use base::Base;
            "#,
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        let root = set.get("crate::app::Settings").unwrap();
        assert!(root.is_root());
        assert_eq!(
            root.ancestors[0].candidates.first().map(String::as_str),
            Some("crate::app::base::Base")
        );
        assert!(set.contains("crate::app::base::Base"));
        assert_eq!(set.roots().count(), 1);
    }

    #[test]
    fn add_source_reports_parse_errors() {
        let mut set = DeclarationSet::new();
        let err = set.add_source(&[], None, "pub trait {").unwrap_err();
        assert!(matches!(err, GeneratorError::ParseError { .. }));
    }

    #[test]
    fn malformed_attributes_stay_on_their_trait() {
        let mut set = DeclarationSet::new();
        set.add_source(
            &[],
            None,
            r#"
                #[preferences]
                pub trait Bad {
                    #[pref(colour = "red")]
                    fn theme(&self) -> String;
                }

                #[preferences]
                pub trait Good {
                    fn volume(&self) -> i32;
                }
            "#,
        )
        .unwrap();

        assert_eq!(set.roots().count(), 2);
        assert_eq!(set.get("crate::Bad").unwrap().attribute_issues.len(), 1);
        assert!(set.get("crate::Good").unwrap().attribute_issues.is_empty());
    }

    #[test]
    fn from_dir_scans_tree_and_skips_target() {
        let dir = TempDir::new().unwrap();
        let src = dir.path();
        std::fs::create_dir_all(src.join("app")).unwrap();
        std::fs::create_dir_all(src.join("target")).unwrap();
        std::fs::write(src.join("lib.rs"), "pub trait Root {}").unwrap();
        std::fs::write(src.join("app/mod.rs"), "pub trait App {}").unwrap();
        std::fs::write(src.join("app/theme.rs"), "pub trait Theme {}").unwrap();
        std::fs::write(src.join("target/junk.rs"), "pub trait Junk {}").unwrap();
        std::fs::write(src.join("notes.txt"), "not rust").unwrap();

        let set = DeclarationSet::from_dir(src).unwrap();
        assert!(set.contains("crate::Root"));
        assert!(set.contains("crate::app::App"));
        assert!(set.contains("crate::app::theme::Theme"));
        assert!(!set.contains("crate::target::junk::Junk"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn from_dir_requires_existing_directory() {
        let err = DeclarationSet::from_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, GeneratorError::ReadError { .. }));
    }

    #[test]
    fn first_declaration_wins() {
        let mut set = DeclarationSet::new();
        let mut first = InterfaceDecl::new("crate::Settings");
        first.methods.push(crate::model::MethodDecl::new(
            "volume",
            vec![],
            crate::model::TypeRef::named("i32"),
        ));
        set.insert(first);
        set.insert(InterfaceDecl::new("crate::Settings"));
        assert_eq!(set.get("crate::Settings").unwrap().methods.len(), 1);
    }
}
