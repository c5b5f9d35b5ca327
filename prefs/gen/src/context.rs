//! Per-root generation state.
//!
//! A [`GenerationContext`] is created fresh for every root trait and dropped
//! after its unit is written, so keys and imports never leak from one root
//! into another.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::classifier::{AccessorSpec, Role};
use crate::diagnostics::{Diagnostic, Warning};
use crate::errors::GeneratorError;

/// Accessor specs keyed by storage key, in registration order.
#[derive(Debug, Default, Clone)]
pub struct KeyMap {
    entries: Vec<AccessorSpec>,
    index: HashMap<String, usize>,
}

impl KeyMap {
    pub fn get(&self, key: &str) -> Option<&AccessorSpec> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|spec| spec.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessorSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `spec`, or returns the spec already holding its key.
    fn insert(&mut self, spec: AccessorSpec) -> Result<(), &AccessorSpec> {
        if let Some(&existing) = self.index.get(&spec.key) {
            return Err(&self.entries[existing]);
        }
        self.index.insert(spec.key.clone(), self.entries.len());
        self.entries.push(spec);
        Ok(())
    }
}

/// The getter and putter keys of one root hierarchy.
#[derive(Debug, Default, Clone)]
pub struct KeySpace {
    getter_keys: KeyMap,
    putter_keys: KeyMap,
}

impl KeySpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the key of `spec` under its role.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::DuplicateKey`], attributed to `spec`, if the
    /// key is already registered in the same role.
    pub fn register(&mut self, spec: &AccessorSpec) -> Result<(), GeneratorError> {
        let map = match spec.role {
            Role::Getter => &mut self.getter_keys,
            Role::Putter => &mut self.putter_keys,
        };
        map.insert(spec.clone())
            .map_err(|first| GeneratorError::DuplicateKey {
                key: spec.key.clone(),
                role: spec.role,
                first: first.method_name.clone(),
                method: spec.method_name.clone(),
                at: spec.attribution(),
            })
    }

    pub fn getter_keys(&self) -> &KeyMap {
        &self.getter_keys
    }

    pub fn putter_keys(&self) -> &KeyMap {
        &self.putter_keys
    }

    pub fn keys(&self, role: Role) -> &KeyMap {
        match role {
            Role::Getter => &self.getter_keys,
            Role::Putter => &self.putter_keys,
        }
    }

    /// Every key with at least one accessor: getter keys in registration
    /// order, then putter-only keys.
    pub fn defined_keys(&self) -> Vec<&str> {
        self.getter_keys
            .keys()
            .chain(
                self.putter_keys
                    .keys()
                    .filter(|key| !self.getter_keys.contains(key)),
            )
            .collect()
    }

    /// Getter/putter pairs sharing a key, in getter order.
    pub fn pairs(&self) -> impl Iterator<Item = (&AccessorSpec, &AccessorSpec)> {
        self.getter_keys
            .iter()
            .filter_map(|getter| self.putter_keys.get(&getter.key).map(|putter| (getter, putter)))
    }

    pub fn is_empty(&self) -> bool {
        self.getter_keys.is_empty() && self.putter_keys.is_empty()
    }
}

/// Everything collected while processing one root trait.
#[derive(Debug, Default)]
pub struct GenerationContext {
    /// Qualified name of the root trait.
    pub root: String,
    pub keys: KeySpace,
    /// Imports beyond the core set, added only when generated code uses them.
    pub imports: BTreeSet<String>,
    /// Interfaces already walked. Each is visited at most once per root.
    pub visited: HashSet<String>,
    /// Traversed interfaces in traversal order.
    pub interfaces: Vec<String>,
    /// Successfully classified accessors in traversal order.
    pub specs: Vec<AccessorSpec>,
    pub errors: Vec<GeneratorError>,
    pub warnings: Vec<Warning>,
}

impl GenerationContext {
    pub fn new(root: &str) -> Self {
        GenerationContext {
            root: root.to_string(),
            ..Default::default()
        }
    }

    /// Marks `interface` as visited. Returns false if it already was.
    pub fn visit(&mut self, interface: &str) -> bool {
        if !self.visited.insert(interface.to_string()) {
            return false;
        }
        self.interfaces.push(interface.to_string());
        true
    }

    pub fn require_import(&mut self, path: &str) {
        self.imports.insert(path.to_string());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors first, then warnings, each in the order they were found.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(Diagnostic::from)
            .chain(self.warnings.iter().map(Diagnostic::from))
            .collect()
    }
}
