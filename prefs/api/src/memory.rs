//! In-memory preference store.
//!
//! [`MemoryPreferences`] implements the store boundary with a map guarded by a
//! lock, and [`MemoryContext`] hands out one store per name. Both are meant for
//! tests and for hosts that have no platform store of their own; nothing is
//! persisted.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use crate::store::{Context, Editor, OnChangeListener, SharedPreferences, StoreMode};

/// Name of the store returned by [`Context::default_shared_preferences`].
pub const DEFAULT_STORE_NAME: &str = "default";

/// A value held by [`MemoryPreferences`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    String(String),
    StringSet(HashSet<String>),
}

#[derive(Debug, Clone)]
enum Change {
    Put(String, StoredValue),
    Remove(String),
}

/// A preference store kept entirely in memory.
#[derive(Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, StoredValue>>,
    listeners: Mutex<Vec<Arc<dyn OnChangeListener>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the value stored under `key`.
    pub fn value(&self, key: &str) -> Option<StoredValue> {
        self.read().get(key).cloned()
    }

    /// Returns the stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, StoredValue>> {
        self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn typed<T>(&self, key: &str, default: T, pick: impl FnOnce(&StoredValue) -> Option<T>) -> T {
        match self.read().get(key) {
            Some(stored) => pick(stored).unwrap_or_else(|| {
                debug!(key, "stored value has a different kind, using default");
                default
            }),
            None => default,
        }
    }

    fn publish(&self, clear: bool, changes: Vec<Change>) {
        let mut changed: Vec<String> = Vec::new();
        {
            let mut values = self
                .values
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            if clear {
                changed.extend(values.drain().map(|(key, _)| key));
            }

            for change in changes {
                match change {
                    Change::Put(key, value) => {
                        if values.get(&key) != Some(&value) {
                            values.insert(key.clone(), value);
                            changed.push(key);
                        }
                    }
                    Change::Remove(key) => {
                        if values.remove(&key).is_some() {
                            changed.push(key);
                        }
                    }
                }
            }
        }

        changed.sort();
        changed.dedup();
        if changed.is_empty() {
            return;
        }

        let listeners: Vec<Arc<dyn OnChangeListener>> = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for key in &changed {
            for listener in &listeners {
                listener.on_shared_preference_changed(self, key);
            }
        }
    }
}

impl SharedPreferences for MemoryPreferences {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.typed(key, default, |v| match v {
            StoredValue::Bool(b) => Some(*b),
            _ => None,
        })
    }

    fn get_i32(&self, key: &str, default: i32) -> i32 {
        self.typed(key, default, |v| match v {
            StoredValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.typed(key, default, |v| match v {
            StoredValue::Long(l) => Some(*l),
            _ => None,
        })
    }

    fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.typed(key, default, |v| match v {
            StoredValue::Float(f) => Some(*f),
            _ => None,
        })
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.read().get(key) {
            Some(StoredValue::String(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    fn get_string_set(&self, key: &str, default: HashSet<String>) -> HashSet<String> {
        match self.read().get(key) {
            Some(StoredValue::StringSet(set)) => set.clone(),
            _ => default,
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    fn edit(&self) -> Box<dyn Editor + '_> {
        Box::new(MemoryEditor {
            store: self,
            clear: false,
            changes: Vec::new(),
        })
    }

    fn register_on_change_listener(&self, listener: Arc<dyn OnChangeListener>) {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    fn unregister_on_change_listener(&self, listener: &Arc<dyn OnChangeListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|l| !Arc::ptr_eq(l, listener));
    }
}

struct MemoryEditor<'a> {
    store: &'a MemoryPreferences,
    clear: bool,
    changes: Vec<Change>,
}

impl MemoryEditor<'_> {
    fn put(&mut self, key: &str, value: StoredValue) {
        self.changes.push(Change::Put(key.to_string(), value));
    }
}

impl Editor for MemoryEditor<'_> {
    fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, StoredValue::Bool(value));
    }

    fn put_i32(&mut self, key: &str, value: i32) {
        self.put(key, StoredValue::Int(value));
    }

    fn put_i64(&mut self, key: &str, value: i64) {
        self.put(key, StoredValue::Long(value));
    }

    fn put_f32(&mut self, key: &str, value: f32) {
        self.put(key, StoredValue::Float(value));
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.put(key, StoredValue::String(value.to_string()));
    }

    fn put_string_set(&mut self, key: &str, value: HashSet<String>) {
        self.put(key, StoredValue::StringSet(value));
    }

    fn remove(&mut self, key: &str) {
        self.changes.push(Change::Remove(key.to_string()));
    }

    fn clear(&mut self) {
        self.clear = true;
    }

    fn apply(self: Box<Self>) {
        self.store.publish(self.clear, self.changes);
    }

    fn commit(self: Box<Self>) -> bool {
        self.store.publish(self.clear, self.changes);
        true
    }
}

/// A [`Context`] that hands out one [`MemoryPreferences`] per store name.
#[derive(Default)]
pub struct MemoryContext {
    stores: Mutex<HashMap<String, (StoreMode, Arc<MemoryPreferences>)>>,
}

impl MemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the store opened under `name`, if any.
    pub fn store(&self, name: &str) -> Option<Arc<MemoryPreferences>> {
        self.lock().get(name).map(|(_, store)| Arc::clone(store))
    }

    /// Returns the mode the store called `name` was first opened with.
    pub fn mode(&self, name: &str) -> Option<StoreMode> {
        self.lock().get(name).map(|(mode, _)| *mode)
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<String, (StoreMode, Arc<MemoryPreferences>)>> {
        self.stores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn open(&self, name: &str, mode: StoreMode) -> Arc<MemoryPreferences> {
        let mut stores = self.lock();
        let (_, store) = stores.entry(name.to_string()).or_insert_with(|| {
            debug!(name, %mode, "opening in-memory store");
            (mode, Arc::new(MemoryPreferences::new()))
        });
        Arc::clone(store)
    }
}

impl Context for MemoryContext {
    fn shared_preferences(&self, name: &str, mode: StoreMode) -> Arc<dyn SharedPreferences> {
        self.open(name, mode)
    }

    fn default_shared_preferences(&self) -> Arc<dyn SharedPreferences> {
        self.open(DEFAULT_STORE_NAME, StoreMode::Private)
    }
}
