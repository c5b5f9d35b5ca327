//! The key-value store boundary.
//!
//! These traits describe the platform preference store the generated code
//! reads and writes. The store itself lives outside this crate; hosts provide
//! an implementation (see [`crate::memory`] for an in-memory one).

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// How a named store is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreMode {
    /// Only the owning process may read or write the store.
    #[default]
    Private,
    /// Other processes may read the store.
    MultiProcessReadable,
    /// Other processes may read and write the store.
    MultiProcessWritable,
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreMode::Private => "private",
            StoreMode::MultiProcessReadable => "multi_process_readable",
            StoreMode::MultiProcessWritable => "multi_process_writable",
        };
        f.write_str(name)
    }
}

/// Read access to a preference store.
///
/// Typed getters return `default` when the key is absent or holds a value of
/// another kind.
pub trait SharedPreferences: Send + Sync {
    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn get_i32(&self, key: &str, default: i32) -> i32;

    fn get_i64(&self, key: &str, default: i64) -> i64;

    fn get_f32(&self, key: &str, default: f32) -> f32;

    fn get_string(&self, key: &str, default: &str) -> String;

    /// Reads a set of strings.
    ///
    /// Only available from platform level [`crate::build::HONEYCOMB`]; older
    /// targets go through [`crate::compat`] instead.
    fn get_string_set(&self, key: &str, default: HashSet<String>) -> HashSet<String>;

    /// Returns true if any value is stored under `key`.
    fn contains(&self, key: &str) -> bool;

    /// Starts a batch of modifications.
    ///
    /// Nothing is visible to readers until the editor is applied or committed.
    fn edit(&self) -> Box<dyn Editor + '_>;

    fn register_on_change_listener(&self, listener: Arc<dyn OnChangeListener>);

    /// Removes a listener previously registered with the same `Arc`.
    fn unregister_on_change_listener(&self, listener: &Arc<dyn OnChangeListener>);
}

/// A pending batch of modifications to a store.
///
/// A `clear` in the batch runs before every put and remove, regardless of the
/// order the calls were made in.
pub trait Editor {
    fn put_bool(&mut self, key: &str, value: bool);

    fn put_i32(&mut self, key: &str, value: i32);

    fn put_i64(&mut self, key: &str, value: i64);

    fn put_f32(&mut self, key: &str, value: f32);

    fn put_string(&mut self, key: &str, value: &str);

    fn put_string_set(&mut self, key: &str, value: HashSet<String>);

    fn remove(&mut self, key: &str);

    fn clear(&mut self);

    /// Publishes the batch without waiting for it to be persisted.
    ///
    /// Available from platform level [`crate::build::GINGERBREAD`].
    fn apply(self: Box<Self>);

    /// Publishes the batch and persists it before returning.
    ///
    /// Returns false if persisting failed.
    fn commit(self: Box<Self>) -> bool;
}

/// Callback invoked after a key in a store changed.
pub trait OnChangeListener: Send + Sync {
    fn on_shared_preference_changed(&self, preferences: &dyn SharedPreferences, key: &str);
}

/// The enclosing handle generated constructors receive.
pub trait Context {
    /// Opens the store called `name`.
    fn shared_preferences(&self, name: &str, mode: StoreMode) -> Arc<dyn SharedPreferences>;

    /// Opens the store scoped to the host application.
    fn default_shared_preferences(&self) -> Arc<dyn SharedPreferences>;
}
