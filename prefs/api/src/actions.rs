//! The fixed accessor contract.

use std::sync::Arc;

use crate::store::{OnChangeListener, SharedPreferences};

/// Actions shared by every generated implementation.
///
/// These work on the underlying store directly and are emitted the same way
/// for every interface, independent of the accessors it declares.
pub trait PreferenceActions {
    /// Returns the underlying store.
    fn get(&self) -> &dyn SharedPreferences;

    /// Returns true if a value exists for `key`.
    fn contains(&self, key: &str) -> bool;

    /// Removes the value stored under `key`.
    fn remove(&self, key: &str);

    /// Registers a callback invoked whenever a value in the store changes.
    fn register_on_change_listener(&self, listener: Arc<dyn OnChangeListener>);

    /// Unregisters a callback previously passed to
    /// [`register_on_change_listener`](Self::register_on_change_listener).
    fn unregister_on_change_listener(&self, listener: &Arc<dyn OnChangeListener>);

    /// Clears the complete store.
    ///
    /// This removes every value under the store's name, not only the ones the
    /// interface defines.
    fn clear(&self);

    /// Removes only the keys defined by this interface and its ancestors.
    fn clear_defined(&self);

    /// Writes every key that has both a getter and a putter with its current
    /// value, materializing implicit and explicit defaults in the store.
    fn init_defaults(&self);
}
