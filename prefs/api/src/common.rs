//! Accessor traits shipped with the runtime.
//!
//! Application traits can list these as supertraits. Since they are compiled
//! as part of this crate rather than the application, the generator resolves
//! them through its bundled external manifest: keys and defaults come from
//! the method names and value types alone.

/// Tracks whether the first-run onboarding flow was completed.
pub trait OnboardingPreferences {
    fn onboarding_completed(&self) -> bool;
    fn set_onboarding_completed(&self, completed: bool);
    fn launch_count(&self) -> i32;
    fn set_launch_count(&self, count: i32);
}

/// Stores the selected UI theme.
pub trait ThemePreferences {
    fn theme(&self) -> String;
    fn set_theme(&self, theme: String);
}

/// Remembers when data was last synchronized, in milliseconds since the epoch.
pub trait SyncPreferences {
    fn last_sync_millis(&self) -> i64;
    fn set_last_sync_millis(&self, millis: i64);
}
