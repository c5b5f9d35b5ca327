//! Test: a bare annotation on a trait with supertraits compiles.

use prefs_macros::preferences;

pub trait Base {
    fn theme(&self) -> String;
}

#[preferences]
pub trait Settings: Base + Send + Sync {
    fn enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
}

fn main() {}
