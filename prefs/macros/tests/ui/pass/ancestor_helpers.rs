//! Test: `#[pref]` on an inherited trait compiles without `#[preferences]`.

use prefs_macros::{pref, preferences};

pub trait Audio {
    #[pref(default = 50)]
    fn volume(&self) -> i32;
    #[pref(key = "volume")]
    fn put_level(&self, level: i32);
}

#[preferences(name = "app")]
pub trait Settings: Audio {
    #[pref(default = "guest")]
    fn username(&self) -> String;
}

struct Fixed;

impl Audio for Fixed {
    fn volume(&self) -> i32 {
        50
    }

    fn put_level(&self, _level: i32) {}
}

impl Settings for Fixed {
    fn username(&self) -> String {
        "guest".to_string()
    }
}

fn main() {
    assert_eq!(Fixed.volume(), 50);
    assert_eq!(Fixed.username(), "guest");
}
