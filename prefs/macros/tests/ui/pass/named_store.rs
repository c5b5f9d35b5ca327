//! Test: a named store with key overrides and defaults compiles.

use prefs_macros::preferences;

#[preferences(name = "app", mode = "multi_process_readable")]
pub trait Settings {
    #[pref(key = "user_name", default = "guest")]
    fn username(&self) -> String;
    #[pref(key = "user_name")]
    fn set_username(&self, username: String) -> &Self;
    #[pref(default = -1)]
    fn volume(&self) -> i32;
    #[pref(default_expr = "vec![1, 2]")]
    fn recent(&self) -> Vec<i32>;
}

struct Fixed;

impl Settings for Fixed {
    fn username(&self) -> String {
        "guest".to_string()
    }

    fn set_username(&self, _username: String) -> &Self {
        self
    }

    fn volume(&self) -> i32 {
        -1
    }

    fn recent(&self) -> Vec<i32> {
        vec![1, 2]
    }
}

fn main() {
    let fixed = Fixed;
    assert_eq!(fixed.set_username("ada".to_string()).volume(), -1);
    assert_eq!(fixed.recent().len(), 2);
    assert_eq!(fixed.username(), "guest");
}
