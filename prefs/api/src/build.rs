//! Platform level query.
//!
//! Generated code consults [`sdk_int`] before calling store methods that only
//! exist on newer platform levels. Hosts report their level once at startup
//! with [`set_sdk_int`]; until then the level is [`CURRENT`].

use std::sync::atomic::{AtomicU32, Ordering};

/// First level with asynchronous `apply` on editors.
pub const GINGERBREAD: u32 = 9;

/// First level with native string-set values.
pub const HONEYCOMB: u32 = 11;

/// Level assumed when the host never reports one.
pub const CURRENT: u32 = 34;

static SDK_INT: AtomicU32 = AtomicU32::new(CURRENT);

/// Returns the platform level the host reported.
pub fn sdk_int() -> u32 {
    SDK_INT.load(Ordering::Relaxed)
}

/// Records the platform level of the running host.
pub fn set_sdk_int(level: u32) {
    tracing::debug!(level, "platform level set");
    SDK_INT.store(level, Ordering::Relaxed);
}
