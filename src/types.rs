//! Shared primitive types, constants, and the clock seam.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub type TimestampMs = u64;

/// Category assigned when a contact has none.
pub const DEFAULT_CATEGORY: &str = "General";

/// Minimum phone length once spaces and hyphens are stripped.
pub const PHONE_MIN_LEN: usize = 7;
/// Maximum phone length once spaces and hyphens are stripped.
pub const PHONE_MAX_LEN: usize = 15;

/// Source of creation and modification timestamps.
pub trait Clock: Send {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> TimestampMs;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        now_ms()
    }
}

pub(crate) fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
