//! Physical time

use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time source used to stamp snapshots.
pub trait PhysicalTimeEffects: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn physical_time_ms(&self) -> u64;
}

/// System clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl PhysicalTimeEffects for SystemClock {
    #[allow(clippy::disallowed_methods)]
    fn physical_time_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}
