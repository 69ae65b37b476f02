//! Job id generation.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::JobId;

/// Source of "now" in milliseconds since the Unix epoch.
pub type Clock = fn() -> u64;

/// Wall-clock milliseconds since the Unix epoch.
pub fn system_clock_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

/// Hands out strictly increasing, timestamp-shaped job ids.
///
/// Each id is the current clock reading, or one more than the previous
/// id when the clock has not moved on. Safe to share across tasks.
#[derive(Debug)]
pub struct JobIdGenerator {
    last: AtomicU64,
    clock: Clock,
}

impl JobIdGenerator {
    /// Generator driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(system_clock_millis)
    }

    /// Generator driven by a custom clock.
    pub const fn with_clock(clock: Clock) -> Self {
        Self {
            last: AtomicU64::new(0),
            clock,
        }
    }

    pub fn next_id(&self) -> JobId {
        let now = (self.clock)();
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(prev.saturating_add(1));
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return JobId::new(candidate),
                Err(actual) => prev = actual,
            }
        }
    }
}

impl Default for JobIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
