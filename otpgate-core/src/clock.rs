//! Clock abstraction
//!
//! Timestamps are nanoseconds since the UNIX epoch. The trait exists so the
//! lifecycle can be tested with deterministic time.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    /// Current time in nanoseconds since the UNIX epoch
    fn now_ns(&self) -> u64;
}

/// Clock backed by the platform wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ns(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

/// Manually driven clock for tests
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct ManualClock {
    now: std::sync::atomic::AtomicU64,
}

#[cfg(any(test, feature = "test-utils"))]
impl ManualClock {
    /// Create a clock pinned at the given timestamp
    pub fn at(now_ns: u64) -> Self {
        ManualClock {
            now: std::sync::atomic::AtomicU64::new(now_ns),
        }
    }

    /// Set the current time
    pub fn set(&self, now_ns: u64) {
        self.now.store(now_ns, std::sync::atomic::Ordering::SeqCst);
    }

    /// Advance the current time
    pub fn advance(&self, delta_ns: u64) {
        self.now
            .fetch_add(delta_ns, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for ManualClock {
    fn now_ns(&self) -> u64 {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now_ns();
        let b = clock.now_ns();
        assert!(b >= a);
        // Sanity: after 2020 in nanoseconds
        assert!(a > 1_577_836_800_000_000_000);
    }

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::at(100);
        assert_eq!(clock.now_ns(), 100);

        clock.advance(50);
        assert_eq!(clock.now_ns(), 150);

        clock.set(10);
        assert_eq!(clock.now_ns(), 10);
    }
}
