use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

/// Monotonic time source, nanosecond resolution.
///
/// Readings are only meaningful relative to each other; the scheduler pins
/// its own origin on the first reading it sees.
pub trait Clock {
    fn now(&self) -> u64;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    boot: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { boot: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> u64 {
        // u64 nanoseconds cover ~584 years of uptime.
        self.boot.elapsed().as_nanos() as u64
    }
}

/// Hand-driven clock for replays and tests.
///
/// Clones share the same reading, so a test can keep one handle while the
/// loop owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_nanos: u64) -> Self {
        Self { nanos: Arc::new(AtomicU64::new(start_nanos)) }
    }

    #[inline]
    pub fn set(&self, nanos: u64) {
        self.nanos.store(nanos, Ordering::Relaxed);
    }

    #[inline]
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> u64 {
        self.nanos.load(Ordering::Relaxed)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> u64 {
        (**self).now()
    }
}
