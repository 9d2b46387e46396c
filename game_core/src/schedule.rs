use std::num::NonZeroU64;

use log::warn;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Largest fraction reported while a carried backlog keeps `lag >= step`.
const ALMOST_ONE: f64 = 1.0 - f64::EPSILON;

/// Duration of one simulation tick, in nanoseconds. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStep(NonZeroU64);

impl FixedStep {
    pub const DEFAULT_HZ: u32 = 64;

    pub fn from_nanos(nanos: u64) -> Option<Self> {
        NonZeroU64::new(nanos).map(Self)
    }

    /// `None` for 0 Hz or for rates finer than one nanosecond per tick.
    pub fn from_hz(hz: u32) -> Option<Self> {
        if hz == 0 {
            return None;
        }
        Self::from_nanos(NANOS_PER_SEC / u64::from(hz))
    }

    #[inline]
    pub fn nanos(self) -> u64 {
        self.0.get()
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        // 1/64 s
        Self(NonZeroU64::new(NANOS_PER_SEC / Self::DEFAULT_HZ as u64).unwrap_or(NonZeroU64::MIN))
    }
}

/// Elapsed-time bookkeeping for the fixed-step loop.
///
/// Each frame the driver calls [`tick`](Self::tick) once with a fresh clock
/// reading, then consumes [`drain_steps`](Self::drain_steps), and finally reads
/// [`interpolation_fraction`](Self::interpolation_fraction) for rendering.
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    step: FixedStep,
    max_steps_per_frame: u32,

    origin: Option<u64>,
    last_tick: u64,
    lag: u64,

    tick_index: u64,
    frames: u64,
}

impl FixedStepScheduler {
    pub fn new(step: FixedStep) -> Self {
        Self {
            step,
            max_steps_per_frame: 0,
            origin: None,
            last_tick: 0,
            lag: 0,
            tick_index: 0,
            frames: 0,
        }
    }

    /// Caps how many steps a single drain yields. Lag beyond the cap stays
    /// in the accumulator and is consumed on later frames. 0 = no cap.
    pub fn with_max_steps_per_frame(mut self, max: u32) -> Self {
        self.max_steps_per_frame = max;
        self
    }

    /// Pins the origin. Later readings are measured against it.
    /// Has no effect once an origin is set.
    pub fn start(&mut self, now: u64) {
        if self.origin.is_none() {
            self.origin = Some(now);
        }
    }

    /// Feeds a clock reading and returns the elapsed nanoseconds it added.
    ///
    /// A reading behind the previous one contributes nothing.
    pub fn tick(&mut self, now: u64) -> u64 {
        self.frames += 1;

        let origin = *self.origin.get_or_insert(now);
        let since_origin = now.saturating_sub(origin);

        if since_origin < self.last_tick {
            warn!(
                "clock went backwards by {} ns; treating frame as zero elapsed",
                self.last_tick - since_origin
            );
            return 0;
        }

        let elapsed = since_origin - self.last_tick;
        self.last_tick = since_origin;
        self.lag = self.lag.saturating_add(elapsed);
        elapsed
    }

    /// Catch-up iterator: yields one tick index per whole step of lag.
    pub fn drain_steps(&mut self) -> Steps<'_> {
        Steps { scheduler: self, taken: 0 }
    }

    /// `lag / step`, in `[0, 1)`.
    pub fn interpolation_fraction(&self) -> f64 {
        let alpha = self.lag as f64 / self.step.nanos() as f64;
        alpha.min(ALMOST_ONE)
    }

    /// Whole steps still owed after the last drain (non-zero only when a
    /// per-frame cap is set).
    #[inline]
    pub fn backlog_steps(&self) -> u64 {
        self.lag / self.step.nanos()
    }

    #[inline]
    pub fn step(&self) -> FixedStep {
        self.step
    }

    #[inline]
    pub fn lag(&self) -> u64 {
        self.lag
    }

    #[inline]
    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }

    #[inline]
    pub fn origin(&self) -> Option<u64> {
        self.origin
    }

    /// Total simulation steps yielded so far.
    #[inline]
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

pub struct Steps<'a> {
    scheduler: &'a mut FixedStepScheduler,
    taken: u32,
}

impl Iterator for Steps<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let s = &mut *self.scheduler;

        if s.max_steps_per_frame != 0 && self.taken >= s.max_steps_per_frame {
            return None;
        }

        let step = s.step.nanos();
        if s.lag < step {
            return None;
        }

        s.lag -= step;
        s.tick_index += 1;
        self.taken += 1;
        Some(s.tick_index)
    }
}
