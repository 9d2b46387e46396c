use log::info;

/// What the driver observed during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    /// Nanoseconds since the loop started.
    pub now: u64,
    pub elapsed: u64,
    pub steps: u32,
    pub alpha: f64,
    pub tick_index: u64,
}

/// Frame-level observer injected into the driver.
pub trait Diagnostics {
    fn on_frame(&mut self, report: &FrameReport);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    #[inline]
    fn on_frame(&mut self, _report: &FrameReport) {}
}

impl<D: Diagnostics + ?Sized> Diagnostics for Box<D> {
    #[inline]
    fn on_frame(&mut self, report: &FrameReport) {
        (**self).on_frame(report)
    }
}

/// Frames-per-second logger, measured on frame timestamps rather than its
/// own clock so replays report replay time.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    period_nanos: u64,

    window_start: Option<u64>,
    frames: u32,
    steps: u64,

    pub fps: f64,
}

impl FpsCounter {
    pub const MIN_PERIOD_MS: u32 = 250;

    pub fn new(period_ms: u32) -> Self {
        Self {
            period_nanos: u64::from(period_ms.max(Self::MIN_PERIOD_MS)) * 1_000_000,
            window_start: None,
            frames: 0,
            steps: 0,
            fps: 0.0,
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Diagnostics for FpsCounter {
    fn on_frame(&mut self, report: &FrameReport) {
        let start = *self.window_start.get_or_insert(report.now);

        self.frames += 1;
        self.steps += u64::from(report.steps);

        let elapsed = report.now.saturating_sub(start);
        if elapsed < self.period_nanos {
            return;
        }

        let secs = elapsed as f64 / 1e9;
        self.fps = f64::from(self.frames) / secs;

        info!(
            "fps={:.1} steps={} alpha={:.2} tick={}",
            self.fps, self.steps, report.alpha, report.tick_index
        );

        self.frames = 0;
        self.steps = 0;
        self.window_start = Some(report.now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(frame_index: u64, now: u64) -> FrameReport {
        FrameReport { frame_index, now, elapsed: 0, steps: 1, alpha: 0.0, tick_index: frame_index }
    }

    #[test]
    fn fps_updates_once_per_period() {
        let mut fps = FpsCounter::new(1000);
        // 100 Hz for just over a second.
        for i in 0..=100u64 {
            fps.on_frame(&report(i, i * 10_000_000));
        }
        assert!((fps.fps - 101.0).abs() < 1e-9);
        assert_eq!(fps.frames, 0);

        fps.on_frame(&report(101, 1_010_000_000));
        assert_eq!(fps.frames, 1);
    }

    #[test]
    fn period_has_a_floor() {
        let fps = FpsCounter::new(1);
        assert_eq!(fps.period_nanos, 250_000_000);
    }
}
