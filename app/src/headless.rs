use std::{
    thread,
    time::{Duration, Instant},
};

use game2d_core::render::{Rect, RenderResult, RenderSink, Rgba};
use log::trace;

/// Render sink without a window. Draw commands go to the `trace` log, and
/// `present` optionally sleeps to imitate a display refresh.
pub struct HeadlessRenderer {
    frame_interval: Option<Duration>,
    next_present: Option<Instant>,

    frames: u64,
    last_rect: Option<Rect>,
}

impl HeadlessRenderer {
    /// `vsync_hz == 0` presents as fast as the loop runs.
    pub fn new(vsync_hz: u32) -> Self {
        let frame_interval =
            (vsync_hz > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(vsync_hz)));
        Self {
            frame_interval,
            next_present: None,
            frames: 0,
            last_rect: None,
        }
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn last_rect(&self) -> Option<Rect> {
        self.last_rect
    }

    fn pace(&mut self) {
        let Some(interval) = self.frame_interval else { return };

        let now = Instant::now();
        let deadline = self.next_present.unwrap_or(now);
        if deadline > now {
            thread::sleep(deadline - now);
        }
        // Fell behind by more than a refresh: resync instead of bursting.
        let next = deadline + interval;
        self.next_present = Some(if next < now { now + interval } else { next });
    }
}

impl RenderSink for HeadlessRenderer {
    fn clear(&mut self, color: Rgba) -> RenderResult<()> {
        trace!("frame {} clear rgba{:?}", self.frames + 1, <[u8; 4]>::from(color));
        self.last_rect = None;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> RenderResult<()> {
        trace!(
            "frame {} fill ({}, {}) {}x{} rgba{:?}",
            self.frames + 1,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            <[u8; 4]>::from(color)
        );
        self.last_rect = Some(rect);
        Ok(())
    }

    fn present(&mut self) -> RenderResult<()> {
        self.pace();
        self.frames += 1;
        Ok(())
    }
}
