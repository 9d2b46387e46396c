use log::{debug, info};
use thiserror::Error;

use crate::{
    actor::Actor,
    config::{ConfigError, GameConfig},
    frame::{LoopState, RunSummary},
    input::InputSource,
    render::{actor_rect, InterpolationMode, RenderError, RenderSink, Rgba},
    schedule::FixedStepScheduler,
    signals::ExitSignal,
    telemetry::{Diagnostics, FrameReport, NullDiagnostics},
    time::Clock,
};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("presentation failed on frame {frame}")]
    Presentation {
        frame: u64,
        #[source]
        source: RenderError,
    },
}

/// Frame driver: one clock, one input queue, one actor, one render sink,
/// all owned by the calling thread.
pub struct GameLoop<C, I, R, D = NullDiagnostics> {
    clock: C,
    input: I,
    renderer: R,
    diagnostics: D,

    scheduler: FixedStepScheduler,
    actor: Actor,

    background: Rgba,
    interpolation: InterpolationMode,

    exit_signal: Option<ExitSignal>,
    max_frames: Option<u64>,

    state: LoopState,
    frame_index: u64,
    ticks_per_marker: u64,
}

impl<C, I, R, D> GameLoop<C, I, R, D>
where
    C: Clock,
    I: InputSource,
    R: RenderSink,
    D: Diagnostics,
{
    /// Builds the loop and pins the scheduler origin to the current clock
    /// reading.
    pub fn new(
        cfg: &GameConfig,
        clock: C,
        input: I,
        renderer: R,
        diagnostics: D,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let step = cfg.sim.fixed_step()?;

        let mut scheduler =
            FixedStepScheduler::new(step).with_max_steps_per_frame(cfg.sim.max_steps_per_frame);
        scheduler.start(clock.now());

        Ok(Self {
            clock,
            input,
            renderer,
            diagnostics,
            scheduler,
            actor: Actor::new(cfg.actor.params()),
            background: cfg.render.background,
            interpolation: cfg.render.interpolation,
            exit_signal: None,
            max_frames: None,
            state: LoopState::Running,
            frame_index: 0,
            ticks_per_marker: u64::from(cfg.sim.steps_per_second.max(1)),
        })
    }

    /// Quit is also honored when this signal is raised from outside the loop.
    pub fn with_exit_signal(mut self, signal: ExitSignal) -> Self {
        self.exit_signal = Some(signal);
        self
    }

    /// Stops after rendering this many frames.
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Runs frames until quit. Presentation failures abort immediately.
    pub fn run(&mut self) -> Result<RunSummary, DriverError> {
        info!(
            "loop start: step={} ns interpolation={:?}",
            self.scheduler.step().nanos(),
            self.interpolation
        );

        while self.run_frame()?.is_running() {}

        let summary = self.summary();
        info!(
            "loop stopped: frames={} steps={} position=({:.2}, {:.2})",
            summary.frames, summary.steps, summary.final_position.0, summary.final_position.1
        );
        Ok(summary)
    }

    /// One iteration: tick, drain input, simulate, render, report.
    pub fn run_frame(&mut self) -> Result<LoopState, DriverError> {
        if !self.state.is_running() {
            return Ok(LoopState::Stopped);
        }

        let elapsed = self.scheduler.tick(self.clock.now());

        let mut quit = false;
        while let Some(event) = self.input.poll() {
            if event.is_quit() {
                quit = true;
            }
            self.actor.handle_input(&event);
        }
        if self.exit_signal.as_ref().is_some_and(ExitSignal::is_exit_requested) {
            quit = true;
        }

        let mut steps: u32 = 0;
        for tick in self.scheduler.drain_steps() {
            self.actor.update();
            steps += 1;

            if tick % self.ticks_per_marker == 0 {
                debug!("fixed tick {tick}");
            }
        }
        if steps > 1 {
            debug!("catch-up: {steps} steps this frame");
        }
        let backlog = self.scheduler.backlog_steps();
        if backlog > 0 {
            debug!("step cap reached, {backlog} steps carried to next frame");
        }

        let alpha = self.scheduler.interpolation_fraction();
        self.frame_index += 1;

        if let Err(source) = self.render(alpha) {
            self.state = LoopState::Stopped;
            return Err(DriverError::Presentation { frame: self.frame_index, source });
        }

        self.diagnostics.on_frame(&FrameReport {
            frame_index: self.frame_index,
            now: self.scheduler.last_tick(),
            elapsed,
            steps,
            alpha,
            tick_index: self.scheduler.tick_index(),
        });

        if self.max_frames.is_some_and(|max| self.frame_index >= max) {
            quit = true;
        }
        if quit {
            info!("quit observed on frame {}", self.frame_index);
            self.state = LoopState::Stopped;
        }

        Ok(self.state)
    }

    fn render(&mut self, alpha: f64) -> Result<(), RenderError> {
        let rect = actor_rect(&self.actor, alpha, self.interpolation);

        self.renderer.clear(self.background)?;
        self.renderer.fill_rect(rect, self.actor.color())?;
        self.renderer.present()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.frame_index,
            steps: self.scheduler.tick_index(),
            final_position: self.actor.position(),
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    #[inline]
    pub fn scheduler(&self) -> &FixedStepScheduler {
        &self.scheduler
    }

    #[inline]
    pub fn input(&self) -> &I {
        &self.input
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }
}
