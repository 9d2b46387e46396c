use std::time::Duration;

use crossbeam_channel::{unbounded, Sender};

use game2d_core::{
    config::GameConfig,
    input::{ChannelInput, InputEvent, Key},
    render::{InterpolationMode, Rect, RenderError, RenderResult, RenderSink, Rgba},
    signals::ExitSignal,
    telemetry::{Diagnostics, FrameReport, NullDiagnostics},
    time::ManualClock,
    DriverError, GameLoop, LoopState,
};

#[derive(Debug, Clone, PartialEq)]
enum Cmd {
    Clear(Rgba),
    Fill(Rect, Rgba),
    Present,
}

#[derive(Default)]
struct RecordingSink {
    cmds: Vec<Cmd>,
    fail_clear_on_call: Option<usize>,
    fail_fill_on_call: Option<usize>,
    fail_present_on_call: Option<usize>,
    clears: usize,
    fills: usize,
    presents: usize,
}

impl RenderSink for RecordingSink {
    fn clear(&mut self, color: Rgba) -> RenderResult<()> {
        self.clears += 1;
        if self.fail_clear_on_call == Some(self.clears) {
            return Err(RenderError::Clear("device removed".into()));
        }
        self.cmds.push(Cmd::Clear(color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> RenderResult<()> {
        self.fills += 1;
        if self.fail_fill_on_call == Some(self.fills) {
            return Err(RenderError::Draw("out of memory".into()));
        }
        self.cmds.push(Cmd::Fill(rect, color));
        Ok(())
    }

    fn present(&mut self) -> RenderResult<()> {
        self.presents += 1;
        if self.fail_present_on_call == Some(self.presents) {
            return Err(RenderError::Present("surface lost".into()));
        }
        self.cmds.push(Cmd::Present);
        Ok(())
    }
}

#[derive(Default)]
struct Reports(Vec<FrameReport>);

impl Diagnostics for Reports {
    fn on_frame(&mut self, report: &FrameReport) {
        self.0.push(*report);
    }
}

const MS: Duration = Duration::from_millis(1);

fn one_ms_config() -> GameConfig {
    let mut cfg = GameConfig::default();
    cfg.sim.steps_per_second = 1000;
    cfg
}

type TestLoop<D = NullDiagnostics> = GameLoop<ManualClock, ChannelInput, RecordingSink, D>;

fn build(cfg: &GameConfig) -> (TestLoop, ManualClock, Sender<InputEvent>) {
    let clock = ManualClock::new(7_000_000_000);
    let (tx, rx) = unbounded();
    let game = GameLoop::new(
        cfg,
        clock.clone(),
        ChannelInput::new(rx),
        RecordingSink::default(),
        NullDiagnostics,
    )
    .unwrap();
    (game, clock, tx)
}

#[test]
fn every_frame_clears_draws_presents_even_without_steps() {
    let (mut game, clock, _tx) = build(&one_ms_config());

    clock.advance(Duration::from_micros(200));
    assert_eq!(game.run_frame().unwrap(), LoopState::Running);
    assert_eq!(game.scheduler().tick_index(), 0);

    let green = Rgba::opaque(0, 200, 60);
    let bg = Rgba::opaque(200, 140, 200);
    assert_eq!(
        game.renderer().cmds,
        vec![
            Cmd::Clear(bg),
            Cmd::Fill(Rect { x: 0, y: 0, w: 50, h: 50 }, green),
            Cmd::Present,
        ]
    );
}

#[test]
fn split_frames_conserve_ticks() {
    let (mut game, clock, _tx) = build(&one_ms_config());

    for delta in [500, 600, 2_300] {
        clock.advance(Duration::from_micros(delta));
        game.run_frame().unwrap();
    }

    assert_eq!(game.scheduler().tick_index(), 3);
    assert_eq!(game.scheduler().lag(), 400_000);
    assert_eq!(game.renderer().cmds.len(), 9);
}

#[test]
fn quit_renders_current_frame_then_stops_before_next_tick() {
    let (mut game, clock, tx) = build(&one_ms_config());

    clock.advance(2 * MS);
    assert_eq!(game.run_frame().unwrap(), LoopState::Running);

    tx.send(InputEvent::KeyPress(Key::D)).unwrap();
    tx.send(InputEvent::Quit).unwrap();
    clock.advance(3 * MS);
    assert_eq!(game.run_frame().unwrap(), LoopState::Stopped);

    // The quitting frame still simulated and presented.
    assert_eq!(game.scheduler().tick_index(), 5);
    assert_eq!(game.renderer().cmds.len(), 6);
    assert_eq!(game.renderer().cmds.last(), Some(&Cmd::Present));
    assert!(game.actor().position().0 > 0.0);

    clock.advance(10 * MS);
    assert_eq!(game.run_frame().unwrap(), LoopState::Stopped);
    assert_eq!(game.scheduler().frames(), 2);
    assert_eq!(game.scheduler().tick_index(), 5);
    assert_eq!(game.renderer().cmds.len(), 6);
}

#[test]
fn escape_press_stops_the_loop() {
    let (mut game, clock, tx) = build(&one_ms_config());
    tx.send(InputEvent::KeyRelease(Key::D)).unwrap();
    clock.advance(MS);
    assert_eq!(game.run_frame().unwrap(), LoopState::Running);

    tx.send(InputEvent::KeyPress(Key::Escape)).unwrap();
    clock.advance(MS);
    assert_eq!(game.run_frame().unwrap(), LoopState::Stopped);
}

#[test]
fn escape_release_stops_the_loop() {
    let (mut game, clock, tx) = build(&one_ms_config());
    tx.send(InputEvent::KeyRelease(Key::Escape)).unwrap();
    clock.advance(MS);
    assert_eq!(game.run_frame().unwrap(), LoopState::Stopped);
    assert_eq!(game.renderer().cmds.len(), 3);
}

#[test]
fn exit_signal_is_honored_after_render() {
    let signal = ExitSignal::new();
    let (game, clock, _tx) = build(&one_ms_config());
    let mut game = game.with_exit_signal(signal.clone());

    clock.advance(MS);
    assert_eq!(game.run_frame().unwrap(), LoopState::Running);

    signal.request_exit();
    clock.advance(MS);
    assert_eq!(game.run_frame().unwrap(), LoopState::Stopped);
    assert_eq!(game.renderer().cmds.len(), 6);
}

fn build_with_sink(sink: RecordingSink) -> (TestLoop, ManualClock) {
    let clock = ManualClock::new(0);
    let (_tx, rx) = unbounded();
    let game = GameLoop::new(
        &one_ms_config(),
        clock.clone(),
        ChannelInput::new(rx),
        sink,
        NullDiagnostics,
    )
    .unwrap();
    (game, clock)
}

#[test]
fn presentation_failure_aborts_the_loop() {
    let (mut game, clock) =
        build_with_sink(RecordingSink { fail_present_on_call: Some(3), ..Default::default() });

    clock.advance(MS);
    let err = game.run().unwrap_err();

    let DriverError::Presentation { frame, source } = err;
    assert_eq!(frame, 3);
    assert!(matches!(source, RenderError::Present(_)));
    assert_eq!(game.state(), LoopState::Stopped);
    assert_eq!(game.run_frame().unwrap(), LoopState::Stopped);
}

#[test]
fn clear_failure_skips_rest_of_frame_and_aborts() {
    let (mut game, clock) =
        build_with_sink(RecordingSink { fail_clear_on_call: Some(2), ..Default::default() });

    clock.advance(MS);
    assert_eq!(game.run_frame().unwrap(), LoopState::Running);

    clock.advance(MS);
    let DriverError::Presentation { frame, source } = game.run_frame().unwrap_err();
    assert_eq!(frame, 2);
    assert!(matches!(source, RenderError::Clear(_)));
    assert_eq!(game.state(), LoopState::Stopped);

    // Only the first frame's commands; nothing drawn after the failed clear.
    assert_eq!(game.renderer().cmds.len(), 3);
    assert_eq!(game.renderer().fills, 1);
    assert_eq!(game.renderer().presents, 1);
}

#[test]
fn fill_failure_aborts_before_present() {
    let (mut game, clock) =
        build_with_sink(RecordingSink { fail_fill_on_call: Some(1), ..Default::default() });

    clock.advance(MS);
    let err = game.run().unwrap_err();

    let DriverError::Presentation { frame, source } = err;
    assert_eq!(frame, 1);
    assert!(matches!(source, RenderError::Draw(_)));
    assert_eq!(game.renderer().cmds, vec![Cmd::Clear(Rgba::opaque(200, 140, 200))]);
    assert_eq!(game.renderer().presents, 0);
    assert_eq!(game.run_frame().unwrap(), LoopState::Stopped);
}

#[test]
fn extrapolated_and_blended_positions() {
    let mut cfg = one_ms_config();
    let (mut game, clock, tx) = build(&cfg);
    tx.send(InputEvent::PointerMove { x: 1000.0, y: 0.0 }).unwrap();
    clock.advance(Duration::from_micros(1_500));
    game.run_frame().unwrap();

    assert_eq!(game.actor().position(), (10.0, 0.0));
    // 10 + 10 * 0.5
    assert!(matches!(game.renderer().cmds[1], Cmd::Fill(Rect { x: 15, y: 0, .. }, _)));

    cfg.render.interpolation = InterpolationMode::Blend;
    let (mut game, clock, tx) = build(&cfg);
    tx.send(InputEvent::PointerMove { x: 1000.0, y: 0.0 }).unwrap();
    clock.advance(Duration::from_micros(1_500));
    game.run_frame().unwrap();
    // 0 + (10 - 0) * 0.5
    assert!(matches!(game.renderer().cmds[1], Cmd::Fill(Rect { x: 5, y: 0, .. }, _)));
    // Rendering never feeds back into the simulation.
    assert_eq!(game.actor().position(), (10.0, 0.0));
}

#[test]
fn run_with_frame_limit_reports_totals() {
    let clock = ManualClock::new(0);
    let (_tx, rx) = unbounded();
    let mut game = GameLoop::new(
        &one_ms_config(),
        clock.clone(),
        ChannelInput::new(rx),
        RecordingSink::default(),
        Reports::default(),
    )
    .unwrap()
    .with_max_frames(1);

    clock.advance(4 * MS);
    let summary = game.run().unwrap();
    assert_eq!(summary.frames, 1);
    assert_eq!(summary.steps, 4);
    assert_eq!(summary.final_position, (0.0, 0.0));

    let reports = &game.diagnostics().0;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].steps, 4);
    assert_eq!(reports[0].elapsed, 4_000_000);
    assert_eq!(reports[0].now, 4_000_000);
}

#[test]
fn stalled_clock_reading_produces_no_steps() {
    let (mut game, clock, _tx) = build(&one_ms_config());
    clock.advance(Duration::from_micros(2_700));
    game.run_frame().unwrap();
    let lag = game.scheduler().lag();

    clock.set(7_000_000_000 + 1_000_000);
    game.run_frame().unwrap();
    assert_eq!(game.scheduler().tick_index(), 2);
    assert_eq!(game.scheduler().lag(), lag);
}

#[test]
fn step_cap_defers_instead_of_dropping() {
    let mut cfg = one_ms_config();
    cfg.sim.max_steps_per_frame = 2;
    let (mut game, clock, _tx) = build(&cfg);

    clock.advance(5 * MS);
    game.run_frame().unwrap();
    assert_eq!(game.scheduler().tick_index(), 2);

    game.run_frame().unwrap();
    game.run_frame().unwrap();
    assert_eq!(game.scheduler().tick_index(), 5);
}

#[test]
fn invalid_config_is_rejected_at_startup() {
    let mut cfg = GameConfig::default();
    cfg.sim.steps_per_second = 0;
    let (_tx, rx) = unbounded();
    let built = GameLoop::new(
        &cfg,
        ManualClock::new(0),
        ChannelInput::new(rx),
        RecordingSink::default(),
        NullDiagnostics,
    );
    assert!(built.is_err());
}
