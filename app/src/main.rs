mod headless;
mod logging;
mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use game2d_core::{
    signals::ExitSignal,
    telemetry::{Diagnostics, FpsCounter, NullDiagnostics},
    time::MonotonicClock,
    GameConfig, GameLoop,
};

use crate::{headless::HeadlessRenderer, logging::LogConfig, script::ScriptedInput};

#[derive(Parser, Debug)]
#[command(name = "game2d")]
#[command(about = "Fixed-timestep loop driving one actor on a headless surface", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after rendering this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// TOML input script; a built-in demo script is used when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Simulated display refresh rate for present pacing (0 = unpaced)
    #[arg(long, default_value_t = 60)]
    vsync_hz: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&LogConfig::from_env())?;

    let cfg = match &cli.config {
        Some(path) => GameConfig::load_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let clock = MonotonicClock::new();
    let input = match &cli.script {
        Some(path) => ScriptedInput::load(path, clock.clone())?,
        None => ScriptedInput::demo(clock.clone()),
    };
    let renderer = HeadlessRenderer::new(cli.vsync_hz);

    let diagnostics: Box<dyn Diagnostics> = if cfg.diagnostics.log_fps {
        Box::new(FpsCounter::new(cfg.diagnostics.fps_log_period_ms))
    } else {
        Box::new(NullDiagnostics)
    };

    let exit = ExitSignal::new();
    if let Err(e) = exit.install_ctrlc_handler() {
        warn!("ctrl-c handler not installed: {e}");
    }

    let mut game = GameLoop::new(&cfg, clock, input, renderer, diagnostics)
        .context("invalid game configuration")?
        .with_exit_signal(exit);
    if let Some(frames) = cli.frames {
        game = game.with_max_frames(frames);
    }

    let summary = game.run()?;
    info!(
        "presented {} frames over {} steps; {} scripted events left unplayed",
        game.renderer().frames(),
        summary.steps,
        game.input().remaining()
    );
    if let Some(rect) = game.renderer().last_rect() {
        info!("last drawn rect at ({}, {}) {}x{}", rect.x, rect.y, rect.w, rect.h);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_matches_defaults() {
        let cfg = GameConfig::from_toml_str(include_str!("../config/game2d.toml")).unwrap();
        let defaults = GameConfig::default();
        assert_eq!(cfg.sim.fixed_step().unwrap(), defaults.sim.fixed_step().unwrap());
        assert_eq!(cfg.actor.params(), defaults.actor.params());
        assert_eq!(cfg.render.background, defaults.render.background);
    }

    #[test]
    fn cli_accepts_all_flags() {
        let cli = Cli::try_parse_from([
            "game2d",
            "--config",
            "a.toml",
            "--frames",
            "10",
            "--script",
            "s.toml",
            "--vsync-hz",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.frames, Some(10));
        assert_eq!(cli.vsync_hz, 0);
        assert_eq!(cli.script, Some(PathBuf::from("s.toml")));
    }
}
