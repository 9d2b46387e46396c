use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    actor::ActorParams,
    render::{InterpolationMode, Rgba},
    schedule::FixedStep,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("sim.steps_per_second must be in 1..=1000000000, got {0}")]
    StepRate(u32),

    #[error("actor.seek_divisor must be finite and non-zero, got {0}")]
    SeekDivisor(f64),

    #[error("actor.velocity_clamp must be finite and >= 0, got {0}")]
    VelocityClamp(f64),

    #[error("actor.impulse must be finite, got {0}")]
    Impulse(f64),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub actor: ActorConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl GameConfig {
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sim.fixed_step()?;

        let a = &self.actor;
        if !a.seek_divisor.is_finite() || a.seek_divisor == 0.0 {
            return Err(ConfigError::SeekDivisor(a.seek_divisor));
        }
        if !a.velocity_clamp.is_finite() || a.velocity_clamp < 0.0 {
            return Err(ConfigError::VelocityClamp(a.velocity_clamp));
        }
        if !a.impulse.is_finite() {
            return Err(ConfigError::Impulse(a.impulse));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_steps_per_second")]
    pub steps_per_second: u32,
    /// 0 = run every owed step in the frame it became due.
    #[serde(default)]
    pub max_steps_per_frame: u32,
}

fn default_steps_per_second() -> u32 { FixedStep::DEFAULT_HZ }

impl Default for SimConfig {
    fn default() -> Self {
        Self { steps_per_second: default_steps_per_second(), max_steps_per_frame: 0 }
    }
}

impl SimConfig {
    pub fn fixed_step(&self) -> Result<FixedStep, ConfigError> {
        FixedStep::from_hz(self.steps_per_second)
            .ok_or(ConfigError::StepRate(self.steps_per_second))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    #[serde(default)]
    pub start: [f64; 2],
    #[serde(default = "default_actor_color")]
    pub color: Rgba,
    #[serde(default = "default_actor_size")]
    pub size: [u32; 2],
    #[serde(default = "default_velocity_clamp")]
    pub velocity_clamp: f64,
    #[serde(default = "default_seek_divisor")]
    pub seek_divisor: f64,
    #[serde(default = "default_impulse")]
    pub impulse: f64,
}

fn default_actor_color() -> Rgba { Rgba::opaque(0, 200, 60) }
fn default_actor_size() -> [u32; 2] { [50, 50] }
fn default_velocity_clamp() -> f64 { 25.0 }
fn default_seek_divisor() -> f64 { 100.0 }
fn default_impulse() -> f64 { 1.0 }

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            start: [0.0, 0.0],
            color: default_actor_color(),
            size: default_actor_size(),
            velocity_clamp: default_velocity_clamp(),
            seek_divisor: default_seek_divisor(),
            impulse: default_impulse(),
        }
    }
}

impl ActorConfig {
    pub fn params(&self) -> ActorParams {
        ActorParams {
            start: (self.start[0], self.start[1]),
            color: self.color,
            size: (self.size[0], self.size[1]),
            velocity_clamp: self.velocity_clamp,
            seek_divisor: self.seek_divisor,
            impulse: self.impulse,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_background")]
    pub background: Rgba,
    #[serde(default)]
    pub interpolation: InterpolationMode,
}

fn default_background() -> Rgba { Rgba::opaque(200, 140, 200) }

impl Default for RenderConfig {
    fn default() -> Self {
        Self { background: default_background(), interpolation: InterpolationMode::default() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_log_fps")]
    pub log_fps: bool,
    #[serde(default = "default_fps_period_ms")]
    pub fps_log_period_ms: u32,
}

fn default_log_fps() -> bool { true }
fn default_fps_period_ms() -> u32 { 1000 }

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { log_fps: default_log_fps(), fps_log_period_ms: default_fps_period_ms() }
    }
}
