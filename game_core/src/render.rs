use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// Axis-aligned rectangle in integer drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("clear failed: {0}")]
    Clear(String),

    #[error("fill_rect failed: {0}")]
    Draw(String),

    #[error("present failed: {0}")]
    Present(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Drawing surface the loop talks to once per frame.
///
/// Any error is terminal for the loop; implementations should not retry
/// internally either.
pub trait RenderSink {
    fn clear(&mut self, color: Rgba) -> RenderResult<()>;
    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> RenderResult<()>;

    /// May block until the host's next presentation opportunity.
    fn present(&mut self) -> RenderResult<()>;
}

impl<R: RenderSink + ?Sized> RenderSink for Box<R> {
    fn clear(&mut self, color: Rgba) -> RenderResult<()> {
        (**self).clear(color)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> RenderResult<()> {
        (**self).fill_rect(rect, color)
    }

    fn present(&mut self) -> RenderResult<()> {
        (**self).present()
    }
}

/// How the rendered position is derived from simulation state and the
/// leftover tick fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// `position + velocity * alpha`
    #[default]
    Extrapolate,
    /// `previous + (position - previous) * alpha`
    Blend,
    /// Last simulated position, no smoothing.
    None,
}

impl InterpolationMode {
    pub fn position(self, actor: &Actor, alpha: f64) -> (f64, f64) {
        let (x, y) = actor.position();
        match self {
            InterpolationMode::Extrapolate => {
                let (vx, vy) = actor.velocity();
                (x + vx * alpha, y + vy * alpha)
            }
            InterpolationMode::Blend => {
                let (px, py) = actor.previous_position();
                (px + (x - px) * alpha, py + (y - py) * alpha)
            }
            InterpolationMode::None => (x, y),
        }
    }
}

/// Screen rectangle for the actor at render time. Never feeds back into
/// the simulation.
pub fn actor_rect(actor: &Actor, alpha: f64, mode: InterpolationMode) -> Rect {
    let (x, y) = mode.position(actor, alpha);
    let (w, h) = actor.size();
    // `as` saturates on overflow and truncates toward zero.
    Rect { x: x as i32, y: y as i32, w, h }
}
