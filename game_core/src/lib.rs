//! game2d core
//!
//! Fixed-timestep simulation loop. The simulation advances in uniform ticks
//! no matter how fast frames are drawn; rendering smooths the leftover
//! fraction of a tick without touching simulation state.
//!
//! Clock, input and drawing surface are supplied by the host through the
//! [`time::Clock`], [`input::InputSource`] and [`render::RenderSink`] traits.

pub mod actor;
pub mod config;
pub mod engine;
pub mod frame;
pub mod input;
pub mod render;
pub mod schedule;
pub mod signals;
pub mod telemetry;
pub mod time;

pub use config::GameConfig;
pub use engine::{DriverError, GameLoop};
pub use frame::{LoopState, RunSummary};
