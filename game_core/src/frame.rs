/// The loop has exactly two states. `Running` loops onto itself every frame;
/// `Stopped` is entered once, after the frame that observed a quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

impl LoopState {
    #[inline]
    pub fn is_running(self) -> bool {
        self == LoopState::Running
    }
}

/// Totals reported when [`GameLoop::run`](crate::engine::GameLoop::run) returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub steps: u64,
    pub final_position: (f64, f64),
}
