use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::info;

/// Cooperative quit request shared between the loop and signal handlers.
/// The loop samples it once per frame, after input has been drained.
#[derive(Clone, Debug, Default)]
pub struct ExitSignal {
    flag: Arc<AtomicBool>,
}

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_exit(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_exit_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Routes Ctrl-C to this signal. Only one handler may exist per process.
    pub fn install_ctrlc_handler(&self) -> anyhow::Result<()> {
        let s = self.clone();
        ctrlc::set_handler(move || {
            info!("interrupt received, stopping after this frame");
            s.request_exit();
        })?;
        Ok(())
    }
}
