//! Cooperative cancellation between steps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shareable stop flag.
///
/// Clones share the same flag. The driver checks it before each step of
/// [`run()`](crate::SimulationDriver::run) and
/// [`run_steps()`](crate::SimulationDriver::run_steps); a step that has
/// started always completes.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clear a previous request so the run can resume.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}
