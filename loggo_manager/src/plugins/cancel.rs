//! The host's cancellation signal
//!
//! Interrupting `loggo` (Ctrl+C, SIGTERM, SIGHUP) must stop the plugin it is
//! waiting on instead of leaving it orphaned. The dispatcher arms the signal
//! with the running plugin's terminator; cancelling fires it.

use crate::context::Terminator;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct CancelState {
    cancelled: bool,
    target: Option<Terminator>,
}

/// Cloneable handle shared between the interrupt handler and the dispatcher
#[derive(Clone, Default)]
pub struct CancelSignal {
    state: Arc<Mutex<CancelState>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel this signal whenever the host process is interrupted.
    ///
    /// Only one handler can be installed per process.
    pub fn install_handler(&self) -> Result<(), ctrlc::Error> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            tracing::debug!("interrupt received, stopping plugin");
            signal.cancel();
        })
    }

    /// Mark the invocation cancelled and terminate the armed plugin, if any.
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.cancelled = true;
        if let Some(terminate) = state.target.as_mut() {
            terminate();
        }
    }

    #[cfg(test)]
    fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Bind a running plugin. Terminates it at once if already cancelled.
    pub(crate) fn arm(&self, mut terminator: Terminator) {
        let mut state = self.lock();
        if state.cancelled {
            terminator();
        }
        state.target = Some(terminator);
    }

    pub(crate) fn disarm(&self) {
        self.lock().target = None;
    }

    fn lock(&self) -> MutexGuard<'_, CancelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("CancelSignal")
            .field("cancelled", &state.cancelled)
            .field("armed", &state.target.is_some())
            .finish()
    }
}
