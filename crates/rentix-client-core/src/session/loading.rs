use std::sync::{Arc, Mutex};

use super::SessionState;

/// Marks the session as loading for as long as it is alive. Dropping it on
/// any exit path (success, error or early return) releases the flag.
///
/// A guard taken before a login or logout does nothing when dropped as the
/// count was already reset for the new session
pub(super) struct LoadingGuard {
    state: Arc<Mutex<SessionState>>,
    epoch: u64,
}

impl LoadingGuard {
    /// `locked` must be the contents of `state`
    pub(super) fn new(state: &Arc<Mutex<SessionState>>, locked: &mut SessionState) -> Self {
        locked.loading_count += 1;
        Self {
            state: Arc::clone(state),
            epoch: locked.epoch,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.epoch == self.epoch {
            state.loading_count = state.loading_count.saturating_sub(1);
        }
    }
}
