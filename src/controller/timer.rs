//! Scoped one-shot timers.
//!
//! A [`ScheduledTask`] runs a callback after a delay on a spawned tokio task.
//! Dropping or cancelling the handle, or cancelling the parent token, stops it
//! from firing.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Handle to a pending one-shot timer.
#[derive(Debug)]
pub struct ScheduledTask {
    token: CancellationToken,
}

impl ScheduledTask {
    /// Spawns a timer that calls `fire` after `delay` unless cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(parent: &CancellationToken, delay: Duration, fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let token = parent.child_token();
        let guard = token.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = guard.cancelled() => {}
                _ = tokio::time::sleep(delay) => fire(),
            }
        });

        Self { token }
    }

    /// Stops the timer. Has no effect if it already fired.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
