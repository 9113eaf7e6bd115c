//! Debounce scheduling for query changes.
//!
//! Every change restarts the quiescence window. A blank query never schedules
//! anything; the caller clears state synchronously instead.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::timer::ScheduledTask;
use super::ControllerEvent;

/// What a query change resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceOutcome {
    /// A settle signal is pending.
    Scheduled,
    /// The query is blank; nothing was scheduled and any pending signal is gone.
    Clear,
}

/// Rate-limits settled-query signals.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    /// Ticket of the most recently scheduled signal.
    ticket: u64,
    pending: Option<ScheduledTask>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiescence window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            ticket: 0,
            pending: None,
        }
    }

    /// Returns the quiescence window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Registers a query change.
    ///
    /// Cancels any pending signal. For a non-blank query, schedules
    /// [`ControllerEvent::QuerySettled`] after the window.
    pub fn change(
        &mut self,
        query: &str,
        root: &CancellationToken,
        events: &UnboundedSender<ControllerEvent>,
    ) -> DebounceOutcome {
        self.cancel();

        if query.trim().is_empty() {
            return DebounceOutcome::Clear;
        }

        self.ticket += 1;
        let ticket = self.ticket;
        let query = query.to_string();
        let events = events.clone();
        trace!("Debounce ticket {} scheduled for '{}'", ticket, query);

        self.pending = Some(ScheduledTask::spawn(root, self.window, move || {
            let _ = events.send(ControllerEvent::QuerySettled { ticket, query });
        }));

        DebounceOutcome::Scheduled
    }

    /// Drops any pending signal.
    ///
    /// A signal that already fired but was not yet applied is invalidated as
    /// well, since its ticket no longer matches.
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel();
            self.ticket += 1;
        }
    }

    /// Consumes a fired signal. Returns false if it was superseded.
    pub fn accept(&mut self, ticket: u64) -> bool {
        if self.pending.is_some() && ticket == self.ticket {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Returns true while a settle signal is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
