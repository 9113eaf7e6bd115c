//! Self-expiring status messages.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::timer::ScheduledTask;
use super::ControllerEvent;

/// Tone of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// A status line with a bounded lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    pub text: String,
    pub kind: MessageKind,
    pub expires_at: Instant,
}

impl TransientMessage {
    /// Returns true once `now` has reached the expiry instant.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Holds at most one message and its expiry timer.
#[derive(Debug)]
pub struct MessageSlot {
    ttl: Duration,
    current: Option<TransientMessage>,
    ticket: u64,
    timer: Option<ScheduledTask>,
}

impl MessageSlot {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: None,
            ticket: 0,
            timer: None,
        }
    }

    /// Shows `text`, replacing any current message and its timer.
    pub fn show(
        &mut self,
        kind: MessageKind,
        text: impl Into<String>,
        root: &CancellationToken,
        events: &UnboundedSender<ControllerEvent>,
    ) {
        self.ticket += 1;
        let ticket = self.ticket;
        let events = events.clone();

        self.current = Some(TransientMessage {
            text: text.into(),
            kind,
            expires_at: Instant::now() + self.ttl,
        });
        // Replacing the handle drops (and so cancels) the previous timer.
        self.timer = Some(ScheduledTask::spawn(root, self.ttl, move || {
            let _ = events.send(ControllerEvent::MessageExpired { ticket });
        }));
    }

    /// Clears the message if `ticket` still belongs to it.
    pub fn expire(&mut self, ticket: u64) -> bool {
        if ticket != self.ticket || self.current.is_none() {
            return false;
        }
        self.current = None;
        self.timer = None;
        true
    }

    /// The visible message, if any.
    pub fn current(&self) -> Option<&TransientMessage> {
        self.current.as_ref()
    }

    /// Drops the message and cancels its timer.
    pub fn clear(&mut self) {
        self.current = None;
        self.timer = None;
    }
}
