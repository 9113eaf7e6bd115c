//! Terminal input for the TUI.
//!
//! A dedicated thread blocks on crossterm and forwards events into a channel,
//! so the async loop never loses input while it waits on something else.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Application events.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse button or wheel event.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// No input within the tick rate (drives animations).
    Tick,
}

impl Event {
    /// Maps a raw crossterm event. Key releases and focus changes are dropped.
    pub fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(Self::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(Self::Mouse(mouse)),
            CrosstermEvent::Resize(width, height) => Some(Self::Resize(width, height)),
            _ => None,
        }
    }
}

/// Reads terminal events on a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tick_rate: Duration,
}

impl EventHandler {
    /// Starts the reader thread with the default tick rate.
    pub fn new() -> Self {
        Self::with_tick_rate(Duration::from_millis(100))
    }

    /// Starts the reader thread with a custom tick rate.
    ///
    /// The thread exits once the handler is dropped.
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        thread::spawn(move || loop {
            let next = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(raw) => Event::from_crossterm(raw),
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        None
                    }
                },
                Ok(false) => Some(Event::Tick),
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            };

            if let Some(event) = next {
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, tick_rate }
    }

    /// Waits for the next event. Returns `None` if the reader thread stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
