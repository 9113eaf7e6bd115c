//! Loading indicator shown while the exact-match request is outstanding.

use std::time::Instant;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Animation speed in milliseconds per frame.
const FRAME_DURATION_MS: u128 = 100;

/// Spinner state for the loading indicator.
#[derive(Debug, Clone)]
pub struct Spinner {
    start_time: Instant,
    label: String,
}

impl Spinner {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            label: label.into(),
        }
    }

    /// The spinner used for suggestion fetches.
    pub fn searching() -> Self {
        Self::new("Searching")
    }

    /// Returns the current frame of the animation.
    pub fn frame(&self) -> &'static str {
        let frame_index = (self.start_time.elapsed().as_millis() / FRAME_DURATION_MS) as usize;
        FRAMES[frame_index % FRAMES.len()]
    }

    /// Returns the display string for the spinner.
    pub fn display(&self) -> String {
        format!("{} {}", self.frame(), self.label)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
