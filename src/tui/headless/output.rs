//! Output formatting for headless mode: text, JSON, and frames.

use super::{HeadlessResult, HeadlessState};
use ratatui::buffer::Buffer;
use serde::Serialize;
use std::fmt::Write;

pub use crate::cli::OutputFormat;

/// Renders a ratatui buffer to a string.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// Renders a buffer to a plain text string.
    pub fn render(buffer: &Buffer) -> String {
        let area = buffer.area;
        if area.height == 0 {
            return String::new();
        }

        let lines = (area.top()..area.bottom())
            .map(|y| {
                let line: String = (area.left()..area.right())
                    .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol()))
                    .collect();
                line.trim_end_matches(' ').to_string()
            })
            .collect::<Vec<_>>();

        let used = lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |last| last + 1);

        format!("{}\n", lines[..used].join("\n"))
    }
}

/// Machine-readable run report. Borrows everything from the result.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    screen: &'a str,
    screen_lines: &'a [String],
    events_executed: usize,
    duration_ms: u64,
    assertions: Tally,
    state: &'a HeadlessState,
}

#[derive(Debug, Serialize)]
struct Tally {
    passed: usize,
    failed: usize,
}

impl Tally {
    fn of(result: &HeadlessResult) -> Self {
        Self {
            passed: result.assertions_passed,
            failed: result.assertions_failed,
        }
    }

    /// "N passed, M failed", or `None` when the script had no assertions.
    fn summary(&self) -> Option<String> {
        (self.passed + self.failed > 0)
            .then(|| format!("{} passed, {} failed", self.passed, self.failed))
    }
}

/// One-line summary of the widget: query, list sizes and any status message.
fn state_line(state: &HeadlessState) -> String {
    let mut line = format!(
        "Query: {:?} | {} exact, {} similar",
        state.query, state.exact_count, state.fuzzy_count
    );
    if state.selected >= 0 {
        let _ = write!(line, " | row {} selected", state.selected);
    }
    if let Some(message) = &state.message {
        let _ = write!(line, " | {message}");
    }
    line
}

/// Formats headless execution results.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, result: &HeadlessResult) -> String {
        match self.format {
            OutputFormat::Text => Self::text(result),
            OutputFormat::Json => Self::json(result),
            OutputFormat::Frames => Self::frames(result),
        }
    }

    /// Final screen followed by a state line and a run summary.
    fn text(result: &HeadlessResult) -> String {
        let mut out = format!("{}
{}
", result.screen, state_line(&result.state));
        let _ = write!(
            out,
            "Events: {} executed in {}ms",
            result.events_executed,
            result.duration.as_millis()
        );
        if let Some(tally) = Tally::of(result).summary() {
            let _ = write!(out, " | Assertions: {tally}");
        }
        out.push('\n');
        out
    }

    fn json(result: &HeadlessResult) -> String {
        let report = JsonReport {
            screen: &result.screen,
            screen_lines: &result.screen_lines,
            events_executed: result.events_executed,
            duration_ms: result.duration.as_millis() as u64,
            assertions: Tally::of(result),
            state: &result.state,
        };

        serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }

    /// Every captured frame, labelled with the event that produced it.
    fn frames(result: &HeadlessResult) -> String {
        let mut out = String::new();
        for frame in &result.frames {
            let label = frame.event.as_deref().unwrap_or("initial");
            let _ = write!(out, "=== FRAME {} ({label}) ===\n{}\n\n", frame.number, frame.screen);
        }

        let _ = writeln!(
            out,
            "Total: {} frames, {} events executed in {}ms",
            result.frames.len(),
            result.events_executed,
            result.duration.as_millis()
        );
        let _ = writeln!(out, "{}", state_line(&result.state));
        if let Some(tally) = Tally::of(result).summary() {
            let _ = writeln!(out, "Assertions: {tally}");
        }
        out
    }
}
