//! Headless mode for scripted testing and automation.
//!
//! Runs the TUI against an in-memory terminal, executing scripted events and
//! capturing output for verification.

mod events;
mod output;

pub use events::{Assertion, Event, EventParser};
pub use output::{HeadlessOutput, OutputFormat, ScreenRenderer};

use crate::cli::Cli;
use crate::controller::SuggestionController;
use crate::error::{Result, SearchError};
use crate::tui::app::App;
use crate::tui::ui;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::time::{Duration, Instant};
use tracing::debug;

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    pub output_format: OutputFormat,
    /// Whether to stop on first assertion failure.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<std::path::PathBuf>,
}

impl HeadlessConfig {
    /// Creates a HeadlessConfig from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            width: cli.size.width,
            height: cli.size.height,
            output_format: cli.output,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
        }
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen content as text.
    pub screen: String,
    /// Screen lines for JSON output.
    pub screen_lines: Vec<String>,
    pub events_executed: usize,
    pub duration: Duration,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    /// Application state snapshot.
    pub state: HeadlessState,
    /// Frame captures (for frames output mode).
    pub frames: Vec<Frame>,
}

/// Snapshot of widget state for JSON output and state assertions.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HeadlessState {
    /// Current query.
    pub query: String,
    /// Selected row, `-1` when idle.
    pub selected: isize,
    pub exact_count: usize,
    pub fuzzy_count: usize,
    /// Whether the exact-match request is outstanding.
    pub loading: bool,
    /// Visible status message, if any.
    pub message: Option<String>,
    /// Whether "add term" is offered.
    pub fallback: bool,
    /// Whether the app is still running.
    pub running: bool,
}

impl HeadlessState {
    pub fn from_app(app: &App) -> Self {
        let ctl = &app.controller;
        Self {
            query: ctl.query().to_string(),
            selected: ctl.selected_index(),
            exact_count: ctl.exact().len(),
            fuzzy_count: ctl.fuzzy().len(),
            loading: ctl.is_loading(),
            message: ctl.message().map(|m| m.text.clone()),
            fallback: ctl.fallback_available(),
            running: app.running,
        }
    }

    /// Looks up a field by name, as text.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "query" => Some(self.query.clone()),
            "selected" => Some(self.selected.to_string()),
            "exact_count" => Some(self.exact_count.to_string()),
            "fuzzy_count" => Some(self.fuzzy_count.to_string()),
            "loading" => Some(self.loading.to_string()),
            "message" => Some(self.message.clone().unwrap_or_default()),
            "fallback" => Some(self.fallback.to_string()),
            "running" => Some(self.running.to_string()),
            _ => None,
        }
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    pub screen: String,
}

/// Runs the TUI in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    events: Vec<Event>,
    frames: Vec<Frame>,
    start_time: Instant,
    assertions_passed: usize,
    assertions_failed: usize,
}

impl HeadlessRunner {
    /// Creates a new headless runner driving `controller`.
    pub fn new(
        config: HeadlessConfig,
        controller: SuggestionController,
        api_label: impl Into<String>,
    ) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend)
            .map_err(|e| SearchError::internal(format!("Failed to create test terminal: {e}")))?;

        Ok(Self {
            config,
            terminal,
            app: App::new(controller, api_label),
            events: Vec::new(),
            frames: Vec::new(),
            start_time: Instant::now(),
            assertions_passed: 0,
            assertions_failed: 0,
        })
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file ("-" reads stdin).
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| SearchError::internal(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| SearchError::internal(format!("Failed to read script file: {e}")))?
        };

        self.load_events(&content)
    }

    /// Runs the headless execution and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        self.start_time = Instant::now();
        self.capture_frame(None)?;

        let script = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in script {
            let event_str = event.to_string();

            match &event {
                Event::Key(key) => self.app.handle_key(*key),
                Event::Type(text) => {
                    for key in events::keystrokes(text) {
                        self.app.handle_key(key);
                    }
                }
                Event::Click(column, row) => self.app.click(*column, *row),
                Event::Wait(duration) => self.pump_for(*duration).await,
                Event::Resize(w, h) => {
                    self.terminal
                        .resize(ratatui::layout::Rect::new(0, 0, *w, *h))
                        .map_err(|e| SearchError::internal(format!("Resize failed: {e}")))?;
                }
                Event::Snapshot(name) => {
                    debug!("Snapshot '{}'", name);
                }
                Event::Assert(assertion) => {
                    self.draw()?;
                    let screen = self.render_screen();
                    let state = HeadlessState::from_app(&self.app);
                    if assertion.check(&screen, &state) {
                        self.assertions_passed += 1;
                    } else {
                        debug!("Assertion failed: {}", event_str);
                        self.assertions_failed += 1;
                        if self.config.fail_fast {
                            break;
                        }
                    }
                }
            }

            events_executed += 1;

            // Anything that completed while the event ran lands before the next render.
            self.app.controller.drain_events();
            self.draw()?;

            if self.config.output_format == OutputFormat::Frames {
                self.capture_frame(Some(event_str))?;
            }

            if !self.app.running {
                break;
            }
        }

        self.draw()?;
        let screen = self.render_screen();
        let screen_lines = screen.lines().map(String::from).collect();
        let state = HeadlessState::from_app(&self.app);
        self.app.controller.dispose();

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: self.start_time.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.assertions_failed,
            state,
            frames: self.frames,
        })
    }

    /// Applies controller events as they arrive until `duration` has passed.
    async fn pump_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        let controller = &mut self.app.controller;

        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => break,
                Some(event) = controller.next_event() => controller.apply(event),
            }
        }
    }

    fn draw(&mut self) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, &mut self.app))
            .map_err(|e| SearchError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    /// Renders the current screen to a string.
    fn render_screen(&self) -> String {
        ScreenRenderer::render(self.terminal.backend().buffer())
    }

    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;
        let screen = self.render_screen();
        let number = self.frames.len();
        self.frames.push(Frame {
            number,
            event,
            screen,
        });
        Ok(())
    }
}

/// Runs headless mode from CLI arguments. Returns the process exit code.
pub async fn run_headless(
    cli: &Cli,
    controller: SuggestionController,
    api_label: String,
) -> Result<i32> {
    cli.validate_headless().map_err(SearchError::config)?;

    let config = HeadlessConfig::from_cli(cli);
    let mut runner = HeadlessRunner::new(config.clone(), controller, api_label)?;

    if let Some(ref events_str) = cli.events {
        runner.load_events(events_str)?;
    } else if let Some(ref script_path) = cli.script {
        runner.load_script(script_path)?;
    }

    let result = runner.run().await?;
    let output_str = HeadlessOutput::new(config.output_format).format(&result);

    if let Some(ref path) = config.output_file {
        std::fs::write(path, &output_str)
            .map_err(|e| SearchError::internal(format!("Failed to write output file: {e}")))?;
    } else {
        print!("{}", output_str);
    }

    if result.assertions_failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}
