//! Terminal user interface for smart-search.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod events;
pub mod headless;
mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::controller::SuggestionController;
use crate::error::{Result, SearchError};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{debug, info};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        let event_handler = EventHandler::new();

        Ok(Self {
            terminal,
            event_handler,
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| SearchError::terminal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|e| {
            SearchError::terminal(format!("Failed to enter alternate screen: {e}"))
        })?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| SearchError::terminal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| SearchError::terminal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| SearchError::terminal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| SearchError::terminal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main loop until the user quits.
    pub async fn run(&mut self, app: &mut App) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let result = self.run_event_loop(app).await;

        app.controller.dispose();
        let _ = panic::take_hook();

        result
    }

    /// The main event loop, separated for cleaner error handling.
    async fn run_event_loop(&mut self, app: &mut App) -> Result<()> {
        loop {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| SearchError::terminal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            tokio::select! {
                input = self.event_handler.next() => match input {
                    Some(event) => app.handle_event(event),
                    None => {
                        debug!("Terminal input closed");
                        app.quit();
                    }
                },
                Some(event) = app.controller.next_event() => {
                    app.controller.apply(event);
                    app.controller.drain_events();
                }
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive search box.
pub async fn run(controller: SuggestionController, api_label: String) -> Result<()> {
    info!("Starting TUI against {}", api_label);
    let mut app = App::new(controller, api_label);
    let mut tui = Tui::new()?;
    tui.run(&mut app).await
}
