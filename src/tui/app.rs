//! Application state for the TUI.
//!
//! Maps terminal input onto the suggestion controller and keeps the text
//! field in step with the controller's query.

use crate::controller::{NavKey, NavOutcome, SuggestionController};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use super::widgets::spinner::Spinner;
use super::widgets::suggestions;
use super::Event;

/// Input state for text editing.
///
/// `cursor` counts characters, not bytes.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current input text.
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor. Returns true if text changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    /// Deletes the character at the cursor. Returns true if text changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Replaces the text and puts the cursor at the end.
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.move_end();
    }

    /// Clears the input. Returns true if there was anything to clear.
    pub fn clear(&mut self) -> bool {
        self.cursor = 0;
        !std::mem::take(&mut self.text).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Screen regions recorded at render time for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Inner area of the suggestion list, when shown.
    pub list: Option<Rect>,
    /// First visible line of the suggestion list.
    pub list_offset: usize,
    /// The clickable "add term" line, when shown.
    pub fallback_action: Option<Rect>,
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Search field state.
    pub input: InputState,
    pub controller: SuggestionController,
    pub spinner: Spinner,
    /// Where the suggestion API lives, for the header.
    pub api_label: String,
    pub layout: ScreenLayout,
}

impl App {
    pub fn new(controller: SuggestionController, api_label: impl Into<String>) -> Self {
        Self {
            running: true,
            input: InputState::new(),
            controller,
            spinner: Spinner::searching(),
            api_label: api_label.into(),
            layout: ScreenLayout::default(),
        }
    }

    /// Handles a terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(_, _) | Event::Tick => {}
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.quit();
            }
            KeyCode::Char('n') if ctrl => {
                if !self.controller.add_term() {
                    debug!("Add term not available for '{}'", self.controller.query());
                }
            }
            KeyCode::Char('u') if ctrl => {
                if self.controller.accepts_input() && self.input.clear() {
                    self.sync_query();
                }
            }

            KeyCode::Up => self.navigate(NavKey::Up),
            KeyCode::Down => self.navigate(NavKey::Down),
            KeyCode::Enter => self.navigate(NavKey::Enter),
            KeyCode::Esc => self.navigate(NavKey::Escape),

            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),

            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                if self.controller.accepts_input() {
                    self.input.insert(c);
                    self.sync_query();
                }
            }
            KeyCode::Backspace => {
                if self.controller.accepts_input() && self.input.backspace() {
                    self.sync_query();
                }
            }
            KeyCode::Delete => {
                if self.controller.accepts_input() && self.input.delete() {
                    self.sync_query();
                }
            }
            _ => {}
        }
    }

    /// Handles a mouse event. Only left clicks do anything.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        self.click(mouse.column, mouse.row);
    }

    /// Left click at a screen cell.
    pub fn click(&mut self, column: u16, row: u16) {
        let position = Position::new(column, row);

        if let Some(list) = self.layout.list.filter(|area| area.contains(position)) {
            let line = (row - list.y) as usize;
            let row_index = suggestions::row_at(
                self.controller.exact().len(),
                self.controller.fuzzy().len(),
                self.layout.list_offset,
                line,
            );
            if let Some(index) = row_index {
                if self.controller.select(index) {
                    self.input.set(self.controller.query());
                }
            }
            return;
        }

        if self
            .layout
            .fallback_action
            .is_some_and(|area| area.contains(position))
        {
            self.controller.add_term();
        }
    }

    fn navigate(&mut self, key: NavKey) {
        if let NavOutcome::Commit(_) = self.controller.handle_key(key) {
            self.input.set(self.controller.query());
        }
    }

    fn sync_query(&mut self) {
        self.controller.set_query(self.input.text.clone());
    }

    /// Stops the app and tears the controller down.
    pub fn quit(&mut self) {
        self.running = false;
        self.controller.dispose();
    }
}
