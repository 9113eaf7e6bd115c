//! UI rendering for the TUI.
//!
//! Defines the layout, renders all components and records the clickable
//! regions on the app.

use super::app::{App, ScreenLayout};
use super::widgets::{
    fallback::FallbackPanel,
    header::Header,
    input::{InputBar, PROMPT_WIDTH},
    suggestions::{self, SuggestionList},
    toast::Toast,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const HELP_TEXT: &str = " ↑/↓ navigate  Enter select  Esc dismiss  Ctrl+N add term  Ctrl+C quit";

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Input
            Constraint::Min(3),    // Suggestions
            Constraint::Length(1), // Help
        ])
        .split(area);

    render_header(frame, main_layout[0], app);
    render_input(frame, main_layout[1], app);
    app.layout = render_body(frame, main_layout[2], app);
    render_help(frame, main_layout[3]);

    if let Some(message) = app.controller.message() {
        let toast_area = Toast::area(area);
        frame.render_widget(Toast::new(&message.text, message.kind), toast_area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let spinner = app.controller.is_loading().then_some(&app.spinner);
    frame.render_widget(Header::new(&app.api_label, spinner), area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let locked = !app.controller.accepts_input();
    frame.render_widget(InputBar::new(&app.input.text, app.input.cursor, locked), area);

    let available = InputBar::available_width(area);
    let visible_cursor = app.input.cursor.min(available) as u16;
    frame.set_cursor_position((area.x + PROMPT_WIDTH + visible_cursor, area.y + 1));
}

/// Draws the list, the fallback panel or a hint, and returns the hit regions.
fn render_body(frame: &mut Frame, area: Rect, app: &App) -> ScreenLayout {
    let ctl = &app.controller;

    if ctl.merged_len() > 0 {
        let inner = Rect::new(
            area.x + 1,
            area.y + 1,
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        );
        let lines = suggestions::list_lines(ctl.exact().len(), ctl.fuzzy().len());
        let offset = suggestions::scroll_offset(&lines, ctl.selection(), inner.height as usize);

        frame.render_widget(
            SuggestionList::new(ctl.exact(), ctl.fuzzy(), ctl.selection(), offset),
            area,
        );
        return ScreenLayout {
            list: Some(inner),
            list_offset: offset,
            fallback_action: None,
        };
    }

    if ctl.fallback_available() {
        frame.render_widget(FallbackPanel::new(ctl.query()), area);
        return ScreenLayout {
            fallback_action: Some(FallbackPanel::action_area(area)),
            ..ScreenLayout::default()
        };
    }

    let hint = if ctl.query().trim().is_empty() {
        " Start typing to search"
    } else {
        ""
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
    ScreenLayout::default()
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(Span::styled(
        HELP_TEXT,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(help, area);
}
