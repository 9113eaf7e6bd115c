//! Header widget for the TUI.
//!
//! Displays the application name, version, the loading spinner and the
//! suggestion API in use.

use super::spinner::Spinner;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    api_label: &'a str,
    spinner: Option<&'a Spinner>,
}

impl<'a> Header<'a> {
    /// Creates a new header. The spinner is shown only when given.
    pub fn new(api_label: &'a str, spinner: Option<&'a Spinner>) -> Self {
        Self { api_label, spinner }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" Smart Search v{}", env!("CARGO_PKG_VERSION"));
        let left_span = Span::styled(left_text, style);
        buf.set_span(area.x, area.y, &left_span, area.width);

        if let Some(spinner) = self.spinner {
            let spinner_text = spinner.display();
            let spinner_style = style.fg(Color::Yellow);
            let spinner_width = spinner_text.chars().count() as u16;
            let spinner_x = area.x + (area.width.saturating_sub(spinner_width)) / 2;
            buf.set_string(spinner_x, area.y, &spinner_text, spinner_style);
        }

        let right_text = format!(" [api: {}] ", self.api_label);
        let right_width = right_text.chars().count() as u16;
        if right_width < area.width / 2 {
            let right_x = area.right().saturating_sub(right_width);
            buf.set_string(right_x, area.y, &right_text, style.remove_modifier(Modifier::BOLD));
        }
    }
}
