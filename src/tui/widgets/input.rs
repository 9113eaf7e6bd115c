//! Search input widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Width taken by the left border and the "> " prompt.
pub const PROMPT_WIDTH: u16 = 3;

/// Calculates the scroll offset needed to keep the cursor visible.
///
/// Returns the number of characters to skip from the start of the text.
pub fn calculate_scroll_offset(cursor: usize, available_width: usize) -> usize {
    cursor.saturating_sub(available_width)
}

/// Search input bar.
pub struct InputBar<'a> {
    text: &'a str,
    cursor: usize,
    locked: bool,
}

impl<'a> InputBar<'a> {
    /// `cursor` is a character index. A locked bar is drawn dimmed.
    pub fn new(text: &'a str, cursor: usize, locked: bool) -> Self {
        Self {
            text,
            cursor,
            locked,
        }
    }

    /// Characters available for text inside `area`.
    pub fn available_width(area: Rect) -> usize {
        // Borders, prompt and one cell for the cursor.
        area.width.saturating_sub(PROMPT_WIDTH + 2) as usize
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border_style, title) = if self.locked {
            (Style::default().fg(Color::DarkGray), " Search (loading) ")
        } else {
            (Style::default().fg(Color::Cyan), " Search ")
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        let prompt_style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);

        let scroll_offset = calculate_scroll_offset(self.cursor, Self::available_width(area));
        let visible_text: String = self.text.chars().skip(scroll_offset).collect();

        let line = Line::from(vec![
            Span::styled("> ", prompt_style),
            Span::raw(visible_text),
        ]);

        Paragraph::new(line).block(block).render(area, buf);
    }
}
