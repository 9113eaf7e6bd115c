//! Toast widget for transient status messages.

use crate::controller::MessageKind;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Toast notification widget.
pub struct Toast<'a> {
    message: &'a str,
    kind: MessageKind,
}

impl<'a> Toast<'a> {
    pub fn new(message: &'a str, kind: MessageKind) -> Self {
        Self { message, kind }
    }

    /// Calculates the area for the toast (bottom-right corner).
    pub fn area(screen: Rect) -> Rect {
        let width = 40.min(screen.width.saturating_sub(4));
        let height = 3.min(screen.height);
        let x = screen.x + screen.width.saturating_sub(width + 2);
        let y = screen.y + screen.height.saturating_sub(height + 1);
        Rect::new(x, y, width, height)
    }
}

impl Widget for Toast<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let color = match self.kind {
            MessageKind::Success => Color::Green,
            MessageKind::Error => Color::Red,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(area);
        block.render(area, buf);

        let max_len = inner.width as usize;
        let display_msg = if self.message.chars().count() > max_len {
            let truncated: String = self.message.chars().take(max_len.saturating_sub(1)).collect();
            format!("{truncated}…")
        } else {
            self.message.to_string()
        };

        let line = Line::from(Span::styled(
            display_msg,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));

        Paragraph::new(line).render(inner, buf);
    }
}
