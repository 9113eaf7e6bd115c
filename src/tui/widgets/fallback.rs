//! "No results" panel offering to add the query as a new term.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Fallback panel widget.
pub struct FallbackPanel<'a> {
    query: &'a str,
}

impl<'a> FallbackPanel<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }

    /// Screen row of the clickable "add" line inside `area`.
    pub fn action_area(area: Rect) -> Rect {
        let inner = Rect::new(
            area.x.saturating_add(1),
            area.y.saturating_add(1),
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        );
        if inner.height < 3 {
            return Rect::new(inner.x, inner.y, inner.width, 0);
        }
        Rect::new(inner.x, inner.y + 2, inner.width, 1)
    }
}

impl Widget for FallbackPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Suggestions ");
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(Span::styled(
                format!("No results found for \"{}\"", self.query),
                Style::default().fg(Color::Gray),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled(
                    format!("+ Add \"{}\" to database", self.query),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (Ctrl+N)", Style::default().fg(Color::DarkGray)),
            ]),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
