//! Suggestion list widget.
//!
//! Shows the exact group, then the similar group, each under its own heading.
//! Row indices are positions in the merged list; headings are not selectable.

use crate::backend::{ExactSuggestion, FuzzySuggestion};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub const EXACT_TITLE: &str = "Exact Matches";
pub const FUZZY_TITLE: &str = "Similar Terms";

/// One visual line of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLine {
    Heading(&'static str),
    Row(usize),
}

/// Lays out headings and rows for the given group sizes.
pub fn list_lines(exact_len: usize, fuzzy_len: usize) -> Vec<ListLine> {
    let mut lines = Vec::with_capacity(exact_len + fuzzy_len + 2);
    if exact_len > 0 {
        lines.push(ListLine::Heading(EXACT_TITLE));
        lines.extend((0..exact_len).map(ListLine::Row));
    }
    if fuzzy_len > 0 {
        lines.push(ListLine::Heading(FUZZY_TITLE));
        lines.extend((exact_len..exact_len + fuzzy_len).map(ListLine::Row));
    }
    lines
}

/// First visible line so that the selected row stays on screen.
pub fn scroll_offset(lines: &[ListLine], selected: Option<usize>, height: usize) -> usize {
    let Some(selected) = selected else {
        return 0;
    };
    let position = lines
        .iter()
        .position(|line| *line == ListLine::Row(selected))
        .unwrap_or(0);
    (position + 1).saturating_sub(height)
}

/// Merged-list index under visible line `line`, if it is a row.
pub fn row_at(exact_len: usize, fuzzy_len: usize, offset: usize, line: usize) -> Option<usize> {
    match list_lines(exact_len, fuzzy_len).get(offset + line) {
        Some(ListLine::Row(index)) => Some(*index),
        _ => None,
    }
}

/// Heat without a trailing `.0` for whole numbers.
pub fn format_heat(heat: f64) -> String {
    if heat.fract() == 0.0 {
        format!("{heat:.0}")
    } else {
        format!("{heat:.1}")
    }
}

/// Suggestion list widget.
pub struct SuggestionList<'a> {
    exact: &'a [ExactSuggestion],
    fuzzy: &'a [FuzzySuggestion],
    selected: Option<usize>,
    offset: usize,
}

impl<'a> SuggestionList<'a> {
    pub fn new(
        exact: &'a [ExactSuggestion],
        fuzzy: &'a [FuzzySuggestion],
        selected: Option<usize>,
        offset: usize,
    ) -> Self {
        Self {
            exact,
            fuzzy,
            selected,
            offset,
        }
    }

    fn row_line(&self, index: usize, width: usize) -> Line<'a> {
        let (term, score, term_style) = match index.checked_sub(self.exact.len()) {
            None => {
                let s = &self.exact[index];
                (s.term.as_str(), format!("Heat: {}", format_heat(s.heat)), Style::default())
            }
            Some(offset) => {
                let s = &self.fuzzy[offset];
                (
                    s.term.as_str(),
                    format!("Similarity: {}%", s.percent()),
                    Style::default().fg(Color::Cyan),
                )
            }
        };

        let selected = self.selected == Some(index);
        let marker = if selected { "> " } else { "  " };
        let used = marker.len() + term.chars().count() + score.chars().count();
        let padding = " ".repeat(width.saturating_sub(used).max(1));

        let line = Line::from(vec![
            Span::raw(marker),
            Span::styled(term, term_style),
            Span::raw(padding),
            Span::styled(score, Style::default().fg(Color::DarkGray)),
        ]);

        if selected {
            line.style(
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            line
        }
    }
}

impl Widget for SuggestionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Suggestions ");
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let heading_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let lines: Vec<Line> = list_lines(self.exact.len(), self.fuzzy.len())
            .into_iter()
            .skip(self.offset)
            .take(inner.height as usize)
            .map(|line| match line {
                ListLine::Heading(title) => Line::from(Span::styled(title, heading_style)),
                ListLine::Row(index) => self.row_line(index, width),
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
