//! Common view rendering helpers.

use crate::controller::RenderState;
use crate::state::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw the loading, error or empty state of a page.
///
/// Returns `true` when something was drawn; `false` means the caller owns
/// the area and should render content.
pub fn render_page_state(f: &mut Frame<'_>, app: &App, area: Rect, title: &str, state: &RenderState) -> bool {
    let (text, style, border) = match state {
        RenderState::Content => return false,
        RenderState::Loading => (
            "Loading...".to_string(),
            Style::default().fg(app.theme.accent),
            app.theme.border,
        ),
        RenderState::Error(message) => (
            format!("Error: {}", message),
            Style::default().fg(app.theme.danger).add_modifier(Modifier::BOLD),
            app.theme.danger,
        ),
        RenderState::Empty(hint) => (
            hint.to_string(),
            Style::default().fg(app.theme.text_dim),
            app.theme.border,
        ),
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(page_block(app, title).border_style(Style::default().fg(border)));
    f.render_widget(paragraph, area);
    true
}

pub fn page_block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(Span::styled(title, Style::default().fg(app.theme.text)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

/// Inline hint for an empty panel inside otherwise rendered content.
pub fn hint_line(app: &App, hint: &str) -> Line<'static> {
    Line::from(Span::styled(
        hint.to_string(),
        Style::default().fg(app.theme.text_dim),
    ))
}

/// Rows `[start, end)` that fit `capacity` and keep `selected` on screen.
pub fn visible_window(selected: usize, total: usize, capacity: usize) -> (usize, usize) {
    let capacity = capacity.max(1);
    let start = (selected + 1).saturating_sub(capacity);
    (start, total.min(start + capacity))
}
