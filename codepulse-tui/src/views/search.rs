//! Free-text search: input line and verbatim results.

use crate::nav::Page;
use crate::state::App;
use crate::views::helpers::{page_block, render_page_state, visible_window};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const PLACEHOLDER: &str = "Search functions, files, features...";

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_input(f, app, parts[0]);

    let model = app.controllers.search.model(&app.cache);
    if render_page_state(f, app, parts[1], "Results", &model.render_state()) {
        return;
    }
    let selected = app.selected_row(Page::Search, model.items.len());
    let lines: Vec<Line> = model
        .items
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let mut style = Style::default().fg(app.theme.text);
            if index == selected {
                style = style.bg(app.theme.bg_secondary);
            }
            Line::from(Span::styled(line.clone(), style))
        })
        .collect();

    let block = page_block(app, "Results");
    let capacity = block.inner(parts[1]).height as usize;
    let (start, _) = visible_window(selected, lines.len(), capacity);
    let results = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(start).unwrap_or(u16::MAX), 0));
    f.render_widget(results, parts[1]);
}

fn render_input(f: &mut Frame<'_>, app: &App, area: Rect) {
    let input = &app.search_input;
    let line = if input.buffer.is_empty() && !input.focused {
        Line::from(Span::styled(PLACEHOLDER, Style::default().fg(app.theme.text_dim)))
    } else {
        let mut spans = vec![Span::styled(input.buffer.clone(), Style::default().fg(app.theme.text))];
        if input.focused {
            spans.push(Span::styled("_", Style::default().fg(app.theme.accent)));
        }
        Line::from(spans)
    };
    let border = if input.focused {
        app.theme.border_focus
    } else {
        app.theme.border
    };
    let block = page_block(app, "Search [/]").border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(line).block(block), area);
}
