//! Indexed files table.

use crate::controller::files_model;
use crate::nav::Page;
use crate::state::App;
use crate::theme::tone_color;
use crate::views::helpers::{page_block, render_page_state};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Cell, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let model = files_model(&app.cache);
    if render_page_state(f, app, area, "Indexed Files", &model.render_state()) {
        return;
    }

    let dim = Style::default().fg(app.theme.text_dim);
    let header = Row::new(vec!["File", "LOC", "Functions", "Stubs"])
        .style(dim.add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = model
        .items
        .iter()
        .map(|file| {
            Row::new(vec![
                Cell::from(Span::styled(file.filename.clone(), Style::default().fg(app.theme.text))),
                Cell::from(Span::styled(file.line_count.to_string(), dim)),
                Cell::from(Span::styled(file.function_count.to_string(), dim)),
                Cell::from(Span::styled(
                    file.stub_count.to_string(),
                    Style::default().fg(tone_color(file.stub_tone, &app.theme)),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
    ];
    let title = format!("Indexed Files ({})", model.items.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(page_block(app, &title))
        .highlight_style(Style::default().bg(app.theme.bg_secondary));
    let mut state = TableState::default()
        .with_selected(Some(app.selected_row(Page::Files, model.items.len())));
    f.render_stateful_widget(table, area, &mut state);
}
