//! Detected stubs.

use crate::controller::stubs_model;
use crate::nav::Page;
use crate::state::App;
use crate::views::helpers::{page_block, render_page_state};
use crate::widgets::tag_span;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let model = stubs_model(&app.cache);
    if render_page_state(f, app, area, "Stub Detection", &model.render_state()) {
        return;
    }

    let items: Vec<ListItem> = model
        .items
        .iter()
        .map(|stub| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(stub.function_name.clone(), Style::default().fg(app.theme.text)),
                    Span::raw("  "),
                    Span::styled(
                        format!("[{}]", stub.stub_type),
                        Style::default().fg(app.theme.warning),
                    ),
                    Span::raw(" "),
                    tag_span(&stub.severity, &app.theme),
                ]),
                Line::from(Span::styled(
                    stub.detection_reason.clone(),
                    Style::default().fg(app.theme.text_dim),
                )),
                Line::from(Span::styled(
                    stub.location.clone(),
                    Style::default().fg(app.theme.muted),
                )),
                Line::default(),
            ])
        })
        .collect();

    let block = page_block(app, "Stub Detection").border_style(Style::default().fg(app.theme.warning));
    let mut state = ListState::default()
        .with_selected(Some(app.selected_row(Page::Stubs, model.items.len())));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(app.theme.bg_secondary));
    f.render_stateful_widget(list, area, &mut state);
}
