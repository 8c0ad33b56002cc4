//! Task list.

use crate::controller::tasks_model;
use crate::nav::Page;
use crate::state::App;
use crate::views::helpers::{page_block, render_page_state};
use crate::widgets::tag_span;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let model = tasks_model(&app.cache);
    if render_page_state(f, app, area, "Tasks", &model.render_state()) {
        return;
    }

    let items: Vec<ListItem> = model
        .items
        .iter()
        .map(|task| {
            let mut heading = vec![
                tag_span(&task.priority, &app.theme),
                Span::raw(" "),
                Span::styled(
                    task.title.clone(),
                    Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                tag_span(&task.status, &app.theme),
            ];
            if let Some(feature) = &task.feature_name {
                heading.push(Span::styled(
                    format!("  {}", feature),
                    Style::default().fg(app.theme.muted),
                ));
            }
            ListItem::new(vec![
                Line::from(heading),
                Line::from(Span::styled(
                    task.description.clone(),
                    Style::default().fg(app.theme.text_dim),
                )),
                Line::default(),
            ])
        })
        .collect();

    let mut state = ListState::default()
        .with_selected(Some(app.selected_row(Page::Tasks, model.items.len())));
    let list = List::new(items)
        .block(page_block(app, "Tasks"))
        .highlight_style(Style::default().bg(app.theme.bg_secondary));
    f.render_stateful_widget(list, area, &mut state);
}
