//! Registered components.

use crate::controller::components_model;
use crate::nav::Page;
use crate::state::App;
use crate::views::helpers::{page_block, render_page_state};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let model = components_model(&app.cache);
    if render_page_state(f, app, area, "Components", &model.render_state()) {
        return;
    }

    let items: Vec<ListItem> = model
        .items
        .iter()
        .map(|component| {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    component.name.clone(),
                    Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", component.component_type),
                    Style::default().fg(app.theme.muted),
                ),
            ])];
            if !component.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    component.description.clone(),
                    Style::default().fg(app.theme.text_dim),
                )));
            }
            lines.push(Line::from(vec![
                Span::styled("Path: ", Style::default().fg(app.theme.text_dim)),
                Span::raw(component.root_path.clone()),
                Span::styled("  Language: ", Style::default().fg(app.theme.text_dim)),
                Span::raw(component.language.clone()),
            ]));
            lines.push(Line::default());
            ListItem::new(lines)
        })
        .collect();

    let mut state = ListState::default()
        .with_selected(Some(app.selected_row(Page::Components, model.items.len())));
    let list = List::new(items)
        .block(page_block(app, "Components"))
        .highlight_style(Style::default().bg(app.theme.bg_secondary));
    f.render_stateful_widget(list, area, &mut state);
}
