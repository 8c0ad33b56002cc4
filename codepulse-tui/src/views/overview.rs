//! Project overview: stat cards, components, priority tasks, activity.

use crate::controller::{
    overview_model, OverviewModel, OVERVIEW_ACTIVITY_EMPTY, OVERVIEW_COMPONENTS_EMPTY,
    OVERVIEW_TASKS_EMPTY,
};
use crate::state::App;
use crate::views::helpers::{hint_line, page_block, render_page_state};
use crate::widgets::{tag_span, StatCardWidget};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let model = overview_model(&app.cache);
    if render_page_state(f, app, area, "Project Overview", &model.render_state()) {
        return;
    }
    let Some(overview) = model.items.first() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(10),
        ])
        .split(area);

    render_stats(f, app, overview, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_components(f, app, overview, columns[0]);
    render_priority_tasks(f, app, overview, columns[1]);
    render_activity(f, app, overview, rows[2]);
}

fn render_stats(f: &mut Frame<'_>, app: &App, overview: &OverviewModel, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    for (card, cell) in overview.stats.iter().zip(cells.iter()) {
        StatCardWidget {
            card,
            theme: &app.theme,
        }
        .render(f, *cell);
    }
}

fn render_components(f: &mut Frame<'_>, app: &App, overview: &OverviewModel, area: Rect) {
    let block = page_block(app, "Components");
    if overview.components.is_empty() {
        f.render_widget(Paragraph::new(hint_line(app, OVERVIEW_COMPONENTS_EMPTY)).block(block), area);
        return;
    }
    let items: Vec<ListItem> = overview
        .components
        .iter()
        .map(|row| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(row.name.clone(), Style::default().fg(app.theme.text)),
                    Span::raw("  "),
                    Span::styled(row.loc.clone(), Style::default().fg(app.theme.text_dim)),
                ]),
                Line::from(Span::styled(
                    row.detail.clone(),
                    Style::default().fg(app.theme.text_dim),
                )),
            ])
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn render_priority_tasks(f: &mut Frame<'_>, app: &App, overview: &OverviewModel, area: Rect) {
    let block = page_block(app, "Priority Tasks");
    if overview.priority_tasks.is_empty() {
        f.render_widget(Paragraph::new(hint_line(app, OVERVIEW_TASKS_EMPTY)).block(block), area);
        return;
    }
    let items: Vec<ListItem> = overview
        .priority_tasks
        .iter()
        .map(|task| {
            ListItem::new(Line::from(vec![
                tag_span(&task.priority, &app.theme),
                Span::raw(" "),
                Span::styled(task.title.clone(), Style::default().fg(app.theme.text)),
                Span::raw(" "),
                Span::styled(
                    task.status.label.clone(),
                    Style::default().fg(app.theme.text_dim),
                ),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn render_activity(f: &mut Frame<'_>, app: &App, overview: &OverviewModel, area: Rect) {
    let block = page_block(app, "Recent Activity");
    if overview.recent_activity.is_empty() {
        f.render_widget(Paragraph::new(hint_line(app, OVERVIEW_ACTIVITY_EMPTY)).block(block), area);
        return;
    }
    let items: Vec<ListItem> = overview
        .recent_activity
        .iter()
        .map(|activity| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<16}", activity.performed_at),
                    Style::default().fg(app.theme.text_dim),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", activity.action),
                    Style::default().fg(app.theme.muted),
                ),
                Span::raw(" "),
                Span::styled(
                    activity.entity_type.clone(),
                    Style::default().fg(app.theme.text_dim),
                ),
                Span::raw(" "),
                Span::styled(activity.entity.clone(), Style::default().fg(app.theme.text)),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}
