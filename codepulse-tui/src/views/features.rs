//! Features with implementation progress.

use crate::controller::{features_model, FeatureRow};
use crate::nav::Page;
use crate::state::App;
use crate::views::helpers::{page_block, render_page_state, visible_window};
use crate::widgets::{tag_span, ProgressBar};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const ROW_HEIGHT: u16 = 5;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let model = features_model(&app.cache);
    if render_page_state(f, app, area, "Features", &model.render_state()) {
        return;
    }

    let total = model.items.len();
    let selected = app.selected_row(Page::Features, total);
    let title = format!("Features ({}/{})", selected + 1, total);
    let block = page_block(app, &title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let capacity = (inner.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_window(selected, total, capacity);

    let mut constraints = vec![Constraint::Length(ROW_HEIGHT); end - start];
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (index, (feature, row)) in model.items[start..end].iter().zip(rows.iter()).enumerate() {
        render_feature(f, app, feature, *row, start + index == selected);
    }
}

fn render_feature(f: &mut Frame<'_>, app: &App, feature: &FeatureRow, area: Rect, selected: bool) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(3)])
        .split(area);

    let heading = vec![
        Line::from(vec![
            Span::styled(
                feature.name.clone(),
                Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            tag_span(&feature.priority, &app.theme),
            Span::raw(" "),
            tag_span(&feature.status, &app.theme),
        ]),
        Line::from(Span::styled(
            feature.description.clone(),
            Style::default().fg(app.theme.text_dim),
        )),
    ];
    let mut heading = Paragraph::new(heading);
    if selected {
        heading = heading.style(Style::default().bg(app.theme.bg_secondary));
    }
    f.render_widget(heading, parts[0]);

    ProgressBar {
        title: format!("Implementation: {}", feature.bar_width),
        percent: feature.percent,
        label: feature.bar_width.clone(),
        style: Style::default()
            .fg(app.theme.accent)
            .bg(app.theme.bg_secondary),
    }
    .render(f, parts[1]);
}
