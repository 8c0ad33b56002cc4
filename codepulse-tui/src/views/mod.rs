//! View rendering dispatch.

pub mod components;
pub mod features;
pub mod files;
pub mod helpers;
pub mod overview;
pub mod search;
pub mod stubs;
pub mod tasks;

pub use helpers::{page_block, render_page_state};

use crate::cache::FetchStatus;
use crate::nav::Page;
use crate::notifications::NotificationLevel;
use crate::state::App;
use crate::theme::fetch_status_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(0)])
        .split(layout[1]);

    render_sidebar(f, app, body[0]);

    match app.active_page {
        Page::Overview => overview::render(f, app, body[1]),
        Page::Components => components::render(f, app, body[1]),
        Page::Features => features::render(f, app, body[1]),
        Page::Files => files::render(f, app, body[1]),
        Page::Stubs => stubs::render(f, app, body[1]),
        Page::Tasks => tasks::render(f, app, body[1]),
        Page::Search => search::render(f, app, body[1]),
    }

    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let key = match app.active_page {
        Page::Search => app.controllers.search.current_key().cloned(),
        page => page.resource_key(),
    };
    let (status, fetched) = match key {
        Some(key) => match app.cache.entry(&key) {
            Some(entry) => (
                entry.status,
                entry
                    .last_fetched_at
                    .map(|at| at.format("%H:%M:%S").to_string()),
            ),
            None => (FetchStatus::Idle, None),
        },
        None => (FetchStatus::Idle, None),
    };

    let mut spans = vec![
        Span::styled(
            "CODEPULSE",
            Style::default().fg(app.theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | {} | {} | ", app.config.api_base_url, app.active_page.title())),
        Span::styled(status.to_string(), Style::default().fg(fetch_status_color(status, &app.theme))),
    ];
    if let Some(fetched) = fetched {
        spans.push(Span::styled(
            format!(" | updated {}", fetched),
            Style::default().fg(app.theme.text_dim),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(header, area);
}

/// Always drawn, whatever state the active page's fetch is in.
fn render_sidebar(f: &mut Frame<'_>, app: &App, area: Rect) {
    let items: Vec<ListItem> = Page::all()
        .iter()
        .enumerate()
        .map(|(index, page)| {
            let style = if *page == app.active_page {
                Style::default().fg(app.theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text_dim)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{} {}", index + 1, page.title()),
                style,
            )))
        })
        .collect();
    let block = Block::default()
        .title(Span::styled("OMBRA", Style::default().fg(app.theme.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    f.render_widget(List::new(items).block(block), area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = if app.search_input.focused {
        "type query • Enter search • Ctrl-U clear • Esc leave input"
    } else {
        "Tab/1-7 switch page • j/k PgUp/PgDn scroll • r refresh • / search • Esc dismiss • q quit"
    };
    let (text, style) = if let Some(note) = app.notifications.last() {
        let (label, color) = match note.level {
            NotificationLevel::Info => ("INFO", app.theme.accent),
            NotificationLevel::Warning => ("WARN", app.theme.warning),
            NotificationLevel::Error => ("ERROR", app.theme.danger),
        };
        (format!("{}: {}", label, note.message), Style::default().fg(color))
    } else {
        (help.to_string(), Style::default().fg(app.theme.text_dim))
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}
