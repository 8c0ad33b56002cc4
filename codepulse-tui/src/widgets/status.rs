//! Stat card and tag widgets.

use crate::controller::{StatCard, Tag};
use crate::theme::{tag_color, tone_color, OmbraTheme};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct StatCardWidget<'a> {
    pub card: &'a StatCard,
    pub theme: &'a OmbraTheme,
}

impl StatCardWidget<'_> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let color = tone_color(self.card.tone, self.theme);
        let lines = vec![
            Line::from(Span::styled(
                self.card.value.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.card.sub_value.clone(),
                Style::default().fg(self.theme.text_dim),
            )),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(self.card.label, Style::default().fg(self.theme.text_dim)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(paragraph, area);
    }
}

/// Bracketed tag label coloured by its tone. Empty labels render nothing.
pub fn tag_span(tag: &Tag, theme: &OmbraTheme) -> Span<'static> {
    if tag.label.is_empty() {
        return Span::raw("");
    }
    Span::styled(
        format!("[{}]", tag.label),
        Style::default().fg(tag_color(tag.tone, theme)),
    )
}
