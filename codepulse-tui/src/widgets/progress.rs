//! Progress bar widget for implementation percentages.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

pub struct ProgressBar {
    pub title: String,
    /// Percentage as derived; may exceed 100.
    pub percent: f64,
    pub label: String,
    pub style: Style,
}

impl ProgressBar {
    /// Gauge ratio. The label keeps the unclamped value; only the bar fill
    /// is limited to the widget's range.
    pub fn ratio(&self) -> f64 {
        if self.percent.is_finite() {
            (self.percent / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let gauge = Gauge::default()
            .block(Block::default().title(self.title.as_str()).borders(Borders::ALL))
            .gauge_style(self.style)
            .ratio(self.ratio())
            .label(self.label.as_str());
        f.render_widget(gauge, area);
    }
}
