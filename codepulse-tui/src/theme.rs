//! Ombra theme and color utilities.

use crate::cache::FetchStatus;
use codepulse_core::Tone;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct OmbraTheme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub accent: Color,
    pub warning: Color,
    pub danger: Color,
    pub muted: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl OmbraTheme {
    pub fn ombra() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 15),
            bg_secondary: Color::Rgb(18, 18, 26),
            accent: Color::Rgb(0, 255, 157),
            warning: Color::Rgb(255, 157, 0),
            danger: Color::Rgb(255, 61, 61),
            muted: Color::Rgb(74, 74, 90),
            text: Color::Rgb(229, 231, 235),
            text_dim: Color::Rgb(107, 114, 128),
            border: Color::Rgb(31, 41, 55),
            border_focus: Color::Rgb(0, 255, 157),
        }
    }
}

pub fn tone_color(tone: Tone, theme: &OmbraTheme) -> Color {
    match tone {
        Tone::Accent => theme.accent,
        Tone::Warning => theme.warning,
        Tone::Danger => theme.danger,
        Tone::Muted => theme.muted,
    }
}

/// Unknown tag values render in plain text colour.
pub fn tag_color(tone: Option<Tone>, theme: &OmbraTheme) -> Color {
    tone.map(|tone| tone_color(tone, theme))
        .unwrap_or(theme.text)
}

pub fn fetch_status_color(status: FetchStatus, theme: &OmbraTheme) -> Color {
    match status {
        FetchStatus::Idle => theme.text_dim,
        FetchStatus::Loading => theme.warning,
        FetchStatus::Success => theme.accent,
        FetchStatus::Error => theme.danger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_palette() {
        let theme = OmbraTheme::ombra();
        assert_eq!(tone_color(Tone::Accent, &theme), Color::Rgb(0x00, 0xff, 0x9d));
        assert_eq!(tone_color(Tone::Warning, &theme), Color::Rgb(0xff, 0x9d, 0x00));
        assert_eq!(tone_color(Tone::Danger, &theme), Color::Rgb(0xff, 0x3d, 0x3d));
        assert_eq!(tone_color(Tone::Muted, &theme), Color::Rgb(0x4a, 0x4a, 0x5a));
    }

    #[test]
    fn test_unknown_tag_uses_text_color() {
        let theme = OmbraTheme::ombra();
        assert_eq!(tag_color(None, &theme), theme.text);
    }
}
