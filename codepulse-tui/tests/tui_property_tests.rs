use codepulse_core::Tone;
use codepulse_tui::config::{ConfigError, ThemeConfig, TuiConfig};
use codepulse_tui::keys::{map_input_key, map_key, Action, InputEdit};
use codepulse_tui::nav::Page;
use codepulse_tui::theme::{tag_color, tone_color, OmbraTheme};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use ratatui::style::Color;
use std::io::Write;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:1337".to_string(),
        request_timeout_ms: Some(5_000),
        dashboard_refresh_ms: 30_000,
        tick_ms: 250,
        search_cache_capacity: 16,
        log_path: "tmp/codepulse-tui.log".into(),
        theme: ThemeConfig {
            name: "ombra".to_string(),
        },
    }
}

fn invalid_field(config: &TuiConfig) -> Option<&'static str> {
    match config.validate() {
        Err(ConfigError::InvalidValue { field, .. }) => Some(field),
        _ => None,
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_base_is_valid() {
    assert!(base_config().validate().is_ok());
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "unknown".to_string(),
    };
    assert_eq!(invalid_field(&config), Some("theme.name"));
}

#[test]
fn config_rejects_non_http_base_url() {
    let mut config = base_config();
    config.api_base_url = "localhost:1337".to_string();
    assert_eq!(invalid_field(&config), Some("api_base_url"));
    config.api_base_url = "   ".to_string();
    assert_eq!(invalid_field(&config), Some("api_base_url"));
}

#[test]
fn config_rejects_zero_values() {
    let mut config = base_config();
    config.request_timeout_ms = Some(0);
    assert_eq!(invalid_field(&config), Some("request_timeout_ms"));

    let mut config = base_config();
    config.dashboard_refresh_ms = 0;
    assert_eq!(invalid_field(&config), Some("dashboard_refresh_ms"));

    let mut config = base_config();
    config.search_cache_capacity = 0;
    assert_eq!(invalid_field(&config), Some("search_cache_capacity"));

    let mut config = base_config();
    config.log_path = "".into();
    assert_eq!(invalid_field(&config), Some("log_path"));
}

#[test]
fn config_timeout_is_optional() {
    let mut config = base_config();
    config.request_timeout_ms = None;
    assert!(config.validate().is_ok());
    assert!(config.request_timeout().is_none());
}

#[test]
fn config_loads_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_base_url = "http://127.0.0.1:1337"
dashboard_refresh_ms = 30000
tick_ms = 250
search_cache_capacity = 8
log_path = "logs/codepulse.log"

[theme]
name = "ombra"
"#
    )
    .unwrap();

    let config = TuiConfig::from_path(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.api_base_url, "http://127.0.0.1:1337");
    assert_eq!(config.request_timeout_ms, None);
    assert_eq!(config.dashboard_refresh().as_millis(), 30_000);
    assert_eq!(config.search_cache_capacity, 8);
}

#[test]
fn config_rejects_unknown_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_base_url = "http://127.0.0.1:1337"
dashboard_refresh_ms = 30000
tick_ms = 250
search_cache_capacity = 8
log_path = "codepulse.log"
persist_state = true

[theme]
name = "ombra"
"#
    )
    .unwrap();

    assert!(matches!(
        TuiConfig::from_path(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn config_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        TuiConfig::from_path(&missing),
        Err(ConfigError::Io(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn config_positive_intervals_accepted(
        refresh in 1u64..600_000,
        tick in 1u64..10_000,
        capacity in 1usize..1024,
    ) {
        let mut config = base_config();
        config.dashboard_refresh_ms = refresh;
        config.tick_ms = tick;
        config.search_cache_capacity = capacity;
        prop_assert!(config.validate().is_ok());
    }

    // ========================================================================
    // Keybindings
    // ========================================================================

    #[test]
    fn keybinding_digit_switches_page(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let event = KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        };
        let action = map_key(event);
        match ch {
            '1'..='7' => {
                let index = (ch as u8 - b'1') as usize;
                prop_assert_eq!(action, Some(Action::SwitchPage(index)));
                prop_assert!(Page::from_index(index).is_some());
            }
            _ => prop_assert!(action.is_none()),
        }
    }

    #[test]
    fn all_action_keys_mapped(key_char in "[qr/]") {
        let ch = key_char.chars().next().unwrap();
        let event = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        prop_assert!(map_key(event).is_some(), "Key '{}' should map to an action", ch);
    }

    #[test]
    fn input_mode_treats_chars_as_text(ch in any::<char>()) {
        let event = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        prop_assert_eq!(map_input_key(event), Some(InputEdit::Insert(ch)));
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    #[test]
    fn next_then_previous_is_identity(index in 0usize..7) {
        let page = Page::from_index(index).unwrap();
        prop_assert_eq!(page.next().previous(), page);
        prop_assert_eq!(page.previous().next(), page);
    }

    #[test]
    fn next_cycles_through_every_page(index in 0usize..7) {
        let start = Page::from_index(index).unwrap();
        let mut page = start;
        for _ in 0..Page::all().len() {
            page = page.next();
        }
        prop_assert_eq!(page, start);
    }

    #[test]
    fn unknown_paths_fall_back_to_overview(segment in "[a-z]{1,12}") {
        let path = format!("/x-{}", segment);
        prop_assert_eq!(Page::from_path(&path), Page::Overview);
    }

    #[test]
    fn page_paths_roundtrip(index in 0usize..7) {
        let page = Page::from_index(index).unwrap();
        prop_assert_eq!(Page::from_path(page.path()), page);
    }

    // ========================================================================
    // Theme
    // ========================================================================

    #[test]
    fn tag_color_matches_tone(tone_idx in 0usize..4) {
        let theme = OmbraTheme::ombra();
        let tones = [Tone::Accent, Tone::Warning, Tone::Danger, Tone::Muted];
        let tone = tones[tone_idx];
        prop_assert_eq!(tag_color(Some(tone), &theme), tone_color(tone, &theme));
    }
}

#[test]
fn tab_and_backtab_cycle_pages() {
    assert_eq!(
        map_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)),
        Some(Action::NextPage)
    );
    assert_eq!(
        map_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
        Some(Action::PrevPage)
    );
}

#[test]
fn scroll_keys_move_selection() {
    let cases = [
        (KeyCode::Up, Action::MoveUp),
        (KeyCode::Char('k'), Action::MoveUp),
        (KeyCode::Down, Action::MoveDown),
        (KeyCode::Char('j'), Action::MoveDown),
        (KeyCode::PageUp, Action::PageUp),
        (KeyCode::PageDown, Action::PageDown),
        (KeyCode::Home, Action::Top),
        (KeyCode::End, Action::Bottom),
        (KeyCode::Char('G'), Action::Bottom),
    ];
    for (code, action) in cases {
        assert_eq!(map_key(KeyEvent::new(code, KeyModifiers::NONE)), Some(action));
    }
}

#[test]
fn ctrl_r_refreshes() {
    assert_eq!(
        map_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
        Some(Action::Refresh)
    );
}

#[test]
fn danger_is_red() {
    let theme = OmbraTheme::ombra();
    assert_eq!(theme.danger, Color::Rgb(255, 61, 61));
}
