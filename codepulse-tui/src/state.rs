//! Application state and key handling.

use crate::cache::{FetchOutcome, QueryCache};
use crate::config::TuiConfig;
use crate::controller::Controllers;
use crate::keys::{map_input_key, map_key, Action, InputEdit};
use crate::nav::Page;
use crate::notifications::{Notification, NotificationLevel};
use crate::theme::OmbraTheme;
use crossterm::event::KeyEvent;
use std::time::Instant;

const MAX_NOTIFICATIONS: usize = 20;
const NOTIFICATION_TTL_SECS: i64 = 8;
/// Rows moved by PageUp/PageDown.
pub const PAGE_STEP: usize = 10;

/// Search input line. Focused while the user is typing a query.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub buffer: String,
    pub focused: bool,
}

/// Selected row per page. Reads clamp against the page's current row
/// count; a refresh can shrink the data under a stored position.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    rows: [usize; Page::COUNT],
}

impl Selection {
    pub fn get(&self, page: Page, len: usize) -> usize {
        self.rows[page.index()].min(len.saturating_sub(1))
    }

    pub fn apply(&mut self, page: Page, len: usize, action: Action) {
        let current = self.get(page, len);
        let last = len.saturating_sub(1);
        let next = match action {
            Action::MoveUp => current.saturating_sub(1),
            Action::MoveDown => current.saturating_add(1),
            Action::PageUp => current.saturating_sub(PAGE_STEP),
            Action::PageDown => current.saturating_add(PAGE_STEP),
            Action::Top => 0,
            Action::Bottom => last,
            _ => current,
        };
        self.rows[page.index()] = next.min(last);
    }
}

pub struct App {
    pub config: TuiConfig,
    pub theme: OmbraTheme,
    pub cache: QueryCache,
    pub controllers: Controllers,
    pub active_page: Page,
    pub search_input: SearchInput,
    pub notifications: Vec<Notification>,
    pub selection: Selection,
    dirty: bool,
    drawn_revision: u64,
}

impl App {
    pub fn new(config: TuiConfig, cache: QueryCache, initial: Page) -> Self {
        let controllers = Controllers::new(config.dashboard_refresh());
        let mut app = Self {
            config,
            theme: OmbraTheme::ombra(),
            cache,
            controllers,
            active_page: initial,
            search_input: SearchInput::default(),
            notifications: Vec::new(),
            selection: Selection::default(),
            dirty: true,
            drawn_revision: 0,
        };
        app.controllers.activate(initial, &mut app.cache);
        app
    }

    pub fn navigate(&mut self, page: Page) {
        self.active_page = page;
        self.controllers.activate(page, &mut self.cache);
    }

    /// Selected row of `page`, clamped to `len` rows.
    pub fn selected_row(&self, page: Page, len: usize) -> usize {
        self.selection.get(page, len)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether the screen is out of date: local state changed, or a cache
    /// observer bumped the revision since the last draw. Resets both.
    pub fn take_redraw(&mut self) -> bool {
        let revision = self.controllers.revision();
        let redraw = self.dirty || revision != self.drawn_revision;
        self.dirty = false;
        self.drawn_revision = revision;
        redraw
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
        self.dirty = true;
        if self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Feed a completed fetch back into the cache.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        let failure = outcome
            .result
            .as_ref()
            .err()
            .map(|err| format!("{} refresh failed: {}", outcome.key, err));
        if self.cache.apply(outcome) {
            if let Some(message) = failure {
                self.notify(NotificationLevel::Warning, message);
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.cache.poll_due(now);
        let ttl = chrono::Duration::seconds(NOTIFICATION_TTL_SECS);
        let wall = chrono::Utc::now();
        let before = self.notifications.len();
        self.notifications.retain(|note| !note.is_expired(wall, ttl));
        if self.notifications.len() != before {
            self.dirty = true;
        }
    }

    /// Handle one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.dirty = true;
        if self.search_input.focused {
            if let Some(edit) = map_input_key(key) {
                self.handle_input_edit(edit);
            }
            return false;
        }
        match map_key(key) {
            Some(action) => self.handle_action(action),
            None => false,
        }
    }

    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::NextPage => self.navigate(self.active_page.next()),
            Action::PrevPage => self.navigate(self.active_page.previous()),
            Action::SwitchPage(index) => {
                if let Some(page) = Page::from_index(index) {
                    self.navigate(page);
                }
            }
            Action::MoveUp
            | Action::MoveDown
            | Action::PageUp
            | Action::PageDown
            | Action::Top
            | Action::Bottom => {
                let len = self.controllers.row_count(self.active_page, &self.cache);
                self.selection.apply(self.active_page, len, action);
            }
            Action::Refresh => {
                if !self.controllers.refresh(self.active_page, &mut self.cache) {
                    self.notify(NotificationLevel::Info, "Nothing to refresh yet.");
                }
            }
            Action::OpenSearch => {
                self.navigate(Page::Search);
                self.search_input.focused = true;
            }
            Action::Confirm => {
                if self.active_page == Page::Search {
                    self.search_input.focused = true;
                }
            }
            Action::Cancel => self.notifications.clear(),
        }
        false
    }

    fn handle_input_edit(&mut self, edit: InputEdit) {
        match edit {
            InputEdit::Insert(c) => self.search_input.buffer.push(c),
            InputEdit::Backspace => {
                self.search_input.buffer.pop();
            }
            InputEdit::Clear => self.search_input.buffer.clear(),
            InputEdit::Submit => {
                if self
                    .controllers
                    .search
                    .submit(&mut self.cache, &self.search_input.buffer)
                {
                    self.search_input.focused = false;
                }
            }
            InputEdit::Leave => self.search_input.focused = false,
        }
    }

    pub fn shutdown(&mut self) {
        self.controllers.teardown(&mut self.cache);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_moves_within_bounds() {
        let mut selection = Selection::default();
        selection.apply(Page::Files, 25, Action::PageDown);
        selection.apply(Page::Files, 25, Action::PageDown);
        selection.apply(Page::Files, 25, Action::PageDown);
        assert_eq!(selection.get(Page::Files, 25), 24);
        selection.apply(Page::Files, 25, Action::MoveDown);
        assert_eq!(selection.get(Page::Files, 25), 24);
        selection.apply(Page::Files, 25, Action::PageUp);
        assert_eq!(selection.get(Page::Files, 25), 14);
        selection.apply(Page::Files, 25, Action::Top);
        selection.apply(Page::Files, 25, Action::MoveUp);
        assert_eq!(selection.get(Page::Files, 25), 0);
    }

    #[test]
    fn test_selection_clamps_when_rows_shrink() {
        let mut selection = Selection::default();
        selection.apply(Page::Tasks, 50, Action::Bottom);
        assert_eq!(selection.get(Page::Tasks, 50), 49);
        assert_eq!(selection.get(Page::Tasks, 5), 4);
        assert_eq!(selection.get(Page::Tasks, 0), 0);
        assert_eq!(selection.get(Page::Stubs, 50), 0);
    }
}
