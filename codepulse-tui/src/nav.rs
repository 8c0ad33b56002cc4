//! Navigation: the seven pages and their resource bindings.

use crate::cache::RefreshPolicy;
use codepulse_core::ResourceKey;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Overview,
    Components,
    Features,
    Files,
    Stubs,
    Tasks,
    Search,
}

impl Page {
    pub const COUNT: usize = 7;

    pub fn title(&self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Components => "Components",
            Page::Features => "Features",
            Page::Files => "Files",
            Page::Stubs => "Stubs",
            Page::Tasks => "Tasks",
            Page::Search => "Search",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Overview => "/",
            Page::Components => "/components",
            Page::Features => "/features",
            Page::Files => "/files",
            Page::Stubs => "/stubs",
            Page::Tasks => "/tasks",
            Page::Search => "/search",
        }
    }

    /// Resolve a location path. Unmatched paths land on the overview.
    pub fn from_path(path: &str) -> Page {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        Self::all()
            .iter()
            .copied()
            .find(|page| page.path().trim_end_matches('/') == trimmed)
            .unwrap_or(Page::Overview)
    }

    pub fn all() -> &'static [Page] {
        &[
            Page::Overview,
            Page::Components,
            Page::Features,
            Page::Files,
            Page::Stubs,
            Page::Tasks,
            Page::Search,
        ]
    }

    pub fn index(&self) -> usize {
        Self::all()
            .iter()
            .position(|p| p == self)
            .unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Page> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> Page {
        let idx = self.index();
        let all = Self::all();
        let next = (idx + 1) % all.len();
        all[next]
    }

    pub fn previous(&self) -> Page {
        let idx = self.index();
        let all = Self::all();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }

    /// Fixed resource this page subscribes to. Search keys are per query.
    pub fn resource_key(&self) -> Option<ResourceKey> {
        match self {
            Page::Overview => Some(ResourceKey::Dashboard),
            Page::Components => Some(ResourceKey::Components),
            Page::Features => Some(ResourceKey::Features),
            Page::Files => Some(ResourceKey::Files),
            Page::Stubs => Some(ResourceKey::Stubs),
            Page::Tasks => Some(ResourceKey::Tasks),
            Page::Search => None,
        }
    }

    /// Overview polls on `dashboard_refresh`; list pages fetch once; search
    /// only fetches on submit.
    pub fn default_policy(&self, dashboard_refresh: Duration) -> RefreshPolicy {
        match self {
            Page::Overview => RefreshPolicy::every(dashboard_refresh),
            Page::Search => RefreshPolicy::manual(),
            _ => RefreshPolicy::once(),
        }
    }
}
