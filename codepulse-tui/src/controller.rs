//! View controllers: bind pages to cache entries and derive render-ready
//! models. Controllers never fail; fetch errors become part of the model.

use crate::cache::{CacheEntry, FetchStatus, QueryCache, RefreshPolicy, SubscriptionId};
use crate::nav::Page;
use codepulse_core::derive::{self, ACTIVITY_LIMIT, PRIORITY_TASK_LIMIT};
use codepulse_core::{
    Activity, Component, ComponentSummary, DashboardPayload, Feature, FileRecord, Resource,
    ResourceKey, Stub, Task, Tone,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const COMPONENTS_EMPTY: &str =
    "No components registered. Use the MCP tools to register components.";
pub const FEATURES_EMPTY: &str = "No features registered. Use the MCP tools to create features.";
pub const FILES_EMPTY: &str = "No files indexed. Run a codebase scan using MCP tools.";
pub const STUBS_EMPTY: &str = "No stubs detected. Run a codebase scan to detect stubs.";
pub const TASKS_EMPTY: &str = "No tasks created. Use MCP tools to create tasks.";
pub const OVERVIEW_EMPTY: &str = "No dashboard data yet. Press r to refresh.";
pub const SEARCH_IDLE: &str = "Enter a query to search functions, files, features...";
pub const SEARCH_EMPTY: &str = "No results.";

pub const OVERVIEW_COMPONENTS_EMPTY: &str = "No components registered. Run a codebase scan.";
pub const OVERVIEW_TASKS_EMPTY: &str = "No priority tasks. Create some tasks to track.";
pub const OVERVIEW_ACTIVITY_EMPTY: &str = "No recent activity.";

// ============================================================================
// PAGE MODEL
// ============================================================================

/// What a page shows: exactly one of these, never nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    Loading,
    Error(String),
    Empty(&'static str),
    Content,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageModel<T> {
    pub status: FetchStatus,
    pub error: Option<String>,
    pub items: Vec<T>,
    pub empty_hint: &'static str,
    /// Shown instead of the loading indicator while idle. Search only.
    pub idle_hint: Option<&'static str>,
    has_data: bool,
}

impl<T> PageModel<T> {
    fn idle(empty_hint: &'static str, idle_hint: Option<&'static str>) -> Self {
        Self {
            status: FetchStatus::Idle,
            error: None,
            items: Vec::new(),
            empty_hint,
            idle_hint,
            has_data: false,
        }
    }

    fn from_entry<F>(entry: Option<&CacheEntry>, empty_hint: &'static str, derive_items: F) -> Self
    where
        F: FnOnce(&Resource) -> Vec<T>,
    {
        let Some(entry) = entry else {
            return Self::idle(empty_hint, None);
        };
        let items = entry.data.as_deref().map(derive_items).unwrap_or_default();
        Self {
            status: entry.status,
            error: entry.error_message(),
            items,
            empty_hint,
            idle_hint: None,
            has_data: entry.data.is_some(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.has_data
    }

    pub fn render_state(&self) -> RenderState {
        match self.status {
            FetchStatus::Error => RenderState::Error(
                self.error
                    .clone()
                    .unwrap_or_else(|| "API error: unknown".to_string()),
            ),
            FetchStatus::Idle if !self.has_data => match self.idle_hint {
                Some(hint) => RenderState::Empty(hint),
                None => RenderState::Loading,
            },
            FetchStatus::Loading if !self.has_data => RenderState::Loading,
            _ if self.items.is_empty() => RenderState::Empty(self.empty_hint),
            _ => RenderState::Content,
        }
    }
}

// ============================================================================
// ROW MODELS
// ============================================================================

/// Priority or status label with its colour class. `tone` is `None` for
/// values the lookup does not know; those render as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub label: String,
    pub tone: Option<Tone>,
    pub class: String,
}

impl Tag {
    pub fn priority(priority: Option<&str>) -> Self {
        let label = priority.unwrap_or_default().to_string();
        Self {
            tone: derive::priority_tag_color(&label),
            class: format!("priority-{}", label),
            label,
        }
    }

    pub fn severity(severity: Option<&str>) -> Self {
        let label = severity.unwrap_or_default().to_string();
        Self {
            tone: derive::severity_tag_color(&label),
            class: format!("severity-{}", label.to_ascii_lowercase()),
            label,
        }
    }

    pub fn status(status: Option<&str>) -> Self {
        let label = status.unwrap_or_default().to_string();
        Self {
            tone: derive::status_tag_color(&label),
            class: format!("status-{}", derive::status_class(&label)),
            label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub sub_value: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSummaryRow {
    pub name: String,
    pub detail: String,
    pub loc: String,
}

impl From<&ComponentSummary> for ComponentSummaryRow {
    fn from(summary: &ComponentSummary) -> Self {
        Self {
            name: summary.name.clone(),
            detail: format!(
                "{} modules | {} files",
                summary.module_count, summary.file_count
            ),
            loc: format!("{} LOC", derive::group_thousands(summary.total_loc)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub performed_at: String,
    pub action: String,
    pub entity_type: String,
    pub entity: String,
}

impl From<&Activity> for ActivityRow {
    fn from(activity: &Activity) -> Self {
        Self {
            performed_at: derive::format_timestamp(activity.performed_at.as_deref()),
            action: activity.action.clone(),
            entity_type: activity.entity_type.clone(),
            entity: derive::entity_label(activity),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewModel {
    pub stats: Vec<StatCard>,
    pub stub_band: derive::StubBand,
    pub components: Vec<ComponentSummaryRow>,
    pub priority_tasks: Vec<TaskRow>,
    pub recent_activity: Vec<ActivityRow>,
}

impl OverviewModel {
    pub fn from_payload(payload: &DashboardPayload) -> Self {
        let overview = &payload.overview;
        let stub_pct = overview.effective_stub_percentage();
        let stub_band = derive::stub_band(stub_pct);

        let stats = vec![
            StatCard {
                label: "Features",
                value: overview.total_features.to_string(),
                sub_value: format!("{} implemented", overview.implemented_features),
                tone: Tone::Accent,
            },
            StatCard {
                label: "Files Indexed",
                value: overview.total_files.to_string(),
                sub_value: format!("{} LOC", derive::group_thousands(overview.total_loc)),
                tone: Tone::Accent,
            },
            StatCard {
                label: "Stub Rate",
                value: derive::format_percent(stub_pct),
                sub_value: format!(
                    "{} of {}",
                    overview.stub_functions, overview.total_functions
                ),
                tone: stub_band.tone(),
            },
            StatCard {
                label: "Critical Stubs",
                value: overview.critical_stubs.to_string(),
                sub_value: "In P0/P1 features".to_string(),
                tone: derive::critical_stub_tone(overview.critical_stubs),
            },
        ];

        Self {
            stats,
            stub_band,
            components: payload.components.iter().map(Into::into).collect(),
            priority_tasks: derive::top_n(&payload.priority_tasks, PRIORITY_TASK_LIMIT)
                .iter()
                .map(Into::into)
                .collect(),
            recent_activity: derive::top_n(&payload.recent_activity, ACTIVITY_LIMIT)
                .iter()
                .map(Into::into)
                .collect(),
        }
    }

    pub fn stat(&self, label: &str) -> Option<&StatCard> {
        self.stats.iter().find(|card| card.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRow {
    pub id: i64,
    pub name: String,
    pub component_type: String,
    pub description: String,
    pub root_path: String,
    pub language: String,
}

impl From<&Component> for ComponentRow {
    fn from(component: &Component) -> Self {
        Self {
            id: component.id,
            name: component.name.clone(),
            component_type: component.component_type.clone().unwrap_or_default(),
            description: component.description.clone().unwrap_or_default(),
            root_path: component.root_path.clone().unwrap_or_default(),
            language: component.language.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub priority: Tag,
    pub status: Tag,
    pub percent: f64,
    pub bar_width: String,
}

impl From<&Feature> for FeatureRow {
    fn from(feature: &Feature) -> Self {
        let percent = derive::progress_percent(feature.implementation_percentage, 100.0);
        Self {
            id: feature.id,
            name: feature.name.clone(),
            description: feature.description.clone().unwrap_or_default(),
            priority: Tag::priority(feature.priority.as_deref()),
            status: Tag::status(feature.status.as_deref()),
            percent,
            bar_width: derive::format_percent(percent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub id: i64,
    pub filename: String,
    pub line_count: u64,
    pub function_count: u64,
    pub stub_count: u64,
    pub stub_tone: Tone,
}

impl From<&FileRecord> for FileRow {
    fn from(file: &FileRecord) -> Self {
        Self {
            id: file.id,
            filename: file.filename.clone(),
            line_count: file.line_count,
            function_count: file.function_count,
            stub_count: file.stub_count,
            stub_tone: derive::stub_count_tone(file.stub_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubRow {
    pub id: i64,
    pub function_name: String,
    pub stub_type: String,
    pub severity: Tag,
    pub detection_reason: String,
    pub location: String,
}

impl From<&Stub> for StubRow {
    fn from(stub: &Stub) -> Self {
        Self {
            id: stub.id,
            function_name: stub.function_name.clone(),
            stub_type: stub.stub_type.clone().unwrap_or_default(),
            severity: Tag::severity(stub.severity.as_deref()),
            detection_reason: stub.detection_reason.clone().unwrap_or_default(),
            location: format!(
                "{}:{}",
                stub.file_path.as_deref().unwrap_or_default(),
                stub.line_number
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: Tag,
    pub status: Tag,
    pub feature_name: Option<String>,
    pub component_name: Option<String>,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: Tag::priority(task.priority.as_deref()),
            status: Tag::status(task.status.as_deref()),
            feature_name: task.feature_name.clone(),
            component_name: task.component_name.clone(),
        }
    }
}

// ============================================================================
// PAGE MODELS
// ============================================================================

pub fn overview_model(cache: &QueryCache) -> PageModel<OverviewModel> {
    PageModel::from_entry(cache.entry(&ResourceKey::Dashboard), OVERVIEW_EMPTY, |resource| {
        resource
            .as_dashboard()
            .map(OverviewModel::from_payload)
            .into_iter()
            .collect()
    })
}

pub fn components_model(cache: &QueryCache) -> PageModel<ComponentRow> {
    PageModel::from_entry(cache.entry(&ResourceKey::Components), COMPONENTS_EMPTY, |resource| {
        rows(resource.as_components())
    })
}

pub fn features_model(cache: &QueryCache) -> PageModel<FeatureRow> {
    PageModel::from_entry(cache.entry(&ResourceKey::Features), FEATURES_EMPTY, |resource| {
        rows(resource.as_features())
    })
}

pub fn files_model(cache: &QueryCache) -> PageModel<FileRow> {
    PageModel::from_entry(cache.entry(&ResourceKey::Files), FILES_EMPTY, |resource| {
        rows(resource.as_files())
    })
}

pub fn stubs_model(cache: &QueryCache) -> PageModel<StubRow> {
    PageModel::from_entry(cache.entry(&ResourceKey::Stubs), STUBS_EMPTY, |resource| {
        rows(resource.as_stubs())
    })
}

pub fn tasks_model(cache: &QueryCache) -> PageModel<TaskRow> {
    PageModel::from_entry(cache.entry(&ResourceKey::Tasks), TASKS_EMPTY, |resource| {
        rows(resource.as_tasks())
    })
}

fn rows<'a, R, T>(records: Option<&'a [R]>) -> Vec<T>
where
    T: From<&'a R>,
{
    records
        .unwrap_or_default()
        .iter()
        .map(T::from)
        .collect()
}

/// Pretty-printed result lines. Empty envelopes (`null`, `[]`, `{}`) yield
/// no lines.
fn search_lines(value: &serde_json::Value) -> Vec<String> {
    let empty = match value {
        serde_json::Value::Null => true,
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(fields) => fields.is_empty(),
        _ => false,
    };
    if empty {
        return Vec::new();
    }
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| value.to_string())
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// SEARCH
// ============================================================================

/// Search is never subscribed automatically; each submit targets one key.
#[derive(Debug, Default)]
pub struct SearchController {
    key: Option<ResourceKey>,
    subscription: Option<SubscriptionId>,
    revision: Arc<AtomicU64>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share a redraw counter; every status transition of the current
    /// search key bumps it.
    pub fn with_revision(revision: Arc<AtomicU64>) -> Self {
        Self {
            revision,
            ..Self::default()
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Relaxed)
    }

    pub fn current_key(&self) -> Option<&ResourceKey> {
        self.key.as_ref()
    }

    pub fn query(&self) -> Option<&str> {
        match &self.key {
            Some(ResourceKey::Search(query)) => Some(query),
            _ => None,
        }
    }

    /// Submit a query. Whitespace-only input is ignored and leaves the
    /// previous result untouched. Returns whether a fetch was issued.
    pub fn submit(&mut self, cache: &mut QueryCache, raw: &str) -> bool {
        let query = raw.trim();
        if query.is_empty() {
            return false;
        }
        let key = ResourceKey::Search(query.to_string());

        if self.key.as_ref() != Some(&key) {
            if let Some(previous) = self.subscription.take() {
                cache.unsubscribe(previous);
            }
            let revision = Arc::clone(&self.revision);
            self.subscription = Some(cache.subscribe_with(
                key.clone(),
                RefreshPolicy::manual(),
                move |_entry| {
                    revision.fetch_add(1, Ordering::Relaxed);
                },
            ));
            self.key = Some(key.clone());
        }
        tracing::debug!(query, "Search submitted");
        cache.refetch(&key);
        true
    }

    /// Re-issue the current query, if any.
    pub fn refresh(&self, cache: &mut QueryCache) -> bool {
        match &self.key {
            Some(key) => {
                cache.refetch(key);
                true
            }
            None => false,
        }
    }

    pub fn model(&self, cache: &QueryCache) -> PageModel<String> {
        let Some(key) = &self.key else {
            return PageModel::idle(SEARCH_EMPTY, Some(SEARCH_IDLE));
        };
        let mut model = PageModel::from_entry(cache.entry(key), SEARCH_EMPTY, |resource| {
            resource.as_search().map(search_lines).unwrap_or_default()
        });
        model.idle_hint = Some(SEARCH_IDLE);
        model
    }

    pub fn detach(&mut self, cache: &mut QueryCache) {
        if let Some(id) = self.subscription.take() {
            cache.unsubscribe(id);
        }
        self.key = None;
    }
}

// ============================================================================
// CONTROLLERS
// ============================================================================

/// Page subscriptions for the session. Only the active page holds a
/// subscription to its fixed resource.
pub struct Controllers {
    dashboard_refresh: Duration,
    active: Option<(Page, SubscriptionId)>,
    pub search: SearchController,
    revision: Arc<AtomicU64>,
}

impl Controllers {
    pub fn new(dashboard_refresh: Duration) -> Self {
        let revision = Arc::new(AtomicU64::new(0));
        Self {
            dashboard_refresh,
            active: None,
            search: SearchController::with_revision(Arc::clone(&revision)),
            revision,
        }
    }

    pub fn active_page(&self) -> Option<Page> {
        self.active.map(|(page, _)| page)
    }

    /// Bumped on every status transition of the active page's key or the
    /// current search key. The render loop redraws when it changes.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Relaxed)
    }

    /// Move the page subscription to `page`. Re-activating the current page
    /// is a no-op.
    pub fn activate(&mut self, page: Page, cache: &mut QueryCache) {
        if self.active_page() == Some(page) {
            return;
        }
        if let Some((previous, id)) = self.active.take() {
            tracing::debug!(from = previous.title(), to = page.title(), "Switching page");
            cache.unsubscribe(id);
        }
        let Some(key) = page.resource_key() else {
            return;
        };
        let revision = Arc::clone(&self.revision);
        let policy = page.default_policy(self.dashboard_refresh);
        let id = cache.subscribe_with(key, policy, move |_entry| {
            revision.fetch_add(1, Ordering::Relaxed);
        });
        self.active = Some((page, id));
    }

    /// Force a refetch of the page's data. Returns whether anything was issued.
    pub fn refresh(&self, page: Page, cache: &mut QueryCache) -> bool {
        match page.resource_key() {
            Some(key) => {
                cache.refetch(&key);
                true
            }
            None => self.search.refresh(cache),
        }
    }

    /// Rows the page currently renders. Overview is a fixed layout and
    /// reports zero.
    pub fn row_count(&self, page: Page, cache: &QueryCache) -> usize {
        match page {
            Page::Overview => 0,
            Page::Components => components_model(cache).items.len(),
            Page::Features => features_model(cache).items.len(),
            Page::Files => files_model(cache).items.len(),
            Page::Stubs => stubs_model(cache).items.len(),
            Page::Tasks => tasks_model(cache).items.len(),
            Page::Search => self.search.model(cache).items.len(),
        }
    }

    pub fn teardown(&mut self, cache: &mut QueryCache) {
        if let Some((_, id)) = self.active.take() {
            cache.unsubscribe(id);
        }
        self.search.detach(cache);
        cache.clear();
    }
}
