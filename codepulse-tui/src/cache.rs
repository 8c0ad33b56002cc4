//! Query cache: one entry per resource key, refreshed on demand or on an
//! interval, with at most one authoritative request per key.
//!
//! The cache is owned by a single task and only mutated through `&mut self`.
//! Fetches run as spawned tasks and report back as [`FetchOutcome`]s on the
//! channel returned by [`QueryCache::new`]; the owner hands each outcome to
//! [`QueryCache::apply`]. Every issued request carries a token, and only the
//! latest token of a key may write that key's entry, so a slow response can
//! never overwrite a newer one or resurrect an invalidated entry.
//!
//! Failed fetches keep the last successful data alongside the error.

use crate::api_client::ResourceFetcher;
use chrono::{DateTime, Utc};
use codepulse_core::{Resource, ResourceKey, TransportError};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

pub type SubscriptionId = u64;

/// Callback invoked synchronously on every status transition of a key.
pub type Observer = Box<dyn FnMut(&CacheEntry) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Success => "success",
            FetchStatus::Error => "error",
        };
        write!(f, "{}", text)
    }
}

/// How a subscriber wants its key kept up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub refresh_interval: Option<Duration>,
    pub enabled: bool,
}

impl RefreshPolicy {
    /// Fetch on first subscription, then only on explicit refetch.
    pub fn once() -> Self {
        Self {
            refresh_interval: None,
            enabled: true,
        }
    }

    /// Fetch on first subscription and again every `interval` while subscribed.
    pub fn every(interval: Duration) -> Self {
        Self {
            refresh_interval: Some(interval),
            enabled: true,
        }
    }

    /// Never fetch on subscription; the owner calls `refetch`.
    pub fn manual() -> Self {
        Self {
            refresh_interval: None,
            enabled: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: ResourceKey,
    pub status: FetchStatus,
    pub data: Option<Arc<Resource>>,
    pub error: Option<TransportError>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn new(key: ResourceKey) -> Self {
        Self {
            key,
            status: FetchStatus::Idle,
            data: None,
            error: None,
            last_fetched_at: None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Result of one spawned fetch, tagged with the token it was issued under.
#[derive(Debug)]
pub struct FetchOutcome {
    pub key: ResourceKey,
    pub token: u64,
    pub result: Result<Resource, TransportError>,
}

struct Slot {
    entry: CacheEntry,
    subscribers: Vec<SubscriptionId>,
    in_flight: Option<u64>,
    last_issued: Option<Instant>,
}

impl Slot {
    fn new(key: ResourceKey) -> Self {
        Self {
            entry: CacheEntry::new(key),
            subscribers: Vec::new(),
            in_flight: None,
            last_issued: None,
        }
    }

    fn is_evictable(&self) -> bool {
        self.subscribers.is_empty() && self.in_flight.is_none()
    }
}

struct Subscriber {
    key: ResourceKey,
    policy: RefreshPolicy,
    observer: Option<Observer>,
}

pub struct QueryCache {
    fetcher: Arc<dyn ResourceFetcher>,
    slots: IndexMap<ResourceKey, Slot>,
    subscribers: HashMap<SubscriptionId, Subscriber>,
    outcomes: mpsc::UnboundedSender<FetchOutcome>,
    next_subscription: SubscriptionId,
    next_token: u64,
    search_capacity: usize,
}

impl QueryCache {
    /// Create a cache and the receiver its fetch outcomes arrive on.
    ///
    /// `search_capacity` bounds how many search keys are retained.
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        search_capacity: usize,
    ) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let cache = Self {
            fetcher,
            slots: IndexMap::new(),
            subscribers: HashMap::new(),
            outcomes,
            next_subscription: 1,
            next_token: 1,
            search_capacity: search_capacity.max(1),
        };
        (cache, receiver)
    }

    pub fn entry(&self, key: &ResourceKey) -> Option<&CacheEntry> {
        self.slots.get(key).map(|slot| &slot.entry)
    }

    pub fn status(&self, key: &ResourceKey) -> FetchStatus {
        self.entry(key)
            .map(|entry| entry.status)
            .unwrap_or(FetchStatus::Idle)
    }

    pub fn is_in_flight(&self, key: &ResourceKey) -> bool {
        self.slots
            .get(key)
            .is_some_and(|slot| slot.in_flight.is_some())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn search_key_count(&self) -> usize {
        self.slots.keys().filter(|key| key.is_search()).count()
    }

    pub fn subscriber_count(&self, key: &ResourceKey) -> usize {
        self.slots
            .get(key)
            .map(|slot| slot.subscribers.len())
            .unwrap_or(0)
    }

    pub fn subscribe(&mut self, key: ResourceKey, policy: RefreshPolicy) -> SubscriptionId {
        self.attach(key, policy, None)
    }

    pub fn subscribe_with<F>(
        &mut self,
        key: ResourceKey,
        policy: RefreshPolicy,
        observer: F,
    ) -> SubscriptionId
    where
        F: FnMut(&CacheEntry) + Send + 'static,
    {
        self.attach(key, policy, Some(Box::new(observer)))
    }

    /// Detach a subscriber. An in-flight fetch still completes and is applied.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        let Some(subscriber) = self.subscribers.remove(&id) else {
            return;
        };
        if let Some(slot) = self.slots.get_mut(&subscriber.key) {
            slot.subscribers.retain(|sub| *sub != id);
        }
        tracing::debug!(key = %subscriber.key, subscription = id, "Unsubscribed");
        self.evict_search_overflow();
    }

    /// Issue a new fetch regardless of status. Supersedes any fetch in flight.
    pub fn refetch(&mut self, key: &ResourceKey) {
        self.ensure_slot(key);
        self.issue_fetch(key);
        self.evict_search_overflow();
    }

    /// Drop data and error, retire any in-flight request, and return to idle.
    pub fn invalidate(&mut self, key: &ResourceKey) {
        let Some(slot) = self.slots.get_mut(key) else {
            return;
        };
        slot.in_flight = None;
        slot.last_issued = None;
        slot.entry.data = None;
        slot.entry.error = None;
        slot.entry.last_fetched_at = None;
        slot.entry.status = FetchStatus::Idle;
        tracing::debug!(key = %key, "Invalidated");
        notify(slot, &mut self.subscribers);
        self.evict_search_overflow();
    }

    /// Record a completed fetch. Returns `false` when the outcome was
    /// superseded and discarded.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { key, token, result } = outcome;
        let Some(slot) = self.slots.get_mut(&key) else {
            tracing::debug!(key = %key, token, "Discarding response for evicted key");
            return false;
        };
        if slot.in_flight != Some(token) {
            tracing::debug!(
                key = %key,
                token,
                current = ?slot.in_flight,
                "Discarding superseded response"
            );
            return false;
        }
        slot.in_flight = None;
        match result {
            Ok(resource) => {
                slot.entry.status = FetchStatus::Success;
                slot.entry.data = Some(Arc::new(resource));
                slot.entry.error = None;
                slot.entry.last_fetched_at = Some(Utc::now());
                tracing::debug!(key = %key, token, "Fetch succeeded");
            }
            Err(err) => {
                tracing::warn!(key = %key, token, error = %err, "Fetch failed");
                slot.entry.status = FetchStatus::Error;
                slot.entry.error = Some(err);
            }
        }
        notify(slot, &mut self.subscribers);
        self.evict_search_overflow();
        true
    }

    /// Refetch every subscribed key whose refresh interval has elapsed.
    /// Returns the number of fetches issued.
    pub fn poll_due(&mut self, now: Instant) -> usize {
        let due: Vec<ResourceKey> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.in_flight.is_none())
            .filter_map(|(key, slot)| {
                let interval = self.refresh_interval(slot)?;
                let elapsed = slot
                    .last_issued
                    .map(|issued| now.saturating_duration_since(issued) >= interval)
                    .unwrap_or(true);
                elapsed.then(|| key.clone())
            })
            .collect();

        for key in &due {
            tracing::debug!(key = %key, "Interval refresh");
            self.issue_fetch(key);
        }
        due.len()
    }

    /// Drop every entry and subscriber. Used at session teardown.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.subscribers.clear();
    }

    fn attach(
        &mut self,
        key: ResourceKey,
        policy: RefreshPolicy,
        observer: Option<Observer>,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;

        self.ensure_slot(&key);
        self.subscribers.insert(
            id,
            Subscriber {
                key: key.clone(),
                policy,
                observer,
            },
        );

        let should_fetch = match self.slots.get_mut(&key) {
            Some(slot) => {
                slot.subscribers.push(id);
                policy.enabled && needs_fetch(slot, policy, Instant::now())
            }
            None => false,
        };
        tracing::debug!(key = %key, subscription = id, fetch = should_fetch, "Subscribed");

        if should_fetch {
            self.issue_fetch(&key);
        }
        self.evict_search_overflow();
        id
    }

    /// Create the slot if missing; search keys move to most-recently-used.
    fn ensure_slot(&mut self, key: &ResourceKey) {
        match self.slots.get_index_of(key) {
            Some(index) if key.is_search() => {
                let last = self.slots.len() - 1;
                self.slots.move_index(index, last);
            }
            Some(_) => {}
            None => {
                self.slots.insert(key.clone(), Slot::new(key.clone()));
            }
        }
    }

    fn issue_fetch(&mut self, key: &ResourceKey) {
        let token = self.next_token;
        self.next_token += 1;

        let Some(slot) = self.slots.get_mut(key) else {
            return;
        };
        if let Some(previous) = slot.in_flight {
            tracing::debug!(key = %key, previous, token, "Superseding in-flight request");
        }
        slot.in_flight = Some(token);
        slot.last_issued = Some(Instant::now());
        if slot.entry.status != FetchStatus::Loading {
            slot.entry.status = FetchStatus::Loading;
            notify(slot, &mut self.subscribers);
        }

        let fetcher = Arc::clone(&self.fetcher);
        let sender = self.outcomes.clone();
        let key = key.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&key).await;
            let _ = sender.send(FetchOutcome { key, token, result });
        });
    }

    fn refresh_interval(&self, slot: &Slot) -> Option<Duration> {
        slot.subscribers
            .iter()
            .filter_map(|id| self.subscribers.get(id))
            .filter(|sub| sub.policy.enabled)
            .filter_map(|sub| sub.policy.refresh_interval)
            .min()
    }

    /// Evict least-recently-used search keys beyond capacity. Keys that are
    /// subscribed or still fetching are skipped.
    fn evict_search_overflow(&mut self) {
        let mut excess = self.search_key_count().saturating_sub(self.search_capacity);
        while excess > 0 {
            let victim = self
                .slots
                .iter()
                .position(|(key, slot)| key.is_search() && slot.is_evictable());
            let Some(index) = victim else {
                break;
            };
            if let Some((key, _)) = self.slots.shift_remove_index(index) {
                tracing::debug!(key = %key, "Evicted search result");
            }
            excess -= 1;
        }
    }
}

fn needs_fetch(slot: &Slot, policy: RefreshPolicy, now: Instant) -> bool {
    if slot.in_flight.is_some() {
        return false;
    }
    match slot.entry.status {
        FetchStatus::Idle => true,
        FetchStatus::Loading | FetchStatus::Error => false,
        FetchStatus::Success => match (policy.refresh_interval, slot.last_issued) {
            (Some(interval), Some(issued)) => now.saturating_duration_since(issued) >= interval,
            _ => false,
        },
    }
}

fn notify(slot: &Slot, subscribers: &mut HashMap<SubscriptionId, Subscriber>) {
    for id in &slot.subscribers {
        if let Some(observer) = subscribers
            .get_mut(id)
            .and_then(|sub| sub.observer.as_mut())
        {
            observer(&slot.entry);
        }
    }
}
