//! Shared query cache with tag invalidation and in-flight tracking.
//!
//! Each [`QueryKey`] owns one entry moving through
//! `Idle → Loading → (Success | Error)`. Data survives invalidation and
//! failures so views keep showing the last good result while a refetch runs.
//! Transient keys (pages, filters, single products) are the exception: an
//! unsubscribed one is evicted when invalidated, and opening one evicts its
//! unsubscribed siblings, so each family keeps at most one unwatched entry.
//!
//! The entry map sits behind a synchronous mutex that is only held for short
//! bookkeeping sections, never across an `.await`. Fetches for one key are
//! serialised by a per-key async gate so concurrent identical reads share one
//! request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use crate::domain::Error;

use super::{CacheTag, QueryData, QueryKey};

/// Lifecycle state of one cached read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    /// Never requested.
    #[default]
    Idle,
    /// Request in flight; any previous data is still exposed.
    Loading,
    /// Last request succeeded.
    Success,
    /// Last request failed; any previous data is still exposed.
    Error,
}

/// Point-in-time copy of an entry, as a view would render it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySnapshot {
    /// Lifecycle state.
    pub status: QueryStatus,
    /// Last good data, if any.
    pub data: Option<QueryData>,
    /// Error of the last failed request.
    pub error: Option<Error>,
    /// Whether the data was invalidated since it was fetched.
    pub is_stale: bool,
    /// Tags currently provided by the entry.
    pub tags: Vec<CacheTag>,
}

struct Entry {
    status: QueryStatus,
    data: Option<QueryData>,
    error: Option<Error>,
    tags: Vec<CacheTag>,
    generation: u64,
    settled: u64,
    stale: bool,
    subscribers: usize,
    gate: Arc<AsyncMutex<()>>,
}

impl Entry {
    fn new(key: &QueryKey) -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            tags: key.provided_tags(None),
            generation: 0,
            settled: 0,
            stale: false,
            subscribers: 0,
            gate: Arc::new(AsyncMutex::new(())),
        }
    }

    fn fresh(&self) -> Option<&QueryData> {
        if self.status == QueryStatus::Success && !self.stale {
            self.data.as_ref()
        } else {
            None
        }
    }

    fn resting_status(&self) -> QueryStatus {
        match (&self.error, &self.data) {
            (Some(_), _) => QueryStatus::Error,
            (None, Some(_)) => QueryStatus::Success,
            (None, None) => QueryStatus::Idle,
        }
    }
}

/// Result of looking a key up before fetching.
pub(crate) enum Probe {
    /// Cached data is current.
    Fresh(QueryData),
    /// A fetch is needed; wait on `gate` and compare `settled` afterwards.
    Miss {
        gate: Arc<AsyncMutex<()>>,
        settled: u64,
    },
}

/// Whether a completed fetch was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchOutcome {
    /// Result written to the entry.
    Applied,
    /// Entry was invalidated while the request was in flight; result dropped.
    Superseded,
}

/// Cache of read results keyed by [`QueryKey`].
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
}

impl QueryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entry for `key`, created on first use.
    fn open<'m>(entries: &'m mut HashMap<QueryKey, Entry>, key: &QueryKey) -> &'m mut Entry {
        if key.is_transient() && !entries.contains_key(key) {
            let before = entries.len();
            entries.retain(|other, entry| {
                other.name() != key.name()
                    || entry.subscribers > 0
                    || entry.status == QueryStatus::Loading
            });
            let evicted = before - entries.len();
            if evicted > 0 {
                debug!(query = key.name(), evicted, "unwatched sibling queries evicted");
            }
        }
        entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(key))
    }

    /// Current state of `key`; unknown keys report [`QueryStatus::Idle`].
    pub fn snapshot(&self, key: &QueryKey) -> QuerySnapshot {
        let entries = self.entries();
        entries.get(key).map_or_else(
            || QuerySnapshot {
                tags: key.provided_tags(None),
                ..QuerySnapshot::default()
            },
            |entry| QuerySnapshot {
                status: entry.status,
                data: entry.data.clone(),
                error: entry.error.clone(),
                is_stale: entry.stale,
                tags: entry.tags.clone(),
            },
        )
    }

    /// Cached data for `key` when it is successful and not stale.
    pub fn fresh(&self, key: &QueryKey) -> Option<QueryData> {
        self.entries().get(key).and_then(Entry::fresh).cloned()
    }

    /// Number of keys with an entry.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether no key has an entry.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub(crate) fn probe(&self, key: &QueryKey) -> Probe {
        let mut entries = self.entries();
        let entry = Self::open(&mut entries, key);
        if let Some(data) = entry.fresh() {
            debug!(query = key.name(), "query cache hit");
            return Probe::Fresh(data.clone());
        }
        Probe::Miss {
            gate: Arc::clone(&entry.gate),
            settled: entry.settled,
        }
    }

    /// Outcome of a fetch that settled after `seen` was observed.
    pub(crate) fn settled_since(
        &self,
        key: &QueryKey,
        seen: u64,
    ) -> Option<Result<QueryData, Error>> {
        let entries = self.entries();
        let entry = entries.get(key)?;
        if entry.settled == seen {
            return None;
        }
        match (&entry.error, &entry.data) {
            (Some(error), _) => Some(Err(error.clone())),
            (None, Some(data)) => Some(Ok(data.clone())),
            (None, None) => None,
        }
    }

    /// Mark `key` as loading and return a guard for the request.
    ///
    /// Dropping the guard without completing it (for example when the
    /// consuming view is closed) restores the previous state and writes
    /// nothing.
    pub(crate) fn begin_fetch(&self, key: &QueryKey) -> InFlight<'_> {
        let mut entries = self.entries();
        let entry = Self::open(&mut entries, key);
        let previous = entry.resting_status();
        entry.status = QueryStatus::Loading;
        debug!(query = key.name(), generation = entry.generation, "query fetch started");
        InFlight {
            cache: self,
            key: key.clone(),
            generation: entry.generation,
            previous,
            finished: false,
        }
    }

    /// Invalidate every entry providing a tag matched by `tags`.
    ///
    /// Matching entries become stale and any request already in flight for
    /// them is superseded. Unsubscribed transient entries are evicted
    /// instead. Returns the keys that have live subscribers and therefore
    /// need an immediate refetch.
    pub fn invalidate(&self, tags: &[CacheTag]) -> Vec<QueryKey> {
        let mut entries = self.entries();
        let mut refetch = Vec::new();
        let mut evict = Vec::new();
        let mut invalidated = 0_usize;
        for (key, entry) in entries.iter_mut() {
            let hit = entry
                .tags
                .iter()
                .any(|provided| tags.iter().any(|tag| tag.matches(provided)));
            if !hit {
                continue;
            }
            invalidated += 1;
            entry.generation += 1;
            entry.stale = true;
            if entry.subscribers > 0 {
                refetch.push(key.clone());
            } else if key.is_transient() {
                evict.push(key.clone());
            }
        }
        for key in &evict {
            entries.remove(key);
        }
        info!(
            tags = ?tags.iter().map(ToString::to_string).collect::<Vec<_>>(),
            invalidated,
            evicted = evict.len(),
            refetch = refetch.len(),
            "cache tags invalidated"
        );
        refetch
    }

    /// Mark one entry stale so the next read refetches it.
    pub fn mark_stale(&self, key: &QueryKey) {
        let mut entries = self.entries();
        if let Some(entry) = entries.get_mut(key) {
            entry.generation += 1;
            entry.stale = true;
        }
    }

    /// First value produced by `find` over the cached data of every entry.
    pub fn find_cached<R>(&self, find: impl Fn(&QueryData) -> Option<R>) -> Option<R> {
        let entries = self.entries();
        entries
            .values()
            .filter_map(|entry| entry.data.as_ref())
            .find_map(find)
    }

    /// Register interest in `key`; invalidations refetch it while the
    /// returned subscription lives.
    pub fn subscribe(self: &Arc<Self>, key: QueryKey) -> QuerySubscription {
        {
            let mut entries = self.entries();
            Self::open(&mut entries, &key).subscribers += 1;
        }
        QuerySubscription {
            cache: Arc::clone(self),
            key,
        }
    }

    /// Number of live subscriptions for `key`.
    pub fn subscribers(&self, key: &QueryKey) -> usize {
        self.entries().get(key).map_or(0, |entry| entry.subscribers)
    }

    /// Drop every entry that has no subscribers and reset the rest.
    pub fn clear(&self) {
        let mut entries = self.entries();
        entries.retain(|_, entry| entry.subscribers > 0);
        for (key, entry) in entries.iter_mut() {
            let subscribers = entry.subscribers;
            *entry = Entry::new(key);
            entry.subscribers = subscribers;
        }
        info!("query cache cleared");
    }

    fn settle(&self, key: &QueryKey, generation: u64, result: &Result<QueryData, Error>) -> FetchOutcome {
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(key) else {
            return FetchOutcome::Superseded;
        };
        if entry.generation != generation {
            debug!(query = key.name(), generation, current = entry.generation, "stale response dropped");
            return FetchOutcome::Superseded;
        }
        match result {
            Ok(data) => {
                entry.tags = key.provided_tags(Some(data));
                entry.data = Some(data.clone());
                entry.error = None;
                entry.status = QueryStatus::Success;
                entry.stale = false;
            }
            Err(error) => {
                entry.error = Some(error.clone());
                entry.tags = key.provided_tags(entry.data.as_ref());
                entry.status = QueryStatus::Error;
            }
        }
        entry.settled += 1;
        FetchOutcome::Applied
    }

    fn abandon(&self, key: &QueryKey, previous: QueryStatus) {
        let mut entries = self.entries();
        if let Some(entry) = entries.get_mut(key) {
            entry.status = previous;
            debug!(query = key.name(), "query fetch abandoned");
        }
    }
}

/// Guard for one in-flight request.
pub(crate) struct InFlight<'a> {
    cache: &'a QueryCache,
    key: QueryKey,
    generation: u64,
    previous: QueryStatus,
    finished: bool,
}

impl InFlight<'_> {
    /// Store the request's result unless the entry moved on meanwhile.
    pub(crate) fn complete(mut self, result: &Result<QueryData, Error>) -> FetchOutcome {
        self.finished = true;
        self.cache.settle(&self.key, self.generation, result)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.cache.abandon(&self.key, self.previous);
        }
    }
}

/// Live interest in one query; dropping it unsubscribes.
pub struct QuerySubscription {
    cache: Arc<QueryCache>,
    key: QueryKey,
}

impl QuerySubscription {
    /// Subscribed key.
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl std::fmt::Debug for QuerySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySubscription")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        let mut entries = self.cache.entries();
        if let Some(entry) = entries.get_mut(&self.key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests;
