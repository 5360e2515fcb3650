//! # Query cache: last-fetched payloads keyed by logical query name
//!
//! [`QueryCache`] maps a [`QueryKey`] (e.g. `current_user`, `list:/rides`) to the
//! JSON payload of the last successful fetch plus the time it was stored. It is
//! the single piece of shared mutable client state: the session service writes
//! to it, views read from it.
//!
//! ## Freshness
//!
//! | Age of entry | Behaviour |
//! |--------------|-----------|
//! | `< stale_time` (5 min) and not invalidated | [`is_fresh`](QueryCache::is_fresh) is true; callers serve it without a request. |
//! | `< gc_time` (10 min) | Still returned by [`get`](QueryCache::get) so views can show stale data while refetching. |
//! | `>= gc_time` | Evicted on the next [`collect_garbage`](QueryCache::collect_garbage), unless pinned. |
//!
//! Reads never evict. Keys that something keeps watching for its whole
//! lifetime (the current user) are [`pin`](QueryCache::pin)ned and survive
//! garbage collection until they are unpinned or removed explicitly.
//!
//! ## Change events
//!
//! Every mutation emits a [`CacheEvent`] to the listeners registered with
//! [`subscribe`](QueryCache::subscribe). Listeners are removed explicitly with
//! [`unsubscribe`](QueryCache::unsubscribe). Listeners run after the internal
//! borrow is released, so they may read the cache again.
//!
//! The cache is `Clone` (all clones share state) and single-threaded.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::CacheConfig;

/// Logical name of a cached query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The signed-in user (`GET /users/me`).
    pub fn current_user() -> Self {
        Self::new("current_user")
    }

    /// A collection, e.g. `list:/rides`.
    pub fn list(path: &str) -> Self {
        Self(format!("list:{path}"))
    }

    /// A single entry of a collection, e.g. `item:/donations/42`.
    pub fn item(path: &str, id: &str) -> Self {
        Self(format!("item:{path}/{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Freshness and retry settings shared by every query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long an entry is served without refetching.
    pub stale_time: Duration,
    /// How long an entry is retained before eviction.
    pub gc_time: Duration,
    /// Automatic retries after a failed fetch.
    pub retry: u32,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            gc_time: Duration::from_secs(10 * 60),
            retry: 1,
        }
    }
}

impl From<&CacheConfig> for CachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            stale_time: Duration::from_secs(config.stale_time_secs),
            gc_time: Duration::from_secs(config.gc_time_secs),
            retry: config.retry,
        }
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let by = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// What changed in the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheEvent {
    Updated(QueryKey),
    Invalidated(QueryKey),
    Removed(QueryKey),
    FetchStarted(QueryKey),
    FetchFinished(QueryKey),
    /// Every entry was invalidated or dropped at once.
    All,
}

impl CacheEvent {
    /// Whether this event may change what `key` reads as.
    pub fn affects(&self, key: &QueryKey) -> bool {
        match self {
            CacheEvent::Updated(k)
            | CacheEvent::Invalidated(k)
            | CacheEvent::Removed(k)
            | CacheEvent::FetchStarted(k)
            | CacheEvent::FetchFinished(k) => k == key,
            CacheEvent::All => true,
        }
    }
}

/// Handle returned by [`QueryCache::subscribe`].
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription(u64);

type Listener = Rc<dyn Fn(&CacheEvent)>;

#[derive(Debug)]
struct Entry {
    value: serde_json::Value,
    updated_at: DateTime<Utc>,
    invalidated: bool,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    /// Requests in flight per key; overlapping fetches each hold one.
    fetching: HashMap<QueryKey, usize>,
    pinned: HashMap<QueryKey, usize>,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
}

/// Shared, observable key-value cache of query results.
#[derive(Clone)]
pub struct QueryCache {
    inner: Rc<RefCell<Inner>>,
    clock: Rc<dyn Clock>,
    policy: CachePolicy,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("QueryCache")
            .field("entries", &inner.entries.len())
            .field("listeners", &inner.listeners.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl QueryCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self::with_clock(policy, SystemClock)
    }

    pub fn with_clock(policy: CachePolicy, clock: impl Clock + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner::default())),
            clock: Rc::new(clock),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// The cached payload for `key`, stale or not. Entries that no longer
    /// decode as `T` read as absent. Never mutates the cache, so it is safe to
    /// call while rendering.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let inner = self.inner.borrow();
        let entry = inner.entries.get(key)?;
        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Cached value for {} does not decode: {}", key, e);
                None
            }
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Whether `key` holds a value younger than the stale time that has not
    /// been invalidated.
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        let now = self.clock.now();
        let inner = self.inner.borrow();
        inner
            .entries
            .get(key)
            .is_some_and(|e| !e.invalidated && age(now, e.updated_at) < self.policy.stale_time)
    }

    /// When `key` was last written.
    pub fn updated_at(&self, key: &QueryKey) -> Option<DateTime<Utc>> {
        self.inner.borrow().entries.get(key).map(|e| e.updated_at)
    }

    /// Store `value` under `key`, marking it fresh.
    pub fn set<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        let entry = Entry {
            value,
            updated_at: self.clock.now(),
            invalidated: false,
        };
        self.inner.borrow_mut().entries.insert(key.clone(), entry);
        self.emit(CacheEvent::Updated(key.clone()));
        Ok(())
    }

    /// Mark `key` stale so the next read refetches. The value stays readable.
    pub fn invalidate(&self, key: &QueryKey) {
        let changed = match self.inner.borrow_mut().entries.get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        };
        if changed {
            self.emit(CacheEvent::Invalidated(key.clone()));
        }
    }

    /// Mark every entry stale.
    pub fn invalidate_all(&self) {
        for entry in self.inner.borrow_mut().entries.values_mut() {
            entry.invalidated = true;
        }
        self.emit(CacheEvent::All);
    }

    pub fn remove(&self, key: &QueryKey) {
        let removed = self.inner.borrow_mut().entries.remove(key).is_some();
        if removed {
            self.emit(CacheEvent::Removed(key.clone()));
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
        self.emit(CacheEvent::All);
    }

    /// Keep `key` through garbage collection until a matching [`unpin`](Self::unpin).
    pub fn pin(&self, key: &QueryKey) {
        *self.inner.borrow_mut().pinned.entry(key.clone()).or_insert(0) += 1;
    }

    pub fn unpin(&self, key: &QueryKey) {
        let mut inner = self.inner.borrow_mut();
        if let Some(count) = inner.pinned.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                inner.pinned.remove(key);
            }
        }
    }

    pub fn is_pinned(&self, key: &QueryKey) -> bool {
        self.inner.borrow().pinned.contains_key(key)
    }

    /// Evict unpinned entries older than the retention window. Returns how
    /// many went.
    pub fn collect_garbage(&self) -> usize {
        let now = self.clock.now();
        let gc_time = self.policy.gc_time;
        let expired: Vec<QueryKey> = {
            let mut inner = self.inner.borrow_mut();
            let expired: Vec<QueryKey> = inner
                .entries
                .iter()
                .filter(|(k, e)| {
                    age(now, e.updated_at) >= gc_time && !inner.pinned.contains_key(*k)
                })
                .map(|(k, _)| k.clone())
                .collect();
            for key in &expired {
                inner.entries.remove(key);
            }
            expired
        };
        if !expired.is_empty() {
            tracing::debug!("Evicted {} expired cache entries", expired.len());
        }
        for key in &expired {
            self.emit(CacheEvent::Removed(key.clone()));
        }
        expired.len()
    }

    pub fn begin_fetch(&self, key: &QueryKey) {
        *self.inner.borrow_mut().fetching.entry(key.clone()).or_insert(0) += 1;
        self.emit(CacheEvent::FetchStarted(key.clone()));
    }

    /// Finish one fetch of `key`. The key stays fetching while other
    /// requests for it are still running.
    pub fn end_fetch(&self, key: &QueryKey) {
        let was_fetching = {
            let mut inner = self.inner.borrow_mut();
            match inner.fetching.get_mut(key) {
                Some(count) => {
                    *count -= 1;
                    if *count == 0 {
                        inner.fetching.remove(key);
                    }
                    true
                }
                None => false,
            }
        };
        if was_fetching {
            self.emit(CacheEvent::FetchFinished(key.clone()));
        }
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.inner.borrow().fetching.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register `listener` for every subsequent [`CacheEvent`].
    pub fn subscribe(&self, listener: impl Fn(&CacheEvent) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push((id, Rc::new(listener)));
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|(id, _)| *id != subscription.0);
    }

    fn emit(&self, event: CacheEvent) {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }
}

fn age(now: DateTime<Utc>, then: DateTime<Utc>) -> Duration {
    (now - then).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cache() -> (QueryCache, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap());
        (QueryCache::with_clock(CachePolicy::default(), clock.clone()), clock)
    }

    #[test]
    fn test_set_and_get() {
        let (cache, _) = cache();
        let key = QueryKey::new("numbers");

        assert!(cache.get::<Vec<u32>>(&key).is_none());
        cache.set(&key, &vec![1u32, 2, 3]).unwrap();

        assert_eq!(cache.get::<Vec<u32>>(&key), Some(vec![1, 2, 3]));
        assert!(cache.is_fresh(&key));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entry_goes_stale_then_expires() {
        let (cache, clock) = cache();
        let key = QueryKey::current_user();
        cache.set(&key, &"ada").unwrap();

        clock.advance(Duration::from_secs(4 * 60 + 59));
        assert!(cache.is_fresh(&key));

        clock.advance(Duration::from_secs(1));
        assert!(!cache.is_fresh(&key));
        // Stale data is still served
        assert_eq!(cache.get::<String>(&key).as_deref(), Some("ada"));

        clock.advance(Duration::from_secs(5 * 60));
        // Reads leave expired entries to the collector
        assert_eq!(cache.get::<String>(&key).as_deref(), Some("ada"));
        assert_eq!(cache.collect_garbage(), 1);
        assert!(cache.get::<String>(&key).is_none());
        assert!(!cache.contains(&key));
    }

    #[test]
    fn test_get_emits_nothing() {
        let (cache, clock) = cache();
        let key = QueryKey::new("old");
        cache.set(&key, &1).unwrap();
        clock.advance(Duration::from_secs(11 * 60));

        let events = Rc::new(Cell::new(0));
        let sink = events.clone();
        let _sub = cache.subscribe(move |_| sink.set(sink.get() + 1));

        assert_eq!(cache.get::<u32>(&key), Some(1));
        assert_eq!(events.get(), 0);
    }

    #[test]
    fn test_pinned_entries_survive_collection() {
        let (cache, clock) = cache();
        let user = QueryKey::current_user();
        let rides = QueryKey::list("/rides");
        cache.pin(&user);
        cache.set(&user, &"ada").unwrap();
        cache.set(&rides, &vec!["r1"]).unwrap();
        clock.advance(Duration::from_secs(11 * 60));

        assert_eq!(cache.collect_garbage(), 1);
        assert_eq!(cache.get::<String>(&user).as_deref(), Some("ada"));
        assert!(!cache.contains(&rides));

        cache.unpin(&user);
        assert!(!cache.is_pinned(&user));
        assert_eq!(cache.collect_garbage(), 1);
        assert!(!cache.contains(&user));
    }

    #[test]
    fn test_overlapping_fetches() {
        let (cache, _) = cache();
        let key = QueryKey::current_user();
        cache.begin_fetch(&key);
        cache.begin_fetch(&key);

        cache.end_fetch(&key);
        assert!(cache.is_fetching(&key));
        cache.end_fetch(&key);
        assert!(!cache.is_fetching(&key));
        // Unbalanced ends are ignored
        cache.end_fetch(&key);
        assert!(!cache.is_fetching(&key));
    }

    #[test]
    fn test_invalidate_keeps_value_but_not_fresh() {
        let (cache, _) = cache();
        let rides = QueryKey::list("/rides");
        let user = QueryKey::current_user();
        cache.set(&rides, &vec!["r1"]).unwrap();
        cache.set(&user, &"ada").unwrap();

        cache.invalidate(&rides);
        assert!(!cache.is_fresh(&rides));
        assert!(cache.is_fresh(&user));
        assert_eq!(cache.get::<Vec<String>>(&rides).unwrap().len(), 1);

        cache.invalidate_all();
        assert!(!cache.is_fresh(&user));

        // Writing again makes it fresh
        cache.set(&user, &"grace").unwrap();
        assert!(cache.is_fresh(&user));
    }

    #[test]
    fn test_collect_garbage() {
        let (cache, clock) = cache();
        cache.set(&QueryKey::new("old"), &1).unwrap();
        clock.advance(Duration::from_secs(6 * 60));
        cache.set(&QueryKey::new("new"), &2).unwrap();
        clock.advance(Duration::from_secs(5 * 60));

        assert_eq!(cache.collect_garbage(), 1);
        assert!(!cache.contains(&QueryKey::new("old")));
        assert!(cache.contains(&QueryKey::new("new")));
    }

    #[test]
    fn test_listeners_receive_events_until_unsubscribed() {
        let (cache, _) = cache();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = cache.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let key = QueryKey::current_user();
        cache.begin_fetch(&key);
        assert!(cache.is_fetching(&key));
        cache.set(&key, &"ada").unwrap();
        cache.end_fetch(&key);
        cache.remove(&key);
        // Removing an absent key emits nothing
        cache.remove(&key);

        cache.unsubscribe(sub);
        cache.clear();

        assert_eq!(
            *seen.borrow(),
            vec![
                CacheEvent::FetchStarted(key.clone()),
                CacheEvent::Updated(key.clone()),
                CacheEvent::FetchFinished(key.clone()),
                CacheEvent::Removed(key.clone()),
            ]
        );
    }

    #[test]
    fn test_listener_may_read_cache() {
        let (cache, _) = cache();
        let reader = cache.clone();
        let last = Rc::new(RefCell::new(None));
        let sink = last.clone();
        let _sub = cache.subscribe(move |_| {
            *sink.borrow_mut() = reader.get::<u32>(&QueryKey::new("n"));
        });

        cache.set(&QueryKey::new("n"), &7u32).unwrap();
        assert_eq!(*last.borrow(), Some(7));
    }

    #[test]
    fn test_event_affects() {
        let user = QueryKey::current_user();
        assert!(CacheEvent::Updated(user.clone()).affects(&user));
        assert!(!CacheEvent::Updated(QueryKey::list("/rides")).affects(&user));
        assert!(CacheEvent::All.affects(&user));
    }

    #[test]
    fn test_query_key_names() {
        assert_eq!(QueryKey::list("/rides").as_str(), "list:/rides");
        assert_eq!(QueryKey::item("/donations", "7").to_string(), "item:/donations/7");
    }
}
