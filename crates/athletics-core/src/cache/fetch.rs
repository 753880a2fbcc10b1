//! Keyed time-to-live cache that sits between views and the remote API.
//!
//! A view owns one `FetchCache` for its whole lifetime. Each call names a
//! key and supplies the fetch operation; the cache answers from a fresh
//! entry when it can, otherwise runs the fetch and stores the result.
//! Progress is published as a `FetchState` on a watch channel.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

/// TTL applied when the caller does not pick one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Result of one fetch, shared by every caller waiting on it.
type FetchOutcome<T> = Result<Arc<T>, String>;

/// The outcome, and whether the flight was still the registered fetch for
/// its key when it finished. A superseded flight neither stores nor publishes.
type FlightResult<T> = (FetchOutcome<T>, bool);
type Flight<T> = Shared<BoxFuture<'static, FlightResult<T>>>;

/// Stand-in expiry for TTLs too large to add to an `Instant`.
fn far_future(from: Instant) -> Instant {
    from + Duration::from_secs(100 * 365 * 24 * 60 * 60)
}

/// The last successful fetch for one key.
#[derive(Debug)]
pub struct CacheEntry<T> {
    value: Arc<T>,
    fetched_at: Instant,
    expires_at: Instant,
    cached_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(value: Arc<T>, ttl: Duration) -> Self {
        let fetched_at = Instant::now();
        Self {
            value,
            fetched_at,
            expires_at: fetched_at.checked_add(ttl).unwrap_or_else(|| far_future(fetched_at)),
            cached_at: Utc::now(),
        }
    }

    pub fn value(&self) -> &Arc<T> {
        &self.value
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.fetched_at)
    }

    pub fn cached_at(&self) -> DateTime<Utc> {
        self.cached_at
    }

    pub fn age_display(&self) -> String {
        let minutes = (self.age().as_secs() / 60) as i64;
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// What a view shows for its active key.
#[derive(Debug)]
pub struct FetchState<T> {
    pub data: Option<Arc<T>>,
    pub loading: bool,
    pub error: Option<String>,
}

// Manual impls: cloning a state clones the Arc, not T.
impl<T> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Coarse state of the active key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Fetching,
    Fresh,
    StaleServed,
    EmptyErrored,
}

impl<T> FetchState<T> {
    fn ready(value: Arc<T>) -> Self {
        Self {
            data: Some(value),
            loading: false,
            error: None,
        }
    }

    fn fetching(previous: Option<Arc<T>>) -> Self {
        Self {
            data: previous,
            loading: true,
            error: None,
        }
    }

    fn failed(fallback: Option<Arc<T>>, message: String) -> Self {
        Self {
            data: fallback,
            loading: false,
            error: Some(message),
        }
    }

    pub fn phase(&self) -> FetchPhase {
        match (self.loading, &self.data, &self.error) {
            (true, _, _) => FetchPhase::Fetching,
            (false, Some(_), None) => FetchPhase::Fresh,
            (false, Some(_), Some(_)) => FetchPhase::StaleServed,
            (false, None, Some(_)) => FetchPhase::EmptyErrored,
            (false, None, None) => FetchPhase::Idle,
        }
    }

    /// Borrow the payload, if any.
    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }
}

struct Store<T> {
    entries: HashMap<String, CacheEntry<T>>,
    in_flight: HashMap<String, (u64, Flight<T>)>,
    next_flight: u64,
    active_key: Option<String>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            next_flight: 0,
            active_key: None,
        }
    }
}

fn lock<T>(store: &Mutex<Store<T>>) -> MutexGuard<'_, Store<T>> {
    // Nothing panics while holding the lock; recover the data if it ever does.
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-view TTL cache with stale fallback and in-flight coalescing.
///
/// The lock is only held for map reads and writes, never across an await.
/// Concurrent `resolve` calls for the same key share one fetch; `refresh`
/// always starts a new one.
pub struct FetchCache<T> {
    store: Arc<Mutex<Store<T>>>,
    state: watch::Sender<FetchState<T>>,
    default_ttl: Duration,
}

impl<T: Send + Sync + 'static> Default for FetchCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> FetchCache<T> {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(default_ttl: Duration) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            state,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Watch `{data, loading, error}` for the active key.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    /// Snapshot of the published state.
    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    pub fn active_key(&self) -> Option<String> {
        lock(&self.store).active_key.clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        lock(&self.store).entries.contains_key(key)
    }

    /// Cached value for `key`, fresh or not.
    pub fn cached(&self, key: &str) -> Option<Arc<T>> {
        lock(&self.store).entries.get(key).map(|e| e.value.clone())
    }

    /// "5m ago" style age of the entry for `key`.
    pub fn cached_age(&self, key: &str) -> Option<String> {
        lock(&self.store).entries.get(key).map(CacheEntry::age_display)
    }

    pub fn len(&self) -> usize {
        lock(&self.store).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `resolve_with_ttl` using the cache's default TTL.
    pub async fn resolve<F, Fut>(&self, key: impl Into<String>, fetch: F) -> FetchState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        self.resolve_with_ttl(key, self.default_ttl, fetch).await
    }

    /// Serve `key` from a fresh entry, or fetch it.
    ///
    /// On failure the expired entry for `key`, if any, is served alongside
    /// the error. The returned state is also published when `key` is still
    /// the active key once the fetch completes.
    pub async fn resolve_with_ttl<F, Fut>(
        &self,
        key: impl Into<String>,
        ttl: Duration,
        fetch: F,
    ) -> FetchState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let key = key.into();
        let flight = {
            let mut store = lock(&self.store);
            store.active_key = Some(key.clone());

            let previous = match store.entries.get(&key) {
                Some(entry) if entry.is_fresh(Instant::now()) => {
                    debug!(key = %key, "cache hit");
                    let state = FetchState::ready(entry.value.clone());
                    self.state.send_replace(state.clone());
                    return state;
                }
                Some(entry) => Some(entry.value.clone()),
                None => None,
            };

            let joined = store.in_flight.get(&key).map(|(_, flight)| flight.clone());
            let flight = match joined {
                Some(flight) => {
                    debug!(key = %key, "joining in-flight fetch");
                    flight
                }
                None => {
                    debug!(key = %key, stale = previous.is_some(), "cache miss");
                    self.start_flight(&mut store, key.clone(), ttl, fetch())
                }
            };
            self.state.send_replace(FetchState::fetching(previous));
            flight
        };

        let (outcome, current) = flight.await;
        let state = match outcome {
            Ok(value) => FetchState::ready(value),
            Err(message) => {
                let fallback = self.cached(&key);
                if fallback.is_some() {
                    warn!(key = %key, error = %message, "fetch failed, serving stale data");
                } else {
                    warn!(key = %key, error = %message, "fetch failed");
                }
                FetchState::failed(fallback, message)
            }
        };
        if current {
            self.publish_if_active(&key, &state);
        }
        state
    }

    /// Drop the entry for `key` and clear the exposed data. No refetch.
    ///
    /// Published data is only cleared when `key` is the active key; other
    /// keys' entries and the displayed state are left alone.
    pub fn invalidate(&self, key: &str) {
        let mut store = lock(&self.store);
        let removed = store.entries.remove(key).is_some();
        let active = store.active_key.as_deref() == Some(key);
        debug!(key = %key, removed, active, "invalidate");
        if active {
            self.state.send_modify(|state| state.data = None);
        }
    }

    /// `refresh_with_ttl` using the cache's default TTL.
    pub async fn refresh<F, Fut>(&self, key: impl Into<String>, fetch: F) -> FetchState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        self.refresh_with_ttl(key, self.default_ttl, fetch).await
    }

    /// Discard the entry for `key` and fetch unconditionally.
    ///
    /// Unlike `resolve`, a failure here serves no data: the old entry is
    /// already gone.
    pub async fn refresh_with_ttl<F, Fut>(
        &self,
        key: impl Into<String>,
        ttl: Duration,
        fetch: F,
    ) -> FetchState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let key = key.into();
        let flight = {
            let mut store = lock(&self.store);
            store.active_key = Some(key.clone());
            store.entries.remove(&key);
            debug!(key = %key, "refresh");
            let flight = self.start_flight(&mut store, key.clone(), ttl, fetch());
            self.state.send_replace(FetchState::fetching(None));
            flight
        };

        let (outcome, current) = flight.await;
        let state = match outcome {
            Ok(value) => FetchState::ready(value),
            Err(message) => {
                warn!(key = %key, error = %message, "refresh failed");
                FetchState::failed(None, message)
            }
        };
        if current {
            self.publish_if_active(&key, &state);
        }
        state
    }

    /// Register a shared fetch for `key`, replacing any earlier registration.
    /// The flight stores its own result, so the entry is written even if every
    /// caller stops waiting, but only while it is still the registered flight:
    /// a `resolve` overtaken by a `refresh` must not overwrite the newer entry.
    /// It holds only a weak handle so a dropped cache is never written to.
    fn start_flight<Fut>(
        &self,
        store: &mut Store<T>,
        key: String,
        ttl: Duration,
        fetch: Fut,
    ) -> Flight<T>
    where
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let id = store.next_flight;
        store.next_flight += 1;

        let weak: Weak<Mutex<Store<T>>> = Arc::downgrade(&self.store);
        let flight_key = key.clone();
        let flight = async move {
            let outcome = fetch.await.map(Arc::new).map_err(|e| format!("{:#}", e));
            let Some(store) = weak.upgrade() else {
                return (outcome, false);
            };
            let mut store = lock(&store);
            let current = matches!(
                store.in_flight.get(&flight_key),
                Some((registered, _)) if *registered == id
            );
            if !current {
                debug!(key = %flight_key, "fetch overtaken by a newer one, discarding result");
                return (outcome, false);
            }
            store.in_flight.remove(&flight_key);
            if let Ok(ref value) = outcome {
                store
                    .entries
                    .insert(flight_key.clone(), CacheEntry::new(value.clone(), ttl));
            }
            (outcome, true)
        }
        .boxed()
        .shared();

        store.in_flight.insert(key, (id, flight.clone()));
        flight
    }

    fn publish_if_active(&self, key: &str, state: &FetchState<T>) {
        let store = lock(&self.store);
        if store.active_key.as_deref() == Some(key) {
            self.state.send_replace(state.clone());
        } else {
            debug!(key = %key, "fetch superseded, not publishing");
        }
    }
}
