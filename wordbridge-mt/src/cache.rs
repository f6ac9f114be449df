//! Time-bounded memoization for calls to external services
//!
//! A [`CachedFunction`] sits in front of an async operation. Calls are keyed
//! by a string built with [`cache_key`]; a successful result is kept for the
//! policy's `max_age` and served to later calls with the same key. Failures
//! are never stored.
//!
//! Storage is pluggable through [`CacheStore`]. [`MemoryStore`] keeps entries
//! in process; a shared store (Redis, a KV service) can implement the same
//! trait. There is no default store: the caller always says where results go.
//!
//! # Example
//!
//! ```ignore
//! let synonyms = CachedFunction::new(
//!     CachePolicy::new("synonyms", Duration::from_secs(3600)),
//!     Arc::new(MemoryStore::new()),
//! );
//! let key = synonyms.key(&["happy"]);
//! let found = synonyms.call(key, || provider.synonyms("happy")).await?;
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Number of entries above which [`MemoryStore`] sweeps expired entries on insert
const PURGE_THRESHOLD: usize = 4096;

/// Build a cache key from an operation name and its arguments
///
/// Parts are joined with `:`. Any `\` or `:` inside a part is escaped first,
/// so `("a:b", "c")` and `("a", "b:c")` get different keys.
pub fn cache_key(name: &str, parts: &[&str]) -> String {
    let mut key = escape_part(name);
    for part in parts {
        key.push(':');
        key.push_str(&escape_part(part));
    }
    key
}

fn escape_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        if c == '\\' || c == ':' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Name and lifetime of a cached operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub name: String,
    pub max_age: Duration,
}

impl CachePolicy {
    pub fn new(name: impl Into<String>, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            max_age,
        }
    }
}

/// Backing storage for cached values
#[async_trait]
pub trait CacheStore<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// The value stored under `key`, unless it is missing or expired
    async fn get(&self, key: &str) -> Option<V>;

    /// Store `value` under `key` until `max_age` from now
    async fn put(&self, key: String, value: V, max_age: Duration);
}

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    /// `None` when `max_age` reaches past the clock's range
    expires_at: Option<Instant>,
}

impl<V> Slot<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// In-process [`CacheStore`] backed by a hash map
///
/// Expired entries are dropped when read. Once the map grows past a
/// threshold, inserts also sweep every expired entry.
#[derive(Debug)]
pub struct MemoryStore<V> {
    entries: Mutex<HashMap<String, Slot<V>>>,
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, slot| slot.is_live(now));
        before - entries.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> CacheStore<V> for MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            Some(slot) if slot.is_live(now) => return Some(slot.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    async fn put(&self, key: String, value: V, max_age: Duration) {
        let now = Instant::now();
        let expires_at = now.checked_add(max_age);
        let mut entries = self.lock();
        if entries.len() >= PURGE_THRESHOLD {
            entries.retain(|_, slot| slot.is_live(now));
        }
        entries.insert(key, Slot { value, expires_at });
    }
}

type Gate = Arc<tokio::sync::Mutex<()>>;

/// A checked-out gate, handed back to its [`CachedFunction`] on drop
///
/// Dropping covers the case where the caller's future is cancelled while
/// waiting on the gate or running the operation.
struct GateTicket<'a, V>
where
    V: Clone + Send + Sync + 'static,
{
    function: &'a CachedFunction<V>,
    key: &'a str,
    gate: Gate,
}

impl<V> Drop for GateTicket<'_, V>
where
    V: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.function.release(self.key, &self.gate);
    }
}

/// An async operation wrapped with a cache
///
/// Concurrent calls for the same key are serialized: the first runs the
/// operation, the others wait and then read its stored result. Calls for
/// different keys never wait on each other.
pub struct CachedFunction<V>
where
    V: Clone + Send + Sync + 'static,
{
    policy: CachePolicy,
    store: Arc<dyn CacheStore<V>>,
    gates: Mutex<HashMap<String, Gate>>,
}

impl<V> CachedFunction<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(policy: CachePolicy, store: Arc<dyn CacheStore<V>>) -> Self {
        Self {
            policy,
            store,
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Key for a call with these arguments, prefixed with the policy name
    pub fn key(&self, parts: &[&str]) -> String {
        cache_key(&self.policy.name, parts)
    }

    /// Return the cached value for `key`, or run `operation` and cache its success
    ///
    /// An error from `operation` is returned unchanged and nothing is stored.
    pub async fn call<E, F, Fut>(&self, key: String, operation: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.store.get(&key).await {
            debug!("cache hit: {}", key);
            return Ok(value);
        }

        let ticket = self.checkout(&key);
        let _held = ticket.gate.lock().await;

        // Another caller may have filled the slot while we waited
        if let Some(value) = self.store.get(&key).await {
            debug!("cache hit after wait: {}", key);
            return Ok(value);
        }

        debug!("cache miss: {}", key);
        let result = operation().await;
        if let Ok(value) = &result {
            self.store
                .put(key.clone(), value.clone(), self.policy.max_age)
                .await;
        }
        result
    }

    fn checkout<'a>(&'a self, key: &'a str) -> GateTicket<'a, V> {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        let gate = gates.entry(key.to_string()).or_default().clone();
        GateTicket {
            function: self,
            key,
            gate,
        }
    }

    fn release(&self, key: &str, gate: &Gate) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference is the ticket's, one is the map's; anything more is a waiter
        if Arc::strong_count(gate) <= 2 {
            gates.remove(key);
        }
    }

    #[cfg(test)]
    fn open_gates(&self) -> usize {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<V> std::fmt::Debug for CachedFunction<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedFunction")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
