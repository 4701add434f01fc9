//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with an arena recency list,
//! lazy TTL expiration and LRU eviction.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::cache::entry::{expiry_from_now, Entry, Slot};
use crate::cache::lru::RecencyList;
use crate::cache::{CacheStats, Eviction, EvictionNotifier, EvictionReason, SubscriptionId};
use crate::config::{CacheConfig, DEFAULT_CAPACITY};
use crate::error::{CacheError, Result};

// == Cache ==
/// Bounded key-value cache with LRU eviction and lazy TTL expiration.
///
/// `get`, `set` and eviction are O(1). Expired entries are only reclaimed
/// when a lookup touches them or when capacity pressure pushes them out;
/// there is no background sweep.
///
/// The cache does no locking of its own. Share it across threads behind a
/// mutex.
#[derive(Debug)]
pub struct Cache<K, V> {
    /// Key to arena slot
    index: HashMap<K, Slot>,
    /// Entries in recency order
    list: RecencyList<K, V>,
    /// Eviction subscribers
    notifier: EvictionNotifier<K, V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries set without one, zero = never expire
    default_ttl: Duration,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new Cache with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be at least 1
    /// * `default_ttl` - TTL for entries set without one; zero means never expire
    pub fn new(capacity: usize, default_ttl: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        debug!(
            "Cache created: capacity={}, default_ttl={}ms",
            capacity,
            default_ttl.as_millis()
        );

        Ok(Self {
            index: HashMap::new(),
            list: RecencyList::new(),
            notifier: EvictionNotifier::new(),
            stats: CacheStats::new(),
            capacity,
            default_ttl,
        })
    }

    /// Creates a new Cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::new(config.capacity, config.default_ttl())
    }

    // == Get ==
    /// Retrieves a value by key, marking it most recently used.
    ///
    /// An entry found past its expiration is removed, reported to subscribers
    /// with `EvictionReason::Expired`, and counted as a miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&slot) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if self.is_expired(slot, Instant::now()) {
            let entry = self.unlink(slot);
            self.stats.record_miss();
            self.evicted(entry, EvictionReason::Expired);
            return None;
        }

        self.stats.record_hit();
        self.list.move_to_front(slot);
        self.list.get(slot).map(|entry| &entry.value)
    }

    // == Set ==
    /// Stores a key-value pair, marking it most recently used.
    ///
    /// If the key already exists its value and expiration are replaced in
    /// place; this never evicts. A new key on a full cache first evicts the
    /// least recently used entry with `EvictionReason::Capacity`, whether or
    /// not that entry had also expired.
    ///
    /// # Arguments
    /// * `ttl` - `None` uses the default TTL, `Some(Duration::ZERO)` never
    ///   expires, anything else expires that long from now
    pub fn set(&mut self, key: K, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);

        if let Some(&slot) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(slot) {
                entry.value = value;
                entry.expires_at = expiry_from_now(ttl);
            }
            self.list.move_to_front(slot);
            return;
        }

        if self.list.len() >= self.capacity {
            if let Some(entry) = self.list.pop_back() {
                self.index.remove(&entry.key);
                self.evicted(entry, EvictionReason::Capacity);
            }
        }

        let slot = self.list.push_front(Entry::new(key.clone(), value, ttl));
        self.index.insert(key, slot);
    }

    // == Remove ==
    /// Removes an entry by key and returns its value.
    ///
    /// Explicit removal is not an eviction: subscribers are not notified.
    /// An expired entry is dropped and reported as absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.index.get(key)?;
        let expired = self.is_expired(slot, Instant::now());
        let entry = self.unlink(slot);
        (!expired).then_some(entry.value)
    }

    // == Clear ==
    /// Drops every entry. Configuration, subscriptions and statistics are kept.
    ///
    /// A bulk clear is not an eviction: subscribers are not notified.
    pub fn clear(&mut self) {
        let discarded = self.list.len();
        self.index.clear();
        self.list.clear();
        info!("Cache cleared: {} entries discarded", discarded);
    }

    // == Peek ==
    /// Returns a live value without refreshing its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key).map(|entry| &entry.value)
    }

    /// Checks whether a live (unexpired) entry exists, without refreshing it.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key).is_some()
    }

    /// Time left before a live entry expires.
    ///
    /// None if the key is absent, expired, or set to never expire.
    pub fn expires_in<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key).and_then(Entry::ttl_remaining)
    }

    // == Subscriptions ==
    /// Registers a handler called synchronously for every eviction.
    ///
    /// The handler runs while the cache is mutably borrowed, so it cannot
    /// call back into this cache.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Eviction<K, V>) + Send + 'static,
    {
        self.notifier.subscribe(handler)
    }

    /// Removes a handler. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // == Accessors ==
    /// Returns the current number of entries, including expired entries
    /// not yet reclaimed.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Iterates stored keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|entry| &entry.key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.list.len());
        stats
    }

    fn live_entry<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.list.get(*self.index.get(key)?)?;
        (!entry.is_expired()).then_some(entry)
    }

    fn is_expired(&self, slot: Slot, now: Instant) -> bool {
        self.list
            .get(slot)
            .is_some_and(|entry| entry.is_expired_at(now))
    }

    /// Detaches an entry from both the list and the index.
    fn unlink(&mut self, slot: Slot) -> Entry<K, V> {
        let entry = self.list.remove(slot);
        self.index.remove(&entry.key);
        entry
    }

    /// Records an eviction and hands it to subscribers.
    fn evicted(&mut self, entry: Entry<K, V>, reason: EvictionReason) {
        self.stats.record_eviction(reason);
        debug!(
            "Entry evicted ({}): {} of {} entries remain",
            reason,
            self.list.len(),
            self.capacity
        );

        self.notifier.notify(&Eviction {
            key: entry.key,
            value: entry.value,
            reason,
        });
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Capacity 100, entries never expire unless given a TTL.
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            list: RecencyList::new(),
            notifier: EvictionNotifier::new(),
            stats: CacheStats::new(),
            capacity: DEFAULT_CAPACITY,
            default_ttl: Duration::ZERO,
        }
    }
}
