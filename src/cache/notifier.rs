//! Eviction Notifier Module
//!
//! Lets callers observe entries the cache drops on its own.

use std::fmt;

use serde::Serialize;

// == Eviction Reason ==
/// Why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionReason {
    /// Pushed out as least recently used to make room for a new key
    Capacity,
    /// Found past its expiration on lookup
    Expired,
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionReason::Capacity => f.write_str("capacity"),
            EvictionReason::Expired => f.write_str("expired"),
        }
    }
}

// == Eviction ==
/// Notification record handed to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction<K, V> {
    pub key: K,
    pub value: V,
    pub reason: EvictionReason,
}

/// Callback invoked for each eviction.
pub type EvictionHandler<K, V> = Box<dyn FnMut(&Eviction<K, V>) + Send>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// == Eviction Notifier ==
/// Ordered list of eviction subscribers.
///
/// Handlers run synchronously, in registration order, while the owning cache
/// is mutably borrowed. A handler therefore cannot call back into the same
/// cache; smuggling it in through interior mutability is not supported.
pub struct EvictionNotifier<K, V> {
    subscribers: Vec<(SubscriptionId, EvictionHandler<K, V>)>,
    next_id: u64,
}

impl<K, V> EvictionNotifier<K, V> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    // == Subscribe ==
    /// Registers a handler and returns its subscription handle.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Eviction<K, V>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    // == Unsubscribe ==
    /// Removes a handler. Returns false if the handle was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    // == Notify ==
    /// Delivers one eviction to every subscriber.
    pub fn notify(&mut self, eviction: &Eviction<K, V>) {
        for (_, handler) in &mut self.subscribers {
            handler(eviction);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<K, V> Default for EvictionNotifier<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for EvictionNotifier<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvictionNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
