//! Cache Entry Module
//!
//! Defines the record stored for each key, with TTL support and recency links.

use std::time::{Duration, Instant};

/// Position of an entry inside the recency arena.
pub(crate) type Slot = usize;

// == Cache Entry ==
/// A single cache entry: key, value, expiration and its place in the recency list.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    /// The key, duplicated from the index so evictions can report it
    pub key: K,
    /// The stored value
    pub value: V,
    /// Absolute expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
    /// Neighbour towards the most recently used end
    pub prev: Option<Slot>,
    /// Neighbour towards the least recently used end
    pub next: Option<Slot>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry that expires `ttl` from now.
    ///
    /// A zero `ttl` means the entry never expires.
    pub fn new(key: K, value: V, ttl: Duration) -> Self {
        Self {
            key,
            value,
            expires_at: expiry_from_now(ttl),
            prev: None,
            next: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches its expiration instant, so a
    /// TTL that has fully elapsed is never served.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Checks if the entry has expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns remaining TTL, or None if no expiration is set.
    ///
    /// - `Some(Duration::ZERO)` once the entry has expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

/// Converts a relative TTL into an absolute expiration instant.
pub(crate) fn expiry_from_now(ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() {
        None
    } else {
        Instant::now().checked_add(ttl)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = Entry::new("key", "value", Duration::ZERO);

        assert_eq!(entry.value, "value");
        assert!(entry.expires_at.is_none());
        assert!(entry.prev.is_none() && entry.next.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = Entry::new("key", "value", Duration::from_secs(60));

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = Entry::new("key", "value", Duration::from_millis(50));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = Entry::new("key", "value", Duration::from_secs(10));

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_no_expiration() {
        let entry = Entry::new("key", "value", Duration::ZERO);
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = Entry::new("key", "value", Duration::from_millis(20));

        sleep(Duration::from_millis(40));

        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = Entry {
            key: "key",
            value: "value",
            expires_at: Some(now),
            prev: None,
            next: None,
        };

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        if let Some(earlier) = now.checked_sub(Duration::from_millis(1)) {
            assert!(!entry.is_expired_at(earlier));
        }
    }
}
