//! Cache Module
//!
//! Provides an in-memory cache with LRU eviction, lazy TTL expiration and
//! eviction notifications.

mod entry;
mod lru;
mod notifier;
mod stats;
mod store;


// Re-export public types
pub use notifier::{Eviction, EvictionHandler, EvictionNotifier, EvictionReason, SubscriptionId};
pub use stats::CacheStats;
pub use store::Cache;
