//! ttl_lru - An in-process key-value cache
//!
//! Bounds memory by entry count (LRU eviction) and entry lifetime (lazy TTL
//! expiration), with O(1) lookup, insertion and eviction. Evictions can be
//! observed through subscriptions, and operations can be memoized on top.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod memo;

pub use cache::{Cache, CacheStats, Eviction, EvictionReason, SubscriptionId};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use memo::{MemoConfig, Memoized, SharedMemoized};
