//! Memoization Module
//!
//! Wraps an operation with a dedicated cache keyed by its arguments.
//!
//! # Wrappers
//! - `Memoized`: synchronous operations, owns its cache outright
//! - `SharedMemoized`: async operations, cloneable handle over one shared cache

mod memoized;
mod shared;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::config::DEFAULT_CAPACITY;
use crate::error::Result;

pub use memoized::Memoized;
pub use shared::SharedMemoized;

/// Derives the cache key for one invocation.
pub type KeyGenerator<A> = Arc<dyn Fn(&A) -> Result<String> + Send + Sync>;

// == Default Key ==
/// Canonical key for an argument value: its JSON serialization.
///
/// Tuples, structs and sequences serialize deterministically. Arguments
/// containing hash maps do not; supply a key generator for those.
pub fn json_key<A: Serialize + ?Sized>(args: &A) -> Result<String> {
    Ok(serde_json::to_string(args)?)
}

// == Memo Config ==
/// Configuration for a memoizing wrapper.
pub struct MemoConfig<A> {
    /// TTL for every cached result, zero = never expire
    pub ttl: Duration,
    /// Maximum number of cached results
    pub capacity: usize,
    /// Derives the cache key from the call arguments
    pub key_generator: KeyGenerator<A>,
}

impl<A: Serialize + 'static> MemoConfig<A> {
    /// Creates a config keyed by the JSON serialization of the arguments.
    pub fn new(ttl: Duration) -> Self {
        Self::keyed_by(ttl, json_key::<A>)
    }
}

impl<A> MemoConfig<A> {
    /// Creates a config with a custom key generator.
    ///
    /// Errors from the generator are returned from the wrapped call, never
    /// swallowed.
    pub fn keyed_by<G>(ttl: Duration, key_generator: G) -> Self
    where
        G: Fn(&A) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            ttl,
            capacity: DEFAULT_CAPACITY,
            key_generator: Arc::new(key_generator),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_key_generator<G>(mut self, key_generator: G) -> Self
    where
        G: Fn(&A) -> Result<String> + Send + Sync + 'static,
    {
        self.key_generator = Arc::new(key_generator);
        self
    }
}

impl<A> Clone for MemoConfig<A> {
    fn clone(&self) -> Self {
        Self {
            ttl: self.ttl,
            capacity: self.capacity,
            key_generator: self.key_generator.clone(),
        }
    }
}

impl<A> fmt::Debug for MemoConfig<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoConfig")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
