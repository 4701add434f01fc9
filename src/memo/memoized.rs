//! Synchronous memoizing wrapper.

use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use crate::cache::{Cache, CacheStats};
use crate::error::CacheError;
use crate::memo::{KeyGenerator, MemoConfig};

// == Memoized ==
/// An operation paired with one dedicated cache of its results.
///
/// The operation returns `Ok(None)` for "no result"; such results and
/// errors are passed through and never cached.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_lru::{CacheError, MemoConfig, Memoized};
///
/// let mut square = Memoized::new(MemoConfig::new(Duration::from_secs(60)), |n: &u64| {
///     Ok::<_, CacheError>(Some(n * n))
/// })?;
/// assert_eq!(square.call(&12)?, Some(144));
/// assert_eq!(square.cache().len(), 1);
/// # Ok::<(), CacheError>(())
/// ```
pub struct Memoized<A, V, F> {
    cache: Cache<String, V>,
    key_generator: KeyGenerator<A>,
    op: F,
    _args: PhantomData<fn(&A)>,
}

impl<A, V, F> Memoized<A, V, F>
where
    V: Clone,
{
    // == Constructor ==
    /// Wraps `op` with a cache built from `config`.
    ///
    /// Fails if the configured capacity is zero.
    pub fn new<E>(config: MemoConfig<A>, op: F) -> Result<Self, CacheError>
    where
        F: FnMut(&A) -> Result<Option<V>, E>,
    {
        Ok(Self {
            cache: Cache::new(config.capacity, config.ttl)?,
            key_generator: config.key_generator,
            op,
            _args: PhantomData,
        })
    }

    // == Call ==
    /// Returns the cached result for `args`, invoking the operation on a miss.
    ///
    /// Key generation errors are converted into `E`; errors from the
    /// operation itself are returned unchanged.
    pub fn call<E>(&mut self, args: &A) -> Result<Option<V>, E>
    where
        F: FnMut(&A) -> Result<Option<V>, E>,
        E: From<CacheError>,
    {
        let key = (self.key_generator)(args)?;
        if let Some(value) = self.cache.get(key.as_str()) {
            trace!("Memoized hit");
            return Ok(Some(value.clone()));
        }

        let result = (self.op)(args)?;
        if let Some(value) = &result {
            self.cache.set(key, value.clone(), None);
        }
        Ok(result)
    }

    pub fn cache(&self) -> &Cache<String, V> {
        &self.cache
    }

    /// Mutable access, e.g. to subscribe to evictions or clear results.
    pub fn cache_mut(&mut self) -> &mut Cache<String, V> {
        &mut self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl<A, V, F> fmt::Debug for Memoized<A, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("len", &self.cache.len())
            .field("capacity", &self.cache.capacity())
            .finish_non_exhaustive()
    }
}
