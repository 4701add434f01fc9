//! Async memoizing wrapper shared between tasks.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::trace;

use crate::cache::{Cache, CacheStats};
use crate::error::CacheError;
use crate::memo::{KeyGenerator, MemoConfig};

// == Shared Memoized ==
/// Cloneable handle memoizing an async operation, such as a remote call.
///
/// All clones share one cache behind an async mutex. The lock is released
/// while the operation runs, so concurrent misses on the same key may each
/// invoke it; the last result stored wins.
pub struct SharedMemoized<A, V, F> {
    cache: Arc<Mutex<Cache<String, V>>>,
    key_generator: KeyGenerator<A>,
    op: Arc<F>,
}

impl<A, V, F> SharedMemoized<A, V, F>
where
    V: Clone,
{
    // == Constructor ==
    /// Wraps `op` with a cache built from `config`.
    pub fn new(config: MemoConfig<A>, op: F) -> Result<Self, CacheError> {
        Ok(Self {
            cache: Arc::new(Mutex::new(Cache::new(config.capacity, config.ttl)?)),
            key_generator: config.key_generator,
            op: Arc::new(op),
        })
    }

    // == Call ==
    /// Returns the cached result for `args`, awaiting the operation on a miss.
    ///
    /// Only `Ok(Some(_))` results are cached. Errors from the operation are
    /// returned unchanged.
    pub async fn call<Fut, E>(&self, args: A) -> Result<Option<V>, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<Option<V>, E>>,
        E: From<CacheError>,
    {
        let key = (self.key_generator)(&args)?;
        {
            let mut cache = self.cache.lock().await;
            if let Some(value) = cache.get(key.as_str()) {
                trace!("Memoized hit");
                return Ok(Some(value.clone()));
            }
        }

        let result = (self.op)(args).await?;
        if let Some(value) = &result {
            self.cache.lock().await.set(key, value.clone(), None);
        }
        Ok(result)
    }

    /// The shared cache, e.g. to subscribe to evictions.
    pub fn cache(&self) -> Arc<Mutex<Cache<String, V>>> {
        self.cache.clone()
    }

    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }
}

impl<A, V, F> Clone for SharedMemoized<A, V, F> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            key_generator: self.key_generator.clone(),
            op: self.op.clone(),
        }
    }
}

impl<A, V, F> fmt::Debug for SharedMemoized<A, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMemoized").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    enum RemoteError {
        Cache,
        Unavailable,
    }

    impl From<CacheError> for RemoteError {
        fn from(_: CacheError) -> Self {
            RemoteError::Cache
        }
    }

    #[tokio::test]
    async fn test_hits_skip_the_remote_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let fetch = SharedMemoized::new(MemoConfig::<u32>::new(Duration::from_secs(60)), move |id: u32| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok::<_, RemoteError>(Some(format!("user-{id}")))
            }
        })
        .unwrap();

        assert_eq!(fetch.call(7).await, Ok(Some("user-7".to_string())));
        assert_eq!(fetch.call(7).await, Ok(Some("user-7".to_string())));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetch.stats().await.hits, 1);
    }

    #[tokio::test]
    async fn test_clones_share_one_cache() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let fetch = SharedMemoized::new(MemoConfig::<u32>::new(Duration::ZERO), move |id: u32| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, RemoteError>(Some(id * 2))
            }
        })
        .unwrap();

        let other = fetch.clone();
        tokio::spawn(async move { other.call(21).await })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetch.call(21).await, Ok(Some(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetch.len().await, 1);
    }

    #[tokio::test]
    async fn test_failures_and_none_are_not_cached() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let fetch = SharedMemoized::new(MemoConfig::<u32>::new(Duration::ZERO), move |id: u32| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                match id {
                    0 => Err(RemoteError::Unavailable),
                    _ => Ok(None::<u32>),
                }
            }
        })
        .unwrap();

        assert_eq!(fetch.call(0).await, Err(RemoteError::Unavailable));
        assert_eq!(fetch.call(0).await, Err(RemoteError::Unavailable));
        assert_eq!(fetch.call(1).await, Ok(None));
        assert_eq!(fetch.call(1).await, Ok(None));

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(fetch.len().await, 0);
    }

    #[tokio::test]
    async fn test_clear_forces_recompute() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let fetch = SharedMemoized::new(MemoConfig::<u32>::new(Duration::ZERO), move |id: u32| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, RemoteError>(Some(id))
            }
        })
        .unwrap();

        fetch.call(1).await.unwrap();
        fetch.clear().await;
        fetch.call(1).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
