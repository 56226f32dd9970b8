// ABOUTME: In-memory session cache with LRU eviction, TTL expiry and explicit close
// ABOUTME: A background task sweeps expired sessions until the cache is closed or dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use wellness_core::errors::{AppError, AppResult};

use super::{CacheConfig, SessionKey};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

type Store<V> = Arc<RwLock<LruCache<String, CacheEntry<V>>>>;

/// Bounded session store
///
/// Capacity is enforced by LRU eviction on insert; staleness by a per-entry
/// TTL checked on read and swept periodically. After [`SessionCache::close`]
/// the cache is empty and ignores writes.
pub struct SessionCache<V> {
    store: Store<V>,
    ttl: Duration,
    closed: AtomicBool,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl<V> SessionCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create the cache, spawning the cleanup task if enabled
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        let store: Store<V> = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = config.enable_background_cleanup.then(|| {
            let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
            let sweep_store = Arc::clone(&store);
            let every = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(every);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&sweep_store).await;
                        }
                        _ = shutdown_rx.recv() => {
                            debug!("Session cache cleanup task stopping");
                            break;
                        }
                    }
                }
            });
            shutdown_tx
        });

        Self {
            store,
            ttl: config.ttl,
            closed: AtomicBool::new(false),
            shutdown_tx,
        }
    }

    async fn cleanup_expired(store: &Store<V>) -> usize {
        let mut guard = store.write().await;
        let expired: Vec<String> = guard
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            guard.pop(key);
        }
        drop(guard);

        if !expired.is_empty() {
            debug!(removed = expired.len(), "Swept expired sessions");
        }
        expired.len()
    }

    /// Sweep expired sessions now; returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        Self::cleanup_expired(&self.store).await
    }

    /// Whether [`SessionCache::close`] has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Live session for `key`, refreshing its LRU position
    pub async fn get(&self, key: &SessionKey) -> Option<V> {
        let cache_key = key.to_string();
        let mut store = self.store.write().await;
        let expired = store.get(&cache_key)?.is_expired();
        if expired {
            store.pop(&cache_key);
            return None;
        }
        store.get(&cache_key).map(|entry| entry.value.clone())
    }

    /// Store a session, restarting its TTL
    pub async fn insert(&self, key: &SessionKey, value: V) {
        if self.is_closed() {
            debug!(%key, "Session cache closed, write ignored");
            return;
        }
        self.store
            .write()
            .await
            .push(key.to_string(), CacheEntry::new(value, self.ttl));
    }

    /// Read-modify-write one session under a single lock
    ///
    /// `apply` receives the live session (if any) and returns the new one,
    /// which is stored with a fresh TTL and returned.
    pub async fn update<F>(&self, key: &SessionKey, apply: F) -> V
    where
        F: FnOnce(Option<V>) -> V + Send,
    {
        let cache_key = key.to_string();
        let mut store = self.store.write().await;
        let current = store
            .pop(&cache_key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value);
        let next = apply(current);
        if !self.is_closed() {
            store.push(cache_key, CacheEntry::new(next.clone(), self.ttl));
        }
        next
    }

    /// Drop one session; returns whether it existed
    pub async fn invalidate(&self, key: &SessionKey) -> bool {
        self.store.write().await.pop(&key.to_string()).is_some()
    }

    /// Drop every session whose key matches a glob
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid glob
    pub async fn invalidate_pattern(&self, pattern: &str) -> AppResult<u64> {
        let matcher = glob::Pattern::new(pattern).map_err(|e| {
            AppError::invalid_input(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        let mut store = self.store.write().await;
        let matching: Vec<String> = store
            .iter()
            .filter(|(key, _)| matcher.matches(key))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &matching {
            store.pop(key);
        }
        drop(store);

        Ok(matching.len() as u64)
    }

    /// Sessions currently held, including not-yet-swept expired ones
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether no sessions are held
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Stop the cleanup task and release every session
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(tx) = &self.shutdown_tx {
            if let Err(e) = tx.try_send(()) {
                debug!(error = ?e, "Session cache shutdown signal not delivered");
            }
        }
        self.store.write().await.clear();
        debug!("Session cache closed");
    }
}

impl<V> Drop for SessionCache<V> {
    fn drop(&mut self) {
        if let Some(tx) = &self.shutdown_tx {
            let _ = tx.try_send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;
    use wellness_core::models::WellnessDomain;

    fn key(day: u32) -> SessionKey {
        SessionKey::new(
            Uuid::nil(),
            WellnessDomain::Sleep,
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        )
    }

    fn config(max_entries: usize, ttl: Duration) -> CacheConfig {
        CacheConfig {
            max_entries,
            ttl,
            cleanup_interval: Duration::from_secs(60),
            enable_background_cleanup: false,
        }
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = SessionCache::new(&config(2, Duration::from_secs(60)));
        cache.insert(&key(1), 1_u32).await;
        cache.insert(&key(2), 2).await;
        cache.insert(&key(3), 3).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(&key(1)).await, None);
        assert_eq!(cache.get(&key(3)).await, Some(3));
    }

    #[tokio::test]
    async fn test_update_starts_from_none() {
        let cache = SessionCache::new(&config(4, Duration::from_secs(60)));
        let first = cache.update(&key(1), |current| current.unwrap_or(0) + 1).await;
        let second = cache.update(&key(1), |current| current.unwrap_or(0) + 1).await;
        assert_eq!((first, second), (1_u32, 2));
    }
}
