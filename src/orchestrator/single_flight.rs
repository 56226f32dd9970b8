// ABOUTME: Single-flight coalescing of concurrent runs for the same key
// ABOUTME: Runs execute in spawned tasks so a dropped caller never cancels the shared work
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use wellness_core::errors::AnalysisError;

/// Future shared by every caller of one flight
pub type Flight<T> = Shared<BoxFuture<'static, Result<T, AnalysisError>>>;

type FlightMap<K, T> = DashMap<K, (u64, Flight<T>)>;

/// In-flight runs keyed by `K`
pub struct SingleFlight<K, T>
where
    K: Eq + Hash,
{
    inflight: Arc<FlightMap<K, T>>,
    next_id: AtomicU64,
}

impl<K, T> Default for SingleFlight<K, T>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            inflight: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<K, T> SingleFlight<K, T>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Empty flight table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flight currently running for `key`, if any
    #[must_use]
    pub fn current(&self, key: &K) -> Option<Flight<T>> {
        self.inflight.get(key).map(|entry| entry.1.clone())
    }

    /// Number of keys with a run in flight
    #[must_use]
    pub fn len(&self) -> usize {
        self.inflight.len()
    }

    /// Whether nothing is in flight
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inflight.is_empty()
    }

    /// Join the run for `key`, starting it with `start` if none is in flight
    ///
    /// # Errors
    ///
    /// Returns the run's own error, or [`AnalysisError::Internal`] if the
    /// spawned task panicked or was cancelled
    pub async fn run<F, Fut>(&self, key: K, start: F) -> Result<T, AnalysisError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AnalysisError>> + Send + 'static,
    {
        let flight = match self.inflight.entry(key.clone()) {
            Entry::Occupied(existing) => {
                debug!("Joining in-flight analysis");
                existing.get().1.clone()
            }
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let flights = Arc::clone(&self.inflight);
                let work = start();
                let handle = tokio::spawn(async move {
                    let result = work.await;
                    flights.remove_if(&key, |_, (flight_id, _)| *flight_id == id);
                    result
                });
                let flight: Flight<T> = async move {
                    handle.await.map_err(|e| {
                        AnalysisError::Internal(format!("analysis task did not complete: {e}"))
                    })?
                }
                .boxed()
                .shared();
                slot.insert((id, flight.clone()));
                flight
            }
        };
        flight.await
    }
}
