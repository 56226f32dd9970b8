// ABOUTME: In-memory AnalysisStore backed by a BTreeMap behind a tokio RwLock
// ABOUTME: Write failures can be switched on to exercise the not-saved path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;
use wellness_core::errors::{AppError, AppResult, ErrorCode};
use wellness_core::models::{AnalysisResult, HistoryPoint, WellnessDomain};

use super::AnalysisStore;

type StoreKey = (Uuid, WellnessDomain, NaiveDate);

/// Analysis store held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryAnalysisStore {
    results: RwLock<BTreeMap<StoreKey, AnalysisResult>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryAnalysisStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent upserts fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful upserts so far
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored results
    pub async fn len(&self) -> usize {
        self.results.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.results.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn upsert(&self, result: &AnalysisResult) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::new(
                ErrorCode::StorageError,
                "Failed to upsert analysis: injected write failure",
            )
            .with_user_id(result.user_id));
        }
        self.results.write().await.insert(
            (result.user_id, result.domain(), result.date()),
            result.clone(),
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        date: NaiveDate,
    ) -> AppResult<Option<AnalysisResult>> {
        Ok(self
            .results
            .read()
            .await
            .get(&(user_id, domain, date))
            .cloned())
    }

    async fn history(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        before: NaiveDate,
        limit: usize,
    ) -> AppResult<Vec<HistoryPoint>> {
        let results = self.results.read().await;
        let mut points: Vec<HistoryPoint> = results
            .range((user_id, domain, NaiveDate::MIN)..(user_id, domain, before))
            .rev()
            .take(limit)
            .map(|(_, result)| result.to_history_point())
            .collect();
        drop(results);
        points.reverse();
        Ok(points)
    }
}
