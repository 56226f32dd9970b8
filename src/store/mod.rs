// ABOUTME: AnalysisStore contract for persisting analysis results keyed by user, domain and day
// ABOUTME: SQLite implementation via sqlx plus an in-memory store with fault injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Store
//!
//! The engine builds an [`AnalysisResult`] as one value; the store owns the
//! write. Writes are idempotent upserts keyed by `(user_id, domain, date)`,
//! so a recomputed result supersedes the earlier one in place and duplicate
//! writes from overlapping runs are harmless.

/// In-memory store for tests and offline runs
pub mod memory;
/// `SQLite` store
pub mod sqlite;

pub use memory::InMemoryAnalysisStore;
pub use sqlite::SqliteAnalysisStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;
use wellness_core::errors::AppResult;
use wellness_core::models::{AnalysisResult, HistoryPoint, WellnessDomain};

/// Persistence collaborator for analysis results
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Insert or replace the result for its `(user_id, domain, date)`
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails
    async fn upsert(&self, result: &AnalysisResult) -> AppResult<()>;

    /// Stored result for one user, domain and day
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored row cannot be decoded
    async fn get(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        date: NaiveDate,
    ) -> AppResult<Option<AnalysisResult>>;

    /// Up to `limit` most recent results strictly before `before`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or a stored row cannot be decoded
    async fn history(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        before: NaiveDate,
        limit: usize,
    ) -> AppResult<Vec<HistoryPoint>>;
}
