// ABOUTME: Integration tests for the SQLite and in-memory analysis stores
// ABOUTME: Upsert replacement, history ordering and limits, and payload version checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::NaiveDate;
use common::{day, fixed_now, health_snapshot};
use sqlx::Row;
use tempfile::TempDir;
use uuid::Uuid;
use wellness_engine::wellness_core::models::{AnalysisResult, Pillar, WellnessDomain};
use wellness_engine::wellness_intelligence::WellnessEngine;
use wellness_engine::{AnalysisStore, InMemoryAnalysisStore, SqliteAnalysisStore};

async fn temp_store() -> (TempDir, SqliteAnalysisStore) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("wellness.db").display());
    let store = SqliteAnalysisStore::connect(&url).await.unwrap();
    (dir, store)
}

fn analysis(user: Uuid, date: NaiveDate, scores: [f64; 4]) -> AnalysisResult {
    let mut snapshot = health_snapshot(date, scores);
    snapshot.user_id = user;
    WellnessEngine::default().analyze(&snapshot, &[], fixed_now())
}

fn assert_same_result(stored: &AnalysisResult, original: &AnalysisResult) {
    assert_eq!(stored.id, original.id);
    assert_eq!(stored.user_id, original.user_id);
    assert_eq!(stored.snapshot_ref, original.snapshot_ref);
    assert!((stored.global_score - original.global_score).abs() < 1e-9);
    assert_eq!(stored.pillar_scores.len(), original.pillar_scores.len());
    for (pillar, score) in original.pillar_scores.iter() {
        assert!((stored.pillar_scores.get(pillar).unwrap() - score).abs() < 1e-9);
    }
    assert_eq!(stored.risk_profile.level, original.risk_profile.level);
    assert_eq!(stored.insights, original.insights);
    assert_eq!(stored.pillar_statuses, original.pillar_statuses);
    assert_eq!(stored.data_quality.confidence, original.data_quality.confidence);
    assert_eq!(stored.created_at, original.created_at);
}

#[tokio::test]
async fn test_upsert_then_get() {
    let (_dir, store) = temp_store().await;
    let user = Uuid::new_v4();
    let result = analysis(user, day(2025, 3, 14), [82.0, 64.0, 71.0, 90.0]);

    store.upsert(&result).await.unwrap();
    let stored = store
        .get(user, WellnessDomain::Health, day(2025, 3, 14))
        .await
        .unwrap()
        .unwrap();

    assert_same_result(&stored, &result);
    assert!(store
        .get(user, WellnessDomain::Sleep, day(2025, 3, 14))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_recompute_replaces_the_row() {
    let (_dir, store) = temp_store().await;
    let user = Uuid::new_v4();
    let first = analysis(user, day(2025, 3, 14), [60.0; 4]);
    let second = analysis(user, day(2025, 3, 14), [90.0; 4]);

    store.upsert(&first).await.unwrap();
    store.upsert(&second).await.unwrap();

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM wellness_analyses")
        .fetch_one(store.pool())
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 1);

    let stored = store
        .get(user, WellnessDomain::Health, day(2025, 3, 14))
        .await
        .unwrap()
        .unwrap();
    assert_same_result(&stored, &second);
}

#[tokio::test]
async fn test_history_is_oldest_first_limited_and_strictly_before() {
    let (_dir, store) = temp_store().await;
    let user = Uuid::new_v4();
    for date in 8..=14 {
        let score = 50.0 + f64::from(date);
        store
            .upsert(&analysis(user, day(2025, 3, date), [score; 4]))
            .await
            .unwrap();
    }
    // Another user's rows never leak in
    store
        .upsert(&analysis(Uuid::new_v4(), day(2025, 3, 13), [10.0; 4]))
        .await
        .unwrap();

    let history = store
        .history(user, WellnessDomain::Health, day(2025, 3, 14), 3)
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = history.iter().map(|point| point.date).collect();
    assert_eq!(dates, vec![day(2025, 3, 11), day(2025, 3, 12), day(2025, 3, 13)]);
    assert_eq!(history[2].pillar_scores.get(Pillar::Fitness), Some(63.0));
}

#[tokio::test]
async fn test_unknown_payload_version_is_an_error() {
    let (_dir, store) = temp_store().await;
    let user = Uuid::new_v4();
    store
        .upsert(&analysis(user, day(2025, 3, 14), [70.0; 4]))
        .await
        .unwrap();

    sqlx::query("UPDATE wellness_analyses SET payload_version = 'v0'")
        .execute(store.pool())
        .await
        .unwrap();

    let error = store
        .get(user, WellnessDomain::Health, day(2025, 3, 14))
        .await
        .unwrap_err();
    assert!(error.message.contains("payload version"));
}

#[tokio::test]
async fn test_migrate_is_idempotent() {
    let (_dir, store) = temp_store().await;

    store.migrate().await.unwrap();
    store.migrate().await.unwrap();
}

#[tokio::test]
async fn test_in_memory_store_matches_history_contract() {
    let store = InMemoryAnalysisStore::new();
    let user = Uuid::new_v4();
    for date in [10, 14, 12, 11] {
        store
            .upsert(&analysis(user, day(2025, 3, date), [70.0; 4]))
            .await
            .unwrap();
    }

    let history = store
        .history(user, WellnessDomain::Health, day(2025, 3, 14), 2)
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = history.iter().map(|point| point.date).collect();
    assert_eq!(dates, vec![day(2025, 3, 11), day(2025, 3, 12)]);
    assert_eq!(store.len().await, 4);
}
