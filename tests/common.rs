// ABOUTME: Shared test utilities for wellness engine integration tests
// ABOUTME: Snapshot builders, static-provider aggregators, and orchestrator setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `wellness_engine`

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::{Arc, Once};
use std::time::Duration;
use uuid::Uuid;
use wellness_engine::cache::CacheConfig;
use wellness_engine::orchestrator::AnalysisOrchestrator;
use wellness_engine::wellness_core::models::{
    DailySnapshot, HistoryPoint, Pillar, PillarInput, PillarScores, WellnessDomain,
};
use wellness_engine::wellness_intelligence::WellnessEngine;
use wellness_engine::wellness_providers::StaticPillarProvider;
use wellness_engine::{AnalysisStore, MetricsAggregator};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

/// Calendar day shorthand
pub fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap()
}

/// Fixed timestamp used as `created_at` in deterministic runs
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
}

/// Snapshot with bare scores for the given pillars
pub fn snapshot(
    domain: WellnessDomain,
    date: NaiveDate,
    scores: &[(Pillar, f64)],
) -> DailySnapshot {
    scores.iter().fold(
        DailySnapshot::new(Uuid::nil(), domain, date),
        |snapshot, (pillar, score)| snapshot.with_pillar(*pillar, PillarInput::new(*score)),
    )
}

/// Health snapshot in fitness, nutrition, recovery, hydration order
pub fn health_snapshot(date: NaiveDate, scores: [f64; 4]) -> DailySnapshot {
    snapshot(
        WellnessDomain::Health,
        date,
        &[
            (Pillar::Fitness, scores[0]),
            (Pillar::Nutrition, scores[1]),
            (Pillar::Recovery, scores[2]),
            (Pillar::Hydration, scores[3]),
        ],
    )
}

/// History point with the given pillar scores
pub fn history_point(date: NaiveDate, global_score: f64, scores: &[(Pillar, f64)]) -> HistoryPoint {
    HistoryPoint {
        date,
        global_score,
        pillar_scores: scores.iter().copied().collect::<PillarScores>(),
    }
}

/// One static provider per health pillar, serving constant scores
pub fn health_providers(scores: [f64; 4]) -> Vec<Arc<StaticPillarProvider>> {
    [
        Pillar::Fitness,
        Pillar::Nutrition,
        Pillar::Recovery,
        Pillar::Hydration,
    ]
    .iter()
    .zip(scores)
    .map(|(pillar, score)| Arc::new(StaticPillarProvider::with_score(*pillar, score)))
    .collect()
}

/// Health aggregator over the given providers with a short timeout
pub fn health_aggregator(providers: &[Arc<StaticPillarProvider>]) -> MetricsAggregator {
    providers.iter().fold(
        MetricsAggregator::new(WellnessDomain::Health).with_timeout(Duration::from_millis(500)),
        |aggregator, provider| aggregator.with_provider(provider.clone()).unwrap(),
    )
}

/// Session cache without the background sweeper
pub fn test_cache_config() -> CacheConfig {
    CacheConfig {
        max_entries: 100,
        ttl: Duration::from_secs(60),
        cleanup_interval: Duration::from_secs(60),
        enable_background_cleanup: false,
    }
}

/// Orchestrator with a fixed clock and a quiet session cache
pub fn test_orchestrator(
    aggregator: MetricsAggregator,
    store: Arc<dyn AnalysisStore>,
) -> AnalysisOrchestrator {
    init_test_logging();
    AnalysisOrchestrator::builder(WellnessEngine::default(), store)
        .aggregator(aggregator)
        .session_cache(test_cache_config())
        .clock(fixed_now)
        .build()
}
