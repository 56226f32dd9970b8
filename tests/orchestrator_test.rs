// ABOUTME: Integration tests for AnalysisOrchestrator sessions over static providers and stores
// ABOUTME: Coalesced runs, error parking and retry, persistence failures, history wiring, shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    day, fixed_now, health_aggregator, health_providers, init_test_logging, test_cache_config,
    test_orchestrator,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wellness_engine::cache::CacheConfig;
use wellness_engine::orchestrator::OrchestrationState;
use wellness_engine::wellness_core::errors::AnalysisError;
use wellness_engine::wellness_core::models::{Pillar, PillarInput, WellnessDomain};
use wellness_engine::wellness_intelligence::WellnessEngine;
use wellness_engine::wellness_providers::{StaticBehavior, StaticPillarProvider};
use wellness_engine::{AnalysisOrchestrator, InMemoryAnalysisStore, PersistenceStatus};

const HEALTH: WellnessDomain = WellnessDomain::Health;

fn fail_all(providers: &[Arc<StaticPillarProvider>]) {
    for provider in providers {
        provider
            .set_behavior(StaticBehavior::Fail("maintenance".to_owned()))
            .unwrap();
    }
}

fn serve_all(providers: &[Arc<StaticPillarProvider>]) {
    for provider in providers {
        provider.set_behavior(StaticBehavior::Serve).unwrap();
    }
}

#[tokio::test]
async fn test_successful_run_is_saved_and_idle() {
    let providers = health_providers([82.0, 76.0, 71.0, 68.0]);
    let store = Arc::new(InMemoryAnalysisStore::new());
    let orchestrator = test_orchestrator(health_aggregator(&providers), store.clone());
    let user = Uuid::new_v4();
    let date = day(2025, 3, 14);

    let report = orchestrator.analyze(user, HEALTH, date).await.unwrap();

    assert_eq!(report.persistence, PersistenceStatus::Saved);
    assert!(report.persistence_error().is_none());
    assert_eq!(report.result.user_id, user);
    assert_eq!(report.result.date(), date);
    assert_eq!(report.result.created_at, fixed_now());
    assert_eq!(orchestrator.state(user, HEALTH, date).await, OrchestrationState::Idle);
    assert_eq!(store.writes(), 1);

    let stored = orchestrator.current(user, HEALTH, date).await.unwrap().unwrap();
    assert_eq!(stored, report.result);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_run() {
    let providers = health_providers([80.0; 4]);
    for provider in &providers {
        provider
            .set_behavior(StaticBehavior::Delay(Duration::from_millis(100)))
            .unwrap();
    }
    let store = Arc::new(InMemoryAnalysisStore::new());
    let orchestrator = test_orchestrator(health_aggregator(&providers), store.clone());
    let user = Uuid::new_v4();
    let date = day(2025, 3, 14);

    let (first, second, third) = tokio::join!(
        orchestrator.analyze(user, HEALTH, date),
        orchestrator.analyze(user, HEALTH, date),
        orchestrator.analyze(user, HEALTH, date),
    );

    let first = first.unwrap();
    assert_eq!(first, second.unwrap());
    assert_eq!(first, third.unwrap());
    for provider in &providers {
        assert_eq!(provider.calls(), 1);
    }
    assert_eq!(store.writes(), 1);
    assert!(!orchestrator.in_flight(user, HEALTH, date));
}

#[tokio::test]
async fn test_different_sessions_run_independently() {
    let providers = health_providers([80.0; 4]);
    let store = Arc::new(InMemoryAnalysisStore::new());
    let orchestrator = test_orchestrator(health_aggregator(&providers), store.clone());
    let date = day(2025, 3, 14);

    let (alice, bob) = tokio::join!(
        orchestrator.analyze(Uuid::new_v4(), HEALTH, date),
        orchestrator.analyze(Uuid::new_v4(), HEALTH, date),
    );

    assert_ne!(alice.unwrap().result.id, bob.unwrap().result.id);
    assert_eq!(store.writes(), 2);
}

#[tokio::test]
async fn test_failed_aggregation_parks_session_with_last_result() {
    let providers = health_providers([80.0; 4]);
    let store = Arc::new(InMemoryAnalysisStore::new());
    let orchestrator = test_orchestrator(health_aggregator(&providers), store);
    let user = Uuid::new_v4();
    let date = day(2025, 3, 14);

    let good = orchestrator.analyze(user, HEALTH, date).await.unwrap();

    fail_all(&providers);
    let error = orchestrator.analyze(user, HEALTH, date).await.unwrap_err();
    assert!(matches!(error, AnalysisError::Aggregation { .. }));
    assert_eq!(orchestrator.state(user, HEALTH, date).await, OrchestrationState::Error);

    let session = orchestrator.session(user, HEALTH, date).await.unwrap();
    assert!(session.last_error.is_some());
    assert_eq!(session.last_result.as_ref(), Some(&good.result));
    assert_eq!(
        orchestrator.current(user, HEALTH, date).await.unwrap(),
        Some(good.result)
    );

    // A plain sync request is not accepted from error
    let refused = orchestrator.analyze(user, HEALTH, date).await.unwrap_err();
    assert!(matches!(
        refused,
        AnalysisError::InvalidTransition {
            state: "error",
            event: "sync_requested"
        }
    ));
}

#[tokio::test]
async fn test_retry_leaves_error_state() {
    let providers = health_providers([80.0; 4]);
    fail_all(&providers);
    let orchestrator = test_orchestrator(
        health_aggregator(&providers),
        Arc::new(InMemoryAnalysisStore::new()),
    );
    let user = Uuid::new_v4();
    let date = day(2025, 3, 14);

    assert!(orchestrator.analyze(user, HEALTH, date).await.is_err());
    assert!(orchestrator.current(user, HEALTH, date).await.unwrap().is_none());

    serve_all(&providers);
    let report = orchestrator.retry(user, HEALTH, date).await.unwrap();

    assert!(report.persistence.is_saved());
    let session = orchestrator.session(user, HEALTH, date).await.unwrap();
    assert_eq!(session.state, OrchestrationState::Idle);
    assert!(session.last_error.is_none());

    let error = orchestrator.retry(user, HEALTH, date).await.unwrap_err();
    assert!(matches!(error, AnalysisError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_store_failure_keeps_computed_result() {
    let providers = health_providers([80.0; 4]);
    let store = Arc::new(InMemoryAnalysisStore::new());
    store.set_fail_writes(true);
    let orchestrator = test_orchestrator(health_aggregator(&providers), store.clone());
    let user = Uuid::new_v4();
    let date = day(2025, 3, 14);

    let report = orchestrator.analyze(user, HEALTH, date).await.unwrap();

    assert!(!report.persistence.is_saved());
    assert!(matches!(
        report.persistence_error(),
        Some(AnalysisError::Persistence { .. })
    ));
    assert_eq!(orchestrator.state(user, HEALTH, date).await, OrchestrationState::Idle);
    assert_eq!(store.writes(), 0);
    assert_eq!(
        orchestrator.current(user, HEALTH, date).await.unwrap(),
        Some(report.result)
    );
}

#[tokio::test]
async fn test_persistence_can_be_disabled() {
    init_test_logging();
    let providers = health_providers([80.0; 4]);
    let store = Arc::new(InMemoryAnalysisStore::new());
    let orchestrator = AnalysisOrchestrator::builder(WellnessEngine::default(), store.clone())
        .aggregator(health_aggregator(&providers))
        .session_cache(common::test_cache_config())
        .persist_results(false)
        .build();

    let report = orchestrator
        .analyze(Uuid::new_v4(), HEALTH, day(2025, 3, 14))
        .await
        .unwrap();

    assert_eq!(
        report.persistence,
        PersistenceStatus::NotSaved {
            reason: "persistence disabled".to_owned()
        }
    );
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_history_from_earlier_runs_feeds_projection() {
    let providers = health_providers([70.0; 4]);
    for (offset, score) in [50.0, 55.0, 60.0].into_iter().enumerate() {
        providers[0]
            .insert(day(2025, 3, 12 + offset as u32), PillarInput::new(score))
            .unwrap();
    }
    let store = Arc::new(InMemoryAnalysisStore::new());
    let orchestrator = test_orchestrator(health_aggregator(&providers), store.clone());
    let user = Uuid::new_v4();

    for date in [day(2025, 3, 12), day(2025, 3, 13)] {
        orchestrator.analyze(user, HEALTH, date).await.unwrap();
    }
    let report = orchestrator.analyze(user, HEALTH, day(2025, 3, 14)).await.unwrap();

    assert_eq!(store.len().await, 3);
    let week = report
        .result
        .predictive_metrics
        .next_7_days
        .get(Pillar::Fitness)
        .unwrap();
    // Five points a day, capped at twenty over the week
    assert!((week - 80.0).abs() < 0.11, "got {week}");
}

#[tokio::test]
async fn test_dropped_caller_does_not_cancel_the_run() {
    let providers = health_providers([80.0; 4]);
    for provider in &providers {
        provider
            .set_behavior(StaticBehavior::Delay(Duration::from_millis(150)))
            .unwrap();
    }
    let store = Arc::new(InMemoryAnalysisStore::new());
    let orchestrator = test_orchestrator(health_aggregator(&providers), store.clone());
    let user = Uuid::new_v4();
    let date = day(2025, 3, 14);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(20),
        orchestrator.analyze(user, HEALTH, date),
    )
    .await;
    assert!(abandoned.is_err());
    assert!(orchestrator.in_flight(user, HEALTH, date));

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(!orchestrator.in_flight(user, HEALTH, date));
    assert_eq!(store.writes(), 1);
    assert_eq!(orchestrator.state(user, HEALTH, date).await, OrchestrationState::Idle);
    assert!(orchestrator.current(user, HEALTH, date).await.unwrap().is_some());
}

#[tokio::test]
async fn test_unknown_domain_is_a_configuration_error() {
    let providers = health_providers([80.0; 4]);
    let orchestrator = test_orchestrator(
        health_aggregator(&providers),
        Arc::new(InMemoryAnalysisStore::new()),
    );

    let error = orchestrator
        .analyze(Uuid::new_v4(), WellnessDomain::Sleep, day(2025, 3, 14))
        .await
        .unwrap_err();

    assert!(matches!(error, AnalysisError::Configuration(_)));
    assert_eq!(orchestrator.domains(), vec![HEALTH]);
    assert!(orchestrator.aggregator(WellnessDomain::Sleep).is_none());
}

#[tokio::test]
async fn test_forget_user_drops_sessions_but_not_results() {
    let providers = health_providers([80.0; 4]);
    let orchestrator = test_orchestrator(
        health_aggregator(&providers),
        Arc::new(InMemoryAnalysisStore::new()),
    );
    let user = Uuid::new_v4();
    let other = Uuid::new_v4();
    for date in [day(2025, 3, 13), day(2025, 3, 14)] {
        orchestrator.analyze(user, HEALTH, date).await.unwrap();
    }
    orchestrator.analyze(other, HEALTH, day(2025, 3, 14)).await.unwrap();

    let dropped = orchestrator.forget_user(user).await.unwrap();

    assert_eq!(dropped, 2);
    assert!(orchestrator.session(user, HEALTH, day(2025, 3, 14)).await.is_none());
    assert!(orchestrator.session(other, HEALTH, day(2025, 3, 14)).await.is_some());
    // Stored results survive
    assert!(orchestrator
        .current(user, HEALTH, day(2025, 3, 14))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_closed_orchestrator_refuses_runs() {
    let providers = health_providers([80.0; 4]);
    let orchestrator = test_orchestrator(
        health_aggregator(&providers),
        Arc::new(InMemoryAnalysisStore::new()),
    );

    orchestrator.close().await;
    let error = orchestrator
        .analyze(Uuid::new_v4(), HEALTH, day(2025, 3, 14))
        .await
        .unwrap_err();

    assert!(matches!(error, AnalysisError::Configuration(_)));
    assert_eq!(providers[0].calls(), 0);
}

fn orchestrator_with_cache(
    providers: &[Arc<StaticPillarProvider>],
    store: Arc<InMemoryAnalysisStore>,
    cache: CacheConfig,
) -> AnalysisOrchestrator {
    init_test_logging();
    AnalysisOrchestrator::builder(WellnessEngine::default(), store)
        .aggregator(health_aggregator(providers))
        .session_cache(cache)
        .clock(fixed_now)
        .build()
}

fn delay_all(providers: &[Arc<StaticPillarProvider>], delay: Duration) {
    for provider in providers {
        provider.set_behavior(StaticBehavior::Delay(delay)).unwrap();
    }
}

#[tokio::test]
async fn test_session_evicted_mid_run_still_completes() {
    let providers = health_providers([80.0; 4]);
    delay_all(&providers, Duration::from_millis(150));
    let store = Arc::new(InMemoryAnalysisStore::new());
    let orchestrator = orchestrator_with_cache(
        &providers,
        store.clone(),
        CacheConfig {
            max_entries: 1,
            ..test_cache_config()
        },
    );
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let date = day(2025, 3, 14);

    // The second session pushes the first out of the cache while its providers run
    let (a, b) = tokio::join!(orchestrator.analyze(first, HEALTH, date), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        orchestrator.analyze(second, HEALTH, date).await
    });

    assert!(a.unwrap().persistence.is_saved());
    assert!(b.unwrap().persistence.is_saved());
    assert_eq!(store.writes(), 2);
    assert_eq!(orchestrator.state(first, HEALTH, date).await, OrchestrationState::Idle);
}

#[tokio::test]
async fn test_session_expiring_during_slow_providers_still_completes() {
    let providers = health_providers([75.0; 4]);
    delay_all(&providers, Duration::from_millis(120));
    let store = Arc::new(InMemoryAnalysisStore::new());
    let orchestrator = orchestrator_with_cache(
        &providers,
        store.clone(),
        CacheConfig {
            ttl: Duration::from_millis(30),
            ..test_cache_config()
        },
    );
    let user = Uuid::new_v4();

    let report = orchestrator.analyze(user, HEALTH, day(2025, 3, 14)).await.unwrap();

    assert!(report.persistence.is_saved());
    assert_eq!(store.writes(), 1);
}

#[tokio::test]
async fn test_parked_session_survives_eviction() {
    let providers = health_providers([80.0; 4]);
    let orchestrator = orchestrator_with_cache(
        &providers,
        Arc::new(InMemoryAnalysisStore::new()),
        CacheConfig {
            max_entries: 1,
            ..test_cache_config()
        },
    );
    let parked = Uuid::new_v4();
    let other = Uuid::new_v4();
    let date = day(2025, 3, 14);

    fail_all(&providers);
    assert!(orchestrator.analyze(parked, HEALTH, date).await.is_err());
    serve_all(&providers);
    // Evicts the parked session from the cache
    orchestrator.analyze(other, HEALTH, date).await.unwrap();

    assert_eq!(orchestrator.state(parked, HEALTH, date).await, OrchestrationState::Error);
    let refused = orchestrator.analyze(parked, HEALTH, date).await.unwrap_err();
    assert!(matches!(
        refused,
        AnalysisError::InvalidTransition {
            state: "error",
            event: "sync_requested"
        }
    ));

    let report = orchestrator.retry(parked, HEALTH, date).await.unwrap();
    assert!(report.persistence.is_saved());
    assert_eq!(orchestrator.state(parked, HEALTH, date).await, OrchestrationState::Idle);
}

#[tokio::test]
async fn test_forget_user_releases_parked_sessions() {
    let providers = health_providers([80.0; 4]);
    fail_all(&providers);
    let orchestrator = test_orchestrator(
        health_aggregator(&providers),
        Arc::new(InMemoryAnalysisStore::new()),
    );
    let user = Uuid::new_v4();
    let date = day(2025, 3, 14);

    assert!(orchestrator.analyze(user, HEALTH, date).await.is_err());
    orchestrator.forget_user(user).await.unwrap();
    serve_all(&providers);

    assert_eq!(orchestrator.state(user, HEALTH, date).await, OrchestrationState::Idle);
    assert!(orchestrator.analyze(user, HEALTH, date).await.is_ok());
}
