// ABOUTME: Integration tests for MetricsAggregator fan-out over static pillar providers
// ABOUTME: Partial failures, timeouts, untracked pillars, validation, and circuit breaking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{day, health_aggregator, health_providers, init_test_logging};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wellness_engine::wellness_core::errors::AnalysisError;
use wellness_engine::wellness_core::models::{IssueKind, Pillar, PillarIssue, WellnessDomain};
use wellness_engine::wellness_providers::{
    CircuitBreakerConfig, CircuitState, StaticBehavior, StaticPillarProvider,
};
use wellness_engine::MetricsAggregator;

fn issue_kind(issues: &[PillarIssue], pillar: Pillar) -> Option<IssueKind> {
    issues
        .iter()
        .find(|issue| issue.pillar == pillar)
        .map(|issue| issue.kind)
}

#[tokio::test]
async fn test_all_providers_present() {
    init_test_logging();
    let providers = health_providers([80.0, 70.0, 60.0, 50.0]);
    let aggregator = health_aggregator(&providers);

    let snapshot = aggregator.collect(Uuid::new_v4(), day(2025, 3, 14)).await.unwrap();

    assert_eq!(snapshot.pillars.len(), 4);
    assert!(snapshot.issues.is_empty());
    assert!(snapshot.is_complete());
    assert!((snapshot.pillar(Pillar::Recovery).unwrap().score - 60.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_one_failure_leaves_others_present() {
    init_test_logging();
    let providers = health_providers([80.0, 70.0, 60.0, 50.0]);
    providers[1]
        .set_behavior(StaticBehavior::Fail("upstream 503".to_owned()))
        .unwrap();
    let aggregator = health_aggregator(&providers);

    let snapshot = aggregator.collect(Uuid::new_v4(), day(2025, 3, 14)).await.unwrap();

    assert_eq!(snapshot.pillars.len(), 3);
    assert_eq!(snapshot.absent_pillars(), vec![Pillar::Nutrition]);
    assert_eq!(issue_kind(&snapshot.issues, Pillar::Nutrition), Some(IssueKind::Failed));
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    init_test_logging();
    let providers = health_providers([80.0, 70.0, 60.0, 50.0]);
    providers[2]
        .set_behavior(StaticBehavior::Delay(Duration::from_millis(400)))
        .unwrap();
    let aggregator = providers.iter().fold(
        MetricsAggregator::new(WellnessDomain::Health).with_timeout(Duration::from_millis(50)),
        |aggregator, provider| aggregator.with_provider(provider.clone()).unwrap(),
    );

    let snapshot = aggregator.collect(Uuid::new_v4(), day(2025, 3, 14)).await.unwrap();

    assert!(!snapshot.pillars.contains_key(&Pillar::Recovery));
    assert_eq!(issue_kind(&snapshot.issues, Pillar::Recovery), Some(IssueKind::TimedOut));
    assert_eq!(snapshot.pillars.len(), 3);
}

#[tokio::test]
async fn test_untracked_and_unregistered_pillars() {
    init_test_logging();
    let fitness = Arc::new(StaticPillarProvider::with_score(Pillar::Fitness, 75.0));
    let nutrition = Arc::new(
        StaticPillarProvider::with_score(Pillar::Nutrition, 75.0)
            .with_behavior(StaticBehavior::NotTracked),
    );
    let aggregator = health_aggregator(&[fitness, nutrition]);

    let snapshot = aggregator.collect(Uuid::new_v4(), day(2025, 3, 14)).await.unwrap();

    assert_eq!(snapshot.pillars.len(), 1);
    for pillar in [Pillar::Nutrition, Pillar::Recovery, Pillar::Hydration] {
        assert_eq!(issue_kind(&snapshot.issues, pillar), Some(IssueKind::NotTracked));
    }
}

#[tokio::test]
async fn test_tracking_nothing_is_not_an_error() {
    init_test_logging();
    let providers = health_providers([0.0; 4]);
    for provider in &providers {
        provider.set_behavior(StaticBehavior::NotTracked).unwrap();
    }
    let aggregator = health_aggregator(&providers);

    let snapshot = aggregator.collect(Uuid::new_v4(), day(2025, 3, 14)).await.unwrap();

    assert!(snapshot.pillars.is_empty());
    assert_eq!(snapshot.absent_pillars().len(), 4);
}

#[tokio::test]
async fn test_every_provider_failing_is_an_aggregation_error() {
    init_test_logging();
    let providers = health_providers([80.0; 4]);
    for provider in &providers {
        provider
            .set_behavior(StaticBehavior::Fail("down".to_owned()))
            .unwrap();
    }
    let aggregator = health_aggregator(&providers);
    let user = Uuid::new_v4();

    let error = aggregator.collect(user, day(2025, 3, 14)).await.unwrap_err();

    match error {
        AnalysisError::Aggregation {
            user_id,
            date,
            issues,
        } => {
            assert_eq!(user_id, user);
            assert_eq!(date, day(2025, 3, 14));
            assert_eq!(issues.len(), 4);
            assert!(issues.iter().all(|issue| issue.kind == IssueKind::Failed));
        }
        other => panic!("expected aggregation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_out_of_range_scores_are_clamped_with_issue() {
    init_test_logging();
    let providers = health_providers([120.0, 70.0, 60.0, 50.0]);
    let aggregator = health_aggregator(&providers);

    let snapshot = aggregator.collect(Uuid::new_v4(), day(2025, 3, 14)).await.unwrap();

    assert!((snapshot.pillar(Pillar::Fitness).unwrap().score - 100.0).abs() < f64::EPSILON);
    assert_eq!(issue_kind(&snapshot.issues, Pillar::Fitness), Some(IssueKind::Clamped));
}

#[tokio::test]
async fn test_non_finite_scores_are_rejected() {
    init_test_logging();
    let providers = health_providers([f64::NAN, 70.0, f64::INFINITY, 50.0]);
    let aggregator = health_aggregator(&providers);

    let snapshot = aggregator.collect(Uuid::new_v4(), day(2025, 3, 14)).await.unwrap();

    assert_eq!(snapshot.absent_pillars(), vec![Pillar::Fitness, Pillar::Recovery]);
    assert_eq!(issue_kind(&snapshot.issues, Pillar::Fitness), Some(IssueKind::Rejected));
    assert_eq!(issue_kind(&snapshot.issues, Pillar::Recovery), Some(IssueKind::Rejected));
}

#[tokio::test]
async fn test_invalid_payload_is_rejected() {
    init_test_logging();
    let providers = health_providers([80.0; 4]);
    providers[3]
        .set_behavior(StaticBehavior::InvalidPayload("missing field".to_owned()))
        .unwrap();
    let aggregator = health_aggregator(&providers);

    let snapshot = aggregator.collect(Uuid::new_v4(), day(2025, 3, 14)).await.unwrap();

    assert_eq!(issue_kind(&snapshot.issues, Pillar::Hydration), Some(IssueKind::Rejected));
    assert_eq!(aggregator.breaker_state(Pillar::Hydration), Some(CircuitState::Closed));
}

#[test]
fn test_foreign_pillar_is_a_configuration_error() {
    let sleep_provider = Arc::new(StaticPillarProvider::with_score(Pillar::Latency, 80.0));

    let result = MetricsAggregator::new(WellnessDomain::Health).with_provider(sleep_provider);

    assert!(matches!(result, Err(AnalysisError::Configuration(_))));
}

#[tokio::test]
async fn test_open_breaker_skips_the_provider() {
    init_test_logging();
    let providers = health_providers([80.0; 4]);
    let flaky = Arc::new(
        StaticPillarProvider::with_score(Pillar::Nutrition, 80.0)
            .with_behavior(StaticBehavior::Fail("flapping".to_owned())),
    );
    let aggregator = MetricsAggregator::new(WellnessDomain::Health)
        .with_provider(providers[0].clone())
        .unwrap()
        .with_provider_config(
            flaky.clone(),
            CircuitBreakerConfig::new(2, Duration::from_secs(60), 1),
        )
        .unwrap();
    let user = Uuid::new_v4();

    for _ in 0..2 {
        let snapshot = aggregator.collect(user, day(2025, 3, 14)).await.unwrap();
        assert_eq!(issue_kind(&snapshot.issues, Pillar::Nutrition), Some(IssueKind::Failed));
    }
    assert_eq!(aggregator.breaker_state(Pillar::Nutrition), Some(CircuitState::Open));

    let snapshot = aggregator.collect(user, day(2025, 3, 14)).await.unwrap();

    assert_eq!(
        issue_kind(&snapshot.issues, Pillar::Nutrition),
        Some(IssueKind::CircuitOpen)
    );
    assert_eq!(flaky.calls(), 2);
    assert_eq!(snapshot.pillars.len(), 1);
}
