// ABOUTME: Exhaustive table test for the orchestration state machine
// ABOUTME: Every (state, event) pair either follows the lifecycle or is refused
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use wellness_engine::orchestrator::{OrchestrationEvent, OrchestrationState};
use wellness_engine::wellness_core::errors::AnalysisError;

const STATES: [OrchestrationState; 4] = [
    OrchestrationState::Idle,
    OrchestrationState::SyncingPillars,
    OrchestrationState::Analyzing,
    OrchestrationState::Error,
];

const EVENTS: [OrchestrationEvent; 5] = [
    OrchestrationEvent::SyncRequested,
    OrchestrationEvent::PillarsCollected,
    OrchestrationEvent::AnalysisCompleted,
    OrchestrationEvent::AggregationFailed,
    OrchestrationEvent::RetryRequested,
];

fn expected(
    state: OrchestrationState,
    event: OrchestrationEvent,
) -> Option<OrchestrationState> {
    use OrchestrationEvent as E;
    use OrchestrationState as S;
    match (state, event) {
        (S::Idle, E::SyncRequested) | (S::Error, E::RetryRequested) => Some(S::SyncingPillars),
        (S::SyncingPillars, E::PillarsCollected) => Some(S::Analyzing),
        (S::SyncingPillars, E::AggregationFailed) => Some(S::Error),
        (S::Analyzing, E::AnalysisCompleted) => Some(S::Idle),
        _ => None,
    }
}

#[test]
fn test_transition_table_is_exhaustive() {
    let mut valid = 0;
    for state in STATES {
        for event in EVENTS {
            match (state.transition(event), expected(state, event)) {
                (Ok(next), Some(want)) => {
                    assert_eq!(next, want, "{state} + {event}");
                    valid += 1;
                }
                (Err(AnalysisError::InvalidTransition { state: s, event: e }), None) => {
                    assert_eq!(s, state.as_str());
                    assert_eq!(e, event.as_str());
                }
                (actual, want) => panic!("{state} + {event}: got {actual:?}, expected {want:?}"),
            }
        }
    }
    assert_eq!(valid, 5);
}

#[test]
fn test_only_idle_is_not_busy() {
    assert!(!OrchestrationState::Idle.is_busy());
    assert!(OrchestrationState::SyncingPillars.is_busy());
    assert!(OrchestrationState::Analyzing.is_busy());
}

#[test]
fn test_states_serialize_as_snake_case() {
    assert_eq!(
        serde_json::to_string(&OrchestrationState::SyncingPillars).unwrap(),
        "\"syncing_pillars\""
    );
    assert_eq!(OrchestrationState::default(), OrchestrationState::Idle);
}
