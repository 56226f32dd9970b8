// ABOUTME: Orchestration state machine with an exhaustive transition table
// ABOUTME: Error is left only through an explicit retry; there is no automatic recovery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use wellness_core::errors::AnalysisError;

/// Where one `(user, domain, date)` session is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationState {
    /// No run in progress
    #[default]
    Idle,
    /// Provider fetches in flight
    SyncingPillars,
    /// Pure pipeline and persistence running
    Analyzing,
    /// Last run could not reach any provider; waiting for a retry
    Error,
}

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationEvent {
    /// Caller asked for an analysis
    SyncRequested,
    /// Aggregation produced a snapshot
    PillarsCollected,
    /// Result built (persisted or not)
    AnalysisCompleted,
    /// Aggregation reached no provider
    AggregationFailed,
    /// Caller explicitly retried after an error
    RetryRequested,
}

impl OrchestrationState {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SyncingPillars => "syncing_pillars",
            Self::Analyzing => "analyzing",
            Self::Error => "error",
        }
    }

    /// Whether a run is in progress
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::SyncingPillars | Self::Analyzing)
    }

    /// Apply `event`, returning the next state
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidTransition`] for any pair not listed in
    /// the table below:
    ///
    /// | from | event | to |
    /// |---|---|---|
    /// | idle | sync_requested | syncing_pillars |
    /// | syncing_pillars | pillars_collected | analyzing |
    /// | syncing_pillars | aggregation_failed | error |
    /// | analyzing | analysis_completed | idle |
    /// | error | retry_requested | syncing_pillars |
    pub const fn transition(self, event: OrchestrationEvent) -> Result<Self, AnalysisError> {
        use OrchestrationEvent as E;
        match (self, event) {
            (Self::Idle, E::SyncRequested) | (Self::Error, E::RetryRequested) => {
                Ok(Self::SyncingPillars)
            }
            (Self::SyncingPillars, E::PillarsCollected) => Ok(Self::Analyzing),
            (Self::SyncingPillars, E::AggregationFailed) => Ok(Self::Error),
            (Self::Analyzing, E::AnalysisCompleted) => Ok(Self::Idle),
            (
                Self::Idle,
                E::PillarsCollected
                | E::AnalysisCompleted
                | E::AggregationFailed
                | E::RetryRequested,
            )
            | (
                Self::SyncingPillars,
                E::SyncRequested | E::AnalysisCompleted | E::RetryRequested,
            )
            | (
                Self::Analyzing,
                E::SyncRequested | E::PillarsCollected | E::AggregationFailed | E::RetryRequested,
            )
            | (
                Self::Error,
                E::SyncRequested
                | E::PillarsCollected
                | E::AnalysisCompleted
                | E::AggregationFailed,
            ) => Err(AnalysisError::InvalidTransition {
                state: self.as_str(),
                event: event.as_str(),
            }),
        }
    }
}

impl OrchestrationEvent {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SyncRequested => "sync_requested",
            Self::PillarsCollected => "pillars_collected",
            Self::AnalysisCompleted => "analysis_completed",
            Self::AggregationFailed => "aggregation_failed",
            Self::RetryRequested => "retry_requested",
        }
    }
}

impl fmt::Display for OrchestrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrchestrationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
