// ABOUTME: Error taxonomy for one analysis run: aggregation, validation, persistence, state
// ABOUTME: Cloneable so a single in-flight result can be shared by coalesced callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use super::{AppError, ErrorCode};
use crate::models::{Pillar, PillarIssue};

/// Errors surfaced by the analysis pipeline
///
/// Scoring, risk, insight and projection stages are total over well-formed
/// input; only the edges of a run (aggregation, persistence, state machine)
/// produce these.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// No pillar provider could be reached for this run
    #[error("no pillar provider could be reached for user {user_id} on {date}")]
    Aggregation {
        /// User the run was for
        user_id: Uuid,
        /// Day the run was for
        date: NaiveDate,
        /// Per-pillar failures that caused the run to fail
        issues: Vec<PillarIssue>,
    },

    /// A provider supplied a score that cannot be used
    #[error("invalid {pillar} input: {reason}")]
    Validation {
        /// Pillar whose input was rejected
        pillar: Pillar,
        /// Why it was rejected
        reason: String,
    },

    /// Storage write failed; the computed result is still valid
    #[error("failed to persist analysis: {reason}")]
    Persistence {
        /// Storage failure detail
        reason: String,
    },

    /// Requested orchestration step is not allowed from the current state
    #[error("cannot apply '{event}' while in state '{state}'")]
    InvalidTransition {
        /// Current state name
        state: &'static str,
        /// Rejected event name
        event: &'static str,
    },

    /// Rule table or engine configuration is invalid
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Unexpected failure (task join error, poisoned invariant)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Error code used when this error crosses into [`AppError`]
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Aggregation { .. } => ErrorCode::ExternalServiceUnavailable,
            Self::Validation { .. } => ErrorCode::ValueOutOfRange,
            Self::Persistence { .. } => ErrorCode::StorageError,
            Self::InvalidTransition { .. } => ErrorCode::ResourceLocked,
            Self::Configuration(_) => ErrorCode::ConfigInvalid,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(error: AnalysisError) -> Self {
        let code = error.code();
        let message = error.to_string();
        match error {
            AnalysisError::Aggregation {
                user_id, issues, ..
            } => Self::new(code, message)
                .with_user_id(user_id)
                .with_details(json!({ "issues": issues })),
            _ => Self::new(code, message),
        }
    }
}
