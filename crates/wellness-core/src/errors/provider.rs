// ABOUTME: Structured error types for pillar provider calls
// ABOUTME: Classifies failures as retryable or not and maps them to snapshot issue kinds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use super::{AppError, ErrorCode};
use crate::models::IssueKind;

/// Failure of a single pillar provider call
///
/// A provider error never aborts an aggregation run: the pillar it belongs to
/// becomes absent in the snapshot and the failure is recorded as an issue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Provider could not be reached or returned a server-side failure
    #[error("{provider} unavailable: {message}")]
    Unavailable {
        /// Provider name
        provider: String,
        /// Failure detail
        message: String,
    },

    /// Provider did not answer within the configured timeout
    #[error("{provider} timed out after {timeout_ms}ms")]
    Timeout {
        /// Provider name
        provider: String,
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// Provider asked the caller to back off
    #[error("{provider} rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Provider name
        provider: String,
        /// Seconds until the provider accepts requests again
        retry_after_secs: u64,
    },

    /// Circuit breaker is open for this provider
    #[error("circuit breaker open for {provider}, retry after {retry_after_secs}s")]
    CircuitBreakerOpen {
        /// Provider name
        provider: String,
        /// Seconds until a recovery probe is allowed
        retry_after_secs: u64,
    },

    /// Provider answered with a payload the engine cannot use
    #[error("{provider} returned an invalid payload: {message}")]
    InvalidPayload {
        /// Provider name
        provider: String,
        /// What was wrong with the payload
        message: String,
    },
}

impl ProviderError {
    /// Whether this failure should count toward opening the circuit breaker
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Name of the provider that failed
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::Unavailable { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::CircuitBreakerOpen { provider, .. }
            | Self::InvalidPayload { provider, .. } => provider,
        }
    }

    /// Snapshot issue kind recorded for this failure
    #[must_use]
    pub const fn issue_kind(&self) -> IssueKind {
        match self {
            Self::Timeout { .. } => IssueKind::TimedOut,
            Self::CircuitBreakerOpen { .. } => IssueKind::CircuitOpen,
            Self::InvalidPayload { .. } => IssueKind::Rejected,
            Self::Unavailable { .. } | Self::RateLimited { .. } => IssueKind::Failed,
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        let provider = error.provider().to_owned();
        Self::new(ErrorCode::ExternalServiceError, error.to_string()).with_resource_id(provider)
    }
}

/// Result type for pillar provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
