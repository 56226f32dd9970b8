// ABOUTME: Configuration error types for rule table validation
// ABOUTME: Defines error variants for invalid ranges, weights, bands, and foreign pillars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration error types for rule table validation.

use thiserror::Error;
use wellness_core::errors::{AnalysisError, AppError, ErrorCode};
use wellness_core::models::{Pillar, WellnessDomain};

/// Rule table configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Value outside acceptable range
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Required configuration field is missing
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Failed to parse an override value
    #[error("Parse error: {0}")]
    Parse(String),

    /// Weights don't sum to the required total
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),

    /// A rule references a pillar outside its domain
    #[error("Pillar {pillar} is not part of the {domain} domain")]
    ForeignPillar {
        /// Offending pillar
        pillar: Pillar,
        /// Domain of the rule table
        domain: WellnessDomain,
    },
}

impl From<ConfigError> for AnalysisError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::new(ErrorCode::ConfigInvalid, error.to_string())
    }
}
