// ABOUTME: Constants module with concern-separated organization
// ABOUTME: Score bounds, provider timeouts, history windows, and cache defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Engine constants grouped by concern. Rule-table defaults that vary per
//! domain live with the rule tables in `wellness-intelligence`.

/// Session cache constants (capacity, TTL, cleanup)
pub mod cache;

/// Score bounds shared by every stage
pub mod scores {
    /// Lowest valid score
    pub const MIN_SCORE: f64 = 0.0;
    /// Highest valid score
    pub const MAX_SCORE: f64 = 100.0;
    /// Consistency reported when history is too short to measure it
    pub const DEFAULT_CONSISTENCY_SCORE: f64 = 75.0;
    /// Baseline of the synergy metric before rule effects
    pub const SYNERGY_BASELINE: f64 = 70.0;
}

/// Provider call limits
pub mod providers {
    /// Default per-provider timeout in milliseconds
    pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 8_000;
    /// Smallest accepted provider timeout in milliseconds
    pub const MIN_PROVIDER_TIMEOUT_MS: u64 = 1_000;
    /// Largest accepted provider timeout in milliseconds
    pub const MAX_PROVIDER_TIMEOUT_MS: u64 = 60_000;
}

/// History lookups feeding trends and consistency
pub mod history {
    /// Days of prior results loaded for each run
    pub const DEFAULT_HISTORY_DAYS: usize = 14;
    /// Upper bound on loaded history
    pub const MAX_HISTORY_DAYS: usize = 90;
}

/// Service identity used in logs
pub mod service_names {
    /// Engine service name
    pub const WELLNESS_ENGINE: &str = "wellness-engine";
}

/// Clamp a score into `[MIN_SCORE, MAX_SCORE]`; NaN maps to `MIN_SCORE`
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return scores::MIN_SCORE;
    }
    value.clamp(scores::MIN_SCORE, scores::MAX_SCORE)
}
