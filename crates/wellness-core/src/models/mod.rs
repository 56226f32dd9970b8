// ABOUTME: Core data models for the wellness engine
// ABOUTME: Pillars and domains, daily snapshots, and derived analysis results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Data model shared by every engine stage.
//!
//! A [`DailySnapshot`] is the raw input for one `(user, domain, date)`; an
//! [`AnalysisResult`] is derived from it in full and never patched.

/// Derived analysis result and its component metrics
pub mod analysis;
/// Wellness domains, pillars, and per-pillar score maps
pub mod pillar;
/// Daily snapshot input, pillar inputs, and data-quality issues
pub mod snapshot;

pub use analysis::{
    AnalysisResult, BalanceMetrics, Confidence, DataQuality, HistoryPoint, Insights, PillarStatus,
    PredictiveMetrics, RiskLevel, RiskProfile, StatusBand, Trend, ANALYSIS_PAYLOAD_VERSION,
};
pub use pillar::{Pillar, PillarScores, WellnessDomain};
pub use snapshot::{DailySnapshot, IssueKind, PillarInput, PillarIssue, SnapshotRef};
