// ABOUTME: Wellness intelligence crate: rule-table driven scoring, risk, insight and projection pipeline
// ABOUTME: Pure synchronous stages shared by the health, hydration and sleep domains
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Wellness Intelligence
//!
//! One generic pipeline parameterized by a per-domain [`config::DomainRules`]
//! table. Every stage is a pure function of its inputs; there is no I/O and
//! no randomness, so recomputing an analysis yields the same value.
//!
//! ## Stages
//!
//! 1. [`validation`]: reject non-finite scores, clamp out-of-range ones
//! 2. [`scoring::ScoreCalculator`]: weighted sum with balance and synergy bonuses
//! 3. [`risk::RiskAssessor`]: risk accumulator and level bands
//! 4. [`insights::InsightGenerator`]: rule-selected text, reusing the risk profile
//! 5. [`prediction::PredictiveProjector`]: slope-based projections
//! 6. [`performance`]: composites and pillar statuses
//!
//! [`engine::WellnessEngine`] runs them in that order.

/// Rule tables and their validation
pub mod config;
/// Pipeline assembly
pub mod engine;
/// Insight text selection
pub mod insights;
/// Sleep and hydration log normalizers
pub mod normalizers;
/// Composite metrics and pillar statuses
pub mod performance;
/// Short-horizon projections
pub mod prediction;
/// Risk classification
pub mod risk;
/// Pillar and global scoring
pub mod scoring;
/// Regression and dispersion helpers
pub mod statistics;
/// Provider input validation
pub mod validation;

pub use config::{ConfigError, DomainRules, RuleBook};
pub use engine::WellnessEngine;
pub use insights::InsightGenerator;
pub use prediction::PredictiveProjector;
pub use risk::RiskAssessor;
pub use scoring::{ScoreCalculator, ScoreCard};
