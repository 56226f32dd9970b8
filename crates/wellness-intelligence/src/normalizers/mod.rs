// ABOUTME: Domain normalizers turning raw sleep and hydration logs into pillar inputs
// ABOUTME: Used by upstream providers that do not supply pre-normalized pillar scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Hydration log normalizer and dehydration assessment
pub mod hydration;
/// Sleep log normalizer
pub mod sleep;

pub use hydration::{
    BeverageBreakdown, DehydrationAssessment, DehydrationLevel, ExerciseIntensity,
    HydrationAssessment, HydrationLog, HydrationSymptoms, ThirstLevel,
};
pub use sleep::{PerformanceImpact, SleepAssessment, SleepLog};
