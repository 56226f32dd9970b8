// ABOUTME: Condition primitives used by rule tables over pillar scores and raw metrics
// ABOUTME: Threshold comparisons, metric predicates, and metric value sources with fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use wellness_core::models::{DailySnapshot, Pillar, PillarScores};

/// Numeric threshold test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op", content = "value")]
pub enum Comparison {
    /// `value >= threshold`
    AtLeast(f64),
    /// `value > threshold`
    Above(f64),
    /// `value < threshold`
    Below(f64),
    /// `value <= threshold`
    AtMost(f64),
    /// `min <= value < max`
    Within(f64, f64),
}

impl Comparison {
    /// Evaluate against a value
    #[must_use]
    pub fn holds(self, value: f64) -> bool {
        match self {
            Self::AtLeast(threshold) => value >= threshold,
            Self::Above(threshold) => value > threshold,
            Self::Below(threshold) => value < threshold,
            Self::AtMost(threshold) => value <= threshold,
            Self::Within(min, max) => value >= min && value < max,
        }
    }

    /// Whether every threshold is finite
    #[must_use]
    pub fn is_finite(self) -> bool {
        match self {
            Self::AtLeast(t) | Self::Above(t) | Self::Below(t) | Self::AtMost(t) => t.is_finite(),
            Self::Within(min, max) => min.is_finite() && max.is_finite() && min < max,
        }
    }
}

/// Threshold test on one pillar's score; an unscored pillar never matches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCondition {
    /// Pillar under test
    pub pillar: Pillar,
    /// Threshold test
    pub comparison: Comparison,
}

impl ScoreCondition {
    /// `score >= threshold`
    #[must_use]
    pub const fn at_least(pillar: Pillar, threshold: f64) -> Self {
        Self {
            pillar,
            comparison: Comparison::AtLeast(threshold),
        }
    }

    /// `score > threshold`
    #[must_use]
    pub const fn above(pillar: Pillar, threshold: f64) -> Self {
        Self {
            pillar,
            comparison: Comparison::Above(threshold),
        }
    }

    /// `score < threshold`
    #[must_use]
    pub const fn below(pillar: Pillar, threshold: f64) -> Self {
        Self {
            pillar,
            comparison: Comparison::Below(threshold),
        }
    }

    /// Evaluate against a score map
    #[must_use]
    pub fn holds(&self, scores: &PillarScores) -> bool {
        scores
            .get(self.pillar)
            .is_some_and(|score| self.comparison.holds(score))
    }
}

/// Conjunction of score conditions with an optional disjunctive clause
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorePattern {
    /// Every condition must hold
    pub all: Vec<ScoreCondition>,
    /// At least one must hold when non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any: Vec<ScoreCondition>,
}

impl ScorePattern {
    /// Pattern requiring all of `conditions`
    #[must_use]
    pub const fn all(conditions: Vec<ScoreCondition>) -> Self {
        Self {
            all: conditions,
            any: Vec::new(),
        }
    }

    /// Add a disjunctive clause
    #[must_use]
    pub fn or_any(mut self, conditions: Vec<ScoreCondition>) -> Self {
        self.any = conditions;
        self
    }

    /// Evaluate against a score map
    #[must_use]
    pub fn matches(&self, scores: &PillarScores) -> bool {
        self.all.iter().all(|condition| condition.holds(scores))
            && (self.any.is_empty() || self.any.iter().any(|condition| condition.holds(scores)))
    }

    /// Every pillar this pattern mentions
    pub fn pillars(&self) -> impl Iterator<Item = Pillar> + '_ {
        self.all
            .iter()
            .chain(self.any.iter())
            .map(|condition| condition.pillar)
    }
}

/// Predicate over a raw metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "arg")]
pub enum MetricPredicate {
    /// String metric equals the argument
    Equals(String),
    /// String metric is present and differs from the argument
    NotEquals(String),
    /// Boolean metric is `true`
    IsTrue,
    /// Boolean metric is present and `false`
    IsFalse,
    /// Numeric metric passes the comparison
    Compare(Comparison),
}

impl MetricPredicate {
    /// Numeric `value > threshold`
    #[must_use]
    pub const fn above(threshold: f64) -> Self {
        Self::Compare(Comparison::Above(threshold))
    }

    /// Numeric `value < threshold`
    #[must_use]
    pub const fn below(threshold: f64) -> Self {
        Self::Compare(Comparison::Below(threshold))
    }

    /// Numeric `value >= threshold`
    #[must_use]
    pub const fn at_least(threshold: f64) -> Self {
        Self::Compare(Comparison::AtLeast(threshold))
    }

    /// String equality
    #[must_use]
    pub fn equals(expected: &str) -> Self {
        Self::Equals(expected.to_owned())
    }

    /// String inequality on a present value
    #[must_use]
    pub fn not_equals(excluded: &str) -> Self {
        Self::NotEquals(excluded.to_owned())
    }
}

/// Predicate on one metric of one pillar input
///
/// A missing pillar or metric never matches, so absent data cannot raise risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCondition {
    /// Pillar carrying the metric
    pub pillar: Pillar,
    /// Metric key inside `PillarInput::metrics`
    pub metric: String,
    /// Predicate applied to the value
    pub predicate: MetricPredicate,
}

impl MetricCondition {
    /// Create a condition
    #[must_use]
    pub fn new(pillar: Pillar, metric: impl Into<String>, predicate: MetricPredicate) -> Self {
        Self {
            pillar,
            metric: metric.into(),
            predicate,
        }
    }

    /// Evaluate against a snapshot
    #[must_use]
    pub fn holds(&self, snapshot: &DailySnapshot) -> bool {
        let Some(input) = snapshot.pillar(self.pillar) else {
            return false;
        };
        match &self.predicate {
            MetricPredicate::Equals(expected) => {
                input.metric_str(&self.metric) == Some(expected.as_str())
            }
            MetricPredicate::NotEquals(excluded) => input
                .metric_str(&self.metric)
                .is_some_and(|value| value != excluded),
            MetricPredicate::IsTrue => input.metric_bool(&self.metric) == Some(true),
            MetricPredicate::IsFalse => input.metric_bool(&self.metric) == Some(false),
            MetricPredicate::Compare(comparison) => input
                .metric_f64(&self.metric)
                .is_some_and(|value| comparison.holds(value)),
        }
    }

    /// Numeric value of the metric, when present
    #[must_use]
    pub fn value(&self, snapshot: &DailySnapshot) -> Option<f64> {
        snapshot
            .pillar(self.pillar)
            .and_then(|input| input.metric_f64(&self.metric))
    }
}

/// Where a scalar input to a projection comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum MetricSource {
    /// A raw metric on a pillar input
    Metric {
        /// Pillar carrying the metric
        pillar: Pillar,
        /// Metric key
        key: String,
        /// Value when the pillar or metric is missing
        fallback: f64,
    },
    /// A pillar's score
    PillarScore {
        /// Pillar to read
        pillar: Pillar,
        /// Value when the pillar is unscored
        fallback: f64,
    },
}

impl MetricSource {
    /// Raw metric source
    #[must_use]
    pub fn metric(pillar: Pillar, key: impl Into<String>, fallback: f64) -> Self {
        Self::Metric {
            pillar,
            key: key.into(),
            fallback,
        }
    }

    /// Resolve the value from a snapshot and its scores
    #[must_use]
    pub fn resolve(&self, snapshot: &DailySnapshot, scores: &PillarScores) -> f64 {
        match self {
            Self::Metric {
                pillar,
                key,
                fallback,
            } => snapshot
                .pillar(*pillar)
                .and_then(|input| input.metric_f64(key))
                .filter(|value| value.is_finite())
                .unwrap_or(*fallback),
            Self::PillarScore { pillar, fallback } => scores.get(*pillar).unwrap_or(*fallback),
        }
    }

    /// Pillar this source reads from
    #[must_use]
    pub const fn pillar(&self) -> Pillar {
        match self {
            Self::Metric { pillar, .. } | Self::PillarScore { pillar, .. } => *pillar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;
    use wellness_core::models::{PillarInput, WellnessDomain};

    fn snapshot() -> DailySnapshot {
        DailySnapshot::new(
            Uuid::nil(),
            WellnessDomain::Health,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
        .with_pillar(
            Pillar::Hydration,
            PillarInput::new(40.0)
                .with_metric("dehydration_risk", "severe")
                .with_metric("urine_color", 6),
        )
    }

    #[test]
    fn test_within_is_half_open() {
        let comparison = Comparison::Within(0.5, 0.7);
        assert!(comparison.holds(0.5));
        assert!(!comparison.holds(0.7));
    }

    #[test]
    fn test_metric_condition_ignores_missing_pillar() {
        let condition = MetricCondition::new(
            Pillar::Fitness,
            "avg_intensity",
            MetricPredicate::Compare(Comparison::Above(0.0)),
        );
        assert!(!condition.holds(&snapshot()));
    }

    #[test]
    fn test_metric_condition_matches_strings_and_numbers() {
        let severe = MetricCondition::new(
            Pillar::Hydration,
            "dehydration_risk",
            MetricPredicate::Equals("severe".to_owned()),
        );
        let dark = MetricCondition::new(
            Pillar::Hydration,
            "urine_color",
            MetricPredicate::Compare(Comparison::AtLeast(6.0)),
        );
        assert!(severe.holds(&snapshot()));
        assert!(dark.holds(&snapshot()));
    }

    #[test]
    fn test_metric_source_falls_back() {
        let source = MetricSource::metric(Pillar::Fitness, "avg_intensity", 50.0);
        assert!((source.resolve(&snapshot(), &PillarScores::new()) - 50.0).abs() < f64::EPSILON);
    }
}
