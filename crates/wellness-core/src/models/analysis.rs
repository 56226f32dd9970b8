// ABOUTME: Analysis result model: scores, balance, risk, insights, projections, data quality
// ABOUTME: Built as one atomic value per snapshot and serialized in camelCase for consumers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::pillar::{Pillar, PillarScores, WellnessDomain};
use super::snapshot::{PillarIssue, SnapshotRef};

/// Version tag written with every persisted analysis payload
pub const ANALYSIS_PAYLOAD_VERSION: &str = "1.0";

/// Discrete danger band derived from the accumulated risk score
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No notable risk
    #[default]
    Low,
    /// Worth watching
    Medium,
    /// Needs attention soon
    High,
    /// Needs attention now
    Critical,
}

impl RiskLevel {
    /// Stable wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified risk with its supporting explanations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    /// Band for `risk_score`
    pub level: RiskLevel,
    /// Accumulated risk points
    pub risk_score: f64,
    /// Named risks that fired
    pub specific_risks: Vec<String>,
    /// Actions that reduce future risk
    pub preventive_actions: Vec<String>,
    /// Items that need immediate attention
    pub urgent_concerns: Vec<String>,
}

/// Distribution metrics across pillar scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceMetrics {
    /// Evenness of today's scores (`100 - 2 * stddev`)
    pub harmony: f64,
    /// Day-to-day stability of the global score
    pub consistency: f64,
    /// Joint-excellence effect from synergy rules
    pub synergy: f64,
    /// Lowest-scoring pillar
    pub weakest_link: Pillar,
    /// Highest-scoring pillar
    pub strongest_pillar: Pillar,
}

/// Rule-selected recommendation text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// Pillars at or above the strength threshold
    pub key_strengths: Vec<String>,
    /// The weakest pillar when it is below the priority threshold
    pub improvement_priorities: Vec<String>,
    /// Advice triggered by pairs of pillar scores
    pub cross_pillar_recommendations: Vec<String>,
    /// Canned plan for the weakest pillar
    pub personalized_strategy: Vec<String>,
    /// Base habit tips plus one conditional tip
    pub habit_formation_tips: Vec<String>,
    /// Advice triggered by raw metrics (caffeine, screen time, intake)
    pub metric_recommendations: Vec<String>,
}

/// Short-horizon projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictiveMetrics {
    /// Projected scores one day ahead
    pub next_day: PillarScores,
    /// Projected scores seven days ahead
    #[serde(rename = "next7Days")]
    pub next_7_days: PillarScores,
    /// Chance of hitting current goals, `0..=100`
    pub goal_achievement_probability: f64,
    /// Overreaching risk, `0..=100`
    pub burnout_risk: f64,
    /// Stagnation likelihood, `0..=100`
    pub plateau_prediction: f64,
}

/// How much of the domain was actually observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Every domain pillar present
    Full,
    /// Some pillars absent; scores are computed but less reliable
    Partial,
    /// No pillar present; the global score is a placeholder `0`
    Insufficient,
}

impl Confidence {
    /// Whether consumers should flag the result as low-confidence
    #[must_use]
    pub const fn is_low(self) -> bool {
        !matches!(self, Self::Full)
    }

    /// Stable wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
            Self::Insufficient => "insufficient",
        }
    }
}

/// Data-quality summary carried by every result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Overall confidence
    pub confidence: Confidence,
    /// Domain pillars with no input
    pub absent_pillars: Vec<Pillar>,
    /// Aggregation and validation notes
    pub issues: Vec<PillarIssue>,
}

/// Score band for a single pillar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBand {
    /// Below 40
    Critical,
    /// 40 to 59
    Poor,
    /// 60 to 74
    Fair,
    /// 75 to 89
    Good,
    /// 90 and above
    Excellent,
}

impl StatusBand {
    /// Band for a score in `[0, 100]`
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 75.0 {
            Self::Good
        } else if score >= 60.0 {
            Self::Fair
        } else if score >= 40.0 {
            Self::Poor
        } else {
            Self::Critical
        }
    }
}

/// Direction of recent change for a pillar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Rising
    Improving,
    /// Flat or not enough history
    Stable,
    /// Falling
    Declining,
}

/// Band and trend for one pillar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarStatus {
    /// Score band
    pub status: StatusBand,
    /// Recent direction
    pub trend: Trend,
}

/// One prior day's scores, used for trends and consistency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Day the scores belong to
    pub date: NaiveDate,
    /// Global score on that day
    pub global_score: f64,
    /// Pillar scores on that day
    pub pillar_scores: PillarScores,
}

/// Complete derived analysis for one snapshot
///
/// Built in one step from a snapshot and recent history; replaced wholesale on
/// recompute, never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Stable id derived from `(user, domain, date)`
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Source snapshot
    pub snapshot_ref: SnapshotRef,
    /// Weighted score with balance and synergy bonuses, `0..=100`
    pub global_score: f64,
    /// Per-pillar scores, `0..=100`
    pub pillar_scores: PillarScores,
    /// Distribution metrics
    pub balance_metrics: BalanceMetrics,
    /// Risk classification
    pub risk_profile: RiskProfile,
    /// Recommendation text
    pub insights: Insights,
    /// Projections
    pub predictive_metrics: PredictiveMetrics,
    /// Band and trend per scored pillar
    pub pillar_statuses: BTreeMap<Pillar, PillarStatus>,
    /// Domain composite metrics (physical, mental, energy)
    pub performance: BTreeMap<String, f64>,
    /// Confidence and data issues
    pub data_quality: DataQuality,
    /// Computation time
    pub created_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Deterministic id for `(user, domain, date)` so recomputes upsert the same row
    #[must_use]
    pub fn derive_id(user_id: Uuid, domain: WellnessDomain, date: NaiveDate) -> Uuid {
        let name = format!("{user_id}:{domain}:{date}");
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }

    /// Scored domain
    #[must_use]
    pub const fn domain(&self) -> WellnessDomain {
        self.snapshot_ref.domain
    }

    /// Scored day
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.snapshot_ref.date
    }

    /// History entry summarizing this result
    #[must_use]
    pub fn to_history_point(&self) -> HistoryPoint {
        HistoryPoint {
            date: self.date(),
            global_score: self.global_score,
            pillar_scores: self.pillar_scores.clone(),
        }
    }
}
