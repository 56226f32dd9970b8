// ABOUTME: WellnessEngine assembling one AnalysisResult from a snapshot and recent history
// ABOUTME: Runs validation, scoring, risk, insights, projections, and composites in fixed order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use tracing::debug;
use wellness_core::models::{
    AnalysisResult, BalanceMetrics, DailySnapshot, DataQuality, HistoryPoint, Pillar,
    PillarScores,
};

use crate::config::{DomainRules, RuleBook};
use crate::insights::InsightGenerator;
use crate::performance;
use crate::prediction::PredictiveProjector;
use crate::risk::RiskAssessor;
use crate::scoring::{self, ScoreCalculator};
use crate::validation::sanitize_snapshot;

/// Pure analysis pipeline over a rule book
///
/// Given identical inputs (including `created_at`) the result is identical,
/// field for field.
#[derive(Debug, Clone, Default)]
pub struct WellnessEngine {
    rules: RuleBook,
}

impl WellnessEngine {
    /// Create an engine over a rule book
    #[must_use]
    pub const fn new(rules: RuleBook) -> Self {
        Self { rules }
    }

    /// Rule book in use
    #[must_use]
    pub const fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Analyze one snapshot
    ///
    /// `history` may contain any prior results for the same user and domain;
    /// entries dated on or after the snapshot are ignored.
    #[must_use]
    pub fn analyze(
        &self,
        snapshot: &DailySnapshot,
        history: &[HistoryPoint],
        created_at: DateTime<Utc>,
    ) -> AnalysisResult {
        let rules = self.rules.get(snapshot.domain);
        let clean = sanitize_snapshot(snapshot);
        let mut prior: Vec<HistoryPoint> = history
            .iter()
            .filter(|point| point.date < clean.date)
            .cloned()
            .collect();
        prior.sort_by_key(|point| point.date);

        let calculator = ScoreCalculator::new(rules);
        let card = calculator.score(&clean);
        let scores = &card.pillar_scores;

        let harmony = scoring::harmony(scores).round();
        let balance_metrics = BalanceMetrics {
            harmony,
            consistency: scoring::consistency(&prior, card.global_score).round(),
            synergy: calculator.synergy_effect(scores),
            weakest_link: extreme_pillar(rules, scores, PillarScores::weakest),
            strongest_pillar: extreme_pillar(rules, scores, PillarScores::strongest),
        };

        // Insights must see the risk profile produced in this run
        let risk_profile = RiskAssessor::new(rules).assess(scores, &clean);
        let insights = InsightGenerator::new(rules).generate(scores, &risk_profile, &clean);

        let projector = PredictiveProjector::new(rules);
        let slopes = projector.slopes(clean.date, scores, &prior);
        let predictive_metrics = projector.predict(&clean, scores, harmony, &slopes);

        debug!(
            user.id = %clean.user_id,
            domain = %clean.domain,
            date = %clean.date,
            global_score = card.global_score,
            risk_level = %risk_profile.level,
            confidence = card.confidence.as_str(),
            synergies = ?calculator.active_synergies(scores),
            "Analysis computed"
        );

        AnalysisResult {
            id: AnalysisResult::derive_id(snapshot.user_id, snapshot.domain, snapshot.date),
            user_id: snapshot.user_id,
            snapshot_ref: snapshot.reference(),
            global_score: card.global_score,
            pillar_scores: scores.clone(),
            pillar_statuses: performance::pillar_statuses(rules, scores, &slopes),
            performance: performance::composites(rules, scores, harmony),
            balance_metrics,
            risk_profile,
            insights,
            predictive_metrics,
            data_quality: DataQuality {
                confidence: card.confidence,
                absent_pillars: card.absent_pillars.clone(),
                issues: clean.issues,
            },
            created_at,
        }
    }
}

/// Weakest or strongest scored pillar, falling back to the domain's first pillar
fn extreme_pillar(
    rules: &DomainRules,
    scores: &PillarScores,
    pick: fn(&PillarScores) -> Option<(Pillar, f64)>,
) -> Pillar {
    pick(scores).map_or_else(
        || rules.pillars().first().copied().unwrap_or(Pillar::Fitness),
        |(pillar, _)| pillar,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use uuid::Uuid;
    use wellness_core::models::{Confidence, PillarInput, WellnessDomain};

    #[test]
    fn test_recompute_is_identical() {
        let engine = WellnessEngine::default();
        let snapshot = DailySnapshot::new(
            Uuid::new_v4(),
            WellnessDomain::Health,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        )
        .with_pillar(Pillar::Fitness, PillarInput::new(82.0))
        .with_pillar(Pillar::Nutrition, PillarInput::new(64.0))
        .with_pillar(Pillar::Recovery, PillarInput::new(71.0));
        let created_at = Utc.with_ymd_and_hms(2025, 7, 1, 20, 0, 0).unwrap();

        let first = engine.analyze(&snapshot, &[], created_at);
        let second = engine.analyze(&snapshot, &[], created_at);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.data_quality.confidence, Confidence::Partial);
        assert_eq!(first.data_quality.absent_pillars, vec![Pillar::Hydration]);
        assert_eq!(first.balance_metrics.weakest_link, Pillar::Hydration);
    }
}
