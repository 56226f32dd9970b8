// ABOUTME: ScoreCalculator turning a snapshot into pillar scores and a global score
// ABOUTME: Rebalanced weights, balance bonus from spread, capped synergy bonus, harmony and consistency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::cast_precision_loss)] // Safe: pillar counts are single digits

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wellness_core::constants::{clamp_score, scores};
use wellness_core::models::{Confidence, DailySnapshot, HistoryPoint, Pillar, PillarScores};

use crate::config::{AbsentPillarPolicy, DomainRules};
use crate::statistics::StatisticalAnalyzer;

/// Everything the calculator derived from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Scores entering the weighted sum (absent pillars at `0` under `score_as_zero`)
    pub pillar_scores: PillarScores,
    /// Domain pillars with no input
    pub absent_pillars: Vec<Pillar>,
    /// Weight applied to each scored pillar
    pub weights: BTreeMap<Pillar, f64>,
    /// `Σ weight * score`
    pub weighted_sum: f64,
    /// Bonus from the spread of scores
    pub balance_bonus: f64,
    /// Capped bonus from synergy rules
    pub synergy_bonus: f64,
    /// `clamp(round(weighted_sum + balance_bonus + synergy_bonus))`
    pub global_score: f64,
    /// Data completeness
    pub confidence: Confidence,
}

impl ScoreCard {
    /// Sum of applied weights
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.weights.values().sum()
    }
}

/// Pure scoring over one domain's rule table
pub struct ScoreCalculator<'a> {
    rules: &'a DomainRules,
}

impl<'a> ScoreCalculator<'a> {
    /// Create a calculator for a rule table
    #[must_use]
    pub const fn new(rules: &'a DomainRules) -> Self {
        Self { rules }
    }

    /// Score a snapshot
    ///
    /// Pillars outside the domain are ignored; scores are clamped into
    /// `[0, 100]` in case the snapshot skipped validation.
    #[must_use]
    pub fn score(&self, snapshot: &DailySnapshot) -> ScoreCard {
        let domain_pillars = self.rules.pillars();
        let present: PillarScores = domain_pillars
            .iter()
            .filter_map(|pillar| {
                snapshot
                    .pillar(*pillar)
                    .map(|input| (*pillar, clamp_score(input.score)))
            })
            .collect();
        let absent_pillars: Vec<Pillar> = domain_pillars
            .iter()
            .copied()
            .filter(|pillar| !present.contains(*pillar))
            .collect();

        if present.is_empty() {
            let pillar_scores: PillarScores =
                domain_pillars.iter().map(|pillar| (*pillar, 0.0)).collect();
            let base = 1.0 / domain_pillars.len().max(1) as f64;
            return ScoreCard {
                weights: domain_pillars.iter().map(|pillar| (*pillar, base)).collect(),
                pillar_scores,
                absent_pillars,
                weighted_sum: 0.0,
                balance_bonus: 0.0,
                synergy_bonus: 0.0,
                global_score: 0.0,
                confidence: Confidence::Insufficient,
            };
        }

        let pillar_scores = match self.rules.weighting.absent_policy {
            AbsentPillarPolicy::ScoreAsZero => domain_pillars
                .iter()
                .map(|pillar| (*pillar, present.get(*pillar).unwrap_or(scores::MIN_SCORE)))
                .collect(),
            AbsentPillarPolicy::Renormalize => present.clone(),
        };

        let weights = self.weights(&present, &pillar_scores);
        let weighted_sum = weights
            .iter()
            .map(|(pillar, weight)| weight * pillar_scores.get(*pillar).unwrap_or(0.0))
            .sum::<f64>();
        let balance_bonus = self.balance_bonus(&pillar_scores);
        let synergy_bonus = self.synergy_bonus(&pillar_scores);
        let global_score = clamp_score((weighted_sum + balance_bonus + synergy_bonus).round());

        let confidence = if absent_pillars.is_empty() {
            Confidence::Full
        } else {
            Confidence::Partial
        };

        ScoreCard {
            pillar_scores,
            absent_pillars,
            weights,
            weighted_sum,
            balance_bonus,
            synergy_bonus,
            global_score,
            confidence,
        }
    }

    /// Base weight `1/N` plus `budget/N` for each present pillar below the present mean
    ///
    /// At most `N - 1` pillars can sit below the mean, so the total stays in
    /// `[1, 1 + budget)`.
    #[must_use]
    pub fn weights(&self, present: &PillarScores, scored: &PillarScores) -> BTreeMap<Pillar, f64> {
        let count = scored.len().max(1) as f64;
        let base = 1.0 / count;
        let nudge = self.rules.weighting.rebalance_budget / count;
        let mean = present.mean();

        scored
            .pillars()
            .map(|pillar| {
                let below_mean = present.get(pillar).is_some_and(|score| score < mean);
                (pillar, if below_mean { base + nudge } else { base })
            })
            .collect()
    }

    /// Plain uniform weighted average with no nudges or bonuses
    #[must_use]
    pub fn weighted_average(scores: &PillarScores) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }
        let weight = 1.0 / scores.len() as f64;
        scores.iter().map(|(_, score)| weight * score).sum()
    }

    /// Balance bonus for the spread of `scores`
    #[must_use]
    pub fn balance_bonus(&self, scores: &PillarScores) -> f64 {
        self.rules.balance.bonus(scores.spread())
    }

    /// Sum of matching synergy score bonuses, capped
    #[must_use]
    pub fn synergy_bonus(&self, scores: &PillarScores) -> f64 {
        let total = self
            .rules
            .synergy
            .rules
            .iter()
            .filter(|rule| rule.pattern.matches(scores))
            .map(|rule| rule.score_bonus)
            .sum::<f64>();
        total.min(self.rules.synergy.bonus_cap)
    }

    /// Synergy balance metric: baseline plus matching effect bonuses, at most `100`
    #[must_use]
    pub fn synergy_effect(&self, scores: &PillarScores) -> f64 {
        let effects = self
            .rules
            .synergy
            .rules
            .iter()
            .filter(|rule| rule.pattern.matches(scores))
            .map(|rule| rule.effect_bonus)
            .sum::<f64>();
        clamp_score(self.rules.synergy.effect_baseline + effects)
    }

    /// Names of the synergy rules that matched
    #[must_use]
    pub fn active_synergies(&self, scores: &PillarScores) -> Vec<&str> {
        self.rules
            .synergy
            .rules
            .iter()
            .filter(|rule| rule.pattern.matches(scores))
            .map(|rule| rule.name.as_str())
            .collect()
    }
}

/// Evenness of today's scores: `max(0, 100 - 2 * stddev)`
#[must_use]
pub fn harmony(scores: &PillarScores) -> f64 {
    clamp_score(2.0f64.mul_add(-scores.std_dev(), scores::MAX_SCORE))
}

/// Stability of the global score across history and today
///
/// Needs at least two history points; otherwise the neutral default applies.
#[must_use]
pub fn consistency(history: &[HistoryPoint], today: f64) -> f64 {
    if history.len() < 2 {
        return scores::DEFAULT_CONSISTENCY_SCORE;
    }
    let mut values: Vec<f64> = history.iter().map(|point| point.global_score).collect();
    values.push(today);
    clamp_score(2.0f64.mul_add(-StatisticalAnalyzer::std_dev(&values), scores::MAX_SCORE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;
    use wellness_core::models::{PillarInput, WellnessDomain};

    fn health_snapshot(scores: &[(Pillar, f64)]) -> DailySnapshot {
        scores.iter().fold(
            DailySnapshot::new(
                Uuid::nil(),
                WellnessDomain::Health,
                NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            ),
            |snapshot, (pillar, score)| snapshot.with_pillar(*pillar, PillarInput::new(*score)),
        )
    }

    #[test]
    fn test_equal_scores_earn_full_balance_bonus() {
        let rules = DomainRules::for_domain(WellnessDomain::Health);
        let card = ScoreCalculator::new(&rules).score(&health_snapshot(&[
            (Pillar::Fitness, 80.0),
            (Pillar::Nutrition, 80.0),
            (Pillar::Recovery, 80.0),
            (Pillar::Hydration, 80.0),
        ]));
        assert!((card.balance_bonus - 10.0).abs() < f64::EPSILON);
        assert!((card.weight_sum() - 1.0).abs() < 1e-9);
        assert_eq!(card.confidence, Confidence::Full);
    }

    #[test]
    fn test_below_mean_pillars_are_nudged() {
        let rules = DomainRules::for_domain(WellnessDomain::Health);
        let card = ScoreCalculator::new(&rules).score(&health_snapshot(&[
            (Pillar::Fitness, 90.0),
            (Pillar::Nutrition, 40.0),
            (Pillar::Recovery, 85.0),
            (Pillar::Hydration, 50.0),
        ]));
        let nutrition = card.weights[&Pillar::Nutrition];
        let fitness = card.weights[&Pillar::Fitness];
        assert!((nutrition - fitness - 0.005).abs() < 1e-9);
        assert!(card.weight_sum() < 1.02);
    }

    #[test]
    fn test_empty_snapshot_is_insufficient() {
        let rules = DomainRules::for_domain(WellnessDomain::Health);
        let card = ScoreCalculator::new(&rules).score(&health_snapshot(&[]));
        assert!(card.global_score.abs() < f64::EPSILON);
        assert_eq!(card.confidence, Confidence::Insufficient);
        assert_eq!(card.pillar_scores.len(), 4);
    }

    #[test]
    fn test_consistency_default_without_history() {
        assert!((consistency(&[], 70.0) - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_harmony_of_equal_scores_is_full() {
        let scores = PillarScores::new()
            .with(Pillar::Fitness, 70.0)
            .with(Pillar::Recovery, 70.0);
        assert!((harmony(&scores) - 100.0).abs() < f64::EPSILON);
    }
}
