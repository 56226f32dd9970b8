// ABOUTME: Domain composite metrics and per-pillar status bands with trend direction
// ABOUTME: Composites are weighted blends of pillar scores declared in the rule table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use wellness_core::constants::clamp_score;
use wellness_core::models::{Pillar, PillarScores, PillarStatus, StatusBand, Trend};

use crate::config::{CompositeKind, DomainRules};

/// Evaluate every composite in the table; unscored pillars count as `0`
#[must_use]
pub fn composites(
    rules: &DomainRules,
    scores: &PillarScores,
    harmony: f64,
) -> BTreeMap<String, f64> {
    rules
        .composites
        .iter()
        .map(|composite| {
            let value = match &composite.kind {
                CompositeKind::Weighted(weights) => weights
                    .iter()
                    .map(|(pillar, weight)| weight * scores.get(*pillar).unwrap_or(0.0))
                    .sum(),
                CompositeKind::HarmonyOffset(offset) => harmony + offset,
            };
            (composite.name.clone(), clamp_score(value).round())
        })
        .collect()
}

/// Direction for a slope in points per day
#[must_use]
pub fn trend(slope: f64, stable_slope: f64) -> Trend {
    if slope > stable_slope {
        Trend::Improving
    } else if slope < -stable_slope {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Band and trend for each scored pillar
#[must_use]
pub fn pillar_statuses(
    rules: &DomainRules,
    scores: &PillarScores,
    slopes: &BTreeMap<Pillar, f64>,
) -> BTreeMap<Pillar, PillarStatus> {
    scores
        .iter()
        .map(|(pillar, score)| {
            let slope = slopes.get(&pillar).copied().unwrap_or(0.0);
            (
                pillar,
                PillarStatus {
                    status: StatusBand::from_score(score),
                    trend: trend(slope, rules.projection.stable_slope),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellness_core::models::WellnessDomain;

    #[test]
    fn test_health_composites() {
        let rules = DomainRules::for_domain(WellnessDomain::Health);
        let scores = PillarScores::new()
            .with(Pillar::Fitness, 80.0)
            .with(Pillar::Nutrition, 70.0)
            .with(Pillar::Recovery, 60.0)
            .with(Pillar::Hydration, 90.0);
        let values = composites(&rules, &scores, 95.0);

        assert!((values["physical"] - 76.0).abs() < f64::EPSILON);
        assert!((values["mental"] - 64.0).abs() < f64::EPSILON);
        assert!((values["adaptation_rate"] - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trend_dead_band() {
        assert_eq!(trend(0.5, 0.5), Trend::Stable);
        assert_eq!(trend(0.6, 0.5), Trend::Improving);
        assert_eq!(trend(-0.6, 0.5), Trend::Declining);
    }
}
