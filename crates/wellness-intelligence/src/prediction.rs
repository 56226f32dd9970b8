// ABOUTME: PredictiveProjector producing deterministic short-horizon projections from history slopes
// ABOUTME: Next-day and next-week scores, goal probability, burnout risk, and plateau prediction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use std::collections::BTreeMap;
use wellness_core::constants::{clamp_score, scores};
use wellness_core::models::{DailySnapshot, HistoryPoint, Pillar, PillarScores, PredictiveMetrics};

use crate::config::DomainRules;
use crate::statistics::{StatisticalAnalyzer, TrendPoint};

const DAYS_PER_WEEK: f64 = 7.0;

/// Pure projection over one domain's rule table
pub struct PredictiveProjector<'a> {
    rules: &'a DomainRules,
}

impl<'a> PredictiveProjector<'a> {
    /// Create a projector for a rule table
    #[must_use]
    pub const fn new(rules: &'a DomainRules) -> Self {
        Self { rules }
    }

    /// Least-squares slope (points per day) for each scored pillar
    ///
    /// Uses prior days from `history` plus today's score. History entries on or
    /// after `today` are ignored. Pillars with fewer than two usable points get
    /// a slope of `0`.
    #[must_use]
    pub fn slopes(
        &self,
        today: NaiveDate,
        current: &PillarScores,
        history: &[HistoryPoint],
    ) -> BTreeMap<Pillar, f64> {
        current
            .iter()
            .map(|(pillar, score)| {
                let mut dated: Vec<(NaiveDate, f64)> = history
                    .iter()
                    .filter(|point| point.date < today)
                    .filter_map(|point| {
                        point
                            .pillar_scores
                            .get(pillar)
                            .map(|value| (point.date, value))
                    })
                    .collect();
                dated.push((today, score));
                let points = TrendPoint::from_dated(&dated);
                (pillar, StatisticalAnalyzer::slope_or_flat(&points))
            })
            .collect()
    }

    /// Project `days` ahead; the trend delta is bounded by the weekly cap scaled to `days`
    #[must_use]
    pub fn project(
        &self,
        current: &PillarScores,
        slopes: &BTreeMap<Pillar, f64>,
        days: u32,
    ) -> PillarScores {
        let horizon = f64::from(days);
        let cap = self.rules.projection.max_weekly_delta * horizon / DAYS_PER_WEEK;
        current.map_scores(|pillar, score| {
            let slope = slopes.get(&pillar).copied().unwrap_or(0.0);
            let delta = (slope * horizon).clamp(-cap, cap);
            round_tenth(clamp_score(score + delta))
        })
    }

    /// Full projection set
    #[must_use]
    pub fn predict(
        &self,
        snapshot: &DailySnapshot,
        current: &PillarScores,
        harmony: f64,
        slopes: &BTreeMap<Pillar, f64>,
    ) -> PredictiveMetrics {
        let projection = &self.rules.projection;

        let goal_achievement_probability = if current.is_empty() {
            scores::MIN_SCORE
        } else {
            round_tenth(clamp_score(current.mean() + projection.goal_lift))
        };

        let intensity = projection.burnout_intensity.resolve(snapshot, current);
        let recovery = projection.burnout_recovery.resolve(snapshot, current);
        let burnout_risk = round_tenth(clamp_score(
            intensity - recovery + projection.burnout_offset,
        ));

        let plateau_prediction = round_tenth(clamp_score(
            scores::MAX_SCORE - harmony - projection.plateau_offset,
        ));

        PredictiveMetrics {
            next_day: self.project(current, slopes, 1),
            next_7_days: self.project(current, slopes, projection.horizon_days),
            goal_achievement_probability,
            burnout_risk,
            plateau_prediction,
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
