// ABOUTME: Sleep log normalizer producing sleep-domain pillar inputs and derived sleep metrics
// ABOUTME: Piecewise duration, latency, awakening, stage balance, and circadian alignment scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::cast_precision_loss)] // Safe: awakening and cycle counts are small

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use wellness_core::constants::clamp_score;
use wellness_core::models::{DailySnapshot, Pillar, PillarInput, WellnessDomain};

/// Recommended nightly sleep in minutes; shortfall accrues as debt
pub const SLEEP_NEED_MINUTES: f64 = 480.0;
const SLEEP_CYCLE_MINUTES: f64 = 90.0;
const OPTIMAL_CYCLES: f64 = 5.0;

/// Raw sleep record for one night
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepLog {
    /// Total time asleep
    pub duration_minutes: f64,
    /// Share of time in bed spent asleep, `0..=100`
    pub efficiency_pct: f64,
    /// Time to fall asleep
    pub latency_minutes: f64,
    /// Night awakenings
    pub awakenings: u32,
    /// Light sleep minutes
    pub light_minutes: f64,
    /// Deep sleep minutes
    pub deep_minutes: f64,
    /// REM sleep minutes
    pub rem_minutes: f64,
    /// Time the user went to bed
    pub bedtime: NaiveTime,
    /// Caffeine after early afternoon
    #[serde(default)]
    pub caffeine: bool,
    /// Screen use before bed
    #[serde(default)]
    pub screen_time_minutes: f64,
    /// Bedroom temperature
    #[serde(default)]
    pub room_temperature_c: Option<f64>,
    /// Meditated before bed
    #[serde(default)]
    pub meditation: bool,
    /// Read before bed
    #[serde(default)]
    pub reading: bool,
    /// Average overnight heart rate variability
    #[serde(default)]
    pub hrv_ms: Option<f64>,
    /// Prior-day training load, `0..=100`
    #[serde(default)]
    pub training_load: Option<f64>,
}

/// Expected impact of the night on next-day performance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceImpact {
    /// Overall quality above 80
    Minimal,
    /// Overall quality above 60
    Moderate,
    /// Overall quality 60 or lower
    Significant,
}

/// Normalized view of one night
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepAssessment {
    /// Duration score
    pub duration: f64,
    /// Efficiency score
    pub efficiency: f64,
    /// Latency score
    pub latency: f64,
    /// Awakenings score
    pub continuity: f64,
    /// Deep/REM balance score
    pub stages: f64,
    /// Bedtime alignment score
    pub circadian: f64,
    /// `0.25 dur + 0.25 eff + 0.15 lat + 0.15 cont + 0.2 stages`
    pub overall_quality: f64,
    /// Deep and REM share of the night
    pub recovery_score: f64,
    /// `0.4 recovery + 0.3 quality + 0.3 circadian`
    pub restoration_index: f64,
    /// HRV-derived recovery, `70` without HRV
    pub autonomic_recovery: f64,
    /// Completed 90-minute cycles against five, `0..=100`
    pub cycle_completeness: f64,
    /// Shortfall against the nightly need
    pub sleep_debt_minutes: f64,
    /// Hours until fully recovered
    pub recovery_hours: u32,
    /// Next-day performance impact
    pub performance_impact: PerformanceImpact,
    /// More than three awakenings
    pub fragmented: bool,
    /// Deep sleep at least 15% of total duration
    pub optimal_deep_sleep: bool,
}

/// `420..=540` minutes scores 100 with piecewise falloff on both sides
#[must_use]
pub fn duration_score(minutes: f64) -> f64 {
    let score = if (420.0..=540.0).contains(&minutes) {
        100.0
    } else if (360.0..420.0).contains(&minutes) {
        80.0 - (420.0 - minutes) / 6.0
    } else if minutes > 540.0 && minutes <= 600.0 {
        90.0 - (minutes - 540.0) / 6.0
    } else if minutes < 360.0 {
        50.0 - (360.0 - minutes) / 12.0
    } else {
        70.0 - (minutes - 600.0) / 12.0
    };
    clamp_score(score)
}

/// Faster sleep onset scores higher
#[must_use]
pub fn latency_score(minutes: f64) -> f64 {
    let score = if minutes <= 15.0 {
        100.0
    } else if minutes <= 30.0 {
        80.0
    } else if minutes <= 45.0 {
        60.0
    } else {
        40.0 - (minutes - 45.0) / 3.0
    };
    clamp_score(score)
}

/// Each awakening past the second costs 15 points
#[must_use]
pub fn awakenings_score(awakenings: u32) -> f64 {
    let score = match awakenings {
        0 => 100.0,
        1 => 85.0,
        2 => 70.0,
        n => 15.0f64.mul_add(-(f64::from(n) - 2.0), 55.0),
    };
    clamp_score(score)
}

/// Deep 15-20% and REM 20-25% of staged sleep score 100; each point away costs 4
#[must_use]
pub fn stages_score(light: f64, deep: f64, rem: f64) -> f64 {
    let total = light + deep + rem;
    if total <= 0.0 {
        return 0.0;
    }
    let deep_pct = deep / total * 100.0;
    let rem_pct = rem / total * 100.0;
    let deep_score = if (15.0..=20.0).contains(&deep_pct) {
        100.0
    } else {
        clamp_score(100.0 - (17.5 - deep_pct).abs() * 4.0)
    };
    let rem_score = if (20.0..=25.0).contains(&rem_pct) {
        100.0
    } else {
        clamp_score(100.0 - (22.5 - rem_pct).abs() * 4.0)
    };
    (deep_score + rem_score) / 2.0
}

/// Bedtime as fractional hours, after-midnight times mapped past 24
#[must_use]
pub fn bedtime_hour(bedtime: NaiveTime) -> f64 {
    let hour = f64::from(bedtime.hour()) + f64::from(bedtime.minute()) / 60.0;
    if hour < 12.0 {
        hour + 24.0
    } else {
        hour
    }
}

/// 22:00 to 23:30 scores 100
#[must_use]
pub fn circadian_score(hour: f64) -> f64 {
    let score = if (22.0..=23.5).contains(&hour) {
        100.0
    } else if (21.0..22.0).contains(&hour) {
        85.0
    } else if hour > 23.5 && hour <= 24.5 {
        75.0
    } else {
        60.0 - (22.75 - hour).abs() * 10.0
    };
    clamp_score(score)
}

/// Hours until recovered from the average of quality, recovery and restoration
#[must_use]
pub fn recovery_hours(average: f64) -> u32 {
    if average >= 80.0 {
        6
    } else if average >= 60.0 {
        8
    } else if average >= 40.0 {
        10
    } else {
        12
    }
}

impl SleepLog {
    /// Compute every sleep score
    #[must_use]
    pub fn assess(&self) -> SleepAssessment {
        let duration = duration_score(self.duration_minutes).round();
        let efficiency = clamp_score(self.efficiency_pct).round();
        let latency = latency_score(self.latency_minutes).round();
        let continuity = awakenings_score(self.awakenings).round();
        let stages = stages_score(self.light_minutes, self.deep_minutes, self.rem_minutes).round();
        let circadian = circadian_score(bedtime_hour(self.bedtime)).round();

        let overall_quality = clamp_score(
            0.2f64.mul_add(
                stages,
                0.15f64.mul_add(
                    continuity,
                    0.15f64.mul_add(latency, 0.25f64.mul_add(efficiency, 0.25 * duration)),
                ),
            ),
        )
        .round();

        let recovery_score = if self.duration_minutes > 0.0 {
            clamp_score(
                (self.rem_minutes / self.duration_minutes)
                    .mul_add(150.0, self.deep_minutes / self.duration_minutes * 200.0),
            )
            .round()
        } else {
            0.0
        };

        let restoration_index = clamp_score(0.3f64.mul_add(
            circadian,
            0.4f64.mul_add(recovery_score, 0.3 * overall_quality),
        ))
        .round();

        let autonomic_recovery = self
            .hrv_ms
            .map_or(70.0, |hrv| clamp_score(hrv / 50.0 * 100.0).round());

        let staged = self.light_minutes + self.deep_minutes + self.rem_minutes;
        let cycle_completeness =
            clamp_score((staged / SLEEP_CYCLE_MINUTES).floor() / OPTIMAL_CYCLES * 100.0).round();

        let performance_impact = if overall_quality > 80.0 {
            PerformanceImpact::Minimal
        } else if overall_quality > 60.0 {
            PerformanceImpact::Moderate
        } else {
            PerformanceImpact::Significant
        };

        SleepAssessment {
            duration,
            efficiency,
            latency,
            continuity,
            stages,
            circadian,
            overall_quality,
            recovery_score,
            restoration_index,
            autonomic_recovery,
            cycle_completeness,
            sleep_debt_minutes: (SLEEP_NEED_MINUTES - self.duration_minutes).max(0.0),
            recovery_hours: recovery_hours(
                (overall_quality + recovery_score + restoration_index) / 3.0,
            ),
            performance_impact,
            fragmented: self.awakenings > 3,
            optimal_deep_sleep: self.deep_minutes >= self.duration_minutes * 0.15,
        }
    }

    /// Sleep-domain pillar inputs carrying the raw metrics the rule table reads
    #[must_use]
    pub fn to_pillars(&self) -> BTreeMap<Pillar, PillarInput> {
        let assessment = self.assess();
        let staged = self.light_minutes + self.deep_minutes + self.rem_minutes;
        let share = |minutes: f64| {
            if staged > 0.0 {
                (minutes / staged * 1000.0).round() / 10.0
            } else {
                0.0
            }
        };

        let mut duration = PillarInput::new(assessment.duration)
            .with_metric("duration_minutes", self.duration_minutes)
            .with_metric("sleep_debt_minutes", assessment.sleep_debt_minutes);
        if let Some(load) = self.training_load {
            duration = duration.with_metric("training_load", load);
        }

        let mut continuity = PillarInput::new(assessment.continuity)
            .with_metric("awakenings", self.awakenings)
            .with_metric("fragmented", assessment.fragmented);
        if let Some(temperature) = self.room_temperature_c {
            continuity = continuity.with_metric("room_temperature_c", temperature);
        }

        BTreeMap::from([
            (Pillar::Duration, duration),
            (
                Pillar::Efficiency,
                PillarInput::new(assessment.efficiency)
                    .with_metric("efficiency_pct", self.efficiency_pct),
            ),
            (
                Pillar::Latency,
                PillarInput::new(assessment.latency)
                    .with_metric("latency_minutes", self.latency_minutes)
                    .with_metric("caffeine", self.caffeine)
                    .with_metric("screen_time_minutes", self.screen_time_minutes)
                    .with_metric("meditation", self.meditation)
                    .with_metric("reading", self.reading),
            ),
            (Pillar::Continuity, continuity),
            (
                Pillar::Stages,
                PillarInput::new(assessment.stages)
                    .with_metric("deep_pct", share(self.deep_minutes))
                    .with_metric("rem_pct", share(self.rem_minutes))
                    .with_metric("recovery_score", assessment.recovery_score)
                    .with_metric("cycle_completeness", assessment.cycle_completeness),
            ),
            (
                Pillar::Circadian,
                PillarInput::new(assessment.circadian)
                    .with_metric("bedtime_hour", bedtime_hour(self.bedtime)),
            ),
        ])
    }

    /// Complete sleep-domain snapshot for one night
    #[must_use]
    pub fn to_snapshot(&self, user_id: Uuid, date: NaiveDate) -> DailySnapshot {
        let mut snapshot = DailySnapshot::new(user_id, WellnessDomain::Sleep, date);
        snapshot.pillars = self.to_pillars();
        snapshot
    }
}
