// ABOUTME: Rule table for the sleep domain (duration, efficiency, latency, continuity, stages, circadian)
// ABOUTME: Lifestyle signals (caffeine, screens, room temperature, sleep debt) feed risk and advice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use wellness_core::constants::scores::SYNERGY_BASELINE;
use wellness_core::models::{Pillar, WellnessDomain};

use super::{
    advice, base_habit_tips, recommend, signal, strategy, synergy, BalanceRules, CompositeMetric,
    CrossPillarRisk, DomainRules, InsightRules, MetricPredicate, MetricSource, ProjectionRules,
    RiskBands, RiskEffect, RiskRules, ScoreCondition, ScorePattern, SynergyRules,
    WeightingRules,
};

use Pillar::{Circadian, Continuity, Duration, Efficiency, Latency, Stages};

/// Sleep rule table
#[must_use]
pub fn rules() -> DomainRules {
    DomainRules {
        domain: WellnessDomain::Sleep,
        weighting: WeightingRules::default(),
        balance: BalanceRules::default(),
        synergy: SynergyRules {
            rules: vec![
                synergy(
                    "long_and_deep",
                    ScoreCondition::at_least(Duration, 80.0),
                    ScoreCondition::at_least(Stages, 80.0),
                    3.0,
                    10.0,
                ),
                synergy(
                    "unbroken_sleep",
                    ScoreCondition::at_least(Efficiency, 80.0),
                    ScoreCondition::at_least(Continuity, 80.0),
                    3.0,
                    8.0,
                ),
                synergy(
                    "aligned_onset",
                    ScoreCondition::at_least(Circadian, 80.0),
                    ScoreCondition::at_least(Latency, 80.0),
                    2.0,
                    6.0,
                ),
                synergy(
                    "efficient_length",
                    ScoreCondition::at_least(Duration, 80.0),
                    ScoreCondition::at_least(Efficiency, 80.0),
                    2.0,
                    6.0,
                ),
            ],
            bonus_cap: 10.0,
            effect_baseline: SYNERGY_BASELINE,
        },
        risk: RiskRules {
            tiers: RiskRules::standard_tiers(),
            cross_pillar: vec![CrossPillarRisk {
                pattern: ScorePattern::all(vec![
                    ScoreCondition::below(Duration, 50.0),
                    ScoreCondition::below(Stages, 50.0),
                ]),
                effect: RiskEffect::new(10.0)
                    .risk("Short and shallow sleep: recovery is compromised")
                    .urgent("Protect a full night of sleep tonight"),
            }],
            signals: vec![
                signal(
                    Latency,
                    "caffeine",
                    MetricPredicate::IsTrue,
                    RiskEffect::new(10.0)
                        .risk("Caffeine late in the day")
                        .preventive("Avoid caffeine after 2pm"),
                ),
                signal(
                    Latency,
                    "screen_time_minutes",
                    MetricPredicate::above(60.0),
                    RiskEffect::new(10.0)
                        .risk("Extended screen time before bed")
                        .preventive("Stop screens 1 hour before bed"),
                ),
                signal(
                    Continuity,
                    "room_temperature_c",
                    MetricPredicate::above(22.0),
                    RiskEffect::new(5.0)
                        .risk("Bedroom too warm")
                        .preventive("Keep the bedroom at 18-20°C"),
                ),
                signal(
                    Duration,
                    "sleep_debt_minutes",
                    MetricPredicate::at_least(120.0),
                    RiskEffect::new(15.0)
                        .risk("Accumulated sleep debt")
                        .urgent("Recover sleep debt: go to bed earlier this week"),
                ),
            ],
            bands: RiskBands::default(),
        },
        insights: InsightRules {
            strength_threshold: 85.0,
            strength_template: "Excellence in {pillar}: score {score}/100".to_owned(),
            priority_threshold: 60.0,
            priority_template: "Critical priority: improve {pillar} ({score}/100)".to_owned(),
            recommendations: vec![
                recommend(
                    ScorePattern::all(vec![
                        ScoreCondition::below(Duration, 70.0),
                        ScoreCondition::below(Circadian, 70.0),
                    ]),
                    "Fix a consistent bedtime to extend total sleep",
                ),
                recommend(
                    ScorePattern::all(vec![
                        ScoreCondition::below(Latency, 60.0),
                        ScoreCondition::below(Efficiency, 70.0),
                    ]),
                    "Get out of bed after 20min awake and return when sleepy",
                ),
                recommend(
                    ScorePattern::all(vec![ScoreCondition::below(Continuity, 60.0)]),
                    "Make the bedroom dark and quiet to reduce awakenings",
                ),
                recommend(
                    ScorePattern::all(vec![
                        ScoreCondition::below(Stages, 60.0),
                        ScoreCondition::at_least(Duration, 80.0),
                    ]),
                    "Long but light sleep: cut alcohol and late meals to deepen it",
                ),
            ],
            strategies: BTreeMap::from([
                (
                    Duration,
                    strategy([
                        "Move bedtime 15min earlier each week",
                        "Aim for 7 to 9 hours in bed",
                    ]),
                ),
                (
                    Efficiency,
                    strategy([
                        "Reserve the bed for sleep only",
                        "Keep a fixed wake-up time, weekends included",
                    ]),
                ),
                (
                    Latency,
                    strategy([
                        "Build a 30min wind-down routine",
                        "Dim lights and stop screens 1 hour before bed",
                    ]),
                ),
                (
                    Continuity,
                    strategy([
                        "Limit fluids in the last 2 hours before bed",
                        "Block noise and light in the bedroom",
                    ]),
                ),
                (
                    Stages,
                    strategy([
                        "Exercise earlier in the day to deepen sleep",
                        "Avoid alcohol in the evening",
                    ]),
                ),
                (
                    Circadian,
                    strategy([
                        "Get daylight within an hour of waking",
                        "Go to bed between 22:00 and 23:30",
                    ]),
                ),
            ]),
            base_tips: base_habit_tips(),
            low_average: 50.0,
            low_average_tip: "Focus on one pillar at a time".to_owned(),
            high_average: 80.0,
            high_average_tip: "Maintain your routine and guard against complacency".to_owned(),
            metric_advice: vec![
                advice(
                    Latency,
                    "latency_minutes",
                    MetricPredicate::above(30.0),
                    "Wind down for 30min before bed to fall asleep faster ({value} min to fall asleep)",
                ),
                advice(
                    Continuity,
                    "awakenings",
                    MetricPredicate::above(3.0),
                    "Frequent awakenings ({value}): limit late fluids and check noise and light",
                ),
                advice(
                    Stages,
                    "deep_pct",
                    MetricPredicate::below(15.0),
                    "Deep sleep is low ({value}%): exercise earlier in the day",
                ),
                advice(
                    Latency,
                    "screen_time_minutes",
                    MetricPredicate::above(60.0),
                    "Cut screen time before bed ({value} min last night)",
                ),
                advice(
                    Latency,
                    "caffeine",
                    MetricPredicate::IsTrue,
                    "Avoid caffeine after 2pm",
                ),
                advice(
                    Continuity,
                    "room_temperature_c",
                    MetricPredicate::above(22.0),
                    "Lower the bedroom temperature to 18-20°C (currently {value}°C)",
                ),
                advice(
                    Latency,
                    "meditation",
                    MetricPredicate::IsFalse,
                    "Try 10min of meditation before bed",
                ),
                advice(
                    Latency,
                    "reading",
                    MetricPredicate::IsFalse,
                    "Replace screens with reading before bed",
                ),
            ],
        },
        projection: ProjectionRules {
            horizon_days: 7,
            max_weekly_delta: 20.0,
            goal_lift: 10.0,
            burnout_intensity: MetricSource::metric(Duration, "training_load", 50.0),
            burnout_recovery: MetricSource::metric(Stages, "recovery_score", 70.0),
            burnout_offset: 20.0,
            plateau_offset: 20.0,
            stable_slope: 0.5,
        },
        composites: vec![
            CompositeMetric::weighted(
                "overall_quality",
                &[
                    (Duration, 0.25),
                    (Efficiency, 0.25),
                    (Latency, 0.15),
                    (Continuity, 0.15),
                    (Stages, 0.2),
                ],
            ),
            CompositeMetric::weighted(
                "restoration_index",
                &[(Stages, 0.4), (Efficiency, 0.3), (Circadian, 0.3)],
            ),
        ],
    }
}
