// ABOUTME: Rule table for the global health domain (fitness, nutrition, recovery, hydration)
// ABOUTME: Synergy pairs, overtraining and imbalance risks, insight text, and performance composites
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use wellness_core::models::{Pillar, WellnessDomain};

use super::{
    advice, base_habit_tips, recommend, signal, strategy, synergy, BalanceRules, CompositeKind,
    CompositeMetric, CrossPillarRisk, DomainRules, InsightRules, MetricPredicate, MetricSource,
    ProjectionRules, RiskBands, RiskEffect, RiskRules, ScoreCondition, ScorePattern,
    SynergyRules, WeightingRules,
};
use wellness_core::constants::scores::SYNERGY_BASELINE;

use Pillar::{Fitness, Hydration, Nutrition, Recovery};

/// Global health rule table
#[must_use]
pub fn rules() -> DomainRules {
    DomainRules {
        domain: WellnessDomain::Health,
        weighting: WeightingRules::default(),
        balance: BalanceRules::default(),
        synergy: SynergyRules {
            rules: vec![
                synergy(
                    "training_fuel",
                    ScoreCondition::at_least(Fitness, 80.0),
                    ScoreCondition::at_least(Nutrition, 80.0),
                    3.0,
                    10.0,
                ),
                synergy(
                    "adaptive_training",
                    ScoreCondition::at_least(Recovery, 80.0),
                    ScoreCondition::at_least(Fitness, 70.0),
                    3.0,
                    8.0,
                ),
                synergy(
                    "hydrated_recovery",
                    ScoreCondition::at_least(Hydration, 80.0),
                    ScoreCondition::at_least(Recovery, 70.0),
                    2.0,
                    6.0,
                ),
                synergy(
                    "nourished_rest",
                    ScoreCondition::at_least(Nutrition, 80.0),
                    ScoreCondition::at_least(Recovery, 80.0),
                    2.0,
                    6.0,
                ),
            ],
            bonus_cap: 10.0,
            effect_baseline: SYNERGY_BASELINE,
        },
        risk: RiskRules {
            tiers: RiskRules::standard_tiers(),
            cross_pillar: vec![
                CrossPillarRisk {
                    pattern: ScorePattern::all(vec![
                        ScoreCondition::below(Nutrition, 60.0),
                        ScoreCondition::above(Fitness, 80.0),
                    ]),
                    effect: RiskEffect::new(0.0)
                        .risk("Imbalance: high physical activity with insufficient nutrition")
                        .preventive("Increase caloric and protein intake"),
                },
                CrossPillarRisk {
                    pattern: ScorePattern::all(vec![
                        ScoreCondition::below(Recovery, 60.0),
                        ScoreCondition::above(Fitness, 70.0),
                    ]),
                    effect: RiskEffect::new(0.0)
                        .risk("Overtraining risk: insufficient recovery")
                        .urgent("Prioritize sleep and recovery"),
                },
            ],
            signals: vec![signal(
                Hydration,
                "dehydration_risk",
                MetricPredicate::equals("severe"),
                RiskEffect::new(25.0).urgent("Severe dehydration detected"),
            )],
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
                        ScoreCondition::above(Fitness, 80.0),
                        ScoreCondition::below(Nutrition, 60.0),
                    ]),
                    "Optimize post-workout nutrition to maximize recovery",
                ),
                recommend(
                    ScorePattern::all(vec![
                        ScoreCondition::below(Recovery, 70.0),
                        ScoreCondition::above(Fitness, 70.0),
                    ]),
                    "Temporarily reduce training intensity to improve recovery",
                ),
                recommend(
                    ScorePattern::all(vec![ScoreCondition::below(Hydration, 70.0)]).or_any(vec![
                        ScoreCondition::above(Fitness, 70.0),
                        ScoreCondition::below(Recovery, 70.0),
                    ]),
                    "Increase hydration to optimize performance and recovery",
                ),
                recommend(
                    ScorePattern::all(vec![
                        ScoreCondition::above(Nutrition, 85.0),
                        ScoreCondition::above(Recovery, 85.0),
                        ScoreCondition::below(Fitness, 70.0),
                    ]),
                    "Your nutrition/recovery base is excellent: progressively intensify training",
                ),
            ],
            strategies: BTreeMap::from([
                (
                    Fitness,
                    strategy([
                        "Build a progressive training routine",
                        "Start with 3 sessions/week of 30min",
                    ]),
                ),
                (
                    Nutrition,
                    strategy([
                        "Follow a structured meal plan",
                        "Prioritize protein and hydration",
                    ]),
                ),
                (
                    Recovery,
                    strategy([
                        "Improve sleep quality first",
                        "Set a fixed bedtime routine",
                    ]),
                ),
                (
                    Hydration,
                    strategy([
                        "Keep a steady hydration rhythm through the day",
                        "Drink regularly, not only when thirsty",
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
                    Fitness,
                    "avg_intensity",
                    MetricPredicate::above(80.0),
                    "Eat protein within 30min after training (intensity {value}/100)",
                ),
                advice(
                    Recovery,
                    "sleep_hours",
                    MetricPredicate::below(7.0),
                    "Keep your bedroom at 18-20°C and aim for 7+ hours of sleep (last night: {value} h)",
                ),
                advice(
                    Recovery,
                    "stress_level",
                    MetricPredicate::at_least(7.0),
                    "Add 10min of meditation before bed",
                ),
                advice(
                    Hydration,
                    "dehydration_risk",
                    MetricPredicate::not_equals("optimal"),
                    "Drink 500ml on waking, then hydrate every 2 hours",
                ),
            ],
        },
        projection: ProjectionRules {
            horizon_days: 7,
            max_weekly_delta: 20.0,
            goal_lift: 10.0,
            burnout_intensity: MetricSource::metric(Fitness, "avg_intensity", 50.0),
            burnout_recovery: MetricSource::metric(Recovery, "recovery_score", 70.0),
            burnout_offset: 20.0,
            plateau_offset: 20.0,
            stable_slope: 0.5,
        },
        composites: vec![
            CompositeMetric::weighted(
                "physical",
                &[(Fitness, 0.5), (Recovery, 0.3), (Hydration, 0.2)],
            ),
            CompositeMetric::weighted("mental", &[(Nutrition, 0.4), (Recovery, 0.6)]),
            CompositeMetric::weighted(
                "energy",
                &[
                    (Fitness, 0.25),
                    (Nutrition, 0.3),
                    (Recovery, 0.3),
                    (Hydration, 0.15),
                ],
            ),
            CompositeMetric::weighted(
                "recovery_capacity",
                &[(Recovery, 0.5), (Nutrition, 0.3), (Hydration, 0.2)],
            ),
            CompositeMetric {
                name: "adaptation_rate".to_owned(),
                kind: CompositeKind::HarmonyOffset(10.0),
            },
        ],
    }
}
