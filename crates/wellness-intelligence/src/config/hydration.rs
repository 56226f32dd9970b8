// ABOUTME: Rule table for the hydration domain (intake, fluid quality, timing, electrolytes, symptoms)
// ABOUTME: Dehydration signal penalties mirror the dehydration risk accumulator used by the normalizer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use wellness_core::constants::scores::SYNERGY_BASELINE;
use wellness_core::models::{Pillar, WellnessDomain};

use super::{
    advice, base_habit_tips, recommend, signal, strategy, synergy, BalanceRules, Comparison,
    CompositeMetric, CrossPillarRisk, DomainRules, InsightRules, MetricPredicate, MetricSource,
    ProjectionRules, RiskBands, RiskEffect, RiskRules, ScoreCondition, ScorePattern, SignalRule,
    SynergyRules, WeightingRules,
};

use Pillar::{Electrolytes, FluidQuality, Intake, Symptoms, Timing};

fn symptom_signals() -> Vec<SignalRule> {
    vec![
        signal(
            Symptoms,
            "thirst",
            MetricPredicate::not_equals("none"),
            RiskEffect::new(20.0).risk("Thirst reported"),
        ),
        signal(
            Symptoms,
            "headache",
            MetricPredicate::IsTrue,
            RiskEffect::new(15.0).risk("Headache"),
        ),
        signal(
            Symptoms,
            "fatigue",
            MetricPredicate::IsTrue,
            RiskEffect::new(10.0).risk("Fatigue"),
        ),
        signal(
            Symptoms,
            "dizziness",
            MetricPredicate::IsTrue,
            RiskEffect::new(25.0)
                .risk("Dizziness")
                .urgent("Dizziness: sit down and rehydrate now"),
        ),
        signal(
            Symptoms,
            "dry_mouth",
            MetricPredicate::IsTrue,
            RiskEffect::new(15.0).risk("Dry mouth"),
        ),
        signal(
            Symptoms,
            "dark_urine",
            MetricPredicate::IsTrue,
            RiskEffect::new(20.0).risk("Dark urine reported"),
        ),
        signal(
            Symptoms,
            "urine_color",
            MetricPredicate::at_least(6.0),
            RiskEffect::new(30.0).risk("Dark urine color"),
        ),
        signal(
            Symptoms,
            "urine_frequency",
            MetricPredicate::below(4.0),
            RiskEffect::new(20.0).risk("Low urine frequency"),
        ),
    ]
}

fn context_signals() -> Vec<SignalRule> {
    vec![
        signal(
            Intake,
            "goal_achievement_ratio",
            MetricPredicate::below(0.5),
            RiskEffect::new(40.0)
                .risk("Very insufficient intake")
                .urgent("Drink water now: intake is under half of your goal"),
        ),
        signal(
            Intake,
            "goal_achievement_ratio",
            MetricPredicate::Compare(Comparison::Within(0.5, 0.7)),
            RiskEffect::new(25.0)
                .risk("Insufficient intake")
                .preventive("Spread the remaining intake over the next hours"),
        ),
        signal(
            Electrolytes,
            "environmental_temp_c",
            MetricPredicate::above(28.0),
            RiskEffect::new(15.0)
                .risk("High temperature")
                .preventive("Increase intake in hot weather"),
        ),
        signal(
            Electrolytes,
            "humidity_pct",
            MetricPredicate::below(30.0),
            RiskEffect::new(10.0).risk("Dry air"),
        ),
        signal(
            Electrolytes,
            "exercise_intensity",
            MetricPredicate::equals("high"),
            RiskEffect::new(20.0)
                .risk("Intense exercise")
                .preventive("Replace fluids and electrolytes after training"),
        ),
        signal(
            Electrolytes,
            "exercise_intensity",
            MetricPredicate::equals("extreme"),
            RiskEffect::new(20.0)
                .risk("Intense exercise")
                .preventive("Replace fluids and electrolytes after training"),
        ),
    ]
}

/// Hydration rule table
#[must_use]
pub fn rules() -> DomainRules {
    let mut signals = symptom_signals();
    signals.extend(context_signals());

    DomainRules {
        domain: WellnessDomain::Hydration,
        weighting: WeightingRules::default(),
        balance: BalanceRules::default(),
        synergy: SynergyRules {
            rules: vec![
                synergy(
                    "clean_volume",
                    ScoreCondition::at_least(Intake, 80.0),
                    ScoreCondition::at_least(FluidQuality, 80.0),
                    3.0,
                    10.0,
                ),
                synergy(
                    "steady_volume",
                    ScoreCondition::at_least(Intake, 80.0),
                    ScoreCondition::at_least(Timing, 80.0),
                    3.0,
                    8.0,
                ),
                synergy(
                    "mineral_support",
                    ScoreCondition::at_least(Electrolytes, 80.0),
                    ScoreCondition::at_least(Intake, 70.0),
                    2.0,
                    6.0,
                ),
                synergy(
                    "symptom_free_quality",
                    ScoreCondition::at_least(Symptoms, 80.0),
                    ScoreCondition::at_least(FluidQuality, 80.0),
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
                    ScoreCondition::below(Intake, 50.0),
                    ScoreCondition::below(Symptoms, 50.0),
                ]),
                effect: RiskEffect::new(10.0)
                    .risk("Low intake with active dehydration symptoms")
                    .urgent("Rehydrate now with water and electrolytes"),
            }],
            signals,
            bands: RiskBands {
                medium: 21.0,
                high: 51.0,
                critical: 81.0,
            },
        },
        insights: InsightRules {
            strength_threshold: 85.0,
            strength_template: "Excellence in {pillar}: score {score}/100".to_owned(),
            priority_threshold: 60.0,
            priority_template: "Critical priority: improve {pillar} ({score}/100)".to_owned(),
            recommendations: vec![
                recommend(
                    ScorePattern::all(vec![
                        ScoreCondition::below(Intake, 70.0),
                        ScoreCondition::below(Electrolytes, 70.0),
                    ]),
                    "Pair extra fluids with electrolytes around exercise",
                ),
                recommend(
                    ScorePattern::all(vec![ScoreCondition::below(Timing, 60.0)]),
                    "Spread intake evenly: one glass every 1-3 hours",
                ),
                recommend(
                    ScorePattern::all(vec![ScoreCondition::below(FluidQuality, 70.0)]),
                    "Favor water: make it at least 70% of your fluids",
                ),
                recommend(
                    ScorePattern::all(vec![
                        ScoreCondition::below(Symptoms, 60.0),
                        ScoreCondition::below(Intake, 70.0),
                    ]),
                    "Your symptoms point to dehydration: increase intake today",
                ),
            ],
            strategies: BTreeMap::from([
                (
                    Intake,
                    strategy([
                        "Set a daily volume goal and track it",
                        "Keep a water bottle within reach all day",
                    ]),
                ),
                (
                    FluidQuality,
                    strategy([
                        "Replace one soda or alcoholic drink per day with water",
                        "Keep coffee under 400ml per day",
                    ]),
                ),
                (
                    Timing,
                    strategy([
                        "Drink 500ml on waking",
                        "Set reminders to drink every 2 hours",
                    ]),
                ),
                (
                    Electrolytes,
                    strategy([
                        "Add a sports drink for sessions over 60min",
                        "Include salty foods after heavy sweating",
                    ]),
                ),
                (
                    Symptoms,
                    strategy([
                        "Check urine color morning and afternoon",
                        "Drink at the first sign of thirst or headache",
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
                    Intake,
                    "deficit_ml",
                    MetricPredicate::above(0.0),
                    "Drink {value} ml more to reach your goal",
                ),
                advice(
                    FluidQuality,
                    "coffee_ml",
                    MetricPredicate::above(400.0),
                    "Reduce caffeine: {value} ml of coffee today is above 400 ml",
                ),
                advice(
                    FluidQuality,
                    "water_ratio",
                    MetricPredicate::below(0.7),
                    "Favor water: aim for at least 70% of your fluids",
                ),
                advice(
                    Electrolytes,
                    "exercise_duration_min",
                    MetricPredicate::above(60.0),
                    "Replace electrolytes after sessions over 60min",
                ),
                advice(
                    Electrolytes,
                    "exercise_intensity",
                    MetricPredicate::not_equals("low"),
                    "Drink 150-250ml every 15-20min during exercise",
                ),
                advice(
                    Electrolytes,
                    "environmental_temp_c",
                    MetricPredicate::above(25.0),
                    "Prefer cool water in hot weather ({value}°C)",
                ),
                advice(
                    Electrolytes,
                    "exercise_duration_min",
                    MetricPredicate::above(90.0),
                    "Use an electrolyte drink for sessions over 90min",
                ),
            ],
        },
        projection: ProjectionRules {
            horizon_days: 7,
            max_weekly_delta: 20.0,
            goal_lift: 10.0,
            burnout_intensity: MetricSource::metric(
                Electrolytes,
                "exercise_intensity_score",
                50.0,
            ),
            burnout_recovery: MetricSource::PillarScore {
                pillar: Symptoms,
                fallback: 70.0,
            },
            burnout_offset: 20.0,
            plateau_offset: 20.0,
            stable_slope: 0.5,
        },
        composites: vec![
            CompositeMetric::weighted(
                "overall_hydration",
                &[(Intake, 0.3), (FluidQuality, 0.25), (Symptoms, 0.45)],
            ),
            CompositeMetric::weighted(
                "hydration_efficiency",
                &[(Timing, 0.34), (FluidQuality, 0.33), (Electrolytes, 0.33)],
            ),
        ],
    }
}
