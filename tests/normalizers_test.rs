// ABOUTME: Integration tests for the sleep and hydration log normalizers
// ABOUTME: Score bounds over input grids, good versus poor days, and snapshot shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::NaiveTime;
use common::{day, fixed_now, health_snapshot};
use uuid::Uuid;
use wellness_engine::wellness_core::models::{Pillar, WellnessDomain};
use wellness_engine::wellness_intelligence::normalizers::{
    BeverageBreakdown, DehydrationLevel, ExerciseIntensity, HydrationLog, HydrationSymptoms,
    PerformanceImpact, SleepLog, ThirstLevel,
};
use wellness_engine::wellness_intelligence::WellnessEngine;

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn good_night() -> SleepLog {
    SleepLog {
        duration_minutes: 480.0,
        efficiency_pct: 92.0,
        latency_minutes: 10.0,
        awakenings: 1,
        light_minutes: 250.0,
        deep_minutes: 90.0,
        rem_minutes: 110.0,
        bedtime: time(22, 30),
        caffeine: false,
        screen_time_minutes: 0.0,
        room_temperature_c: Some(18.5),
        meditation: true,
        reading: true,
        hrv_ms: Some(60.0),
        training_load: None,
    }
}

fn poor_night() -> SleepLog {
    SleepLog {
        duration_minutes: 300.0,
        efficiency_pct: 65.0,
        latency_minutes: 60.0,
        awakenings: 5,
        light_minutes: 250.0,
        deep_minutes: 20.0,
        rem_minutes: 30.0,
        bedtime: time(1, 30),
        caffeine: true,
        screen_time_minutes: 90.0,
        room_temperature_c: None,
        meditation: false,
        reading: false,
        hrv_ms: None,
        training_load: Some(85.0),
    }
}

fn hydrated_day() -> HydrationLog {
    HydrationLog {
        goal_ml: 2500.0,
        beverages: BeverageBreakdown {
            water_ml: 2200.0,
            tea_ml: 200.0,
            ..BeverageBreakdown::default()
        },
        intake_times: vec![time(8, 0), time(10, 0), time(12, 30), time(15, 0), time(17, 30)],
        exercise_intensity: ExerciseIntensity::Low,
        exercise_duration_min: 0.0,
        environmental_temp_c: Some(21.0),
        humidity_pct: Some(45.0),
        symptoms: HydrationSymptoms::default(),
        urine_color: Some(2),
        urine_frequency: Some(7),
    }
}

fn parched_day() -> HydrationLog {
    HydrationLog {
        goal_ml: 3000.0,
        beverages: BeverageBreakdown {
            water_ml: 500.0,
            coffee_ml: 400.0,
            ..BeverageBreakdown::default()
        },
        intake_times: vec![time(9, 0)],
        exercise_intensity: ExerciseIntensity::High,
        exercise_duration_min: 75.0,
        environmental_temp_c: Some(31.0),
        humidity_pct: None,
        symptoms: HydrationSymptoms {
            thirst: ThirstLevel::Moderate,
            headache: true,
            dizziness: true,
            ..HydrationSymptoms::default()
        },
        urine_color: Some(7),
        urine_frequency: Some(3),
    }
}

#[test]
fn test_good_night_outscores_poor_night() {
    let good = good_night().assess();
    let poor = poor_night().assess();

    assert!(good.overall_quality > poor.overall_quality);
    assert_eq!(good.performance_impact, PerformanceImpact::Minimal);
    assert_eq!(poor.performance_impact, PerformanceImpact::Significant);
    assert!(good.sleep_debt_minutes.abs() < f64::EPSILON);
    assert!((poor.sleep_debt_minutes - 180.0).abs() < f64::EPSILON);
    assert!(poor.fragmented);
    assert!(!good.fragmented);
    assert!(good.recovery_hours < poor.recovery_hours);
}

#[test]
fn test_sleep_snapshot_covers_every_sleep_pillar() {
    let user = Uuid::new_v4();
    let snapshot = poor_night().to_snapshot(user, day(2025, 3, 14));

    assert_eq!(snapshot.domain, WellnessDomain::Sleep);
    assert_eq!(snapshot.user_id, user);
    assert!(snapshot.absent_pillars().is_empty());
    assert_eq!(snapshot.pillars.len(), WellnessDomain::Sleep.pillars().len());

    let duration = snapshot.pillar(Pillar::Duration).unwrap();
    assert_eq!(duration.metric_f64("training_load"), Some(85.0));
    assert_eq!(duration.metric_f64("sleep_debt_minutes"), Some(180.0));
    let latency = snapshot.pillar(Pillar::Latency).unwrap();
    assert_eq!(latency.metric_bool("caffeine"), Some(true));
}

#[test]
fn test_sleep_scores_stay_in_range() {
    for duration in [0.0, 200.0, 390.0, 480.0, 570.0, 720.0, 900.0] {
        for latency in [0.0, 20.0, 40.0, 90.0, 300.0] {
            for awakenings in [0, 2, 6, 20] {
                for bedtime in [time(19, 0), time(22, 45), time(0, 15), time(4, 0)] {
                    let log = SleepLog {
                        duration_minutes: duration,
                        latency_minutes: latency,
                        awakenings,
                        bedtime,
                        ..good_night()
                    };
                    for (pillar, input) in log.to_pillars() {
                        assert!(
                            (0.0..=100.0).contains(&input.score),
                            "{pillar} = {} for {duration}/{latency}/{awakenings}",
                            input.score
                        );
                    }
                    assert!((0.0..=100.0).contains(&log.assess().overall_quality));
                }
            }
        }
    }
}

#[test]
fn test_hydrated_day_is_optimal() {
    let log = hydrated_day();
    let assessment = log.assess();

    assert!((assessment.goal_achievement - 96.0).abs() < f64::EPSILON);
    assert!((assessment.deficit_ml - 100.0).abs() < f64::EPSILON);
    assert!((assessment.timing - 100.0).abs() < f64::EPSILON);
    assert_eq!(assessment.dehydration.level, DehydrationLevel::Optimal);
    assert_eq!(assessment.dehydration.time_to_optimal_minutes, 0);
    assert!(assessment.dehydration.factors.is_empty());
}

#[test]
fn test_parched_day_is_severe() {
    let dehydration = parched_day().dehydration();

    assert_eq!(dehydration.level, DehydrationLevel::Severe);
    assert_eq!(dehydration.time_to_optimal_minutes, 120);
    assert!(dehydration
        .factors
        .contains(&"Very insufficient intake".to_owned()));
    assert!(dehydration.factors.contains(&"High temperature".to_owned()));
}

#[test]
fn test_hydration_snapshot_shape() {
    let snapshot = parched_day().to_snapshot(Uuid::nil(), day(2025, 3, 14));

    assert_eq!(snapshot.domain, WellnessDomain::Hydration);
    assert!(snapshot.absent_pillars().is_empty());
    for (_, input) in &snapshot.pillars {
        assert!((0.0..=100.0).contains(&input.score));
    }
    let intake = snapshot.pillar(Pillar::Intake).unwrap();
    assert_eq!(intake.metric_f64("intake_ml"), Some(900.0));
    let symptoms = snapshot.pillar(Pillar::Symptoms).unwrap();
    assert_eq!(symptoms.metric_str("dehydration_level"), Some("severe"));
}

#[test]
fn test_severe_dehydration_flows_into_health_risk() {
    let engine = WellnessEngine::default();
    let date = day(2025, 3, 14);
    let baseline = health_snapshot(date, [80.0; 4]);
    let mut alarmed = baseline.clone();
    alarmed
        .pillars
        .insert(Pillar::Hydration, parched_day().to_health_pillar());

    let calm = engine.analyze(&baseline, &[], fixed_now());
    let result = engine.analyze(&alarmed, &[], fixed_now());

    assert!(result.risk_profile.risk_score > calm.risk_profile.risk_score);
    assert!(result
        .risk_profile
        .urgent_concerns
        .contains(&"Severe dehydration detected".to_owned()));
}
