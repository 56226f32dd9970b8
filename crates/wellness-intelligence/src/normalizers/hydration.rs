// ABOUTME: Hydration log normalizer producing hydration-domain pillar inputs and a dehydration assessment
// ABOUTME: Goal achievement, beverage quality, timing, electrolytes, symptoms, and urine biomarkers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::cast_precision_loss)] // Safe: intake event counts are small

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;
use wellness_core::constants::clamp_score;
use wellness_core::models::{DailySnapshot, Pillar, PillarInput, WellnessDomain};

const CAFFEINE_LIMIT_ML: f64 = 400.0;
const TEA_BONUS_LIMIT_ML: f64 = 500.0;
const MIN_INTERVAL_MINUTES: i64 = 60;
const MAX_INTERVAL_MINUTES: i64 = 180;

/// Self-reported thirst
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirstLevel {
    /// Not thirsty
    #[default]
    None,
    /// Slightly thirsty
    Mild,
    /// Clearly thirsty
    Moderate,
    /// Very thirsty
    Severe,
}

impl ThirstLevel {
    /// Stable wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }

    const fn symptom_penalty(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Mild => 10.0,
            Self::Moderate => 20.0,
            Self::Severe => 40.0,
        }
    }
}

/// Exercise intensity for the day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseIntensity {
    /// Light or no exercise
    #[default]
    Low,
    /// Moderate effort
    Moderate,
    /// Hard effort
    High,
    /// Race-level effort
    Extreme,
}

impl ExerciseIntensity {
    /// Stable wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }

    /// Numeric intensity used for burnout projection
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Low => 25.0,
            Self::Moderate => 50.0,
            Self::High => 75.0,
            Self::Extreme => 95.0,
        }
    }

    const fn is_intense(self) -> bool {
        matches!(self, Self::High | Self::Extreme)
    }
}

/// Fluids consumed, by type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeverageBreakdown {
    /// Plain water
    #[serde(default)]
    pub water_ml: f64,
    /// Coffee
    #[serde(default)]
    pub coffee_ml: f64,
    /// Tea
    #[serde(default)]
    pub tea_ml: f64,
    /// Sports or electrolyte drinks
    #[serde(default)]
    pub sports_drink_ml: f64,
    /// Sodas
    #[serde(default)]
    pub soda_ml: f64,
    /// Alcoholic drinks
    #[serde(default)]
    pub alcohol_ml: f64,
}

impl BeverageBreakdown {
    /// Total fluid volume
    #[must_use]
    pub fn total_ml(&self) -> f64 {
        self.water_ml
            + self.coffee_ml
            + self.tea_ml
            + self.sports_drink_ml
            + self.soda_ml
            + self.alcohol_ml
    }
}

/// Reported symptoms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // Independent symptom flags
pub struct HydrationSymptoms {
    /// Thirst level
    #[serde(default)]
    pub thirst: ThirstLevel,
    /// Headache
    #[serde(default)]
    pub headache: bool,
    /// Fatigue
    #[serde(default)]
    pub fatigue: bool,
    /// Dizziness
    #[serde(default)]
    pub dizziness: bool,
    /// Dry mouth
    #[serde(default)]
    pub dry_mouth: bool,
    /// Dark urine noticed
    #[serde(default)]
    pub dark_urine: bool,
    /// Constipation
    #[serde(default)]
    pub constipation: bool,
}

/// Raw hydration record for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationLog {
    /// Daily goal
    pub goal_ml: f64,
    /// Fluids by type
    pub beverages: BeverageBreakdown,
    /// Time of each drink
    #[serde(default)]
    pub intake_times: Vec<NaiveTime>,
    /// Exercise intensity
    #[serde(default)]
    pub exercise_intensity: ExerciseIntensity,
    /// Exercise duration
    #[serde(default)]
    pub exercise_duration_min: f64,
    /// Ambient temperature
    #[serde(default)]
    pub environmental_temp_c: Option<f64>,
    /// Relative humidity
    #[serde(default)]
    pub humidity_pct: Option<f64>,
    /// Symptoms
    #[serde(default)]
    pub symptoms: HydrationSymptoms,
    /// Urine color on the 1 (clear) to 8 (dark) chart
    #[serde(default)]
    pub urine_color: Option<u8>,
    /// Urinations per day
    #[serde(default)]
    pub urine_frequency: Option<u32>,
}

/// Dehydration band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DehydrationLevel {
    /// Risk score 20 or lower
    Optimal,
    /// 21 to 50
    Mild,
    /// 51 to 80
    Moderate,
    /// Above 80
    Severe,
}

impl DehydrationLevel {
    /// Band for an accumulated risk score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score <= 20.0 {
            Self::Optimal
        } else if score <= 50.0 {
            Self::Mild
        } else if score <= 80.0 {
            Self::Moderate
        } else {
            Self::Severe
        }
    }

    /// Minutes of steady intake needed to get back to optimal
    #[must_use]
    pub const fn time_to_optimal_minutes(self) -> u32 {
        match self {
            Self::Optimal => 0,
            Self::Mild => 30,
            Self::Moderate => 60,
            Self::Severe => 120,
        }
    }

    /// Stable wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl fmt::Display for DehydrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated dehydration risk with contributing factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DehydrationAssessment {
    /// Accumulated points
    pub risk_score: f64,
    /// Band
    pub level: DehydrationLevel,
    /// Factors that added points
    pub factors: Vec<String>,
    /// Minutes to get back to optimal
    pub time_to_optimal_minutes: u32,
}

/// Normalized view of one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationAssessment {
    /// Goal achievement score
    pub goal_achievement: f64,
    /// Beverage quality score
    pub fluid_quality: f64,
    /// Intake spacing score
    pub timing: f64,
    /// Electrolyte balance score
    pub electrolytes: f64,
    /// Symptom score
    pub symptoms: f64,
    /// Urine biomarker score
    pub biomarkers: f64,
    /// `0.3 goal + 0.25 quality + 0.25 symptoms + 0.2 biomarkers`
    pub overall: f64,
    /// Remaining volume to the goal
    pub deficit_ml: f64,
    /// Dehydration risk
    pub dehydration: DehydrationAssessment,
}

impl HydrationLog {
    /// Total intake
    #[must_use]
    pub fn intake_ml(&self) -> f64 {
        self.beverages.total_ml()
    }

    fn achievement_ratio(&self) -> f64 {
        if self.goal_ml > 0.0 {
            self.intake_ml() / self.goal_ml
        } else {
            1.0
        }
    }

    fn water_ratio(&self) -> f64 {
        let total = self.intake_ml();
        if total > 0.0 {
            self.beverages.water_ml / total
        } else {
            0.0
        }
    }

    /// `min(100, intake / goal * 100)`
    #[must_use]
    pub fn goal_score(&self) -> f64 {
        clamp_score(self.achievement_ratio() * 100.0)
    }

    /// Water share with alcohol, soda, and caffeine penalties and a small tea bonus
    #[must_use]
    pub fn quality_score(&self) -> f64 {
        let total = self.intake_ml();
        if total <= 0.0 {
            return 0.0;
        }
        let drinks = &self.beverages;
        let mut score = self.water_ratio() * 100.0;
        score -= drinks.alcohol_ml / total * 30.0;
        score -= drinks.soda_ml / total * 20.0;
        if drinks.coffee_ml > CAFFEINE_LIMIT_ML {
            score -= 15.0;
        }
        if drinks.tea_ml > 0.0 && drinks.tea_ml <= TEA_BONUS_LIMIT_ML {
            score += 5.0;
        }
        clamp_score(score)
    }

    /// Share of gaps between drinks that fall within one to three hours
    #[must_use]
    pub fn timing_score(&self) -> f64 {
        if self.intake_times.len() < 2 {
            return 50.0;
        }
        let mut times = self.intake_times.clone();
        times.sort();
        let gaps: Vec<i64> = times
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_minutes())
            .collect();
        let regular = gaps
            .iter()
            .filter(|gap| (MIN_INTERVAL_MINUTES..=MAX_INTERVAL_MINUTES).contains(*gap))
            .count();
        clamp_score(regular as f64 / gaps.len() as f64 * 100.0)
    }

    /// Electrolyte balance from exercise, sports drinks, and diuretic share
    #[must_use]
    pub fn electrolyte_score(&self) -> f64 {
        let mut score: f64 = 70.0;
        if self.exercise_intensity.is_intense() {
            score += if self.beverages.sports_drink_ml > 0.0 {
                20.0
            } else {
                -15.0
            };
        }
        let total = self.intake_ml();
        if total > 0.0 && (self.beverages.coffee_ml + self.beverages.alcohol_ml) / total > 0.3 {
            score -= 20.0;
        }
        clamp_score(score)
    }

    /// `100` minus symptom penalties
    #[must_use]
    pub fn symptom_score(&self) -> f64 {
        let s = &self.symptoms;
        let penalties = [
            (s.headache, 15.0),
            (s.fatigue, 10.0),
            (s.dizziness, 25.0),
            (s.dry_mouth, 15.0),
            (s.dark_urine, 20.0),
            (s.constipation, 10.0),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, penalty)| penalty)
        .sum::<f64>();
        clamp_score(100.0 - s.thirst.symptom_penalty() - penalties)
    }

    /// Urine color and frequency score; missing readings carry no penalty
    #[must_use]
    pub fn biomarker_score(&self) -> f64 {
        let mut score = 100.0;
        if let Some(color) = self.urine_color {
            score -= (f64::from(color) - 1.0).max(0.0) * 12.5;
        }
        if let Some(frequency) = self.urine_frequency {
            score -= match frequency {
                0..=3 => 30.0,
                4..=5 => 15.0,
                6..=10 => 0.0,
                _ => 10.0,
            };
        }
        clamp_score(score)
    }

    /// Accumulate dehydration risk from symptoms, urine, intake, and environment
    #[must_use]
    pub fn dehydration(&self) -> DehydrationAssessment {
        let mut risk_score = 0.0;
        let mut factors = Vec::new();
        let mut add = |present: bool, points: f64, factor: &str| {
            if present {
                risk_score += points;
                factors.push(factor.to_owned());
            }
        };

        let s = &self.symptoms;
        add(s.thirst != ThirstLevel::None, 20.0, "Thirst");
        add(s.headache, 15.0, "Headache");
        add(s.fatigue, 10.0, "Fatigue");
        add(s.dizziness, 25.0, "Dizziness");
        add(s.dry_mouth, 15.0, "Dry mouth");
        add(s.dark_urine, 20.0, "Dark urine");

        add(
            self.urine_color.is_some_and(|color| color >= 6),
            30.0,
            "Dark urine color",
        );
        add(
            self.urine_frequency.is_some_and(|frequency| frequency < 4),
            20.0,
            "Low urine frequency",
        );

        let ratio = self.achievement_ratio();
        add(ratio < 0.5, 40.0, "Very insufficient intake");
        add((0.5..0.7).contains(&ratio), 25.0, "Insufficient intake");

        add(
            self.environmental_temp_c.is_some_and(|t| t > 28.0),
            15.0,
            "High temperature",
        );
        add(
            self.humidity_pct.is_some_and(|h| h < 30.0),
            10.0,
            "Dry air",
        );
        add(self.exercise_intensity.is_intense(), 20.0, "Intense exercise");

        let level = DehydrationLevel::from_score(risk_score);
        DehydrationAssessment {
            risk_score,
            level,
            factors,
            time_to_optimal_minutes: level.time_to_optimal_minutes(),
        }
    }

    /// Compute every hydration score
    #[must_use]
    pub fn assess(&self) -> HydrationAssessment {
        let goal_achievement = self.goal_score().round();
        let fluid_quality = self.quality_score().round();
        let symptoms = self.symptom_score().round();
        let biomarkers = self.biomarker_score().round();
        let overall = clamp_score(0.2f64.mul_add(
            biomarkers,
            0.25f64.mul_add(
                symptoms,
                0.25f64.mul_add(fluid_quality, 0.3 * goal_achievement),
            ),
        ))
        .round();

        HydrationAssessment {
            goal_achievement,
            fluid_quality,
            timing: self.timing_score().round(),
            electrolytes: self.electrolyte_score().round(),
            symptoms,
            biomarkers,
            overall,
            deficit_ml: (self.goal_ml - self.intake_ml()).max(0.0).round(),
            dehydration: self.dehydration(),
        }
    }

    /// Hydration-domain pillar inputs carrying the raw metrics the rule table reads
    ///
    /// The symptoms pillar blends symptom and biomarker scores in the same
    /// 25:20 proportion they carry in the overall score.
    #[must_use]
    pub fn to_pillars(&self) -> BTreeMap<Pillar, PillarInput> {
        let assessment = self.assess();
        let ratio = (self.achievement_ratio() * 100.0).round() / 100.0;
        let symptoms_pillar =
            (0.25f64.mul_add(assessment.symptoms, 0.2 * assessment.biomarkers) / 0.45).round();

        let mut electrolytes = PillarInput::new(assessment.electrolytes)
            .with_metric("exercise_intensity", self.exercise_intensity.as_str())
            .with_metric("exercise_intensity_score", self.exercise_intensity.score())
            .with_metric("exercise_duration_min", self.exercise_duration_min);
        if let Some(temperature) = self.environmental_temp_c {
            electrolytes = electrolytes.with_metric("environmental_temp_c", temperature);
        }
        if let Some(humidity) = self.humidity_pct {
            electrolytes = electrolytes.with_metric("humidity_pct", humidity);
        }

        let s = &self.symptoms;
        let mut symptoms = PillarInput::new(symptoms_pillar)
            .with_metric("thirst", s.thirst.as_str())
            .with_metric("headache", s.headache)
            .with_metric("fatigue", s.fatigue)
            .with_metric("dizziness", s.dizziness)
            .with_metric("dry_mouth", s.dry_mouth)
            .with_metric("dark_urine", s.dark_urine)
            .with_metric("constipation", s.constipation)
            .with_metric("dehydration_level", assessment.dehydration.level.as_str());
        if let Some(color) = self.urine_color {
            symptoms = symptoms.with_metric("urine_color", color);
        }
        if let Some(frequency) = self.urine_frequency {
            symptoms = symptoms.with_metric("urine_frequency", frequency);
        }

        BTreeMap::from([
            (
                Pillar::Intake,
                PillarInput::new(assessment.goal_achievement)
                    .with_metric("intake_ml", self.intake_ml())
                    .with_metric("goal_ml", self.goal_ml)
                    .with_metric("goal_achievement_ratio", ratio)
                    .with_metric("deficit_ml", assessment.deficit_ml),
            ),
            (
                Pillar::FluidQuality,
                PillarInput::new(assessment.fluid_quality)
                    .with_metric("water_ratio", (self.water_ratio() * 100.0).round() / 100.0)
                    .with_metric("coffee_ml", self.beverages.coffee_ml)
                    .with_metric("alcohol_ml", self.beverages.alcohol_ml),
            ),
            (
                Pillar::Timing,
                PillarInput::new(assessment.timing)
                    .with_metric("intake_events", self.intake_times.len()),
            ),
            (Pillar::Electrolytes, electrolytes),
            (Pillar::Symptoms, symptoms),
        ])
    }

    /// Complete hydration-domain snapshot for one day
    #[must_use]
    pub fn to_snapshot(&self, user_id: Uuid, date: NaiveDate) -> DailySnapshot {
        let mut snapshot = DailySnapshot::new(user_id, WellnessDomain::Hydration, date);
        snapshot.pillars = self.to_pillars();
        snapshot
    }

    /// Health-domain hydration pillar: overall score plus the dehydration band
    #[must_use]
    pub fn to_health_pillar(&self) -> PillarInput {
        let assessment = self.assess();
        PillarInput::new(assessment.overall)
            .with_metric("dehydration_risk", assessment.dehydration.level.as_str())
            .with_metric("intake_ml", self.intake_ml())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> HydrationLog {
        HydrationLog {
            goal_ml: 2500.0,
            beverages: BeverageBreakdown {
                water_ml: 2000.0,
                tea_ml: 250.0,
                ..BeverageBreakdown::default()
            },
            intake_times: Vec::new(),
            exercise_intensity: ExerciseIntensity::Low,
            exercise_duration_min: 0.0,
            environmental_temp_c: None,
            humidity_pct: None,
            symptoms: HydrationSymptoms::default(),
            urine_color: Some(2),
            urine_frequency: Some(7),
        }
    }

    #[test]
    fn test_goal_is_capped() {
        let mut log = log();
        log.beverages.water_ml = 5000.0;
        assert!((log.goal_score() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_timing_without_timestamps_is_neutral() {
        assert!((log().timing_score() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_symptom_penalties() {
        let mut log = log();
        log.symptoms.thirst = ThirstLevel::Moderate;
        log.symptoms.headache = true;
        assert!((log.symptom_score() - 65.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_severe_dehydration() {
        let mut log = log();
        log.beverages = BeverageBreakdown {
            water_ml: 800.0,
            ..BeverageBreakdown::default()
        };
        log.symptoms.dizziness = true;
        log.urine_color = Some(7);
        let dehydration = log.dehydration();
        assert!((dehydration.risk_score - 95.0).abs() < f64::EPSILON);
        assert_eq!(dehydration.level, DehydrationLevel::Severe);
        assert_eq!(dehydration.time_to_optimal_minutes, 120);
        assert_eq!(
            log.to_health_pillar().metric_str("dehydration_risk"),
            Some("severe")
        );
    }
}
