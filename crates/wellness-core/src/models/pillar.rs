// ABOUTME: Wellness domains, their pillars, and the ordered per-pillar score map
// ABOUTME: Pillar order drives deterministic iteration, tie-breaking, and serialization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::str::FromStr;

/// A tracked wellness dimension
///
/// Variants are grouped by the domain that uses them. Declaration order is the
/// iteration order of [`PillarScores`], so ties are always broken the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    // Health domain
    /// Workout volume and quality
    Fitness,
    /// Dietary quality and macro balance
    Nutrition,
    /// Sleep-driven recovery
    Recovery,
    /// Daily fluid status
    Hydration,

    // Hydration domain
    /// Volume against the daily goal
    Intake,
    /// Share of water versus alcohol, soda, and caffeine
    FluidQuality,
    /// Distribution of intake through the day
    Timing,
    /// Electrolyte balance
    Electrolytes,
    /// Dehydration symptoms and urine biomarkers
    Symptoms,

    // Sleep domain
    /// Total sleep time
    Duration,
    /// Time asleep over time in bed
    Efficiency,
    /// Time to fall asleep
    Latency,
    /// Night awakenings
    Continuity,
    /// Deep and REM stage distribution
    Stages,
    /// Bedtime alignment with the circadian window
    Circadian,
}

impl Pillar {
    /// Every pillar in declaration order
    pub const ALL: [Self; 15] = [
        Self::Fitness,
        Self::Nutrition,
        Self::Recovery,
        Self::Hydration,
        Self::Intake,
        Self::FluidQuality,
        Self::Timing,
        Self::Electrolytes,
        Self::Symptoms,
        Self::Duration,
        Self::Efficiency,
        Self::Latency,
        Self::Continuity,
        Self::Stages,
        Self::Circadian,
    ];

    /// Stable wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fitness => "fitness",
            Self::Nutrition => "nutrition",
            Self::Recovery => "recovery",
            Self::Hydration => "hydration",
            Self::Intake => "intake",
            Self::FluidQuality => "fluid_quality",
            Self::Timing => "timing",
            Self::Electrolytes => "electrolytes",
            Self::Symptoms => "symptoms",
            Self::Duration => "duration",
            Self::Efficiency => "efficiency",
            Self::Latency => "latency",
            Self::Continuity => "continuity",
            Self::Stages => "stages",
            Self::Circadian => "circadian",
        }
    }

    /// Human-readable label used in insight text
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fitness => "Fitness",
            Self::Nutrition => "Nutrition",
            Self::Recovery => "Recovery",
            Self::Hydration => "Hydration",
            Self::Intake => "Fluid intake",
            Self::FluidQuality => "Fluid quality",
            Self::Timing => "Intake timing",
            Self::Electrolytes => "Electrolyte balance",
            Self::Symptoms => "Hydration symptoms",
            Self::Duration => "Sleep duration",
            Self::Efficiency => "Sleep efficiency",
            Self::Latency => "Sleep latency",
            Self::Continuity => "Sleep continuity",
            Self::Stages => "Sleep stages",
            Self::Circadian => "Circadian alignment",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pillar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pillar| pillar.as_str() == s)
            .ok_or_else(|| format!("unknown pillar '{s}'"))
    }
}

/// Feature area whose pillars are scored together
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellnessDomain {
    /// Cross-pillar global health
    Health,
    /// Fluid intake and dehydration
    Hydration,
    /// Sleep quality and restoration
    Sleep,
}

impl WellnessDomain {
    /// Every domain
    pub const ALL: [Self; 3] = [Self::Health, Self::Hydration, Self::Sleep];

    /// Pillars scored in this domain, in scoring order
    #[must_use]
    pub const fn pillars(self) -> &'static [Pillar] {
        match self {
            Self::Health => &[
                Pillar::Fitness,
                Pillar::Nutrition,
                Pillar::Recovery,
                Pillar::Hydration,
            ],
            Self::Hydration => &[
                Pillar::Intake,
                Pillar::FluidQuality,
                Pillar::Timing,
                Pillar::Electrolytes,
                Pillar::Symptoms,
            ],
            Self::Sleep => &[
                Pillar::Duration,
                Pillar::Efficiency,
                Pillar::Latency,
                Pillar::Continuity,
                Pillar::Stages,
                Pillar::Circadian,
            ],
        }
    }

    /// Whether a pillar belongs to this domain
    #[must_use]
    pub fn contains(self, pillar: Pillar) -> bool {
        self.pillars().contains(&pillar)
    }

    /// Stable wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Hydration => "hydration",
            Self::Sleep => "sleep",
        }
    }
}

impl fmt::Display for WellnessDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WellnessDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "health" => Ok(Self::Health),
            "hydration" => Ok(Self::Hydration),
            "sleep" => Ok(Self::Sleep),
            other => Err(format!("unknown wellness domain '{other}'")),
        }
    }
}

/// Ordered map of pillar to score in `[0, 100]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PillarScores(BTreeMap<Pillar, f64>);

impl PillarScores {
    /// Create an empty score map
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert or replace a pillar score
    pub fn insert(&mut self, pillar: Pillar, score: f64) {
        self.0.insert(pillar, score);
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, pillar: Pillar, score: f64) -> Self {
        self.insert(pillar, score);
        self
    }

    /// Score for a pillar, if present
    #[must_use]
    pub fn get(&self, pillar: Pillar) -> Option<f64> {
        self.0.get(&pillar).copied()
    }

    /// Whether a pillar has a score
    #[must_use]
    pub fn contains(&self, pillar: Pillar) -> bool {
        self.0.contains_key(&pillar)
    }

    /// Number of scored pillars
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no pillar is scored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(pillar, score)` pairs in pillar order
    pub fn iter(&self) -> impl Iterator<Item = (Pillar, f64)> + '_ {
        self.0.iter().map(|(pillar, score)| (*pillar, *score))
    }

    /// Scored pillars in order
    pub fn pillars(&self) -> impl Iterator<Item = Pillar> + '_ {
        self.0.keys().copied()
    }

    /// Arithmetic mean, `0.0` when empty
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.values().sum::<f64>() / self.0.len() as f64
    }

    /// Population standard deviation, `0.0` when empty
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .0
            .values()
            .map(|score| (score - mean).powi(2))
            .sum::<f64>()
            / self.0.len() as f64;
        variance.sqrt()
    }

    /// `max - min` across scores, `0.0` when empty
    #[must_use]
    pub fn spread(&self) -> f64 {
        let (min, max) = self
            .0
            .values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), score| {
                (lo.min(*score), hi.max(*score))
            });
        if min.is_finite() && max.is_finite() {
            max - min
        } else {
            0.0
        }
    }

    /// Lowest-scoring pillar; the first in pillar order wins ties
    #[must_use]
    pub fn weakest(&self) -> Option<(Pillar, f64)> {
        self.iter().fold(None, |best, (pillar, score)| match best {
            Some((_, lowest)) if score >= lowest => best,
            _ => Some((pillar, score)),
        })
    }

    /// Highest-scoring pillar; the first in pillar order wins ties
    #[must_use]
    pub fn strongest(&self) -> Option<(Pillar, f64)> {
        self.iter().fold(None, |best, (pillar, score)| match best {
            Some((_, highest)) if score <= highest => best,
            _ => Some((pillar, score)),
        })
    }

    /// Apply `f` to every score, keeping pillar order
    #[must_use]
    pub fn map_scores(&self, mut f: impl FnMut(Pillar, f64) -> f64) -> Self {
        Self(
            self.0
                .iter()
                .map(|(pillar, score)| (*pillar, f(*pillar, *score)))
                .collect(),
        )
    }
}

impl FromIterator<(Pillar, f64)> for PillarScores {
    fn from_iter<I: IntoIterator<Item = (Pillar, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for PillarScores {
    type Item = (Pillar, f64);
    type IntoIter = btree_map::IntoIter<Pillar, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
