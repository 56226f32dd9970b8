// ABOUTME: Per-domain rule tables driving the generic scoring pipeline
// ABOUTME: Weights, balance and synergy bonuses, risk rules, insight text, projections, env overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Rule Table Configuration
//!
//! One [`DomainRules`] value parameterizes every pipeline stage for a domain.
//! The health, hydration and sleep tables live in their own modules; this
//! module holds the table types, validation, and environment overrides.

/// Score and metric condition primitives
pub mod conditions;
/// Configuration error types
pub mod error;
/// Global health table (fitness, nutrition, recovery, hydration)
pub mod health;
/// Hydration domain table
pub mod hydration;
/// Sleep domain table
pub mod sleep;

pub use conditions::{
    Comparison, MetricCondition, MetricPredicate, MetricSource, ScoreCondition, ScorePattern,
};
pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use wellness_core::models::{Pillar, RiskLevel, WellnessDomain};

/// Largest total upward weight nudge that keeps the weight sum within 1.02
pub const MAX_REBALANCE_BUDGET: f64 = 0.02;

/// Tolerance for composite weight sums
const COMPOSITE_WEIGHT_TOLERANCE: f64 = 0.01;

/// How absent pillars enter the weighted sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AbsentPillarPolicy {
    /// Absent pillars keep their weight and contribute `0`
    #[default]
    ScoreAsZero,
    /// Absent pillars are dropped and the base weight is `1/present`
    Renormalize,
}

impl FromStr for AbsentPillarPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "score_as_zero" | "zero" => Ok(Self::ScoreAsZero),
            "renormalize" => Ok(Self::Renormalize),
            other => Err(ConfigError::Parse(format!("unknown absent pillar policy '{other}'"))),
        }
    }
}

/// Weight assignment for the weighted sum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightingRules {
    /// Total upward nudge shared by below-mean pillars (`budget / N` each)
    pub rebalance_budget: f64,
    /// Treatment of absent pillars
    pub absent_policy: AbsentPillarPolicy,
}

impl Default for WeightingRules {
    fn default() -> Self {
        Self {
            rebalance_budget: MAX_REBALANCE_BUDGET,
            absent_policy: AbsentPillarPolicy::ScoreAsZero,
        }
    }
}

/// Spread ceiling and the bonus awarded at or under it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceBand {
    /// Inclusive upper bound on `max - min`
    pub max_spread: f64,
    /// Bonus points
    pub bonus: f64,
}

/// Balance bonus bands, checked in ascending spread order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRules {
    /// Ascending bands
    pub bands: Vec<BalanceBand>,
    /// Bonus when the spread exceeds every band
    pub fallback_bonus: f64,
}

impl BalanceRules {
    /// Bonus for a given spread
    #[must_use]
    pub fn bonus(&self, spread: f64) -> f64 {
        self.bands
            .iter()
            .find(|band| spread <= band.max_spread)
            .map_or(self.fallback_bonus, |band| band.bonus)
    }
}

impl Default for BalanceRules {
    fn default() -> Self {
        Self {
            bands: vec![
                BalanceBand {
                    max_spread: 10.0,
                    bonus: 10.0,
                },
                BalanceBand {
                    max_spread: 20.0,
                    bonus: 5.0,
                },
                BalanceBand {
                    max_spread: 30.0,
                    bonus: 0.0,
                },
            ],
            fallback_bonus: -5.0,
        }
    }
}

/// A pair (or group) of pillars that reward joint excellence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyRule {
    /// Short identifier
    pub name: String,
    /// Scores that must hold together
    pub pattern: ScorePattern,
    /// Points added to the global score
    pub score_bonus: f64,
    /// Points added to the synergy balance metric
    pub effect_bonus: f64,
}

/// Synergy table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyRules {
    /// Rules, each evaluated independently
    pub rules: Vec<SynergyRule>,
    /// Cap on the summed global bonus
    pub bonus_cap: f64,
    /// Synergy metric before rule effects
    pub effect_baseline: f64,
}

/// What a fired risk rule contributes
///
/// Text may contain `{pillar}` and `{score}` placeholders for per-pillar tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskEffect {
    /// Points added to the risk accumulator
    pub penalty: f64,
    /// Entry for `specificRisks`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_risk: Option<String>,
    /// Entry for `preventiveActions`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preventive_action: Option<String>,
    /// Entry for `urgentConcerns`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgent_concern: Option<String>,
}

impl RiskEffect {
    /// Effect with a penalty and no text
    #[must_use]
    pub const fn new(penalty: f64) -> Self {
        Self {
            penalty,
            specific_risk: None,
            preventive_action: None,
            urgent_concern: None,
        }
    }

    /// Attach a specific-risk entry
    #[must_use]
    pub fn risk(mut self, text: impl Into<String>) -> Self {
        self.specific_risk = Some(text.into());
        self
    }

    /// Attach a preventive action
    #[must_use]
    pub fn preventive(mut self, text: impl Into<String>) -> Self {
        self.preventive_action = Some(text.into());
        self
    }

    /// Attach an urgent concern
    #[must_use]
    pub fn urgent(mut self, text: impl Into<String>) -> Self {
        self.urgent_concern = Some(text.into());
        self
    }
}

/// Per-pillar threshold; the first tier whose `below` exceeds the score applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTier {
    /// Exclusive upper score bound
    pub below: f64,
    /// Contribution when the tier applies
    pub effect: RiskEffect,
}

/// Pattern over several pillars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossPillarRisk {
    /// Scores that must hold together
    pub pattern: ScorePattern,
    /// Contribution when the pattern matches
    pub effect: RiskEffect,
}

/// Risk driven by a raw metric (symptom flags, dehydration level)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRule {
    /// Metric predicate
    pub condition: MetricCondition,
    /// Contribution when the predicate holds
    pub effect: RiskEffect,
}

/// Lower bounds of each band above `low`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBands {
    /// `medium` at or above
    pub medium: f64,
    /// `high` at or above
    pub high: f64,
    /// `critical` at or above
    pub critical: f64,
}

impl RiskBands {
    /// Band for an accumulated risk score; monotone non-decreasing
    #[must_use]
    pub fn level(&self, risk_score: f64) -> RiskLevel {
        if risk_score >= self.critical {
            RiskLevel::Critical
        } else if risk_score >= self.high {
            RiskLevel::High
        } else if risk_score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            medium: 20.0,
            high: 40.0,
            critical: 60.0,
        }
    }
}

/// Risk table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRules {
    /// Ascending per-pillar tiers
    pub tiers: Vec<RiskTier>,
    /// Cross-pillar patterns
    pub cross_pillar: Vec<CrossPillarRisk>,
    /// Raw metric signals
    pub signals: Vec<SignalRule>,
    /// Level bands
    pub bands: RiskBands,
}

impl RiskRules {
    /// Standard tiers: `<30` urgent, `<50` preventive, `<70` maintenance
    #[must_use]
    pub fn standard_tiers() -> Vec<RiskTier> {
        vec![
            RiskTier {
                below: 30.0,
                effect: RiskEffect::new(30.0)
                    .risk("{pillar}: high risk (score {score}/100)")
                    .urgent("Urgent improvement required for {pillar}"),
            },
            RiskTier {
                below: 50.0,
                effect: RiskEffect::new(15.0)
                    .risk("{pillar}: moderate risk (score {score}/100)")
                    .preventive("Strengthen {pillar} habits"),
            },
            RiskTier {
                below: 70.0,
                effect: RiskEffect::new(5.0).preventive("Maintain and optimize {pillar}"),
            },
        ]
    }
}

/// Recommendation selected when a score pattern matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRule {
    /// Scores that must hold together
    pub pattern: ScorePattern,
    /// Recommendation text
    pub text: String,
}

/// Advice selected when a raw metric predicate holds; `{value}` renders the metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAdvice {
    /// Metric predicate
    pub condition: MetricCondition,
    /// Advice text
    pub text: String,
}

/// Insight text table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRules {
    /// Scores at or above this are strengths
    pub strength_threshold: f64,
    /// Strength text with `{pillar}` and `{score}`
    pub strength_template: String,
    /// Weakest pillar below this becomes a priority
    pub priority_threshold: f64,
    /// Priority text with `{pillar}` and `{score}`
    pub priority_template: String,
    /// Cross-pillar decision table
    pub recommendations: Vec<RecommendationRule>,
    /// Canned strategy per weakest pillar
    pub strategies: BTreeMap<Pillar, Vec<String>>,
    /// Tips always included
    pub base_tips: Vec<String>,
    /// Average below which `low_average_tip` is added
    pub low_average: f64,
    /// Tip for a low overall average
    pub low_average_tip: String,
    /// Average above which `high_average_tip` is added
    pub high_average: f64,
    /// Tip for a high overall average
    pub high_average_tip: String,
    /// Raw metric advice
    pub metric_advice: Vec<MetricAdvice>,
}

/// Projection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRules {
    /// Days ahead for the weekly projection
    pub horizon_days: u32,
    /// Bound on the absolute trend delta over the horizon
    pub max_weekly_delta: f64,
    /// Points added to the average for goal probability
    pub goal_lift: f64,
    /// Training intensity input to burnout
    pub burnout_intensity: MetricSource,
    /// Recovery input to burnout
    pub burnout_recovery: MetricSource,
    /// Constant added to `intensity - recovery`
    pub burnout_offset: f64,
    /// Constant subtracted from `100 - harmony`
    pub plateau_offset: f64,
    /// Slope magnitude (points per day) treated as flat
    pub stable_slope: f64,
}

/// How a composite metric is derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    /// Weighted blend of pillar scores (weights sum to 1)
    Weighted(Vec<(Pillar, f64)>),
    /// Harmony plus a fixed offset
    HarmonyOffset(f64),
}

/// Named domain composite (physical performance, restoration index)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeMetric {
    /// Output key
    pub name: String,
    /// Derivation
    pub kind: CompositeKind,
}

impl CompositeMetric {
    /// Weighted composite
    #[must_use]
    pub fn weighted(name: &str, weights: &[(Pillar, f64)]) -> Self {
        Self {
            name: name.to_owned(),
            kind: CompositeKind::Weighted(weights.to_vec()),
        }
    }
}

/// Complete rule table for one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRules {
    /// Domain these rules score
    pub domain: WellnessDomain,
    /// Weighted-sum configuration
    pub weighting: WeightingRules,
    /// Balance bonus bands
    pub balance: BalanceRules,
    /// Synergy table
    pub synergy: SynergyRules,
    /// Risk table
    pub risk: RiskRules,
    /// Insight text table
    pub insights: InsightRules,
    /// Projection parameters
    pub projection: ProjectionRules,
    /// Domain composites
    pub composites: Vec<CompositeMetric>,
}

impl DomainRules {
    /// Built-in table for a domain
    #[must_use]
    pub fn for_domain(domain: WellnessDomain) -> Self {
        match domain {
            WellnessDomain::Health => health::rules(),
            WellnessDomain::Hydration => hydration::rules(),
            WellnessDomain::Sleep => sleep::rules(),
        }
    }

    /// Built-in table with environment overrides applied, then validated
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed or the result is invalid
    pub fn load(domain: WellnessDomain) -> Result<Self, ConfigError> {
        let rules = Self::for_domain(domain).apply_env_overrides()?;
        rules.validate()?;
        Ok(rules)
    }

    /// Pillars scored by this table
    #[must_use]
    pub const fn pillars(&self) -> &'static [Pillar] {
        self.domain.pillars()
    }

    /// Validate the table
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range parameters, negative risk penalties,
    /// non-monotone bands, bad composite weights, or foreign pillars
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pillars().is_empty() {
            return Err(ConfigError::MissingField("pillars"));
        }
        if !(0.0..=MAX_REBALANCE_BUDGET).contains(&self.weighting.rebalance_budget) {
            return Err(ConfigError::ValueOutOfRange(
                "rebalance_budget must be within [0, 0.02]",
            ));
        }
        self.validate_balance()?;
        self.validate_synergy()?;
        self.validate_risk()?;
        self.validate_insights()?;
        self.validate_projection()?;
        self.validate_composites()
    }

    fn ensure_member(&self, pillar: Pillar) -> Result<(), ConfigError> {
        if self.domain.contains(pillar) {
            Ok(())
        } else {
            Err(ConfigError::ForeignPillar {
                pillar,
                domain: self.domain,
            })
        }
    }

    fn ensure_pattern(&self, pattern: &ScorePattern) -> Result<(), ConfigError> {
        if pattern.all.is_empty() && pattern.any.is_empty() {
            return Err(ConfigError::MissingField("pattern conditions"));
        }
        for condition in pattern.all.iter().chain(pattern.any.iter()) {
            self.ensure_member(condition.pillar)?;
            if !condition.comparison.is_finite() {
                return Err(ConfigError::InvalidRange("pattern thresholds must be finite"));
            }
        }
        Ok(())
    }

    fn ensure_finite(values: &[f64], what: &'static str) -> Result<(), ConfigError> {
        if values.iter().all(|value| value.is_finite()) {
            Ok(())
        } else {
            Err(ConfigError::ValueOutOfRange(what))
        }
    }

    fn validate_balance(&self) -> Result<(), ConfigError> {
        for band in &self.balance.bands {
            Self::ensure_finite(&[band.max_spread, band.bonus], "balance bands must be finite")?;
        }
        Self::ensure_finite(
            &[self.balance.fallback_bonus],
            "balance fallback_bonus must be finite",
        )?;
        let ascending = self
            .balance
            .bands
            .windows(2)
            .all(|pair| pair[0].max_spread < pair[1].max_spread);
        if !ascending {
            return Err(ConfigError::InvalidRange(
                "balance bands must have ascending max_spread",
            ));
        }
        Ok(())
    }

    fn validate_synergy(&self) -> Result<(), ConfigError> {
        Self::ensure_finite(
            &[self.synergy.bonus_cap, self.synergy.effect_baseline],
            "synergy bonus_cap and effect_baseline must be finite",
        )?;
        if self.synergy.bonus_cap < 0.0 {
            return Err(ConfigError::ValueOutOfRange("synergy bonus_cap must be >= 0"));
        }
        for rule in &self.synergy.rules {
            self.ensure_pattern(&rule.pattern)?;
            Self::ensure_finite(
                &[rule.score_bonus, rule.effect_bonus],
                "synergy bonuses must be finite",
            )?;
            if rule.score_bonus < 0.0 || rule.effect_bonus < 0.0 {
                return Err(ConfigError::ValueOutOfRange("synergy bonuses must be >= 0"));
            }
        }
        Ok(())
    }

    fn validate_risk(&self) -> Result<(), ConfigError> {
        let risk = &self.risk;
        for tier in &risk.tiers {
            Self::ensure_finite(&[tier.below], "risk tier bounds must be finite")?;
        }
        let tiers_ascending = risk.tiers.windows(2).all(|pair| pair[0].below < pair[1].below);
        if !tiers_ascending {
            return Err(ConfigError::InvalidRange("risk tiers must be ascending"));
        }
        let penalties = risk
            .tiers
            .iter()
            .map(|tier| tier.effect.penalty)
            .chain(risk.cross_pillar.iter().map(|rule| rule.effect.penalty))
            .chain(risk.signals.iter().map(|rule| rule.effect.penalty));
        for penalty in penalties {
            if !penalty.is_finite() || penalty < 0.0 {
                return Err(ConfigError::ValueOutOfRange(
                    "risk penalties must be finite and >= 0",
                ));
            }
        }
        for rule in &risk.cross_pillar {
            self.ensure_pattern(&rule.pattern)?;
        }
        for rule in &risk.signals {
            self.ensure_member(rule.condition.pillar)?;
        }
        let bands = risk.bands;
        if !(0.0 < bands.medium && bands.medium < bands.high && bands.high < bands.critical) {
            return Err(ConfigError::InvalidRange(
                "risk bands must satisfy 0 < medium < high < critical",
            ));
        }
        Ok(())
    }

    fn validate_insights(&self) -> Result<(), ConfigError> {
        let insights = &self.insights;
        let thresholds = [
            insights.strength_threshold,
            insights.priority_threshold,
            insights.low_average,
            insights.high_average,
        ];
        if thresholds.iter().any(|t| !(0.0..=100.0).contains(t)) {
            return Err(ConfigError::ValueOutOfRange(
                "insight thresholds must be within [0, 100]",
            ));
        }
        if insights.low_average >= insights.high_average {
            return Err(ConfigError::InvalidRange("low_average must be < high_average"));
        }
        for rule in &insights.recommendations {
            self.ensure_pattern(&rule.pattern)?;
        }
        for pillar in insights.strategies.keys() {
            self.ensure_member(*pillar)?;
        }
        for advice in &insights.metric_advice {
            self.ensure_member(advice.condition.pillar)?;
        }
        Ok(())
    }

    fn validate_projection(&self) -> Result<(), ConfigError> {
        let projection = &self.projection;
        if projection.horizon_days == 0 {
            return Err(ConfigError::ValueOutOfRange("horizon_days must be >= 1"));
        }
        Self::ensure_finite(
            &[
                projection.max_weekly_delta,
                projection.stable_slope,
                projection.goal_lift,
                projection.burnout_offset,
                projection.plateau_offset,
            ],
            "projection parameters must be finite",
        )?;
        if projection.max_weekly_delta < 0.0 || projection.stable_slope < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "max_weekly_delta and stable_slope must be >= 0",
            ));
        }
        self.ensure_member(projection.burnout_intensity.pillar())?;
        self.ensure_member(projection.burnout_recovery.pillar())
    }

    fn validate_composites(&self) -> Result<(), ConfigError> {
        for composite in &self.composites {
            if let CompositeKind::Weighted(weights) = &composite.kind {
                for (pillar, _) in weights {
                    self.ensure_member(*pillar)?;
                }
                let sum: f64 = weights.iter().map(|(_, weight)| weight).sum();
                if (sum - 1.0).abs() > COMPOSITE_WEIGHT_TOLERANCE {
                    return Err(ConfigError::InvalidWeights(format!(
                        "composite '{}' weights sum to {sum:.3}, expected 1.0",
                        composite.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Apply a single environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply `WELLNESS_RULES_<DOMAIN>_*` environment overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        let prefix = format!("WELLNESS_RULES_{}", self.domain.as_str().to_ascii_uppercase());
        let var = |suffix: &str| format!("{prefix}_{suffix}");

        Self::apply_env_var(
            &var("REBALANCE_BUDGET"),
            &mut self.weighting.rebalance_budget,
        )?;
        Self::apply_env_var(&var("ABSENT_POLICY"), &mut self.weighting.absent_policy)?;
        Self::apply_env_var(&var("SYNERGY_CAP"), &mut self.synergy.bonus_cap)?;
        Self::apply_env_var(&var("RISK_MEDIUM"), &mut self.risk.bands.medium)?;
        Self::apply_env_var(&var("RISK_HIGH"), &mut self.risk.bands.high)?;
        Self::apply_env_var(&var("RISK_CRITICAL"), &mut self.risk.bands.critical)?;
        Self::apply_env_var(
            &var("STRENGTH_THRESHOLD"),
            &mut self.insights.strength_threshold,
        )?;
        Self::apply_env_var(
            &var("PRIORITY_THRESHOLD"),
            &mut self.insights.priority_threshold,
        )?;
        Self::apply_env_var(&var("HORIZON_DAYS"), &mut self.projection.horizon_days)?;
        Self::apply_env_var(
            &var("MAX_WEEKLY_DELTA"),
            &mut self.projection.max_weekly_delta,
        )?;

        Ok(self)
    }
}

/// Rule tables for every domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBook {
    health: DomainRules,
    hydration: DomainRules,
    sleep: DomainRules,
}

impl RuleBook {
    /// Built-in tables without overrides
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            health: health::rules(),
            hydration: hydration::rules(),
            sleep: sleep::rules(),
        }
    }

    /// Built-in tables with environment overrides, validated
    ///
    /// # Errors
    ///
    /// Returns the first override or validation failure
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            health: DomainRules::load(WellnessDomain::Health)?,
            hydration: DomainRules::load(WellnessDomain::Hydration)?,
            sleep: DomainRules::load(WellnessDomain::Sleep)?,
        })
    }

    /// Replace one domain's table after validating it
    ///
    /// # Errors
    ///
    /// Returns an error if the table is invalid
    pub fn with_rules(mut self, rules: DomainRules) -> Result<Self, ConfigError> {
        rules.validate()?;
        match rules.domain {
            WellnessDomain::Health => self.health = rules,
            WellnessDomain::Hydration => self.hydration = rules,
            WellnessDomain::Sleep => self.sleep = rules,
        }
        Ok(self)
    }

    /// Table for a domain
    #[must_use]
    pub const fn get(&self, domain: WellnessDomain) -> &DomainRules {
        match domain {
            WellnessDomain::Health => &self.health,
            WellnessDomain::Hydration => &self.hydration,
            WellnessDomain::Sleep => &self.sleep,
        }
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Habit tips shared by every domain
fn base_habit_tips() -> Vec<String> {
    vec![
        "Use visual triggers to remember your new habits".to_owned(),
        "Start small: improve by 1% each day".to_owned(),
        "Link new habits to existing ones".to_owned(),
        "Track your progress daily".to_owned(),
    ]
}

fn synergy(
    name: &str,
    first: ScoreCondition,
    second: ScoreCondition,
    score_bonus: f64,
    effect_bonus: f64,
) -> SynergyRule {
    SynergyRule {
        name: name.to_owned(),
        pattern: ScorePattern::all(vec![first, second]),
        score_bonus,
        effect_bonus,
    }
}

fn recommend(pattern: ScorePattern, text: &str) -> RecommendationRule {
    RecommendationRule {
        pattern,
        text: text.to_owned(),
    }
}

fn strategy(lines: [&str; 2]) -> Vec<String> {
    lines.iter().map(|line| (*line).to_owned()).collect()
}

fn advice(pillar: Pillar, metric: &str, predicate: MetricPredicate, text: &str) -> MetricAdvice {
    MetricAdvice {
        condition: MetricCondition::new(pillar, metric, predicate),
        text: text.to_owned(),
    }
}

fn signal(
    pillar: Pillar,
    metric: &str,
    predicate: MetricPredicate,
    effect: RiskEffect,
) -> SignalRule {
    SignalRule {
        condition: MetricCondition::new(pillar, metric, predicate),
        effect,
    }
}

/// Render `{pillar}` and `{score}` placeholders
#[must_use]
pub fn render(template: &str, pillar: Pillar, score: f64) -> String {
    template
        .replace("{pillar}", pillar.label())
        .replace("{score}", &format!("{score:.0}"))
}

impl fmt::Display for AbsentPillarPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScoreAsZero => f.write_str("score_as_zero"),
            Self::Renormalize => f.write_str("renormalize"),
        }
    }
}
