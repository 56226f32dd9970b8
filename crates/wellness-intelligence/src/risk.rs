// ABOUTME: RiskAssessor accumulating a risk score from pillar tiers, cross-pillar patterns, and signals
// ABOUTME: Maps the accumulator to a risk level band and collects explanatory text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use wellness_core::models::{DailySnapshot, PillarScores, RiskProfile};

use crate::config::{render, DomainRules, RiskEffect};

/// Pure risk classification over one domain's rule table
///
/// Every rule contributes a non-negative penalty, so adding triggers can
/// only keep or raise the level.
pub struct RiskAssessor<'a> {
    rules: &'a DomainRules,
}

impl<'a> RiskAssessor<'a> {
    /// Create an assessor for a rule table
    #[must_use]
    pub const fn new(rules: &'a DomainRules) -> Self {
        Self { rules }
    }

    /// Classify scores plus raw metric signals carried by the snapshot
    #[must_use]
    pub fn assess(&self, scores: &PillarScores, snapshot: &DailySnapshot) -> RiskProfile {
        let mut profile = self.assess_scores(scores);
        for rule in &self.rules.risk.signals {
            if rule.condition.holds(snapshot) {
                apply(&mut profile, &rule.effect, |text| text.to_owned());
            }
        }
        profile.level = self.rules.risk.bands.level(profile.risk_score);
        profile
    }

    /// Classify scores alone, without metric signals
    #[must_use]
    pub fn assess_scores(&self, scores: &PillarScores) -> RiskProfile {
        let mut profile = RiskProfile::default();

        for (pillar, score) in scores.iter() {
            let tier = self
                .rules
                .risk
                .tiers
                .iter()
                .find(|tier| score < tier.below);
            if let Some(tier) = tier {
                apply(&mut profile, &tier.effect, |text| render(text, pillar, score));
            }
        }

        for rule in &self.rules.risk.cross_pillar {
            if rule.pattern.matches(scores) {
                apply(&mut profile, &rule.effect, |text| text.to_owned());
            }
        }

        profile.level = self.rules.risk.bands.level(profile.risk_score);
        profile
    }
}

fn apply(profile: &mut RiskProfile, effect: &RiskEffect, render_text: impl Fn(&str) -> String) {
    profile.risk_score += effect.penalty;
    if let Some(text) = &effect.specific_risk {
        push_unique(&mut profile.specific_risks, render_text(text));
    }
    if let Some(text) = &effect.preventive_action {
        push_unique(&mut profile.preventive_actions, render_text(text));
    }
    if let Some(text) = &effect.urgent_concern {
        push_unique(&mut profile.urgent_concerns, render_text(text));
    }
}

fn push_unique(list: &mut Vec<String>, text: String) {
    if !list.contains(&text) {
        list.push(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellness_core::models::{Pillar, RiskLevel, WellnessDomain};

    #[test]
    fn test_tiers_accumulate() {
        let rules = DomainRules::for_domain(WellnessDomain::Health);
        let scores = PillarScores::new()
            .with(Pillar::Fitness, 25.0)
            .with(Pillar::Nutrition, 45.0)
            .with(Pillar::Recovery, 65.0)
            .with(Pillar::Hydration, 90.0);
        let profile = RiskAssessor::new(&rules).assess_scores(&scores);

        assert!((profile.risk_score - 50.0).abs() < f64::EPSILON);
        assert_eq!(profile.level, RiskLevel::High);
        assert_eq!(
            profile.urgent_concerns,
            vec!["Urgent improvement required for Fitness".to_owned()]
        );
        assert!(profile
            .specific_risks
            .contains(&"Nutrition: moderate risk (score 45/100)".to_owned()));
    }

    #[test]
    fn test_overtraining_pattern() {
        let rules = DomainRules::for_domain(WellnessDomain::Health);
        let scores = PillarScores::new()
            .with(Pillar::Fitness, 85.0)
            .with(Pillar::Nutrition, 80.0)
            .with(Pillar::Recovery, 55.0)
            .with(Pillar::Hydration, 80.0);
        let profile = RiskAssessor::new(&rules).assess_scores(&scores);
        assert!(profile
            .specific_risks
            .contains(&"Overtraining risk: insufficient recovery".to_owned()));
        assert!(profile
            .urgent_concerns
            .contains(&"Prioritize sleep and recovery".to_owned()));
    }
}
