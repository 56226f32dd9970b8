// ABOUTME: InsightGenerator selecting rule-based strengths, priorities, recommendations, and tips
// ABOUTME: Reuses the risk profile of the same run so urgent concerns surface as priorities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use wellness_core::constants::scores;
use wellness_core::models::{DailySnapshot, Insights, PillarScores, RiskProfile};

use crate::config::{render, DomainRules};

/// Pure text selection over one domain's rule table
pub struct InsightGenerator<'a> {
    rules: &'a DomainRules,
}

impl<'a> InsightGenerator<'a> {
    /// Create a generator for a rule table
    #[must_use]
    pub const fn new(rules: &'a DomainRules) -> Self {
        Self { rules }
    }

    /// Select insight text
    ///
    /// Deterministic in `(scores, risk, snapshot metrics)`. Urgent concerns
    /// follow the weakest-pillar priority and preventive actions follow the
    /// canned strategy, both verbatim from `risk`.
    #[must_use]
    pub fn generate(
        &self,
        scores: &PillarScores,
        risk: &RiskProfile,
        snapshot: &DailySnapshot,
    ) -> Insights {
        let table = &self.rules.insights;

        let key_strengths = scores
            .iter()
            .filter(|(_, score)| *score >= table.strength_threshold)
            .map(|(pillar, score)| render(&table.strength_template, pillar, score))
            .collect();

        let weakest = scores.weakest();

        let mut improvement_priorities = Vec::new();
        if let Some((pillar, score)) = weakest {
            if score < table.priority_threshold {
                improvement_priorities.push(render(&table.priority_template, pillar, score));
            }
        }
        extend_unique(&mut improvement_priorities, &risk.urgent_concerns);

        let cross_pillar_recommendations = table
            .recommendations
            .iter()
            .filter(|rule| rule.pattern.matches(scores))
            .map(|rule| rule.text.clone())
            .collect();

        let mut personalized_strategy = weakest
            .filter(|(_, score)| *score < scores::MAX_SCORE)
            .and_then(|(pillar, _)| table.strategies.get(&pillar))
            .cloned()
            .unwrap_or_default();
        extend_unique(&mut personalized_strategy, &risk.preventive_actions);

        let mut habit_formation_tips = table.base_tips.clone();
        let average = scores.mean();
        if average < table.low_average {
            habit_formation_tips.push(table.low_average_tip.clone());
        } else if average > table.high_average {
            habit_formation_tips.push(table.high_average_tip.clone());
        }

        let mut metric_recommendations = Vec::new();
        for advice in &table.metric_advice {
            if advice.condition.holds(snapshot) {
                let text = advice.condition.value(snapshot).map_or_else(
                    || advice.text.clone(),
                    |value| advice.text.replace("{value}", &format_value(value)),
                );
                if !metric_recommendations.contains(&text) {
                    metric_recommendations.push(text);
                }
            }
        }

        Insights {
            key_strengths,
            improvement_priorities,
            cross_pillar_recommendations,
            personalized_strategy,
            habit_formation_tips,
            metric_recommendations,
        }
    }
}

fn extend_unique(list: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !list.contains(item) {
            list.push(item.clone());
        }
    }
}

fn format_value(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;
    use wellness_core::models::{Pillar, WellnessDomain};

    fn empty_snapshot() -> DailySnapshot {
        DailySnapshot::new(
            Uuid::nil(),
            WellnessDomain::Health,
            NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
        )
    }

    #[test]
    fn test_strengths_and_priority() {
        let rules = DomainRules::for_domain(WellnessDomain::Health);
        let scores = PillarScores::new()
            .with(Pillar::Fitness, 90.0)
            .with(Pillar::Nutrition, 55.0)
            .with(Pillar::Recovery, 88.0)
            .with(Pillar::Hydration, 75.0);
        let insights = InsightGenerator::new(&rules).generate(
            &scores,
            &RiskProfile::default(),
            &empty_snapshot(),
        );

        assert_eq!(
            insights.key_strengths,
            vec![
                "Excellence in Fitness: score 90/100".to_owned(),
                "Excellence in Recovery: score 88/100".to_owned(),
            ]
        );
        assert_eq!(
            insights.improvement_priorities,
            vec!["Critical priority: improve Nutrition (55/100)".to_owned()]
        );
        assert_eq!(insights.personalized_strategy.len(), 2);
        assert!(insights
            .cross_pillar_recommendations
            .contains(&"Optimize post-workout nutrition to maximize recovery".to_owned()));
    }

    #[test]
    fn test_perfect_scores_have_no_strategy() {
        let rules = DomainRules::for_domain(WellnessDomain::Health);
        let scores = PillarScores::new()
            .with(Pillar::Fitness, 100.0)
            .with(Pillar::Nutrition, 100.0)
            .with(Pillar::Recovery, 100.0)
            .with(Pillar::Hydration, 100.0);
        let insights = InsightGenerator::new(&rules).generate(
            &scores,
            &RiskProfile::default(),
            &empty_snapshot(),
        );
        assert!(insights.personalized_strategy.is_empty());
        assert_eq!(insights.habit_formation_tips.len(), 5);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(350.0), "350");
        assert_eq!(format_value(6.3), "6.3");
    }
}
