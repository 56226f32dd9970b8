// ABOUTME: Output formatting helpers for wellness-cli
// ABOUTME: Human-readable summaries of analysis results and persistence status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use wellness_engine::wellness_core::models::AnalysisResult;
use wellness_engine::PersistenceStatus;

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{title}:");
    for item in items {
        println!("  • {item}");
    }
}

/// Display one analysis as a readable report
pub fn display_result(result: &AnalysisResult) {
    println!("\nWellness Analysis: {} / {}", result.domain(), result.date());
    println!("{}", "=".repeat(60));
    println!("   User: {}", result.user_id);
    println!("   Global score: {:.1}", result.global_score);
    println!(
        "   Confidence: {}",
        result.data_quality.confidence.as_str()
    );
    if !result.data_quality.absent_pillars.is_empty() {
        let absent: Vec<&str> = result
            .data_quality
            .absent_pillars
            .iter()
            .map(|pillar| pillar.label())
            .collect();
        println!("   Absent pillars: {}", absent.join(", "));
    }

    println!("\nPillars:");
    for (pillar, score) in result.pillar_scores.iter() {
        let status = result
            .pillar_statuses
            .get(&pillar)
            .map(|s| format!("{:?} / {:?}", s.status, s.trend))
            .unwrap_or_default();
        println!("   {:<16} {score:>6.1}  {status}", pillar.label());
    }

    let balance = &result.balance_metrics;
    println!("\nBalance:");
    println!("   Harmony: {:.0}", balance.harmony);
    println!("   Consistency: {:.0}", balance.consistency);
    println!("   Synergy: {:.0}", balance.synergy);
    println!("   Weakest link: {}", balance.weakest_link.label());
    println!("   Strongest pillar: {}", balance.strongest_pillar.label());

    let risk = &result.risk_profile;
    println!(
        "\nRisk: {} (score {:.0})",
        risk.level.as_str(),
        risk.risk_score
    );
    print_list("Urgent concerns", &risk.urgent_concerns);
    print_list("Specific risks", &risk.specific_risks);
    print_list("Preventive actions", &risk.preventive_actions);

    let insights = &result.insights;
    print_list("Key strengths", &insights.key_strengths);
    print_list("Improvement priorities", &insights.improvement_priorities);
    print_list(
        "Cross-pillar recommendations",
        &insights.cross_pillar_recommendations,
    );
    print_list("Strategy", &insights.personalized_strategy);
    print_list("Habit tips", &insights.habit_formation_tips);
    print_list("Metric recommendations", &insights.metric_recommendations);

    let predictions = &result.predictive_metrics;
    println!("\nProjections:");
    for (pillar, score) in predictions.next_7_days.iter() {
        println!("   {:<16} {score:>6.1} in 7 days", pillar.label());
    }
    println!(
        "   Goal achievement: {:.0}%",
        predictions.goal_achievement_probability
    );
    println!("   Burnout risk: {:.0}", predictions.burnout_risk);
    println!("   Plateau likelihood: {:.0}", predictions.plateau_prediction);
}

/// Display the store outcome of a run
pub fn display_persistence(status: &PersistenceStatus) {
    match status {
        PersistenceStatus::Saved => println!("\nSaved."),
        PersistenceStatus::NotSaved { reason } => println!("\nNot saved: {reason}"),
    }
}
