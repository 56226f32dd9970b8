// ABOUTME: Input validation for provider-supplied pillar scores before they reach scoring
// ABOUTME: Non-finite scores are rejected, out-of-range scores clamped, foreign pillars dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::warn;
use wellness_core::constants::{clamp_score, scores};
use wellness_core::models::{DailySnapshot, IssueKind, Pillar, PillarInput, PillarIssue};

/// Outcome of validating one pillar input
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    /// Score already in range
    Accepted(PillarInput),
    /// Score moved into range; the issue records the original value
    Clamped(PillarInput, PillarIssue),
    /// Score unusable; the pillar must be treated as absent
    Rejected(PillarIssue),
}

/// Validate a single provider input
#[must_use]
pub fn validate_input(pillar: Pillar, mut input: PillarInput) -> Validated {
    let raw = input.score;
    if !raw.is_finite() {
        warn!(pillar = %pillar, score = raw, "Rejecting non-finite pillar score");
        return Validated::Rejected(PillarIssue::new(
            pillar,
            IssueKind::Rejected,
            format!("non-finite score {raw}"),
        ));
    }
    if !(scores::MIN_SCORE..=scores::MAX_SCORE).contains(&raw) {
        input.score = clamp_score(raw);
        warn!(pillar = %pillar, score = raw, clamped = input.score, "Clamping out-of-range pillar score");
        return Validated::Clamped(
            input,
            PillarIssue::new(
                pillar,
                IssueKind::Clamped,
                format!("score {raw} clamped to {}", clamp_score(raw)),
            ),
        );
    }
    Validated::Accepted(input)
}

/// Re-validate every pillar of a snapshot
///
/// Pillars outside the snapshot's domain are dropped with a `rejected` issue.
/// Already-valid snapshots come back unchanged.
#[must_use]
pub fn sanitize_snapshot(snapshot: &DailySnapshot) -> DailySnapshot {
    let mut clean = DailySnapshot::new(snapshot.user_id, snapshot.domain, snapshot.date);
    clean.issues.clone_from(&snapshot.issues);

    for (pillar, input) in &snapshot.pillars {
        if !snapshot.domain.contains(*pillar) {
            clean.issues.push(PillarIssue::new(
                *pillar,
                IssueKind::Rejected,
                format!("pillar is not part of the {} domain", snapshot.domain),
            ));
            continue;
        }
        match validate_input(*pillar, input.clone()) {
            Validated::Accepted(input) => {
                clean.pillars.insert(*pillar, input);
            }
            Validated::Clamped(input, issue) => {
                clean.pillars.insert(*pillar, input);
                clean.issues.push(issue);
            }
            Validated::Rejected(issue) => clean.issues.push(issue),
        }
    }
    clean
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;
    use wellness_core::models::WellnessDomain;

    #[test]
    fn test_nan_is_rejected() {
        let outcome = validate_input(Pillar::Fitness, PillarInput::new(f64::NAN));
        assert!(matches!(outcome, Validated::Rejected(issue) if issue.kind == IssueKind::Rejected));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let Validated::Clamped(input, issue) =
            validate_input(Pillar::Fitness, PillarInput::new(140.0))
        else {
            panic!("expected clamp");
        };
        assert!((input.score - 100.0).abs() < f64::EPSILON);
        assert_eq!(issue.kind, IssueKind::Clamped);
    }

    #[test]
    fn test_sanitize_drops_foreign_pillars() {
        let snapshot = DailySnapshot::new(
            Uuid::nil(),
            WellnessDomain::Sleep,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        )
        .with_pillar(Pillar::Fitness, PillarInput::new(80.0))
        .with_pillar(Pillar::Duration, PillarInput::new(-4.0));

        let clean = sanitize_snapshot(&snapshot);
        assert!(clean.pillar(Pillar::Fitness).is_none());
        assert!(clean.pillar(Pillar::Duration).unwrap().score.abs() < f64::EPSILON);
        assert_eq!(clean.issues.len(), 2);
    }
}
