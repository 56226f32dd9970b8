// ABOUTME: Daily snapshot input model: per-pillar inputs, absence, and data-quality issues
// ABOUTME: Snapshots are immutable per run and fingerprinted for result provenance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::pillar::{Pillar, WellnessDomain};

/// One provider's contribution for a pillar on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarInput {
    /// Pre-normalized provider score in `[0, 100]`
    pub score: f64,
    /// Free-form domain metrics (durations, intensities, symptom flags)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, Value>,
}

impl PillarInput {
    /// Create an input carrying only a score
    #[must_use]
    pub const fn new(score: f64) -> Self {
        Self {
            score,
            metrics: BTreeMap::new(),
        }
    }

    /// Attach a raw metric
    #[must_use]
    pub fn with_metric(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metrics.insert(key.into(), value.into());
        self
    }

    /// Numeric metric value
    #[must_use]
    pub fn metric_f64(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).and_then(Value::as_f64)
    }

    /// String metric value
    #[must_use]
    pub fn metric_str(&self, key: &str) -> Option<&str> {
        self.metrics.get(key).and_then(Value::as_str)
    }

    /// Boolean metric value
    #[must_use]
    pub fn metric_bool(&self, key: &str) -> Option<bool> {
        self.metrics.get(key).and_then(Value::as_bool)
    }
}

/// Why a pillar is missing or was altered on its way into a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Provider call returned an error
    Failed,
    /// Provider call exceeded its timeout
    TimedOut,
    /// Provider skipped because its circuit breaker is open
    CircuitOpen,
    /// User does not track this pillar
    NotTracked,
    /// Score was NaN or infinite and was discarded
    Rejected,
    /// Score was outside `[0, 100]` and was clamped
    Clamped,
}

impl IssueKind {
    /// Whether the pillar ends up absent from the snapshot
    #[must_use]
    pub const fn makes_absent(self) -> bool {
        !matches!(self, Self::Clamped)
    }

    /// Whether this is a provider-side failure (as opposed to a data decision)
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::TimedOut | Self::CircuitOpen)
    }
}

/// Data-quality note attached to a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarIssue {
    /// Affected pillar
    pub pillar: Pillar,
    /// What happened
    pub kind: IssueKind,
    /// Free-text detail for logs and diagnostics
    pub detail: String,
}

impl PillarIssue {
    /// Create an issue
    #[must_use]
    pub fn new(pillar: Pillar, kind: IssueKind, detail: impl Into<String>) -> Self {
        Self {
            pillar,
            kind,
            detail: detail.into(),
        }
    }
}

/// Raw per-user per-day input to the scoring pipeline
///
/// Pillars missing from `pillars` are absent, which is distinct from a zero
/// score. A snapshot is never patched; new provider data produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    /// Owner of the data
    pub user_id: Uuid,
    /// Domain whose pillars this snapshot covers
    pub domain: WellnessDomain,
    /// Calendar day
    pub date: NaiveDate,
    /// Present pillar inputs
    #[serde(default)]
    pub pillars: BTreeMap<Pillar, PillarInput>,
    /// Aggregation and validation notes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<PillarIssue>,
}

impl DailySnapshot {
    /// Create an empty snapshot
    #[must_use]
    pub const fn new(user_id: Uuid, domain: WellnessDomain, date: NaiveDate) -> Self {
        Self {
            user_id,
            domain,
            date,
            pillars: BTreeMap::new(),
            issues: Vec::new(),
        }
    }

    /// Builder-style pillar insert
    #[must_use]
    pub fn with_pillar(mut self, pillar: Pillar, input: PillarInput) -> Self {
        self.pillars.insert(pillar, input);
        self
    }

    /// Input for a pillar, if present
    #[must_use]
    pub fn pillar(&self, pillar: Pillar) -> Option<&PillarInput> {
        self.pillars.get(&pillar)
    }

    /// Domain pillars with no input, in domain order
    #[must_use]
    pub fn absent_pillars(&self) -> Vec<Pillar> {
        self.domain
            .pillars()
            .iter()
            .copied()
            .filter(|pillar| !self.pillars.contains_key(pillar))
            .collect()
    }

    /// Whether every domain pillar is present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.absent_pillars().is_empty()
    }

    /// SHA-256 hex digest of the canonical JSON encoding
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&canonical))
    }

    /// Reference stored alongside results derived from this snapshot
    #[must_use]
    pub fn reference(&self) -> SnapshotRef {
        SnapshotRef {
            user_id: self.user_id,
            domain: self.domain,
            date: self.date,
            fingerprint: self.fingerprint(),
        }
    }
}

/// Provenance link from a result back to its snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRef {
    /// Owner of the data
    pub user_id: Uuid,
    /// Scored domain
    pub domain: WellnessDomain,
    /// Calendar day
    pub date: NaiveDate,
    /// Snapshot fingerprint
    pub fingerprint: String,
}

impl fmt::Display for SnapshotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.user_id, self.domain, self.date)
    }
}
