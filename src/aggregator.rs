// ABOUTME: MetricsAggregator fanning out one provider fetch per pillar into a DailySnapshot
// ABOUTME: Settle-all join with per-call timeouts and circuit breakers; failures become absent pillars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Metrics Aggregation
//!
//! Every registered provider is called concurrently. Each call runs under
//! its own timeout and circuit breaker, and no call can abort another: a
//! failed, slow or tripped provider only makes its own pillar absent and
//! leaves an issue on the snapshot.
//!
//! The run as a whole fails with [`AnalysisError::Aggregation`] only when no
//! pillar is present and every missing pillar is missing because its provider
//! could not be reached. A user who simply tracks nothing still gets a
//! (zero-confidence) snapshot.

use chrono::NaiveDate;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;
use wellness_core::constants::providers::DEFAULT_PROVIDER_TIMEOUT_MS;
use wellness_core::errors::{AnalysisError, ProviderError};
use wellness_core::models::{
    DailySnapshot, IssueKind, Pillar, PillarInput, PillarIssue, WellnessDomain,
};
use wellness_intelligence::validation::{validate_input, Validated};
use wellness_providers::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, SharedPillarProvider,
};

struct ProviderSlot {
    provider: SharedPillarProvider,
    breaker: CircuitBreaker,
}

/// What one provider call contributed to the snapshot
enum PillarOutcome {
    Present(PillarInput, Option<PillarIssue>),
    Absent(PillarIssue),
}

/// Collects one [`DailySnapshot`] from per-pillar providers
pub struct MetricsAggregator {
    domain: WellnessDomain,
    slots: BTreeMap<Pillar, ProviderSlot>,
    timeout: Duration,
}

impl MetricsAggregator {
    /// Aggregator for `domain` with the default provider timeout
    #[must_use]
    pub fn new(domain: WellnessDomain) -> Self {
        Self {
            domain,
            slots: BTreeMap::new(),
            timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
        }
    }

    /// Per-provider timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register a provider with a default circuit breaker
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if the provider's pillar is not
    /// part of this aggregator's domain
    pub fn with_provider(self, provider: SharedPillarProvider) -> Result<Self, AnalysisError> {
        self.with_provider_config(provider, CircuitBreakerConfig::default())
    }

    /// Register a provider with explicit breaker thresholds
    ///
    /// A second provider for the same pillar replaces the first.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if the provider's pillar is not
    /// part of this aggregator's domain
    pub fn with_provider_config(
        mut self,
        provider: SharedPillarProvider,
        breaker: CircuitBreakerConfig,
    ) -> Result<Self, AnalysisError> {
        let pillar = provider.pillar();
        if !self.domain.contains(pillar) {
            return Err(AnalysisError::Configuration(format!(
                "provider '{}' feeds {pillar}, which is not part of the {} domain",
                provider.name(),
                self.domain
            )));
        }
        let breaker = CircuitBreaker::with_config(provider.name(), breaker);
        self.slots.insert(pillar, ProviderSlot { provider, breaker });
        Ok(self)
    }

    /// Domain this aggregator builds snapshots for
    #[must_use]
    pub const fn domain(&self) -> WellnessDomain {
        self.domain
    }

    /// Configured per-provider timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Breaker state for the provider feeding `pillar`
    #[must_use]
    pub fn breaker_state(&self, pillar: Pillar) -> Option<CircuitState> {
        self.slots.get(&pillar).map(|slot| slot.breaker.state())
    }

    /// Fetch every pillar concurrently and assemble the snapshot
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Aggregation`] when no pillar is present and
    /// every domain pillar failed, timed out, or was short-circuited
    pub async fn collect(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailySnapshot, AnalysisError> {
        let started = Instant::now();
        let fetches = self
            .slots
            .iter()
            .map(|(pillar, slot)| self.fetch_pillar(*pillar, slot, user_id, date));
        let outcomes = join_all(fetches).await;

        let mut snapshot = DailySnapshot::new(user_id, self.domain, date);
        for (pillar, outcome) in outcomes {
            match outcome {
                PillarOutcome::Present(input, issue) => {
                    snapshot.pillars.insert(pillar, input);
                    snapshot.issues.extend(issue);
                }
                PillarOutcome::Absent(issue) => snapshot.issues.push(issue),
            }
        }
        for pillar in self.domain.pillars() {
            if !self.slots.contains_key(pillar) {
                snapshot.issues.push(PillarIssue::new(
                    *pillar,
                    IssueKind::NotTracked,
                    "no provider registered",
                ));
            }
        }

        let unreachable = snapshot.pillars.is_empty()
            && !snapshot.issues.is_empty()
            && snapshot.issues.iter().all(|issue| issue.kind.is_failure());
        if unreachable {
            warn!(
                user.id = %user_id,
                domain = %self.domain,
                %date,
                failures = snapshot.issues.len(),
                "No pillar provider could be reached"
            );
            return Err(AnalysisError::Aggregation {
                user_id,
                date,
                issues: snapshot.issues,
            });
        }

        info!(
            user.id = %user_id,
            domain = %self.domain,
            %date,
            present = snapshot.pillars.len(),
            issues = snapshot.issues.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Pillars collected"
        );
        Ok(snapshot)
    }

    async fn fetch_pillar(
        &self,
        pillar: Pillar,
        slot: &ProviderSlot,
        user_id: Uuid,
        date: NaiveDate,
    ) -> (Pillar, PillarOutcome) {
        let name = slot.provider.name();
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let guarded = slot.breaker.call(async {
            tokio::time::timeout(self.timeout, slot.provider.fetch(user_id, date))
                .await
                .unwrap_or_else(|_| {
                    Err(ProviderError::Timeout {
                        provider: name.to_owned(),
                        timeout_ms,
                    })
                })
        });

        let outcome = match guarded.await {
            Ok(Some(input)) => match validate_input(pillar, input) {
                Validated::Accepted(input) => PillarOutcome::Present(input, None),
                Validated::Clamped(input, issue) => PillarOutcome::Present(input, Some(issue)),
                Validated::Rejected(issue) => PillarOutcome::Absent(issue),
            },
            Ok(None) => {
                debug!(provider = %name, pillar = %pillar, "Pillar not tracked");
                PillarOutcome::Absent(PillarIssue::new(
                    pillar,
                    IssueKind::NotTracked,
                    format!("{name} reported no data"),
                ))
            }
            Err(error) => {
                warn!(
                    provider = %name,
                    pillar = %pillar,
                    user.id = %user_id,
                    error = %error,
                    "Pillar provider failed"
                );
                PillarOutcome::Absent(PillarIssue::new(
                    pillar,
                    error.issue_kind(),
                    error.to_string(),
                ))
            }
        };
        (pillar, outcome)
    }
}
