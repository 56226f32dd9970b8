// ABOUTME: AnalysisOrchestrator sequencing aggregation, the pure pipeline, and persistence per session
// ABOUTME: Explicit state machine per (user, domain, date) with single-flight coalescing of concurrent runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Orchestration
//!
//! One run walks `idle → syncing_pillars → analyzing → idle`. If aggregation
//! cannot reach any provider the session parks in `error`, keeping its last
//! good result available through [`AnalysisOrchestrator::current`]. Leaving
//! `error` takes an explicit [`AnalysisOrchestrator::retry`].
//!
//! Concurrent requests for the same session share one spawned run. A caller
//! that drops its future does not cancel the run; the result is still
//! written and recorded on the session.
//!
//! Progress of a run is tracked by the run itself. The session cache only
//! mirrors it, so a session evicted mid-run is written back when the next
//! stage completes. Sessions parked in `error` are pinned outside the cache
//! until a retry succeeds or the user is forgotten.
//!
//! A failed store write does not fail the run. The report carries
//! [`PersistenceStatus::NotSaved`] and the in-memory result stays usable.

/// Orchestration state machine
pub mod state;
/// Coalescing of concurrent runs
pub mod single_flight;

pub use single_flight::SingleFlight;
pub use state::{OrchestrationEvent, OrchestrationState};

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wellness_core::constants::history::DEFAULT_HISTORY_DAYS;
use wellness_core::errors::AnalysisError;
use wellness_core::models::{AnalysisResult, HistoryPoint, WellnessDomain};
use wellness_intelligence::WellnessEngine;

use crate::aggregator::MetricsAggregator;
use crate::cache::{CacheConfig, SessionCache, SessionKey};
use crate::config::EngineConfig;
use crate::store::AnalysisStore;

/// Whether a computed result reached the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceStatus {
    /// Upsert succeeded
    Saved,
    /// Result computed but not written
    NotSaved {
        /// Store error or the reason writing was skipped
        reason: String,
    },
}

impl PersistenceStatus {
    /// Whether the result was written
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Outcome of one completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Computed analysis, valid whether or not it was saved
    pub result: AnalysisResult,
    /// Store outcome
    pub persistence: PersistenceStatus,
}

impl AnalysisReport {
    /// Store failure as an error value, if the write failed
    #[must_use]
    pub fn persistence_error(&self) -> Option<AnalysisError> {
        match &self.persistence {
            PersistenceStatus::Saved => None,
            PersistenceStatus::NotSaved { reason } => Some(AnalysisError::Persistence {
                reason: reason.clone(),
            }),
        }
    }
}

/// Per-session record kept in the session cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Current state
    pub state: OrchestrationState,
    /// Most recent successfully computed result
    pub last_result: Option<AnalysisResult>,
    /// Store outcome of `last_result`
    pub persistence: Option<PersistenceStatus>,
    /// Message of the error that parked the session, if any
    pub last_error: Option<String>,
}

type Clock = fn() -> DateTime<Utc>;

struct Inner {
    engine: WellnessEngine,
    aggregators: HashMap<WellnessDomain, MetricsAggregator>,
    store: Arc<dyn AnalysisStore>,
    sessions: SessionCache<Session>,
    /// Error messages of parked sessions, kept out of LRU and TTL eviction
    parked: DashMap<SessionKey, String>,
    history_days: usize,
    persist_results: bool,
    clock: Clock,
}

/// Builder for [`AnalysisOrchestrator`]
pub struct OrchestratorBuilder {
    engine: WellnessEngine,
    store: Arc<dyn AnalysisStore>,
    aggregators: HashMap<WellnessDomain, MetricsAggregator>,
    session_cache: CacheConfig,
    history_days: usize,
    persist_results: bool,
    clock: Clock,
}

impl OrchestratorBuilder {
    /// Register the aggregator for its domain, replacing any earlier one
    #[must_use]
    pub fn aggregator(mut self, aggregator: MetricsAggregator) -> Self {
        self.aggregators.insert(aggregator.domain(), aggregator);
        self
    }

    /// Session cache bounds
    #[must_use]
    pub fn session_cache(mut self, config: CacheConfig) -> Self {
        self.session_cache = config;
        self
    }

    /// Days of prior results loaded per run
    #[must_use]
    pub const fn history_days(mut self, days: usize) -> Self {
        self.history_days = days;
        self
    }

    /// Write results to the store
    #[must_use]
    pub const fn persist_results(mut self, persist: bool) -> Self {
        self.persist_results = persist;
        self
    }

    /// Timestamp source for `created_at`
    #[must_use]
    pub const fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Apply history, persistence and session settings from `config`
    #[must_use]
    pub fn with_config(self, config: &EngineConfig) -> Self {
        self.session_cache(config.session_cache.clone())
            .history_days(config.history_days)
            .persist_results(config.persist_results)
    }

    /// Build the orchestrator
    ///
    /// Spawns the session cleanup task when enabled, so this needs a running
    /// tokio runtime in that case.
    #[must_use]
    pub fn build(self) -> AnalysisOrchestrator {
        AnalysisOrchestrator {
            inner: Arc::new(Inner {
                engine: self.engine,
                aggregators: self.aggregators,
                store: self.store,
                sessions: SessionCache::new(&self.session_cache),
                parked: DashMap::new(),
                history_days: self.history_days,
                persist_results: self.persist_results,
                clock: self.clock,
            }),
            flights: SingleFlight::new(),
        }
    }
}

/// Runs and tracks analyses per `(user, domain, date)`
pub struct AnalysisOrchestrator {
    inner: Arc<Inner>,
    flights: SingleFlight<SessionKey, AnalysisReport>,
}

impl AnalysisOrchestrator {
    /// Start building an orchestrator over an engine and a store
    #[must_use]
    pub fn builder(engine: WellnessEngine, store: Arc<dyn AnalysisStore>) -> OrchestratorBuilder {
        OrchestratorBuilder {
            engine,
            store,
            aggregators: HashMap::new(),
            session_cache: CacheConfig::default(),
            history_days: DEFAULT_HISTORY_DAYS,
            persist_results: true,
            clock: Utc::now,
        }
    }

    /// Run (or join) an analysis for one user, domain and day
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Configuration`] if no aggregator serves `domain` or
    ///   the orchestrator is closed
    /// - [`AnalysisError::InvalidTransition`] if the session is in `error`
    /// - [`AnalysisError::Aggregation`] if no provider could be reached
    pub async fn analyze(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        date: NaiveDate,
    ) -> Result<AnalysisReport, AnalysisError> {
        self.start(
            SessionKey::new(user_id, domain, date),
            OrchestrationEvent::SyncRequested,
        )
        .await
    }

    /// Re-run a session that is parked in `error`
    ///
    /// # Errors
    ///
    /// Same as [`AnalysisOrchestrator::analyze`], with
    /// [`AnalysisError::InvalidTransition`] when the session is not in `error`
    pub async fn retry(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        date: NaiveDate,
    ) -> Result<AnalysisReport, AnalysisError> {
        self.start(
            SessionKey::new(user_id, domain, date),
            OrchestrationEvent::RetryRequested,
        )
        .await
    }

    async fn start(
        &self,
        key: SessionKey,
        event: OrchestrationEvent,
    ) -> Result<AnalysisReport, AnalysisError> {
        if self.inner.sessions.is_closed() {
            return Err(AnalysisError::Configuration(
                "orchestrator has been closed".to_owned(),
            ));
        }
        if !self.inner.aggregators.contains_key(&key.domain) {
            return Err(AnalysisError::Configuration(format!(
                "no aggregator registered for the {} domain",
                key.domain
            )));
        }
        let inner = Arc::clone(&self.inner);
        self.flights
            .run(key, move || run_pipeline(inner, key, event))
            .await
    }

    /// Last good result for a session, falling back to the store
    ///
    /// Served even while the session is in `error`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Persistence`] if the store read fails
    pub async fn current(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        date: NaiveDate,
    ) -> Result<Option<AnalysisResult>, AnalysisError> {
        let key = SessionKey::new(user_id, domain, date);
        if let Some(result) = self
            .inner
            .sessions
            .get(&key)
            .await
            .and_then(|session| session.last_result)
        {
            return Ok(Some(result));
        }
        self.inner
            .store
            .get(user_id, domain, date)
            .await
            .map_err(|e| AnalysisError::Persistence {
                reason: e.to_string(),
            })
    }

    /// Current state of a session; unknown sessions are `idle`
    pub async fn state(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        date: NaiveDate,
    ) -> OrchestrationState {
        self.session(user_id, domain, date)
            .await
            .map(|session| session.state)
            .unwrap_or_default()
    }

    /// Full session record, if one is live or parked in `error`
    pub async fn session(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        date: NaiveDate,
    ) -> Option<Session> {
        let key = SessionKey::new(user_id, domain, date);
        match self.inner.sessions.get(&key).await {
            Some(session) => Some(session),
            None => self.inner.parked_session(&key),
        }
    }

    /// Drop every session of one user
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Internal`] if the user's key pattern is rejected
    pub async fn forget_user(&self, user_id: Uuid) -> Result<u64, AnalysisError> {
        self.inner.parked.retain(|key, _| key.user_id != user_id);
        self.inner
            .sessions
            .invalidate_pattern(&SessionKey::user_pattern(user_id))
            .await
            .map_err(|e| AnalysisError::Internal(e.to_string()))
    }

    /// Whether a run for the session is currently in flight
    #[must_use]
    pub fn in_flight(&self, user_id: Uuid, domain: WellnessDomain, date: NaiveDate) -> bool {
        self.flights
            .current(&SessionKey::new(user_id, domain, date))
            .is_some()
    }

    /// Domains with a registered aggregator
    #[must_use]
    pub fn domains(&self) -> Vec<WellnessDomain> {
        let mut domains: Vec<WellnessDomain> = self.inner.aggregators.keys().copied().collect();
        domains.sort();
        domains
    }

    /// Aggregator serving `domain`
    #[must_use]
    pub fn aggregator(&self, domain: WellnessDomain) -> Option<&MetricsAggregator> {
        self.inner.aggregators.get(&domain)
    }

    /// Stop session cleanup and release every session; later runs are refused
    pub async fn close(&self) {
        self.inner.sessions.close().await;
        self.inner.parked.clear();
        info!("Analysis orchestrator closed");
    }
}

impl Inner {
    /// Session as pinned in `error`, for keys the cache no longer holds
    fn parked_session(&self, key: &SessionKey) -> Option<Session> {
        self.parked.get(key).map(|message| Session {
            state: OrchestrationState::Error,
            last_error: Some(message.clone()),
            ..Session::default()
        })
    }

    /// Apply the event that opens a run to the stored session
    ///
    /// A session missing from the cache starts from `idle`, or from `error`
    /// if it is parked.
    async fn begin(
        &self,
        key: &SessionKey,
        event: OrchestrationEvent,
    ) -> Result<OrchestrationState, AnalysisError> {
        let seed = self.parked_session(key).unwrap_or_default();
        let mut outcome = Ok(OrchestrationState::Idle);
        self.sessions
            .update(key, |current| {
                let mut session = current.unwrap_or(seed);
                match session.state.transition(event) {
                    Ok(next) => {
                        debug!(
                            session = %key,
                            from = %session.state,
                            to = %next,
                            %event,
                            "Session transition"
                        );
                        session.state = next;
                        outcome = Ok(next);
                    }
                    Err(error) => outcome = Err(error),
                }
                session
            })
            .await;
        outcome
    }

    /// Advance a running session from `from` and mirror it into the cache
    ///
    /// The run owns its state; an evicted or expired session is written back.
    async fn record<F>(
        &self,
        key: &SessionKey,
        from: OrchestrationState,
        event: OrchestrationEvent,
        edit: F,
    ) -> Result<OrchestrationState, AnalysisError>
    where
        F: FnOnce(&mut Session) + Send,
    {
        let next = from.transition(event)?;
        debug!(session = %key, %from, to = %next, %event, "Session transition");
        self.sessions
            .update(key, |current| {
                let mut session = current.unwrap_or_default();
                session.state = next;
                edit(&mut session);
                session
            })
            .await;
        Ok(next)
    }

    async fn load_history(&self, key: &SessionKey) -> Vec<HistoryPoint> {
        if self.history_days == 0 {
            return Vec::new();
        }
        match self
            .store
            .history(key.user_id, key.domain, key.date, self.history_days)
            .await
        {
            Ok(history) => history,
            Err(error) => {
                warn!(
                    user.id = %key.user_id,
                    domain = %key.domain,
                    error = %error,
                    "History unavailable, analyzing without trends"
                );
                Vec::new()
            }
        }
    }

    async fn persist(&self, result: &AnalysisResult) -> PersistenceStatus {
        if !self.persist_results {
            return PersistenceStatus::NotSaved {
                reason: "persistence disabled".to_owned(),
            };
        }
        match self.store.upsert(result).await {
            Ok(()) => PersistenceStatus::Saved,
            Err(error) => {
                warn!(
                    user.id = %result.user_id,
                    domain = %result.domain(),
                    date = %result.date(),
                    error = %error,
                    "Analysis computed but not saved"
                );
                PersistenceStatus::NotSaved {
                    reason: error.to_string(),
                }
            }
        }
    }
}

async fn run_pipeline(
    inner: Arc<Inner>,
    key: SessionKey,
    event: OrchestrationEvent,
) -> Result<AnalysisReport, AnalysisError> {
    let started = Instant::now();
    let state = inner.begin(&key, event).await?;

    let aggregator = inner.aggregators.get(&key.domain).ok_or_else(|| {
        AnalysisError::Configuration(format!(
            "no aggregator registered for the {} domain",
            key.domain
        ))
    })?;

    let snapshot = match aggregator.collect(key.user_id, key.date).await {
        Ok(snapshot) => snapshot,
        Err(error) => {
            let message = error.to_string();
            inner.parked.insert(key, message.clone());
            inner
                .record(&key, state, OrchestrationEvent::AggregationFailed, |session| {
                    session.last_error = Some(message);
                })
                .await?;
            warn!(
                user.id = %key.user_id,
                domain = %key.domain,
                date = %key.date,
                error = %error,
                "Analysis run failed; session parked until retry"
            );
            return Err(error);
        }
    };
    let state = inner
        .record(&key, state, OrchestrationEvent::PillarsCollected, |_| {})
        .await?;

    let history = inner.load_history(&key).await;
    let result = inner.engine.analyze(&snapshot, &history, (inner.clock)());
    let persistence = inner.persist(&result).await;
    let report = AnalysisReport {
        result,
        persistence,
    };

    let recorded = report.clone();
    inner.parked.remove(&key);
    inner
        .record(&key, state, OrchestrationEvent::AnalysisCompleted, move |session| {
            session.last_result = Some(recorded.result);
            session.persistence = Some(recorded.persistence);
            session.last_error = None;
        })
        .await?;

    info!(
        user.id = %key.user_id,
        domain = %key.domain,
        date = %key.date,
        global_score = report.result.global_score,
        risk_level = %report.result.risk_profile.level,
        saved = report.persistence.is_saved(),
        elapsed_ms = started.elapsed().as_millis(),
        "Analysis run completed"
    );
    Ok(report)
}
