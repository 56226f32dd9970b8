// ABOUTME: Per-provider circuit breaker guarding pillar fetches during aggregation
// ABOUTME: A tripped breaker short-circuits the call so the pillar is marked circuit_open
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use wellness_core::errors::{ProviderError, ProviderResult};

/// Breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Fetches pass through and failures are counted
    Closed,
    /// Fetches are refused until the recovery timeout elapses
    Open,
    /// A single probe fetch is in flight
    HalfOpen,
}

impl CircuitState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Closed,
            1 => Self::Open,
            _ => Self::HalfOpen,
        }
    }

    const fn as_u8(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
            Self::HalfOpen => 2,
        }
    }

    /// Lowercase name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Thresholds for one breaker
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive retryable failures that open the circuit
    pub failure_threshold: u32,
    /// Time spent open before a probe is allowed
    pub recovery_timeout: Duration,
    /// Successful probes needed to close again
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

impl CircuitBreakerConfig {
    /// Explicit thresholds
    #[must_use]
    pub const fn new(
        failure_threshold: u32,
        recovery_timeout: Duration,
        success_threshold: u32,
    ) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            success_threshold,
        }
    }

    /// Trip quickly and wait longer; for providers known to flap
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 3,
        }
    }

    /// Tolerate more failures; for local or cached providers
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            failure_threshold: 10,
            recovery_timeout: Duration::from_secs(15),
            success_threshold: 1,
        }
    }
}

/// Lock-free circuit breaker owned by one pillar provider
///
/// Only retryable provider errors (unavailable, timeout, rate limited) count
/// toward opening the circuit. Invalid payloads are the provider's data
/// problem, not an availability problem, and leave the breaker untouched.
///
/// # States
///
/// - **Closed**: fetches run; consecutive failures are counted
/// - **Open**: fetches fail immediately with [`ProviderError::CircuitBreakerOpen`]
/// - **Half-open**: after the recovery timeout one probe is let through
pub struct CircuitBreaker {
    name: String,
    state: AtomicU8,
    failure_count: AtomicU32,
    success_count: AtomicU32,
    /// Milliseconds since `created` at which the circuit last opened
    opened_at_ms: AtomicU64,
    probe_due: AtomicBool,
    config: CircuitBreakerConfig,
    created: Instant,
}

impl CircuitBreaker {
    /// Breaker with default thresholds
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_config(name, CircuitBreakerConfig::default())
    }

    /// Breaker with explicit thresholds
    #[must_use]
    pub fn with_config(name: &str, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.to_owned(),
            state: AtomicU8::new(CircuitState::Closed.as_u8()),
            failure_count: AtomicU32::new(0),
            success_count: AtomicU32::new(0),
            opened_at_ms: AtomicU64::new(0),
            probe_due: AtomicBool::new(false),
            config,
            created: Instant::now(),
        }
    }

    /// Provider name this breaker guards
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Consecutive failures counted while closed
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::SeqCst)
    }

    /// Whether a fetch may run now
    ///
    /// An open circuit whose recovery timeout has elapsed moves to half-open
    /// and admits exactly the caller that observed the transition.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        match self.state() {
            CircuitState::Closed => true,
            CircuitState::Open => self.try_half_open(),
            CircuitState::HalfOpen => false,
        }
    }

    fn try_half_open(&self) -> bool {
        let due = self.probe_due.load(Ordering::SeqCst)
            || self.millis_since_open() >= self.recovery_ms();
        if !due {
            return false;
        }
        let swapped = self
            .state
            .compare_exchange(
                CircuitState::Open.as_u8(),
                CircuitState::HalfOpen.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if swapped {
            self.probe_due.store(false, Ordering::SeqCst);
            info!(provider = %self.name, "Circuit half-open, probing provider");
        }
        swapped
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.created.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn recovery_ms(&self) -> u64 {
        u64::try_from(self.config.recovery_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn millis_since_open(&self) -> u64 {
        self.elapsed_ms()
            .saturating_sub(self.opened_at_ms.load(Ordering::SeqCst))
    }

    fn open(&self) {
        self.state
            .store(CircuitState::Open.as_u8(), Ordering::SeqCst);
        self.opened_at_ms.store(self.elapsed_ms(), Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
        self.probe_due.store(false, Ordering::SeqCst);
    }

    /// Seconds until a probe will be admitted, rounded up
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        self.recovery_ms()
            .saturating_sub(self.millis_since_open())
            .saturating_add(999)
            / 1000
    }

    /// Record a successful fetch
    pub fn record_success(&self) {
        match self.state() {
            CircuitState::Closed => self.failure_count.store(0, Ordering::SeqCst),
            CircuitState::HalfOpen => {
                let successes = self.success_count.fetch_add(1, Ordering::SeqCst) + 1;
                if successes >= self.config.success_threshold {
                    self.reset_counters();
                    info!(provider = %self.name, "Circuit closed, provider recovered");
                } else {
                    // Next call is admitted as another probe without waiting again
                    self.probe_due.store(true, Ordering::SeqCst);
                    self.state
                        .store(CircuitState::Open.as_u8(), Ordering::SeqCst);
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a retryable fetch failure
    pub fn record_failure(&self) {
        match self.state() {
            CircuitState::Closed => {
                let failures = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= self.config.failure_threshold {
                    self.open();
                    warn!(
                        provider = %self.name,
                        failures,
                        threshold = self.config.failure_threshold,
                        recovery_timeout_secs = self.config.recovery_timeout.as_secs(),
                        "Circuit opened, provider failing"
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.open();
                warn!(provider = %self.name, "Circuit re-opened, probe failed");
            }
            CircuitState::Open => {
                self.opened_at_ms.store(self.elapsed_ms(), Ordering::SeqCst);
            }
        }
    }

    /// Run one provider fetch under the breaker
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::CircuitBreakerOpen`] without polling `fetch`
    /// when the circuit refuses the call; otherwise the fetch's own error.
    pub async fn call<T, F>(&self, fetch: F) -> ProviderResult<T>
    where
        F: Future<Output = ProviderResult<T>>,
    {
        if !self.is_allowed() {
            return Err(ProviderError::CircuitBreakerOpen {
                provider: self.name.clone(),
                retry_after_secs: self.retry_after_secs(),
            });
        }

        match fetch.await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(error) => {
                if error.is_retryable() {
                    self.record_failure();
                } else if self.state() == CircuitState::HalfOpen {
                    // Non-retryable errors still prove the provider answered
                    self.record_success();
                }
                Err(error)
            }
        }
    }

    fn reset_counters(&self) {
        self.state
            .store(CircuitState::Closed.as_u8(), Ordering::SeqCst);
        self.failure_count.store(0, Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
        self.probe_due.store(false, Ordering::SeqCst);
    }

    /// Force the breaker closed
    pub fn reset(&self) {
        self.reset_counters();
        info!(provider = %self.name, "Circuit manually reset");
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("failure_count", &self.failure_count())
            .finish_non_exhaustive()
    }
}
