// ABOUTME: Environment-driven engine configuration (storage, provider timeouts, session cache)
// ABOUTME: Parses WELLNESS_* variables with defaults and validates their ranges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration for the engine runtime

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use wellness_core::constants::cache::{
    DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_SESSION_CACHE_MAX_ENTRIES, DEFAULT_SESSION_TTL_SECS,
};
use wellness_core::constants::history::{DEFAULT_HISTORY_DAYS, MAX_HISTORY_DAYS};
use wellness_core::constants::providers::{
    DEFAULT_PROVIDER_TIMEOUT_MS, MAX_PROVIDER_TIMEOUT_MS, MIN_PROVIDER_TIMEOUT_MS,
};
use wellness_core::errors::{AppError, AppResult};

use crate::cache::CacheConfig;

/// Default `SQLite` location when `WELLNESS_DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:wellness.db";

/// Runtime configuration for aggregation, orchestration and storage
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// sqlx connection string for the analysis store
    pub database_url: String,
    /// Per-provider fetch timeout
    pub provider_timeout: Duration,
    /// Days of prior results loaded for trends and consistency
    pub history_days: usize,
    /// Session cache bounds
    pub session_cache: CacheConfig,
    /// Write results to the store after each run
    pub persist_results: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            provider_timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
            history_days: DEFAULT_HISTORY_DAYS,
            session_cache: CacheConfig::default(),
            persist_results: true,
        }
    }
}

impl EngineConfig {
    /// Load from `WELLNESS_*` environment variables, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a variable does not parse or a value is out of range
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            database_url: env_var_or("WELLNESS_DATABASE_URL", DEFAULT_DATABASE_URL),
            provider_timeout: Duration::from_millis(parse_env(
                "WELLNESS_PROVIDER_TIMEOUT_MS",
                DEFAULT_PROVIDER_TIMEOUT_MS,
            )?),
            history_days: parse_env("WELLNESS_HISTORY_DAYS", DEFAULT_HISTORY_DAYS)?,
            session_cache: CacheConfig {
                max_entries: parse_env(
                    "WELLNESS_SESSION_CACHE_MAX_ENTRIES",
                    DEFAULT_SESSION_CACHE_MAX_ENTRIES,
                )?,
                ttl: Duration::from_secs(parse_env(
                    "WELLNESS_SESSION_CACHE_TTL_SECS",
                    DEFAULT_SESSION_TTL_SECS,
                )?),
                cleanup_interval: Duration::from_secs(parse_env(
                    "WELLNESS_CACHE_CLEANUP_INTERVAL_SECS",
                    DEFAULT_CLEANUP_INTERVAL_SECS,
                )?),
                enable_background_cleanup: true,
            },
            persist_results: parse_bool(&env_var_or("WELLNESS_PERSIST_RESULTS", "true")),
        };

        config.validate()?;
        info!(
            database = %config.database_url,
            provider_timeout_ms = config.provider_timeout.as_millis(),
            history_days = config.history_days,
            session_cache_max_entries = config.session_cache.max_entries,
            session_ttl_secs = config.session_cache.ttl.as_secs(),
            persist_results = config.persist_results,
            "Engine configuration loaded"
        );
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first offending setting
    pub fn validate(&self) -> AppResult<()> {
        let timeout_ms = u64::try_from(self.provider_timeout.as_millis()).unwrap_or(u64::MAX);
        if !(MIN_PROVIDER_TIMEOUT_MS..=MAX_PROVIDER_TIMEOUT_MS).contains(&timeout_ms) {
            return Err(AppError::config(format!(
                "WELLNESS_PROVIDER_TIMEOUT_MS must be between {MIN_PROVIDER_TIMEOUT_MS} and {MAX_PROVIDER_TIMEOUT_MS}, got {timeout_ms}"
            )));
        }
        if self.history_days > MAX_HISTORY_DAYS {
            return Err(AppError::config(format!(
                "WELLNESS_HISTORY_DAYS must be at most {MAX_HISTORY_DAYS}, got {}",
                self.history_days
            )));
        }
        if self.session_cache.max_entries == 0 {
            return Err(AppError::config(
                "WELLNESS_SESSION_CACHE_MAX_ENTRIES must be greater than zero",
            ));
        }
        if self.session_cache.ttl.is_zero() {
            return Err(AppError::config(
                "WELLNESS_SESSION_CACHE_TTL_SECS must be greater than zero",
            ));
        }
        if self.session_cache.cleanup_interval.is_zero() {
            return Err(AppError::config(
                "WELLNESS_CACHE_CLEANUP_INTERVAL_SECS must be greater than zero",
            ));
        }
        if self.database_url.trim().is_empty() {
            return Err(AppError::config("WELLNESS_DATABASE_URL must not be empty"));
        }
        Ok(())
    }

    /// One-line summary for startup logs and the CLI
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "database={} provider_timeout={}ms history_days={} sessions={}x{}s persist={}",
            self.database_url,
            self.provider_timeout.as_millis(),
            self.history_days,
            self.session_cache.max_entries,
            self.session_cache.ttl.as_secs(),
            if self.persist_results { "on" } else { "off" },
        )
    }
}

/// Read a variable or fall back to `default`
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Read and parse a variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

/// `false`, `0`, `no` and `off` disable; anything else enables
fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
