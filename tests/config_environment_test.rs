// ABOUTME: Unit tests for environment-driven engine configuration
// ABOUTME: Validates defaults, WELLNESS_* overrides, parse failures, and range checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use std::time::Duration;
use wellness_engine::config::environment::{EngineConfig, DEFAULT_DATABASE_URL};

const VARS: [&str; 7] = [
    "WELLNESS_DATABASE_URL",
    "WELLNESS_PROVIDER_TIMEOUT_MS",
    "WELLNESS_HISTORY_DAYS",
    "WELLNESS_SESSION_CACHE_MAX_ENTRIES",
    "WELLNESS_SESSION_CACHE_TTL_SECS",
    "WELLNESS_CACHE_CLEANUP_INTERVAL_SECS",
    "WELLNESS_PERSIST_RESULTS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_when_unset() {
    clear_env();

    let config = EngineConfig::from_env().unwrap();

    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.provider_timeout, Duration::from_millis(8_000));
    assert_eq!(config.history_days, 14);
    assert_eq!(config.session_cache.max_entries, 1_000);
    assert!(config.persist_results);
}

#[test]
#[serial]
fn test_overrides_from_env() {
    clear_env();
    env::set_var("WELLNESS_DATABASE_URL", "sqlite::memory:");
    env::set_var("WELLNESS_PROVIDER_TIMEOUT_MS", "2500");
    env::set_var("WELLNESS_HISTORY_DAYS", " 30 ");
    env::set_var("WELLNESS_SESSION_CACHE_TTL_SECS", "120");
    env::set_var("WELLNESS_PERSIST_RESULTS", "off");

    let config = EngineConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.database_url, "sqlite::memory:");
    assert_eq!(config.provider_timeout, Duration::from_millis(2_500));
    assert_eq!(config.history_days, 30);
    assert_eq!(config.session_cache.ttl, Duration::from_secs(120));
    assert!(!config.persist_results);
    assert!(config.summary().contains("persist=off"));
}

#[test]
#[serial]
fn test_unparseable_value_names_the_variable() {
    clear_env();
    env::set_var("WELLNESS_HISTORY_DAYS", "two weeks");

    let error = EngineConfig::from_env().unwrap_err();
    clear_env();

    assert!(error.message.contains("WELLNESS_HISTORY_DAYS"));
}

#[test]
#[serial]
fn test_out_of_range_timeout_is_rejected() {
    clear_env();
    env::set_var("WELLNESS_PROVIDER_TIMEOUT_MS", "50");

    let error = EngineConfig::from_env().unwrap_err();
    clear_env();

    assert!(error.message.contains("WELLNESS_PROVIDER_TIMEOUT_MS"));
}

#[test]
fn test_validate_rejects_out_of_range_values() {
    assert!(EngineConfig::default().validate().is_ok());

    let mut config = EngineConfig::default();
    config.session_cache.max_entries = 0;
    assert!(config.validate().is_err());

    let config = EngineConfig {
        history_days: 365,
        ..EngineConfig::default()
    };
    assert!(config.validate().is_err());

    let config = EngineConfig {
        database_url: "  ".to_owned(),
        ..EngineConfig::default()
    };
    assert!(config.validate().is_err());
}
