// ABOUTME: Tests for WELLNESS_RULES_<DOMAIN>_* overrides applied by DomainRules::load
// ABOUTME: Valid overrides land in the table; unparseable or non-finite values are rejected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use wellness_engine::wellness_core::models::WellnessDomain;
use wellness_engine::wellness_intelligence::{ConfigError, DomainRules, RuleBook};

const VARS: [&str; 3] = [
    "WELLNESS_RULES_HEALTH_MAX_WEEKLY_DELTA",
    "WELLNESS_RULES_HEALTH_HORIZON_DAYS",
    "WELLNESS_RULES_SLEEP_SYNERGY_CAP",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_valid_override_is_applied() {
    clear_env();
    env::set_var("WELLNESS_RULES_HEALTH_MAX_WEEKLY_DELTA", "12.5");
    env::set_var("WELLNESS_RULES_HEALTH_HORIZON_DAYS", "5");

    let rules = DomainRules::load(WellnessDomain::Health).unwrap();
    clear_env();

    assert!((rules.projection.max_weekly_delta - 12.5).abs() < f64::EPSILON);
    assert_eq!(rules.projection.horizon_days, 5);
}

#[test]
#[serial]
fn test_nan_weekly_delta_is_rejected() {
    clear_env();
    env::set_var("WELLNESS_RULES_HEALTH_MAX_WEEKLY_DELTA", "NaN");

    let result = DomainRules::load(WellnessDomain::Health);
    let book = RuleBook::load();
    clear_env();

    assert!(matches!(result, Err(ConfigError::ValueOutOfRange(_))));
    assert!(book.is_err());
}

#[test]
#[serial]
fn test_infinite_synergy_cap_is_rejected() {
    clear_env();
    env::set_var("WELLNESS_RULES_SLEEP_SYNERGY_CAP", "inf");

    let result = DomainRules::load(WellnessDomain::Sleep);
    clear_env();

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_unparseable_override_names_the_variable() {
    clear_env();
    env::set_var("WELLNESS_RULES_HEALTH_HORIZON_DAYS", "a week");

    let error = DomainRules::load(WellnessDomain::Health).unwrap_err();
    clear_env();

    assert!(error.to_string().contains("WELLNESS_RULES_HEALTH_HORIZON_DAYS"));
}
