// ABOUTME: Pillar data providers for the wellness engine
// ABOUTME: Provider contract, per-provider circuit breaker, and an in-memory static provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! Pillar provider abstractions.
//!
//! The aggregator in the root crate fans out one [`PillarProvider::fetch`]
//! per domain pillar, each wrapped in its own [`CircuitBreaker`].

/// Circuit breaker guarding each provider
pub mod circuit_breaker;
/// Provider trait
pub mod core;
/// In-memory provider for tests, demos and fixture-driven CLI runs
pub mod static_provider;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use core::{PillarProvider, SharedPillarProvider};
pub use static_provider::{StaticBehavior, StaticPillarProvider};
