// ABOUTME: PillarProvider contract consumed by the metrics aggregator
// ABOUTME: One provider per pillar returns a pre-normalized score plus free-form metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pillar Provider Contract
//!
//! Every pillar of a wellness domain is fed by one provider. A provider
//! answers `fetch(user_id, date)` with one of three outcomes, which the
//! aggregator keeps distinct:
//!
//! - `Ok(Some(input))`: the pillar has data for that day
//! - `Ok(None)`: the user does not track this pillar
//! - `Err(ProviderError)`: the provider failed; the pillar becomes absent
//!   and the failure is recorded as an issue on the snapshot
//!
//! Providers are expected to normalize their raw metrics to a `0..=100`
//! score themselves (see the sleep and hydration normalizers in
//! `wellness-intelligence`). The engine still validates the score and never
//! trusts it blindly.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;
use wellness_core::errors::ProviderResult;
use wellness_core::models::{Pillar, PillarInput};

/// Source of one pillar's daily input
#[async_trait]
pub trait PillarProvider: Send + Sync {
    /// Pillar this provider feeds
    fn pillar(&self) -> Pillar;

    /// Provider name used for logs, issues and the circuit breaker
    fn name(&self) -> &str;

    /// Fetch the pillar input for one user and day
    ///
    /// # Errors
    ///
    /// Returns a [`wellness_core::errors::ProviderError`] when the provider
    /// cannot answer. `Ok(None)` is not an error: it means the pillar is not
    /// tracked for this user.
    async fn fetch(&self, user_id: Uuid, date: NaiveDate) -> ProviderResult<Option<PillarInput>>;
}

/// Shared provider handle held by the aggregator
pub type SharedPillarProvider = Arc<dyn PillarProvider>;
