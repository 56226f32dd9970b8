// ABOUTME: In-process pillar provider serving preloaded inputs for tests, demos and the CLI
// ABOUTME: Can be switched to fail, stall or report not-tracked to exercise aggregation paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Static Pillar Provider
//!
//! Serves pillar inputs from memory without any network access. Inputs can be
//! registered per day, with an optional fallback used for days that have no
//! entry. The provider's [`StaticBehavior`] can be changed at runtime so tests
//! can simulate an outage or a slow upstream mid-run.
//!
//! All state sits behind `RwLock`s; a poisoned lock is reported as
//! [`ProviderError::Unavailable`] rather than panicking.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;
use wellness_core::errors::{ProviderError, ProviderResult};
use wellness_core::models::{Pillar, PillarInput};

use crate::core::PillarProvider;

/// How the provider answers the next fetch
#[derive(Debug, Clone, PartialEq)]
pub enum StaticBehavior {
    /// Serve the registered input for the day, or the fallback
    Serve,
    /// Answer that the pillar is not tracked
    NotTracked,
    /// Fail as unavailable with the given message
    Fail(String),
    /// Fail with an unusable payload
    InvalidPayload(String),
    /// Wait before serving, to trip the aggregator's timeout
    Delay(Duration),
}

/// Pillar provider backed by in-memory inputs
#[derive(Debug)]
pub struct StaticPillarProvider {
    pillar: Pillar,
    name: String,
    inputs: RwLock<HashMap<NaiveDate, PillarInput>>,
    fallback: Option<PillarInput>,
    behavior: RwLock<StaticBehavior>,
    calls: AtomicUsize,
}

impl StaticPillarProvider {
    /// Provider with no inputs; named after the pillar
    #[must_use]
    pub fn new(pillar: Pillar) -> Self {
        Self {
            pillar,
            name: format!("static-{}", pillar.as_str()),
            inputs: RwLock::new(HashMap::new()),
            fallback: None,
            behavior: RwLock::new(StaticBehavior::Serve),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider answering every day with the same input
    #[must_use]
    pub fn constant(pillar: Pillar, input: PillarInput) -> Self {
        Self::new(pillar).with_fallback(input)
    }

    /// Provider answering every day with a bare score
    #[must_use]
    pub fn with_score(pillar: Pillar, score: f64) -> Self {
        Self::constant(pillar, PillarInput::new(score))
    }

    /// Override the provider name
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Input served for days without a registered entry
    #[must_use]
    pub fn with_fallback(mut self, input: PillarInput) -> Self {
        self.fallback = Some(input);
        self
    }

    /// Start with the given behavior
    #[must_use]
    pub fn with_behavior(self, behavior: StaticBehavior) -> Self {
        Self {
            behavior: RwLock::new(behavior),
            ..self
        }
    }

    /// Register the input for one day
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unavailable`] if the input table lock is poisoned.
    pub fn insert(&self, date: NaiveDate, input: PillarInput) -> ProviderResult<()> {
        self.inputs
            .write()
            .map_err(|_| self.poisoned())?
            .insert(date, input);
        Ok(())
    }

    /// Change how subsequent fetches are answered
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unavailable`] if the behavior lock is poisoned.
    pub fn set_behavior(&self, behavior: StaticBehavior) -> ProviderResult<()> {
        *self.behavior.write().map_err(|_| self.poisoned())? = behavior;
        Ok(())
    }

    /// Number of fetches received so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn poisoned(&self) -> ProviderError {
        ProviderError::Unavailable {
            provider: self.name.clone(),
            message: "provider state lock poisoned".to_owned(),
        }
    }

    fn lookup(&self, date: NaiveDate) -> ProviderResult<Option<PillarInput>> {
        let inputs = self.inputs.read().map_err(|_| self.poisoned())?;
        Ok(inputs.get(&date).cloned().or_else(|| self.fallback.clone()))
    }
}

#[async_trait]
impl PillarProvider for StaticPillarProvider {
    fn pillar(&self) -> Pillar {
        self.pillar
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, user_id: Uuid, date: NaiveDate) -> ProviderResult<Option<PillarInput>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior.read().map_err(|_| self.poisoned())?.clone();
        debug!(
            provider = %self.name,
            pillar = %self.pillar,
            user.id = %user_id,
            %date,
            ?behavior,
            "Static provider fetch"
        );

        match behavior {
            StaticBehavior::Serve => self.lookup(date),
            StaticBehavior::NotTracked => Ok(None),
            StaticBehavior::Fail(message) => Err(ProviderError::Unavailable {
                provider: self.name.clone(),
                message,
            }),
            StaticBehavior::InvalidPayload(message) => Err(ProviderError::InvalidPayload {
                provider: self.name.clone(),
                message,
            }),
            StaticBehavior::Delay(delay) => {
                tokio::time::sleep(delay).await;
                self.lookup(date)
            }
        }
    }
}
