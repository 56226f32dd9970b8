// ABOUTME: Main library entry point for the wellness scoring engine
// ABOUTME: Wires providers, the scoring pipeline, orchestration, session cache and persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Wellness Engine
//!
//! Per-domain wellness scoring. A day's pillar inputs (fitness, nutrition,
//! sleep quality, hydration balance, ...) are gathered from providers, scored
//! against the domain's rule table, classified for risk, turned into
//! insights and short-horizon projections, and persisted as one
//! `AnalysisResult` per user, domain and day.
//!
//! ## Architecture
//!
//! - **wellness-core**: models, error taxonomy, constants
//! - **wellness-intelligence**: the pure pipeline (`WellnessEngine`) and rule tables
//! - **wellness-providers**: `PillarProvider` trait, circuit breaker, static providers
//! - **aggregator**: concurrent provider fan-out into a `DailySnapshot`
//! - **orchestrator**: per-session state machine with single-flight runs
//! - **store**: `AnalysisStore` over `SQLite` or memory
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//! use wellness_engine::aggregator::MetricsAggregator;
//! use wellness_engine::orchestrator::AnalysisOrchestrator;
//! use wellness_engine::wellness_providers::StaticPillarProvider;
//! use wellness_engine::store::InMemoryAnalysisStore;
//! use wellness_engine::wellness_core::models::{Pillar, WellnessDomain};
//! use wellness_engine::wellness_intelligence::WellnessEngine;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let aggregator = MetricsAggregator::new(WellnessDomain::Health)
//!     .with_provider(Arc::new(StaticPillarProvider::with_score(Pillar::Fitness, 85.0)))?;
//! let orchestrator = AnalysisOrchestrator::builder(
//!     WellnessEngine::default(),
//!     Arc::new(InMemoryAnalysisStore::new()),
//! )
//! .aggregator(aggregator)
//! .build();
//!
//! let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap_or_default();
//! let report = orchestrator
//!     .analyze(Uuid::new_v4(), WellnessDomain::Health, date)
//!     .await?;
//! println!("global score {}", report.result.global_score);
//! # Ok(())
//! # }
//! ```

/// Concurrent per-pillar provider aggregation
pub mod aggregator;

/// Bounded session cache
pub mod cache;

/// Environment-driven engine configuration
pub mod config;

/// Structured logging bootstrap
pub mod logging;

/// Per-session orchestration of analysis runs
pub mod orchestrator;

/// Analysis persistence
pub mod store;

pub use wellness_core;
pub use wellness_intelligence;
pub use wellness_providers;

pub use aggregator::MetricsAggregator;
pub use orchestrator::{AnalysisOrchestrator, AnalysisReport, PersistenceStatus};
pub use store::{AnalysisStore, InMemoryAnalysisStore, SqliteAnalysisStore};
