// ABOUTME: Run command driving a fixture through static providers, the orchestrator and SQLite
// ABOUTME: Prior fixture days are analyzed first so the target day sees real history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use wellness_engine::config::EngineConfig;
use wellness_engine::wellness_core::models::{Pillar, PillarInput, WellnessDomain};
use wellness_engine::wellness_intelligence::{RuleBook, WellnessEngine};
use wellness_engine::wellness_providers::{StaticBehavior, StaticPillarProvider};
use wellness_engine::{AnalysisOrchestrator, MetricsAggregator, SqliteAnalysisStore};

use crate::helpers::display::{display_persistence, display_result};
use crate::helpers::files::{print_json, read_json};

/// One day of provider data
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureDay {
    date: NaiveDate,
    #[serde(default)]
    pillars: BTreeMap<Pillar, PillarInput>,
}

/// Provider data for one user and domain
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    #[serde(default)]
    user_id: Option<Uuid>,
    domain: WellnessDomain,
    /// Days to analyze, in any order; the latest is reported
    days: Vec<FixtureDay>,
    /// Pillars whose provider fails on every call
    #[serde(default)]
    unavailable: BTreeSet<Pillar>,
}

/// Run every fixture day through the orchestrator and report the last one
pub async fn run(config: &EngineConfig, fixture_path: &Path, json: bool) -> Result<()> {
    let mut fixture: Fixture = read_json(fixture_path)?;
    if fixture.days.is_empty() {
        bail!("Fixture {} has no days", fixture_path.display());
    }
    fixture.days.sort_by_key(|day| day.date);
    let user_id = fixture.user_id.unwrap_or_else(Uuid::new_v4);
    let domain = fixture.domain;

    let mut aggregator = MetricsAggregator::new(domain).with_timeout(config.provider_timeout);
    for pillar in domain.pillars() {
        let provider = StaticPillarProvider::new(*pillar);
        if fixture.unavailable.contains(pillar) {
            provider.set_behavior(StaticBehavior::Fail(
                "marked unavailable in fixture".to_owned(),
            ))?;
        }
        for day in &fixture.days {
            if let Some(input) = day.pillars.get(pillar) {
                provider.insert(day.date, input.clone())?;
            }
        }
        aggregator = aggregator.with_provider(Arc::new(provider))?;
    }

    info!("Connecting to database: {}", config.database_url);
    let store = SqliteAnalysisStore::connect(&config.database_url).await?;
    let orchestrator =
        AnalysisOrchestrator::builder(WellnessEngine::new(RuleBook::load()?), Arc::new(store))
            .aggregator(aggregator)
            .with_config(config)
            .build();

    let mut last = None;
    for day in &fixture.days {
        match orchestrator.analyze(user_id, domain, day.date).await {
            Ok(report) => last = Some(report),
            Err(error) => warn!(date = %day.date, error = %error, "Fixture day not analyzed"),
        }
    }
    orchestrator.close().await;

    let Some(report) = last else {
        bail!("No fixture day could be analyzed");
    };
    if json {
        print_json(&report)?;
    } else {
        display_result(&report.result);
        display_persistence(&report.persistence);
    }
    Ok(())
}
