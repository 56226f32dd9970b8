// ABOUTME: Offline analyze command running the pure pipeline over a snapshot file
// ABOUTME: No providers, orchestration or storage are involved
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use tracing::info;
use wellness_engine::wellness_core::models::{DailySnapshot, HistoryPoint};
use wellness_engine::wellness_intelligence::{RuleBook, WellnessEngine};

use crate::helpers::display::display_result;
use crate::helpers::files::{print_json, read_json};

/// Analyze one snapshot file
pub fn run(snapshot_path: &Path, history_path: Option<&Path>, json: bool) -> Result<()> {
    let snapshot: DailySnapshot = read_json(snapshot_path)?;
    let history: Vec<HistoryPoint> = match history_path {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    info!(
        domain = %snapshot.domain,
        date = %snapshot.date,
        pillars = snapshot.pillars.len(),
        history = history.len(),
        "Analyzing snapshot"
    );

    let engine = WellnessEngine::new(RuleBook::load()?);
    let result = engine.analyze(&snapshot, &history, Utc::now());

    if json {
        print_json(&result)
    } else {
        display_result(&result);
        Ok(())
    }
}
