// ABOUTME: Normalize commands turning raw sleep or hydration logs into scored snapshots
// ABOUTME: Output feeds straight into the analyze command
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::path::Path;
use uuid::Uuid;
use wellness_engine::wellness_intelligence::normalizers::hydration::HydrationLog;
use wellness_engine::wellness_intelligence::normalizers::sleep::SleepLog;

use crate::helpers::files::{print_json, read_json};

fn owner_and_day(user: Option<Uuid>, date: Option<NaiveDate>) -> (Uuid, NaiveDate) {
    (
        user.unwrap_or_else(Uuid::new_v4),
        date.unwrap_or_else(|| Utc::now().date_naive()),
    )
}

/// Print the sleep assessment and the sleep-domain snapshot for one log
pub fn sleep(path: &Path, user: Option<Uuid>, date: Option<NaiveDate>) -> Result<()> {
    let log: SleepLog = read_json(path)?;
    let (user_id, day) = owner_and_day(user, date);
    print_json(&json!({
        "assessment": log.assess(),
        "snapshot": log.to_snapshot(user_id, day),
    }))
}

/// Print the hydration assessment and the hydration-domain snapshot for one log
pub fn hydration(path: &Path, user: Option<Uuid>, date: Option<NaiveDate>) -> Result<()> {
    let log: HydrationLog = read_json(path)?;
    let (user_id, day) = owner_and_day(user, date);
    print_json(&json!({
        "assessment": log.assess(),
        "dehydration": log.dehydration(),
        "snapshot": log.to_snapshot(user_id, day),
    }))
}
