// ABOUTME: Show command reading one stored analysis from SQLite
// ABOUTME: Prints a summary or the stored JSON shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;
use wellness_engine::config::EngineConfig;
use wellness_engine::wellness_core::models::WellnessDomain;
use wellness_engine::{AnalysisStore, SqliteAnalysisStore};

use crate::helpers::display::display_result;
use crate::helpers::files::print_json;

/// Show the stored analysis for one user, domain and day
pub async fn run(
    config: &EngineConfig,
    user_id: Uuid,
    domain: WellnessDomain,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    info!("Connecting to database: {}", config.database_url);
    let store = SqliteAnalysisStore::connect(&config.database_url).await?;

    match store.get(user_id, domain, date).await? {
        Some(result) if json => print_json(&result)?,
        Some(result) => display_result(&result),
        None => println!("No {domain} analysis stored for {user_id} on {date}"),
    }
    Ok(())
}
