// ABOUTME: Wellness CLI - command-line front end for the wellness scoring engine
// ABOUTME: Offline analysis, orchestrated runs with SQLite persistence, rule tables and log normalizers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Analyze a snapshot file without touching storage
//! wellness-cli analyze snapshot.json --history history.json
//!
//! # Run a fixture through providers, orchestration and SQLite persistence
//! wellness-cli run fixture.json
//!
//! # Show a stored analysis
//! wellness-cli show --user 6f1c... --domain health --date 2025-03-14
//!
//! # Print the hydration rule table
//! wellness-cli rules hydration
//!
//! # Turn a raw sleep log into a sleep-domain snapshot
//! wellness-cli normalize-sleep night.json --date 2025-03-14
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;
use wellness_engine::config::EngineConfig;
use wellness_engine::logging::LoggingConfig;
use wellness_engine::wellness_core::models::WellnessDomain;

#[derive(Parser)]
#[command(
    name = "wellness-cli",
    about = "Wellness scoring engine CLI",
    long_about = "Score daily wellness snapshots, run orchestrated analyses, and inspect rule tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Print JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Analyze a snapshot file with the pure pipeline (no storage)
    Analyze {
        /// `DailySnapshot` JSON file
        snapshot: PathBuf,

        /// JSON array of prior `HistoryPoint`s
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Run a fixture through providers, orchestration and persistence
    Run {
        /// Fixture JSON file
        fixture: PathBuf,

        /// Compute without writing to the database
        #[arg(long)]
        no_persist: bool,
    },

    /// Show a stored analysis
    Show {
        /// User id
        #[arg(long)]
        user: Uuid,

        /// Domain (health, hydration, sleep)
        #[arg(long)]
        domain: WellnessDomain,

        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },

    /// Print a domain's validated rule table
    Rules {
        /// Domain (health, hydration, sleep)
        domain: WellnessDomain,
    },

    /// Normalize a raw sleep log into sleep pillars
    NormalizeSleep {
        /// `SleepLog` JSON file
        log: PathBuf,

        /// Snapshot owner (random if omitted)
        #[arg(long)]
        user: Option<Uuid>,

        /// Snapshot day (today if omitted)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Normalize a raw hydration log into hydration pillars
    NormalizeHydration {
        /// `HydrationLog` JSON file
        log: PathBuf,

        /// Snapshot owner (random if omitted)
        #[arg(long)]
        user: Option<Uuid>,

        /// Snapshot day (today if omitted)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = EngineConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    config.validate()?;
    info!("{}", config.summary());

    match cli.command {
        Command::Analyze { snapshot, history } => {
            commands::analyze::run(&snapshot, history.as_deref(), cli.json)?;
        }
        Command::Run {
            fixture,
            no_persist,
        } => {
            config.persist_results = !no_persist;
            commands::run::run(&config, &fixture, cli.json).await?;
        }
        Command::Show { user, domain, date } => {
            commands::show::run(&config, user, domain, date, cli.json).await?;
        }
        Command::Rules { domain } => commands::rules::run(domain)?,
        Command::NormalizeSleep { log, user, date } => {
            commands::normalize::sleep(&log, user, date)?;
        }
        Command::NormalizeHydration { log, user, date } => {
            commands::normalize::hydration(&log, user, date)?;
        }
    }

    Ok(())
}
