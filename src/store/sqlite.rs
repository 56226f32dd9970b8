// ABOUTME: SQLite AnalysisStore using sqlx with scalar score columns and a versioned JSON payload
// ABOUTME: Upserts on (user_id, domain, analysis_date) so recomputes replace rows in place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;
use wellness_core::errors::{AppError, AppResult};
use wellness_core::models::{
    AnalysisResult, BalanceMetrics, DataQuality, HistoryPoint, Insights, Pillar, PillarScores,
    PillarStatus, PredictiveMetrics, RiskProfile, SnapshotRef, WellnessDomain,
    ANALYSIS_PAYLOAD_VERSION,
};

use super::AnalysisStore;

/// Less-structured part of a result, stored as one JSON blob
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPayload {
    balance_metrics: BalanceMetrics,
    risk_profile: RiskProfile,
    insights: Insights,
    predictive_metrics: PredictiveMetrics,
    pillar_statuses: BTreeMap<Pillar, PillarStatus>,
    performance: BTreeMap<String, f64>,
    data_quality: DataQuality,
}

impl StoredPayload {
    fn from_result(result: &AnalysisResult) -> Self {
        Self {
            balance_metrics: result.balance_metrics.clone(),
            risk_profile: result.risk_profile.clone(),
            insights: result.insights.clone(),
            predictive_metrics: result.predictive_metrics.clone(),
            pillar_statuses: result.pillar_statuses.clone(),
            performance: result.performance.clone(),
            data_quality: result.data_quality.clone(),
        }
    }
}

/// Analysis store on a `SQLite` pool
#[derive(Clone)]
pub struct SqliteAnalysisStore {
    pool: SqlitePool,
}

impl SqliteAnalysisStore {
    /// Wrap an existing pool; call [`SqliteAnalysisStore::migrate`] before use
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`, creating the file if needed, and migrate
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migration fails
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let creatable = database_url.starts_with("sqlite:")
            && !database_url.contains('?')
            && !database_url.contains(":memory:");
        let connection_options = if creatable {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open {database_url}: {e}")))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `wellness_analyses` table and its indexes
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS wellness_analyses (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                domain TEXT NOT NULL,
                analysis_date TEXT NOT NULL,
                snapshot_fingerprint TEXT NOT NULL,
                global_score REAL NOT NULL,
                risk_level TEXT NOT NULL,
                risk_score REAL NOT NULL,
                harmony REAL NOT NULL,
                consistency REAL NOT NULL,
                synergy REAL NOT NULL,
                confidence TEXT NOT NULL,
                pillar_scores TEXT NOT NULL,
                payload_version TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(user_id, domain, analysis_date)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create wellness_analyses: {e}")))?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_wellness_analyses_user_domain_date
            ON wellness_analyses (user_id, domain, analysis_date DESC)
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create analysis index: {e}")))?;

        Ok(())
    }

    fn row_to_result(row: &SqliteRow) -> AppResult<AnalysisResult> {
        let payload_version: String = row.get("payload_version");
        if payload_version != ANALYSIS_PAYLOAD_VERSION {
            return Err(AppError::database(format!(
                "Unsupported analysis payload version '{payload_version}'"
            )));
        }

        let payload_json: String = row.get("payload");
        let payload: StoredPayload = serde_json::from_str(&payload_json)
            .map_err(|e| AppError::database(format!("Invalid analysis payload: {e}")))?;
        let user_id = parse_uuid(row, "user_id")?;

        Ok(AnalysisResult {
            id: parse_uuid(row, "id")?,
            user_id,
            snapshot_ref: SnapshotRef {
                user_id,
                domain: parse_domain(row)?,
                date: parse_date(row)?,
                fingerprint: row.get("snapshot_fingerprint"),
            },
            global_score: row.get("global_score"),
            pillar_scores: parse_pillar_scores(row)?,
            balance_metrics: payload.balance_metrics,
            risk_profile: payload.risk_profile,
            insights: payload.insights,
            predictive_metrics: payload.predictive_metrics,
            pillar_statuses: payload.pillar_statuses,
            performance: payload.performance,
            data_quality: payload.data_quality,
            created_at: parse_timestamp(row, "created_at")?,
        })
    }
}

fn parse_uuid(row: &SqliteRow, column: &str) -> AppResult<Uuid> {
    let raw: String = row.get(column);
    Uuid::parse_str(&raw).map_err(|e| AppError::database(format!("Invalid UUID in {column}: {e}")))
}

fn parse_domain(row: &SqliteRow) -> AppResult<WellnessDomain> {
    let raw: String = row.get("domain");
    raw.parse().map_err(AppError::database)
}

fn parse_date(row: &SqliteRow) -> AppResult<NaiveDate> {
    let raw: String = row.get("analysis_date");
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|e| AppError::database(format!("Invalid analysis_date '{raw}': {e}")))
}

fn parse_timestamp(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let raw: String = row.get(column);
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid {column} '{raw}': {e}")))
}

fn parse_pillar_scores(row: &SqliteRow) -> AppResult<PillarScores> {
    let raw: String = row.get("pillar_scores");
    serde_json::from_str(&raw)
        .map_err(|e| AppError::database(format!("Invalid pillar_scores: {e}")))
}

#[async_trait]
impl AnalysisStore for SqliteAnalysisStore {
    async fn upsert(&self, result: &AnalysisResult) -> AppResult<()> {
        let pillar_scores = serde_json::to_string(&result.pillar_scores)?;
        let payload = serde_json::to_string(&StoredPayload::from_result(result))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO wellness_analyses (
                id, user_id, domain, analysis_date, snapshot_fingerprint,
                global_score, risk_level, risk_score, harmony, consistency, synergy,
                confidence, pillar_scores, payload_version, payload, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT(user_id, domain, analysis_date) DO UPDATE SET
                snapshot_fingerprint = excluded.snapshot_fingerprint,
                global_score = excluded.global_score,
                risk_level = excluded.risk_level,
                risk_score = excluded.risk_score,
                harmony = excluded.harmony,
                consistency = excluded.consistency,
                synergy = excluded.synergy,
                confidence = excluded.confidence,
                pillar_scores = excluded.pillar_scores,
                payload_version = excluded.payload_version,
                payload = excluded.payload,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            ",
        )
        .bind(result.id.to_string())
        .bind(result.user_id.to_string())
        .bind(result.domain().as_str())
        .bind(result.date().format("%Y-%m-%d").to_string())
        .bind(&result.snapshot_ref.fingerprint)
        .bind(result.global_score)
        .bind(result.risk_profile.level.as_str())
        .bind(result.risk_profile.risk_score)
        .bind(result.balance_metrics.harmony)
        .bind(result.balance_metrics.consistency)
        .bind(result.balance_metrics.synergy)
        .bind(result.data_quality.confidence.as_str())
        .bind(pillar_scores)
        .bind(ANALYSIS_PAYLOAD_VERSION)
        .bind(payload)
        .bind(result.created_at.to_rfc3339())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to upsert analysis: {e}"))
                .with_user_id(result.user_id)
        })?;

        debug!(
            user.id = %result.user_id,
            domain = %result.domain(),
            date = %result.date(),
            "Analysis upserted"
        );
        Ok(())
    }

    async fn get(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        date: NaiveDate,
    ) -> AppResult<Option<AnalysisResult>> {
        let row = sqlx::query(
            r"
            SELECT * FROM wellness_analyses
            WHERE user_id = $1 AND domain = $2 AND analysis_date = $3
            ",
        )
        .bind(user_id.to_string())
        .bind(domain.as_str())
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get analysis: {e}")))?;

        row.map(|r| Self::row_to_result(&r)).transpose()
    }

    async fn history(
        &self,
        user_id: Uuid,
        domain: WellnessDomain,
        before: NaiveDate,
        limit: usize,
    ) -> AppResult<Vec<HistoryPoint>> {
        let rows = sqlx::query(
            r"
            SELECT analysis_date, global_score, pillar_scores FROM wellness_analyses
            WHERE user_id = $1 AND domain = $2 AND analysis_date < $3
            ORDER BY analysis_date DESC
            LIMIT $4
            ",
        )
        .bind(user_id.to_string())
        .bind(domain.as_str())
        .bind(before.format("%Y-%m-%d").to_string())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load analysis history: {e}")))?;

        let mut points = rows
            .iter()
            .map(|row| {
                Ok(HistoryPoint {
                    date: parse_date(row)?,
                    global_score: row.get("global_score"),
                    pillar_scores: parse_pillar_scores(row)?,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        points.reverse();
        Ok(points)
    }
}
