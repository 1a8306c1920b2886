use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ApplicationScore, ScoreBreakdown, ScoreHistoryEntry, Tier};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Outcome of a human application review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "review_decision", rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    /// Parse the decision verb sent by reviewers
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "approve" | "approved" => Some(ReviewDecision::Approved),
            "reject" | "rejected" => Some(ReviewDecision::Rejected),
            _ => None,
        }
    }
}

impl From<ReviewDecision> for crate::models::ApplicationStatus {
    fn from(value: ReviewDecision) -> Self {
        match value {
            ReviewDecision::Approved => crate::models::ApplicationStatus::Approved,
            ReviewDecision::Rejected => crate::models::ApplicationStatus::Rejected,
        }
    }
}

/// Recorded review of a provider application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: Uuid,
    pub application_id: String,
    pub reviewer_id: String,
    pub decision: ReviewDecision,
    pub notes: Option<String>,
    pub decided_at: chrono::DateTime<chrono::Utc>,
}

/// PostgreSQL client for the application review trail
///
/// The hosted backend only keeps the current status of an application.
/// This database keeps every automated score and every human decision so
/// reviewers can see how an application evolved.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Append an automated score to an application's history
    pub async fn record_score(
        &self,
        application_id: &str,
        score: &ApplicationScore,
    ) -> Result<Uuid, PostgresError> {
        if application_id.is_empty() {
            return Err(PostgresError::InvalidInput("application_id is empty".to_string()));
        }

        let id = Uuid::new_v4();
        let query = r#"
            INSERT INTO application_scores (id, application_id, score, tier, auto_approved, breakdown, scored_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(application_id)
            .bind(score.score as i32)
            .bind(score.tier.as_str())
            .bind(score.auto_approved)
            .bind(Json(score.breakdown))
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded score {} ({}) for application {}",
            score.score,
            score.tier,
            application_id
        );

        Ok(id)
    }

    /// Score history for an application, newest first
    pub async fn get_score_history(
        &self,
        application_id: &str,
        limit: usize,
    ) -> Result<Vec<ScoreHistoryEntry>, PostgresError> {
        let query = r#"
            SELECT id, application_id, score, tier, auto_approved, breakdown, scored_at
            FROM application_scores
            WHERE application_id = $1
            ORDER BY scored_at DESC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(application_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let tier: String = row.get("tier");
                let score: i32 = row.get("score");
                let breakdown: Json<ScoreBreakdown> = row.get("breakdown");

                Ok(ScoreHistoryEntry {
                    id: row.get("id"),
                    application_id: row.get("application_id"),
                    score: u8::try_from(score)
                        .map_err(|_| PostgresError::InvalidInput(format!("score out of range: {}", score)))?,
                    tier: tier.parse::<Tier>().map_err(PostgresError::InvalidInput)?,
                    auto_approved: row.get("auto_approved"),
                    breakdown: breakdown.0,
                    scored_at: row.get("scored_at"),
                })
            })
            .collect()
    }

    /// Record a human review decision
    pub async fn record_review(
        &self,
        application_id: &str,
        reviewer_id: &str,
        decision: ReviewDecision,
        notes: Option<&str>,
    ) -> Result<Uuid, PostgresError> {
        let id = Uuid::new_v4();
        let query = r#"
            INSERT INTO review_decisions (id, application_id, reviewer_id, decision, notes, decided_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(application_id)
            .bind(reviewer_id)
            .bind(decision)
            .bind(notes)
            .execute(&self.pool)
            .await?;

        tracing::info!(
            "Reviewer {} recorded {:?} for application {}",
            reviewer_id,
            decision,
            application_id
        );

        Ok(id)
    }

    /// Most recent review decision for an application
    pub async fn latest_review(&self, application_id: &str) -> Result<ReviewRecord, PostgresError> {
        let query = r#"
            SELECT id, application_id, reviewer_id, decision, notes, decided_at
            FROM review_decisions
            WHERE application_id = $1
            ORDER BY decided_at DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(application_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("No review for application {}", application_id)))?;

        Ok(ReviewRecord {
            id: row.get("id"),
            application_id: row.get("application_id"),
            reviewer_id: row.get("reviewer_id"),
            decision: row.get("decision"),
            notes: row.get("notes"),
            decided_at: row.get("decided_at"),
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
