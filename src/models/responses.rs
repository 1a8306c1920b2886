use serde::{Deserialize, Serialize};
use crate::models::domain::{ApplicationScore, ApplicationStatus, RankedMatch, Route, Tier};

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<RankedMatch>,
    pub total_results: usize,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Score for answers that were not persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewApplicationResponse {
    #[serde(flatten)]
    pub score: ApplicationScore,
    pub hint_messages: Vec<String>,
}

impl From<ApplicationScore> for PreviewApplicationResponse {
    fn from(score: ApplicationScore) -> Self {
        let hint_messages = score.hints.iter().map(|h| h.message().to_string()).collect();
        Self { score, hint_messages }
    }
}

/// Result of scoring a stored application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreApplicationResponse {
    pub application_id: String,
    pub status: ApplicationStatus,
    #[serde(flatten)]
    pub score: ApplicationScore,
    pub hint_messages: Vec<String>,
}

/// One entry of an application's score history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistoryEntry {
    pub id: uuid::Uuid,
    pub application_id: String,
    pub score: u8,
    pub tier: Tier,
    pub auto_approved: bool,
    pub breakdown: crate::models::domain::ScoreBreakdown,
    pub scored_at: chrono::DateTime<chrono::Utc>,
}

/// Outcome of a human review
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewApplicationResponse {
    pub application_id: String,
    pub status: ApplicationStatus,
    pub decision_id: uuid::Uuid,
}

/// Resolved landing route for the current session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationResponse {
    pub route: Route,
    pub path: String,
}

impl From<Route> for DestinationResponse {
    fn from(route: Route) -> Self {
        Self {
            route,
            path: route.path().to_string(),
        }
    }
}
