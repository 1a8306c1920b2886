use crate::models::{
    ApplicationRecord, ApplicationScore, ApplicationStatus, AuthState, FounderProfile,
    ProviderProfile, Role,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the hosted backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the hosted backend
#[derive(Debug, Clone)]
pub struct BackendTables {
    pub profiles: String,
    pub provider_applications: String,
}

impl Default for BackendTables {
    fn default() -> Self {
        Self {
            profiles: "profiles".to_string(),
            provider_applications: "provider_applications".to_string(),
        }
    }
}

/// Role and onboarding columns of a profile row
#[derive(Debug, Deserialize)]
struct ProfileStateRow {
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    onboarding_complete: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ApplicationStatusRow {
    status: ApplicationStatus,
}

/// Client for the hosted backend's REST interface
///
/// Handles all communication with the profile and submission stores:
/// - Fetching founder and provider profiles
/// - Loading provider applications
/// - Writing application status and provider approval changes
pub struct BackendClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: BackendTables,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(
        base_url: String,
        api_key: String,
        tables: BackendTables,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Run a GET against a table and decode the returned rows
    async fn select<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, BackendError> {
        tracing::debug!("Querying backend: {}", url);

        let response = self.authorize(self.client.get(url)).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Backend query failed: {} - {}", status, body);
            return Err(BackendError::ApiError(format!("Query failed: {}", status)));
        }

        let json: Value = response.json().await?;
        let rows = json
            .as_array()
            .ok_or_else(|| BackendError::InvalidResponse("Expected an array of rows".into()))?;

        rows.iter()
            .map(|row| {
                serde_json::from_value(row.clone())
                    .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse row: {}", e)))
            })
            .collect()
    }

    /// PATCH rows matching `filter` with the given JSON body
    async fn update(&self, table: &str, filter: &str, body: Value) -> Result<(), BackendError> {
        let url = format!("{}?{}", self.table_url(table), filter);

        let response = self
            .authorize(self.client.patch(&url))
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            return Err(BackendError::ApiError(format!("Update of {} failed: {}", table, status)));
        }

        Ok(())
    }

    /// Fetch a founder profile by user id
    pub async fn get_founder(&self, user_id: &str) -> Result<FounderProfile, BackendError> {
        let url = format!(
            "{}?id=eq.{}&role=eq.founder&select=*",
            self.table_url(&self.tables.profiles),
            urlencoding::encode(user_id)
        );

        self.select::<FounderProfile>(&url)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("Founder profile not found for user {}", user_id)))
    }

    /// Fetch a single provider profile by user id
    pub async fn get_provider(&self, user_id: &str) -> Result<ProviderProfile, BackendError> {
        let url = format!(
            "{}?id=eq.{}&role=eq.provider&select=*",
            self.table_url(&self.tables.profiles),
            urlencoding::encode(user_id)
        );

        self.select::<ProviderProfile>(&url)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("Provider profile not found for user {}", user_id)))
    }

    /// Query providers visible to founders (approved and onboarded)
    ///
    /// Featured providers come first so a truncated pool keeps them.
    pub async fn list_visible_providers(&self, limit: usize) -> Result<Vec<ProviderProfile>, BackendError> {
        let url = format!(
            "{}?role=eq.provider&approved=is.true&onboarding_complete=is.true&order=is_featured.desc.nullslast,id.asc&limit={}&select=*",
            self.table_url(&self.tables.profiles),
            limit
        );

        let providers = self.select::<ProviderProfile>(&url).await?;

        tracing::debug!("Queried {} visible providers", providers.len());

        Ok(providers)
    }

    /// Load a provider application by id
    pub async fn get_application(&self, application_id: &str) -> Result<ApplicationRecord, BackendError> {
        let url = format!(
            "{}?id=eq.{}&select=*",
            self.table_url(&self.tables.provider_applications),
            urlencoding::encode(application_id)
        );

        self.select::<ApplicationRecord>(&url)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("Application {} not found", application_id)))
    }

    /// Load the role, onboarding and application state for a user
    pub async fn get_auth_state(&self, user_id: &str) -> Result<AuthState, BackendError> {
        let url = format!(
            "{}?id=eq.{}&select=role,onboarding_complete",
            self.table_url(&self.tables.profiles),
            urlencoding::encode(user_id)
        );

        let Some(profile) = self.select::<ProfileStateRow>(&url).await?.into_iter().next() else {
            // Signed up but no profile row yet
            return Ok(AuthState {
                authenticated: true,
                ..AuthState::default()
            });
        };

        let application_status = if profile.role == Some(Role::Provider) {
            let url = format!(
                "{}?user_id=eq.{}&select=status&order=created_at.desc&limit=1",
                self.table_url(&self.tables.provider_applications),
                urlencoding::encode(user_id)
            );
            self.select::<ApplicationStatusRow>(&url)
                .await?
                .into_iter()
                .next()
                .map(|row| row.status)
        } else {
            None
        };

        Ok(AuthState {
            authenticated: true,
            role: profile.role,
            onboarding_complete: profile.onboarding_complete.unwrap_or(false),
            application_status,
        })
    }

    /// Write a new status (and optionally the latest score) to an application
    pub async fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
        score: Option<&ApplicationScore>,
    ) -> Result<(), BackendError> {
        let mut body = json!({ "status": status.as_str() });
        if let (Some(score), Some(obj)) = (score, body.as_object_mut()) {
            obj.insert("score".to_string(), json!(score.score));
            obj.insert("tier".to_string(), json!(score.tier.as_str()));
            obj.insert("auto_approved".to_string(), json!(score.auto_approved));
        }

        let filter = format!("id=eq.{}", urlencoding::encode(application_id));
        self.update(&self.tables.provider_applications, &filter, body).await?;

        tracing::debug!("Application {} moved to {}", application_id, status.as_str());

        Ok(())
    }

    /// Set the approval flag that gates provider visibility
    pub async fn set_provider_approved(&self, user_id: &str, approved: bool) -> Result<(), BackendError> {
        let filter = format!("id=eq.{}", urlencoding::encode(user_id));
        self.update(&self.tables.profiles, &filter, json!({ "approved": approved }))
            .await
    }

    /// Reachability check used by the health endpoint
    pub async fn health_check(&self) -> bool {
        let url = format!("{}?select=id&limit=1", self.table_url(&self.tables.profiles));
        match self.authorize(self.client.get(&url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Backend health check failed: {}", e);
                false
            }
        }
    }
}
