// Route exports
pub mod applications;
pub mod matches;
pub mod session;

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;

use crate::auth::{Session, SessionVerifier};
use crate::core::{ApplicationScorer, Matcher};
use crate::models::{ErrorResponse, HealthResponse, Role};
use crate::services::{BackendClient, BackendError, CacheManager, PostgresClient};

/// Caps applied to ranking requests
#[derive(Debug, Clone, Copy)]
pub struct MatchLimits {
    pub max_limit: u16,
    pub candidate_pool: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            max_limit: 100,
            candidate_pool: 500,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub sessions: Arc<SessionVerifier>,
    pub matcher: Matcher,
    pub scorer: ApplicationScorer,
    pub limits: MatchLimits,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(matches::configure)
            .configure(applications::configure)
            .configure(session::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);
    let backend_healthy = state.backend.health_check().await;

    let status = if pg_healthy && backend_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// JSON error body with the given status
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

/// Map a backend failure onto an HTTP response
pub(crate) fn backend_error_response(error: &str, e: &BackendError) -> HttpResponse {
    let status = match e {
        BackendError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    };

    if status != StatusCode::NOT_FOUND {
        tracing::error!("{}: {}", error, e);
    }

    error_response(status, error, e)
}

/// Reject the request unless the session belongs to an admin
pub(crate) async fn require_admin(backend: &BackendClient, session: &Session) -> Result<(), HttpResponse> {
    let auth = backend
        .get_auth_state(&session.user_id)
        .await
        .map_err(|e| backend_error_response("Failed to load session state", &e))?;

    if auth.role == Some(Role::Admin) {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::FORBIDDEN,
            "Forbidden",
            "Admin role required",
        ))
    }
}
