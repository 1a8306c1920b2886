use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::Session;
use crate::models::{
    ApplicationRecord, ApplicationScore, ApplicationStatus, PreviewApplicationRequest, PreviewApplicationResponse,
    ProviderApplicationSubmission, ReviewApplicationRequest, ReviewApplicationResponse,
    ScoreApplicationResponse,
};
use crate::routes::{backend_error_response, error_response, require_admin, AppState};
use crate::services::{BackendClient, BackendError, CacheKey, PostgresError, ReviewDecision};

const HISTORY_LIMIT: usize = 50;

/// Configure provider application routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/applications/preview", web::post().to(preview_application))
        .route("/applications/{id}/score", web::post().to(score_application))
        .route("/applications/{id}/scores", web::get().to(score_history))
        .route("/applications/{id}/review", web::post().to(review_application))
        .route("/applications/{id}/review", web::get().to(latest_review));
}

/// Score application answers without storing anything
///
/// POST /api/v1/applications/preview
async fn preview_application(
    state: web::Data<AppState>,
    _session: Session,
    req: web::Json<PreviewApplicationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let submission = ProviderApplicationSubmission::from(req.into_inner());
    let score = state.scorer.score(&submission);

    HttpResponse::Ok().json(PreviewApplicationResponse::from(score))
}

/// Load an application the session may act on: its owner or an admin
async fn load_owned_application(
    state: &AppState,
    session: &Session,
    application_id: &str,
) -> Result<ApplicationRecord, HttpResponse> {
    let record = state
        .backend
        .get_application(application_id)
        .await
        .map_err(|e| backend_error_response("Failed to fetch application", &e))?;

    if record.user_id != session.user_id {
        require_admin(&state.backend, session).await?;
    }

    Ok(record)
}

/// Stop caching rankings computed before a visibility change
async fn invalidate_rankings(state: &AppState) {
    if let Err(e) = state
        .cache
        .invalidate_pattern(CacheKey::RECOMMENDATIONS_PATTERN)
        .await
    {
        tracing::warn!("Failed to invalidate cached rankings: {}", e);
    }
}

/// Write the outcome of a scoring run to the backend
///
/// The provider approval is written before the application status, so a
/// failed write leaves the application undecided and scoring can be retried.
pub(crate) async fn advance_scored_application(
    backend: &BackendClient,
    application_id: &str,
    user_id: &str,
    score: &ApplicationScore,
) -> Result<ApplicationStatus, BackendError> {
    let status = if score.auto_approved {
        backend.set_provider_approved(user_id, true).await?;
        ApplicationStatus::Approved
    } else {
        ApplicationStatus::UnderReview
    };

    backend
        .update_application_status(application_id, status, Some(score))
        .await?;

    Ok(status)
}

/// Score a submitted application and advance its status
///
/// POST /api/v1/applications/{id}/score
///
/// Applications at or above the auto-approve threshold are approved
/// immediately; everything else is queued for human review.
async fn score_application(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> impl Responder {
    let application_id = path.into_inner();

    let record = match load_owned_application(&state, &session, &application_id).await {
        Ok(record) => record,
        Err(response) => return response,
    };

    if matches!(
        record.status,
        ApplicationStatus::Approved | ApplicationStatus::Rejected
    ) {
        return error_response(
            StatusCode::CONFLICT,
            "Application already decided",
            format!("Application {} is {}", application_id, record.status.as_str()),
        );
    }

    let score = state.scorer.score(&record.submission);

    if let Err(e) = state.postgres.record_score(&application_id, &score).await {
        tracing::error!("Failed to record score for {}: {}", application_id, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record score", e);
    }

    let status = match advance_scored_application(&state.backend, &application_id, &record.user_id, &score).await {
        Ok(status) => status,
        Err(e) => return backend_error_response("Failed to update application", &e),
    };

    if score.auto_approved {
        invalidate_rankings(&state).await;
    }

    tracing::info!(
        "Application {} scored {} ({}), status {}",
        application_id,
        score.score,
        score.tier,
        status.as_str()
    );

    let hint_messages = score.hints.iter().map(|h| h.message().to_string()).collect();

    HttpResponse::Ok().json(ScoreApplicationResponse {
        application_id,
        status,
        score,
        hint_messages,
    })
}

/// Score history for an application, newest first
///
/// GET /api/v1/applications/{id}/scores
async fn score_history(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> impl Responder {
    let application_id = path.into_inner();

    if let Err(response) = load_owned_application(&state, &session, &application_id).await {
        return response;
    }

    match state.postgres.get_score_history(&application_id, HISTORY_LIMIT).await {
        Ok(history) => HttpResponse::Ok().json(serde_json::json!({
            "applicationId": application_id,
            "scores": history,
            "count": history.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch score history for {}: {}", application_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch score history", e)
        }
    }
}

/// Check the reviewer is an admin, then validate the decision
async fn authorize_review(
    backend: &BackendClient,
    session: &Session,
    req: &ReviewApplicationRequest,
) -> Result<ReviewDecision, HttpResponse> {
    require_admin(backend, session).await?;

    req.validate()
        .map_err(|errors| error_response(StatusCode::BAD_REQUEST, "Validation failed", errors))?;

    ReviewDecision::parse(&req.decision).ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "Invalid decision",
            "Decision must be one of: approve, reject",
        )
    })
}

/// Record a human approve/reject decision
///
/// POST /api/v1/applications/{id}/review
///
/// Request body:
/// ```json
/// {
///   "decision": "approve|reject",
///   "notes": "string"
/// }
/// ```
async fn review_application(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    req: web::Json<ReviewApplicationRequest>,
) -> impl Responder {
    let decision = match authorize_review(&state.backend, &session, &req).await {
        Ok(decision) => decision,
        Err(response) => return response,
    };

    let application_id = path.into_inner();
    let record = match state.backend.get_application(&application_id).await {
        Ok(record) => record,
        Err(e) => return backend_error_response("Failed to fetch application", &e),
    };

    let decision_id = match state
        .postgres
        .record_review(&application_id, &session.user_id, decision, req.notes.as_deref())
        .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to record review for {}: {}", application_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record review", e);
        }
    };

    let approved = decision == ReviewDecision::Approved;
    if let Err(e) = state.backend.set_provider_approved(&record.user_id, approved).await {
        return backend_error_response("Failed to update provider approval", &e);
    }
    invalidate_rankings(&state).await;

    let status = ApplicationStatus::from(decision);

    if let Err(e) = state
        .backend
        .update_application_status(&application_id, status, None)
        .await
    {
        return backend_error_response("Failed to update application", &e);
    }

    HttpResponse::Ok().json(ReviewApplicationResponse {
        application_id,
        status,
        decision_id,
    })
}

/// Most recent human decision for an application
///
/// GET /api/v1/applications/{id}/review
async fn latest_review(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> impl Responder {
    let application_id = path.into_inner();

    if let Err(response) = load_owned_application(&state, &session, &application_id).await {
        return response;
    }

    match state.postgres.latest_review(&application_id).await {
        Ok(review) => HttpResponse::Ok().json(review),
        Err(PostgresError::NotFound(message)) => {
            error_response(StatusCode::NOT_FOUND, "Review not found", message)
        }
        Err(e) => {
            tracing::error!("Failed to fetch review for {}: {}", application_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch review", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::score_application;
    use crate::services::BackendTables;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn backend_for(url: String) -> BackendClient {
        BackendClient::new(url, "test_key".to_string(), BackendTables::default(), Duration::from_secs(5))
            .unwrap()
    }

    fn approvable_score() -> ApplicationScore {
        score_application(&ProviderApplicationSubmission {
            headline: Some("Klaviyo flows for DTC fashion brands".to_string()),
            years_experience: Some("5+".to_string()),
            case_studies: Some("x".repeat(600)),
            portfolio_url: Some("https://portfolio.example.com".to_string()),
            linkedin_url: Some("https://linkedin.com/in/someone".to_string()),
            guarantee_offered: Some(true),
            expertise_areas: vec!["flows".into(), "sms".into(), "copy".into(), "design".into(), "ops".into()],
        })
    }

    fn session(user_id: &str) -> Session {
        Session {
            user_id: user_id.to_string(),
            email: None,
        }
    }

    fn review(decision: &str) -> ReviewApplicationRequest {
        ReviewApplicationRequest {
            decision: decision.to_string(),
            notes: None,
        }
    }

    async fn mock_role(server: &mut Server, role: &str) -> mockito::Mock {
        server
            .mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::json!([{"role": role, "onboarding_complete": true}]).to_string())
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_review_rejects_non_admin_before_body() {
        let mut server = Server::new_async().await;
        let _role = mock_role(&mut server, "founder").await;
        let backend = backend_for(server.url());

        let result = authorize_review(&backend, &session("founder_1"), &review("")).await;
        assert_eq!(result.unwrap_err().status(), StatusCode::FORBIDDEN);

        let result = authorize_review(&backend, &session("founder_1"), &review("maybe")).await;
        assert_eq!(result.unwrap_err().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_review_validates_admin_decision() {
        let mut server = Server::new_async().await;
        let _role = mock_role(&mut server, "admin").await;
        let backend = backend_for(server.url());

        let result = authorize_review(&backend, &session("admin_1"), &review("maybe")).await;
        assert_eq!(result.unwrap_err().status(), StatusCode::BAD_REQUEST);

        let result = authorize_review(&backend, &session("admin_1"), &review("")).await;
        assert_eq!(result.unwrap_err().status(), StatusCode::BAD_REQUEST);

        let decision = authorize_review(&backend, &session("admin_1"), &review("Approve")).await;
        assert_eq!(decision.unwrap(), ReviewDecision::Approved);
    }

    #[tokio::test]
    async fn test_failed_provider_approval_leaves_application_open() {
        let mut server = Server::new_async().await;
        let profiles = server
            .mock("PATCH", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let applications = server
            .mock("PATCH", "/rest/v1/provider_applications")
            .match_query(Matcher::Any)
            .with_status(204)
            .expect(0)
            .create_async()
            .await;

        let backend = backend_for(server.url());
        let score = approvable_score();
        assert!(score.auto_approved);

        let result = advance_scored_application(&backend, "app_1", "provider_1", &score).await;

        assert!(matches!(result, Err(BackendError::ApiError(_))));
        profiles.assert_async().await;
        applications.assert_async().await;
    }

    #[tokio::test]
    async fn test_auto_approval_writes_provider_then_status() {
        let mut server = Server::new_async().await;
        let profiles = server
            .mock("PATCH", "/rest/v1/profiles")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.provider_1".into()))
            .match_body(Matcher::Json(serde_json::json!({"approved": true})))
            .with_status(204)
            .create_async()
            .await;
        let applications = server
            .mock("PATCH", "/rest/v1/provider_applications")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.app_1".into()))
            .match_body(Matcher::PartialJson(serde_json::json!({"status": "approved"})))
            .with_status(204)
            .create_async()
            .await;

        let backend = backend_for(server.url());
        let status = advance_scored_application(&backend, "app_1", "provider_1", &approvable_score())
            .await
            .unwrap();

        assert_eq!(status, ApplicationStatus::Approved);
        profiles.assert_async().await;
        applications.assert_async().await;
    }

    #[tokio::test]
    async fn test_low_score_queues_for_review() {
        let mut server = Server::new_async().await;
        let profiles = server
            .mock("PATCH", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let applications = server
            .mock("PATCH", "/rest/v1/provider_applications")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(serde_json::json!({"status": "under_review"})))
            .with_status(204)
            .create_async()
            .await;

        let backend = backend_for(server.url());
        let score = score_application(&ProviderApplicationSubmission::default());
        let status = advance_scored_application(&backend, "app_1", "provider_1", &score)
            .await
            .unwrap();

        assert_eq!(status, ApplicationStatus::UnderReview);
        profiles.assert_async().await;
        applications.assert_async().await;
    }
}
