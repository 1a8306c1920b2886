use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::Session;
use crate::core::{is_founder, is_visible_provider};
use crate::models::{FindMatchesRequest, FindMatchesResponse};
use crate::routes::{backend_error_response, error_response, AppState};
use crate::services::{CacheError, CacheKey};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches/find", web::post().to(find_matches))
        .route("/matches/{provider_id}", web::get().to(score_pair));
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "limit": 20,
///   "excludeProviderIds": ["string"],
///   "refresh": false
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    session: Session,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let founder_id = &session.user_id;
    let limit = req.limit.min(state.limits.max_limit) as usize;

    tracing::info!("Finding matches for founder: {}, limit: {}", founder_id, limit);

    // Exclusions are per-request, so only the plain ranking is cached
    let cacheable = req.exclude_provider_ids.is_empty();
    let cache_key = CacheKey::recommendations(founder_id, limit);

    if cacheable && !req.refresh {
        match state.cache.get::<FindMatchesResponse>(&cache_key).await {
            Ok(cached) => {
                tracing::debug!("Serving cached matches for {}", founder_id);
                return HttpResponse::Ok().json(cached);
            }
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cache read failed for {}: {}", cache_key, e),
        }
    }

    let founder = match state.backend.get_founder(founder_id).await {
        Ok(founder) => founder,
        Err(e) => return backend_error_response("Failed to fetch founder profile", &e),
    };

    if !is_founder(&founder) {
        return error_response(
            StatusCode::FORBIDDEN,
            "Forbidden",
            "Only founders can request matches",
        );
    }

    let candidates = match state
        .backend
        .list_visible_providers(state.limits.candidate_pool)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => return backend_error_response("Failed to query providers", &e),
    };

    tracing::debug!("Found {} candidates for {}", candidates.len(), founder_id);

    let result = state
        .matcher
        .find_matches(&founder, candidates, &req.exclude_provider_ids, limit);

    let generated_at = chrono::Utc::now();
    let matches = result
        .matches
        .into_iter()
        .map(|mut ranked| {
            ranked.recommendation = ranked.recommendation.generated_at(generated_at);
            ranked
        })
        .collect();

    let response = FindMatchesResponse {
        matches,
        total_results: result.total_candidates,
        generated_at,
    };

    tracing::info!(
        "Returning {} matches for founder {} (from {} candidates)",
        response.matches.len(),
        founder_id,
        result.total_candidates
    );

    if cacheable {
        if let Err(e) = state.cache.set(&cache_key, &response).await {
            tracing::warn!("Failed to cache matches for {}: {}", founder_id, e);
        }
    }

    HttpResponse::Ok().json(response)
}

/// Score the session founder against a single provider
///
/// GET /api/v1/matches/{provider_id}
async fn score_pair(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> impl Responder {
    let provider_id = path.into_inner();

    let founder = match state.backend.get_founder(&session.user_id).await {
        Ok(founder) => founder,
        Err(e) => return backend_error_response("Failed to fetch founder profile", &e),
    };

    let provider = match state.backend.get_provider(&provider_id).await {
        Ok(provider) => provider,
        Err(e) => return backend_error_response("Failed to fetch provider profile", &e),
    };

    // Unapproved providers are indistinguishable from missing ones
    if !is_visible_provider(&provider) {
        return error_response(
            StatusCode::NOT_FOUND,
            "Provider not found",
            format!("Provider {} is not available", provider_id),
        );
    }

    let recommendation = state
        .matcher
        .score(&founder, &provider)
        .generated_at(chrono::Utc::now());

    HttpResponse::Ok().json(recommendation)
}
