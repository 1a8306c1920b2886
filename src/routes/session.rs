use actix_web::{web, HttpResponse, Responder};

use crate::auth::Session;
use crate::core::resolve_destination;
use crate::models::{AuthState, DestinationResponse};
use crate::routes::{backend_error_response, AppState};

/// Configure session routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/session/destination", web::get().to(destination));
}

/// Where the current caller should land
///
/// GET /api/v1/session/destination
///
/// Callers without a valid token are sent to the login screen rather
/// than rejected.
async fn destination(state: web::Data<AppState>, session: Option<Session>) -> impl Responder {
    let auth = match session {
        Some(session) => match state.backend.get_auth_state(&session.user_id).await {
            Ok(auth) => auth,
            Err(e) => return backend_error_response("Failed to load session state", &e),
        },
        None => AuthState::default(),
    };

    let route = resolve_destination(&auth);
    tracing::debug!("Resolved destination {:?} for {:?}", route, auth);

    HttpResponse::Ok().json(DestinationResponse::from(route))
}
