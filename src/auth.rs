//! Session handling for tokens issued by the hosted auth provider.
//!
//! Handlers receive an explicit [`Session`] argument; nothing reads auth
//! state from globals.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;

use crate::routes::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by hosted-auth access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
}

/// Verifies HS256 access tokens with the project's shared secret
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate a raw token and return its claims
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }

    /// Validate an `Authorization: Bearer <token>` header value
    pub fn verify_header(&self, header: Option<&str>) -> Result<Session, AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedHeader)?;

        let claims = self.verify(token.trim())?;

        Ok(Session {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

/// Authenticated caller, passed explicitly to handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("Session extractor used without application state");
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "Session verification unavailable",
            )));
        };

        let header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok());

        ready(state.sessions.verify_header(header).map_err(|e| {
            tracing::warn!("Session rejected on {}: {}", req.path(), e);
            actix_web::error::ErrorUnauthorized(e.to_string())
        }))
    }
}
