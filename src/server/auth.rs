//! `X-Api-Key` header gate.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use crate::error::ServiceError;

use super::AppState;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Compares presented keys against the configured one.
#[derive(Clone)]
pub struct ApiKeyValidator {
    key: String,
}

impl std::fmt::Debug for ApiKeyValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyValidator").finish_non_exhaustive()
    }
}

impl ApiKeyValidator {
    /// Fails if `key` is empty or whitespace.
    pub fn new(key: impl Into<String>) -> Result<Self, ServiceError> {
        let key = key.into();
        if key.trim().is_empty() {
            error!("API key is not configured");
            return Err(ServiceError::Config("API key is not configured".to_string()));
        }
        Ok(Self { key })
    }

    pub fn validate(&self, candidate: &str) -> bool {
        if candidate.trim().is_empty() {
            warn!("validation attempt with an empty API key");
            return false;
        }
        candidate == self.key
    }
}

/// Middleware rejecting requests without a valid `X-Api-Key` with `401`.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let valid = match request.headers().get(API_KEY_HEADER) {
        None => {
            warn!("API key was not provided");
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Some(value) => state.api_key.validate(value.to_str().unwrap_or_default()),
    };

    if !valid {
        warn!("invalid API key provided");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    info!("API key validated successfully");
    next.run(request).await
}
