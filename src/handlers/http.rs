//! HTTP handlers: protected resource and health.

use axum::{http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::json;

use crate::models::Identity;
use crate::services::AccountService;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
}

impl AppState {
    pub fn new(account_service: AccountService) -> Self {
        Self { account_service }
    }

    pub fn accounts(&self) -> &AccountService {
        &self.account_service
    }
}

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub logged_in_as: String,
}

/// GET /protected. Needs `Authorization: Bearer <access_token>` (see `require_access`).
pub async fn protected(Extension(identity): Extension<Identity>) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        logged_in_as: identity.email,
    })
}

/// GET /health
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "authgate" })),
    )
}
