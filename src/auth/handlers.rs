//! Auth HTTP handlers: register, verify email, login.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::handlers::http::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(b)| b)
        .map_err(|e| AppError::InvalidInput(e.body_text()))
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let body = json_body(body)?;
    body.validate()
        .map_err(|_| AppError::InvalidInput("Invalid email address".to_string()))?;

    state.accounts().register(&body.email, &body.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Account registered. Please check your email to verify it.".to_string(),
        }),
    ))
}

/// GET /verify_email/:token
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.accounts().verify_email(&token).await?;
    Ok(Json(MessageResponse {
        message: "Your account has been verified.".to_string(),
    }))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let body = json_body(body)?;
    let credential = state.accounts().login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        expires_in: credential.expires_in().num_seconds(),
        access_token: credential.token,
        token_type: "Bearer",
    }))
}
