//! Application error types: the account/credential failure taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Stable, machine-distinguishable failure kind reported alongside every error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    DuplicateAccount,
    WeakCredential,
    InvalidToken,
    ExpiredToken,
    InvalidCredentials,
    UnverifiedAccount,
    MissingCredential,
    InvalidCredential,
    ExpiredCredential,
    DependencyFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::DuplicateAccount => "duplicate_account",
            ErrorKind::WeakCredential => "weak_credential",
            ErrorKind::InvalidToken => "invalid_token",
            ErrorKind::ExpiredToken => "expired_token",
            ErrorKind::InvalidCredentials => "invalid_credentials",
            ErrorKind::UnverifiedAccount => "unverified_account",
            ErrorKind::MissingCredential => "missing_credential",
            ErrorKind::InvalidCredential => "invalid_credential",
            ErrorKind::ExpiredCredential => "expired_credential",
            ErrorKind::DependencyFailure => "dependency_failure",
        }
    }
}

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("An account with this email already exists")]
    DuplicateAccount,

    #[error("Password must be at least {min} characters")]
    WeakCredential { min: usize },

    #[error("Invalid verification token")]
    InvalidToken,

    #[error("Verification token has expired")]
    ExpiredToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account email address is not verified")]
    UnverifiedAccount,

    #[error("Missing access credential")]
    MissingCredential,

    #[error("Invalid access credential")]
    InvalidCredential,

    #[error("Access credential has expired")]
    ExpiredCredential,

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::DuplicateAccount => ErrorKind::DuplicateAccount,
            AppError::WeakCredential { .. } => ErrorKind::WeakCredential,
            AppError::InvalidToken => ErrorKind::InvalidToken,
            AppError::ExpiredToken => ErrorKind::ExpiredToken,
            AppError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AppError::UnverifiedAccount => ErrorKind::UnverifiedAccount,
            AppError::MissingCredential => ErrorKind::MissingCredential,
            AppError::InvalidCredential => ErrorKind::InvalidCredential,
            AppError::ExpiredCredential => ErrorKind::ExpiredCredential,
            AppError::Db(_)
            | AppError::Redis(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => ErrorKind::DependencyFailure,
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidInput
            | ErrorKind::WeakCredential
            | ErrorKind::InvalidToken
            | ErrorKind::ExpiredToken => StatusCode::BAD_REQUEST,
            ErrorKind::DuplicateAccount => StatusCode::CONFLICT,
            ErrorKind::InvalidCredentials
            | ErrorKind::MissingCredential
            | ErrorKind::InvalidCredential
            | ErrorKind::ExpiredCredential => StatusCode::UNAUTHORIZED,
            ErrorKind::UnverifiedAccount => StatusCode::FORBIDDEN,
            ErrorKind::DependencyFailure => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = if kind == ErrorKind::DependencyFailure {
            error!(error = %self, "dependency failure");
            "Service temporarily unavailable".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "error": message, "kind": kind.as_str() }));
        (self.status(), body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_errors_share_one_kind() {
        let err = AppError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.kind(), ErrorKind::DependencyFailure);
        let err = AppError::Db(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), ErrorKind::DependencyFailure);
    }

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(AppError::DuplicateAccount.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::UnverifiedAccount.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ExpiredToken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("down")).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn kinds_are_snake_case() {
        assert_eq!(ErrorKind::WeakCredential.as_str(), "weak_credential");
        assert_eq!(ErrorKind::ExpiredCredential.as_str(), "expired_credential");
    }
}
