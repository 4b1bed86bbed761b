//! The persisted account record.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Registered account. `verification_token` and `token_expiry` are present only while
/// the account is waiting for its email address to be confirmed.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
    pub verification_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// New unverified account holding a pending verification token.
    pub fn pending(
        email: String,
        password_hash: String,
        token: String,
        token_expiry: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            verified: false,
            verification_token: Some(token),
            token_expiry: Some(token_expiry),
            created_at,
        }
    }

    /// Whether the pending token is still usable at `now`.
    pub fn token_is_live(&self, now: DateTime<Utc>) -> bool {
        matches!(self.token_expiry, Some(expiry) if now < expiry)
    }

    /// Transition to verified and drop the consumed token.
    pub fn mark_verified(&mut self) {
        self.verified = true;
        self.verification_token = None;
        self.token_expiry = None;
    }
}

/// Identity bound into an access credential and exposed to protected handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

/// Signed access credential returned by login.
#[derive(Debug, Clone)]
pub struct AccessCredential {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessCredential {
    pub fn expires_in(&self) -> chrono::Duration {
        self.expires_at - self.issued_at
    }
}
