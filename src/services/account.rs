//! Account lifecycle: register, verify email, login, and the stateless access check.

use crate::auth::{normalize_email, AuthAppService, JwtSecret};
use crate::clock::Clock;
use crate::db::AccountRepository;
use crate::dispatch::Dispatcher;
use crate::error::{AppError, AppResult};
use crate::models::{AccessCredential, Account, Identity};
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const VERIFICATION_SUBJECT: &str = "Verify your account";

/// Tunables injected from configuration.
#[derive(Debug, Clone)]
pub struct AccountPolicy {
    pub min_password_length: usize,
    pub verification_ttl: Duration,
    /// Link prefix; the token is appended as the last path segment.
    pub verification_base_url: String,
    pub dispatch_timeout: std::time::Duration,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            verification_ttl: Duration::hours(1),
            verification_base_url: "http://127.0.0.1:5001/verify_email".to_string(),
            dispatch_timeout: std::time::Duration::from_secs(5),
        }
    }
}

impl AccountPolicy {
    fn verification_link(&self, token: &str) -> String {
        format!("{}/{}", self.verification_base_url.trim_end_matches('/'), token)
    }
}

/// Holds the store, signer, dispatcher and clock; built once at startup and cloned per request.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    dispatcher: Arc<dyn Dispatcher>,
    jwt: JwtSecret,
    clock: Arc<dyn Clock>,
    policy: AccountPolicy,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        dispatcher: Arc<dyn Dispatcher>,
        jwt: JwtSecret,
        clock: Arc<dyn Clock>,
        policy: AccountPolicy,
    ) -> Self {
        Self {
            accounts,
            dispatcher,
            jwt,
            clock,
            policy,
        }
    }

    /// Create an unverified account and send its verification link.
    /// A failed or slow dispatch is logged and does not undo the account.
    #[instrument(skip_all, fields(email = %email.trim()))]
    pub async fn register(&self, email: &str, password: &str) -> AppResult<()> {
        let email = normalize_email(email);
        AuthAppService::validate_email(&email)?;

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateAccount);
        }
        AuthAppService::validate_password(password, self.policy.min_password_length)?;

        let password_hash = AuthAppService::hash_password(password)?;
        let token = AuthAppService::generate_verification_token();
        let now = self.clock.now();
        let account = Account::pending(
            email,
            password_hash,
            token.clone(),
            now + self.policy.verification_ttl,
            now,
        );
        // the unique constraint decides races that slipped past the lookup above
        self.accounts.insert(&account).await?;
        info!(account_id = %account.id, "account registered");

        let body = format!(
            "Click this link to verify your account: {}",
            self.policy.verification_link(&token)
        );
        let delivery = tokio::time::timeout(
            self.policy.dispatch_timeout,
            self.dispatcher.notify(&account.email, VERIFICATION_SUBJECT, &body),
        )
        .await;
        match delivery {
            Ok(Ok(())) => debug!(account_id = %account.id, "verification link dispatched"),
            Ok(Err(e)) => {
                warn!(account_id = %account.id, error = %e, "verification dispatch failed")
            }
            Err(_) => warn!(account_id = %account.id, "verification dispatch timed out"),
        }
        Ok(())
    }

    /// Consume a verification token. A consumed token is cleared, so replays find nothing.
    #[instrument(skip_all)]
    pub async fn verify_email(&self, token: &str) -> AppResult<()> {
        let mut account = self
            .accounts
            .find_by_token(token)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !account.token_is_live(self.clock.now()) {
            debug!(account_id = %account.id, "verification token expired");
            return Err(AppError::ExpiredToken);
        }

        account.mark_verified();
        // a concurrent consumer of the same token makes this fail with InvalidToken
        self.accounts.update(&account, token).await?;
        info!(account_id = %account.id, "account verified");
        Ok(())
    }

    /// Check the password, then the verified flag, then issue an access credential.
    #[instrument(skip_all, fields(email = %email.trim()))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AccessCredential> {
        let email = normalize_email(email);
        let Some(account) = self.accounts.find_by_email(&email).await? else {
            AuthAppService::verify_against_dummy(password);
            return Err(AppError::InvalidCredentials);
        };

        if !AuthAppService::verify_password(password, &account.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }
        if !account.verified {
            return Err(AppError::UnverifiedAccount);
        }

        let credential = self.jwt.issue(&account.email)?;
        info!(account_id = %account.id, "access credential issued");
        Ok(credential)
    }

    /// Self-contained check of a presented credential; no store access.
    pub fn authorize(&self, credential: Option<&str>) -> AppResult<Identity> {
        let credential = credential
            .filter(|c| !c.is_empty())
            .ok_or(AppError::MissingCredential)?;
        self.jwt.validate(credential)
    }
}
