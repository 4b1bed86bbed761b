//! In-process account store for tests and local runs.

use crate::error::{AppError, AppResult};
use crate::models::Account;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::AccountRepository;

/// Accounts keyed by id. The uniqueness check and insert happen under one write lock.
#[derive(Clone, Default)]
pub struct MemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert(&self, account: &Account) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AppError::DuplicateAccount);
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account, expected_token: &str) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .get_mut(&account.id)
            .filter(|a| a.verification_token.as_deref() == Some(expected_token))
            .ok_or(AppError::InvalidToken)?;
        stored.verified = account.verified;
        stored.verification_token = account.verification_token.clone();
        stored.token_expiry = account.token_expiry;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn account(email: &str, token: &str) -> Account {
        let now = Utc::now();
        Account::pending(
            email.to_string(),
            "hash".to_string(),
            token.to_string(),
            now + Duration::hours(1),
            now,
        )
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let repo = MemoryAccountRepository::new();
        repo.insert(&account("a@b.com", "t1")).await.unwrap();
        let err = repo.insert(&account("a@b.com", "t2")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateAccount));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn lookups_by_email_and_token() {
        let repo = MemoryAccountRepository::new();
        let stored = account("a@b.com", "t1");
        repo.insert(&stored).await.unwrap();
        assert_eq!(repo.find_by_email("a@b.com").await.unwrap(), Some(stored.clone()));
        assert_eq!(repo.find_by_token("t1").await.unwrap(), Some(stored));
        assert!(repo.find_by_token("t2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cleared_token_no_longer_matches() {
        let repo = MemoryAccountRepository::new();
        let mut stored = account("a@b.com", "t1");
        repo.insert(&stored).await.unwrap();
        stored.mark_verified();
        repo.update(&stored, "t1").await.unwrap();
        assert!(repo.find_by_token("t1").await.unwrap().is_none());
        assert!(repo.find_by_email("a@b.com").await.unwrap().unwrap().verified);
    }

    #[tokio::test]
    async fn update_with_stale_token_writes_nothing() {
        let repo = MemoryAccountRepository::new();
        let mut stored = account("a@b.com", "t1");
        repo.insert(&stored).await.unwrap();
        stored.mark_verified();
        repo.update(&stored, "t1").await.unwrap();

        let err = repo.update(&stored, "t1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));

        let mut other = account("c@d.com", "t2");
        repo.insert(&other).await.unwrap();
        other.mark_verified();
        let err = repo.update(&other, "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
        assert!(!repo.find_by_email("c@d.com").await.unwrap().unwrap().verified);
    }
}
