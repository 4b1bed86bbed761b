//! Account repository: point lookups by email and by token, insert, update.

use crate::error::{AppError, AppResult};
use crate::models::Account;
use async_trait::async_trait;

use super::DbPool;

/// Storage seam for accounts. `insert` must reject a second account with the same
/// email atomically (`AppError::DuplicateAccount`), not via a prior read.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Account>>;

    async fn insert(&self, account: &Account) -> AppResult<()>;

    /// Persist the mutable fields (`verified`, token, expiry) of an existing account,
    /// provided its stored verification token still equals `expected_token`.
    /// Compare-and-set: a lost race yields `AppError::InvalidToken` with no write.
    async fn update(&self, account: &Account, expected_token: &str) -> AppResult<()>;
}

const ACCOUNT_COLUMNS: &str =
    "id, email, password_hash, verified, verification_token, token_expiry, created_at";

/// PostgreSQL-backed repository. Uniqueness is enforced by the `accounts.email` constraint.
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: DbPool,
}

impl PgAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE verification_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, account: &Account) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, verified, verification_token, token_expiry, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.verified)
        .bind(&account.verification_token)
        .bind(account.token_expiry)
        .bind(account.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::DuplicateAccount)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, account: &Account, expected_token: &str) -> AppResult<()> {
        let r = sqlx::query(
            r#"
            UPDATE accounts SET verified = $1, verification_token = $2, token_expiry = $3
            WHERE id = $4 AND verification_token = $5
            "#,
        )
        .bind(account.verified)
        .bind(&account.verification_token)
        .bind(account.token_expiry)
        .bind(account.id)
        .bind(expected_token)
        .execute(&self.pool)
        .await?;
        if r.rows_affected() == 0 {
            return Err(AppError::InvalidToken);
        }
        Ok(())
    }
}
