//! Persistence seams consumed by the orchestrator.
//!
//! The orchestrations only ever talk to these traits; MongoDB adapters live
//! in `database` and deterministic in-memory fakes (used by the integration
//! suite) are exported alongside, next to the contracts they satisfy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Account, AccountStatus, ConfirmationCode};
use crate::services::clock::truncate_subsec;
use crate::services::error::ServiceError;

/// Partial update applied to an account. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub status: Option<AccountStatus>,
    pub password_hash: Option<String>,
    pub reset_token_hash: Option<String>,
    pub reset_token_issued_at: Option<DateTime<Utc>>,
    pub confirmation_code_id: Option<String>,
}

/// Store for account records.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError>;

    /// Look up the account carrying the given reset-token digest.
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Account>, ServiceError>;

    async fn username_taken(&self, username: &str) -> Result<bool, ServiceError>;

    async fn email_taken(&self, email: &str) -> Result<bool, ServiceError>;

    async fn insert(&self, account: &Account) -> Result<(), ServiceError>;

    /// Apply a partial update, returning the updated record or `None` when
    /// no account has that id.
    async fn update_by_id(
        &self,
        id: &str,
        update: AccountUpdate,
    ) -> Result<Option<Account>, ServiceError>;

    /// Liveness probe against the backing store.
    async fn ping(&self) -> Result<(), ServiceError>;
}

/// Store for confirmation codes, keyed by the owning account's email.
#[async_trait]
pub trait ConfirmationCodeStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<ConfirmationCode>, ServiceError>;

    /// Persist a code for the account registered under `email`, stamping its
    /// creation time and replacing any code already on file (last writer
    /// wins; the previous code is not revoked anywhere else).
    async fn store_for_email(&self, code: &str, email: &str) -> Result<(), ServiceError>;
}

/// In-memory account store for tests.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account directly, bypassing the orchestrator.
    pub fn seed(&self, account: Account) {
        self.accounts.lock().unwrap().push(account);
    }

    /// Fetch a snapshot of an account by email, for assertions.
    pub fn get(&self, email: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
        Ok(self.get(email))
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Account>, ServiceError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.reset_token_hash.as_deref() == Some(token_hash))
            .cloned())
    }

    async fn username_taken(&self, username: &str) -> Result<bool, ServiceError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.username == username))
    }

    async fn email_taken(&self, email: &str) -> Result<bool, ServiceError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.email == email))
    }

    async fn insert(&self, account: &Account) -> Result<(), ServiceError> {
        self.accounts.lock().unwrap().push(account.clone());
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: &str,
        update: AccountUpdate,
    ) -> Result<Option<Account>, ServiceError> {
        let mut accounts = self.accounts.lock().unwrap();
        let Some(account) = accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            account.status = status;
        }
        if let Some(password_hash) = update.password_hash {
            account.password_hash = password_hash;
        }
        if let Some(reset_token_hash) = update.reset_token_hash {
            account.reset_token_hash = Some(reset_token_hash);
        }
        if let Some(issued_at) = update.reset_token_issued_at {
            account.reset_token_issued_at = Some(issued_at);
        }
        if let Some(code_id) = update.confirmation_code_id {
            account.confirmation_code_id = Some(code_id);
        }
        Ok(Some(account.clone()))
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// In-memory confirmation-code store for tests. One code per email, exactly
/// like the production adapter: storing again overwrites.
#[derive(Default)]
pub struct MemoryCodeStore {
    codes: Mutex<HashMap<String, ConfirmationCode>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a code with a chosen creation timestamp, for expiry tests.
    pub fn seed(&self, email: &str, code: &str, created_at: DateTime<Utc>) {
        self.codes.lock().unwrap().insert(
            email.to_string(),
            ConfirmationCode::new(code.to_string(), email.to_string(), created_at),
        );
    }

    pub fn get(&self, email: &str) -> Option<ConfirmationCode> {
        self.codes.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl ConfirmationCodeStore for MemoryCodeStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<ConfirmationCode>, ServiceError> {
        Ok(self.get(email))
    }

    async fn store_for_email(&self, code: &str, email: &str) -> Result<(), ServiceError> {
        self.codes.lock().unwrap().insert(
            email.to_string(),
            ConfirmationCode::new(
                code.to_string(),
                email.to_string(),
                truncate_subsec(Utc::now()),
            ),
        );
        Ok(())
    }
}
