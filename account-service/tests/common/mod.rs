//! Shared harness for account-service integration tests.
//!
//! Everything runs against the in-memory stores and the recording mailer, so
//! the suite needs no MongoDB or SMTP relay and the clock can be pinned.

#![allow(dead_code)]

use account_service::{
    config::JwtConfig,
    models::{Account, AccountStatus},
    services::{
        AccountService, AccountStore, AccountUpdate, FixedClock, JwtService, MemoryAccountStore,
        MemoryCodeStore, RecordingMailer,
    },
    utils::{hash_password, Password},
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

pub struct Harness {
    pub accounts: Arc<MemoryAccountStore>,
    pub codes: Arc<MemoryCodeStore>,
    pub mailer: Arc<RecordingMailer>,
    pub jwt: JwtService,
    pub now: DateTime<Utc>,
    pub service: AccountService,
}

/// Harness pinned to a fixed, arbitrary instant.
pub fn harness() -> Harness {
    harness_at(Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap())
}

pub fn harness_at(now: DateTime<Utc>) -> Harness {
    let accounts = Arc::new(MemoryAccountStore::new());
    let codes = Arc::new(MemoryCodeStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let jwt = JwtService::new(&JwtConfig {
        secret: "test-secret".to_string(),
        session_token_expiry_minutes: 60,
    });

    let service = AccountService::new(
        accounts.clone(),
        codes.clone(),
        mailer.clone(),
        jwt.clone(),
        Arc::new(FixedClock(now)),
    );

    Harness {
        accounts,
        codes,
        mailer,
        jwt,
        now,
        service,
    }
}

/// Seed an account with a real Argon2 hash of `password`.
pub fn seed_account(
    h: &Harness,
    username: &str,
    email: &str,
    password: &str,
    status: AccountStatus,
) -> Account {
    let hash = hash_password(&Password::new(password.to_string())).expect("hash");
    let mut account = Account::new(username.to_string(), email.to_string(), hash.into_string());
    account.status = status;
    h.accounts.seed(account.clone());
    account
}

/// Attach a reset-token digest with a chosen issue time to an account.
pub async fn seed_reset_token(
    h: &Harness,
    account: &Account,
    token: &str,
    issued_at: DateTime<Utc>,
) {
    h.accounts
        .update_by_id(
            &account.id,
            AccountUpdate {
                reset_token_hash: Some(Account::hash_reset_token(token)),
                reset_token_issued_at: Some(issued_at),
                ..Default::default()
            },
        )
        .await
        .expect("seed reset token");
}
