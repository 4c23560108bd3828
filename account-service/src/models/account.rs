//! Account model - the single persistent entity of the account lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of an account.
///
/// Accounts are created `inactive` and become `active` once the owner proves
/// control of the email address via a confirmation code. There is no way
/// back: `active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Inactive,
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Inactive => "inactive",
            AccountStatus::Active => "active",
        }
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: AccountStatus) -> bool {
        matches!(
            (self, next),
            (AccountStatus::Inactive, AccountStatus::Active)
        )
    }
}

/// Account entity as persisted in the `accounts` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub status: AccountStatus,
    /// SHA-256 digest of the last issued reset token. The plaintext token is
    /// only ever sent by email, never stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token_hash: Option<String>,
    /// Timestamp captured by the orchestrator when the reset token was
    /// issued; the 24-hour expiry window is measured from here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token_issued_at: Option<DateTime<Utc>>,
    /// Back-reference to the confirmation code currently on file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_code_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, unconfirmed account.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            status: AccountStatus::Inactive,
            reset_token_hash: None,
            reset_token_issued_at: None,
            confirmation_code_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Digest a plaintext reset token for storage or lookup.
    pub fn hash_reset_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_starts_inactive() {
        let account = Account::new(
            "u1".to_string(),
            "u1@x.com".to_string(),
            "$argon2id$fake".to_string(),
        );
        assert_eq!(account.status, AccountStatus::Inactive);
        assert!(account.reset_token_hash.is_none());
        assert!(account.confirmation_code_id.is_none());
    }

    #[test]
    fn activation_is_the_only_permitted_transition() {
        assert!(AccountStatus::Inactive.can_transition_to(AccountStatus::Active));
        assert!(!AccountStatus::Active.can_transition_to(AccountStatus::Inactive));
        assert!(!AccountStatus::Active.can_transition_to(AccountStatus::Active));
        assert!(!AccountStatus::Inactive.can_transition_to(AccountStatus::Inactive));
    }

    #[test]
    fn reset_token_digest_is_stable_and_hides_the_token() {
        let digest = Account::hash_reset_token("topsecret");
        assert_eq!(digest, Account::hash_reset_token("topsecret"));
        assert_ne!(digest, "topsecret");
        assert_eq!(digest.len(), 64);
    }
}
