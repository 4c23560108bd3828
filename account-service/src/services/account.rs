use chrono::Duration;
use rand::Rng;
use std::sync::Arc;

use crate::models::{Account, AccountStatus};
use crate::services::clock::Clock;
use crate::services::email::EmailProvider;
use crate::services::error::{CodeRejection, ServiceError};
use crate::services::jwt::JwtService;
use crate::services::store::{AccountStore, AccountUpdate, ConfirmationCodeStore};
use crate::utils::{hash_password, verify_password, Password, PasswordError, PasswordHashString};

/// How long a confirmation code stays redeemable. A code created exactly this
/// long ago is already expired.
pub const CONFIRMATION_CODE_LIFETIME_HOURS: i64 = 6;

/// How long a reset token stays redeemable, with the same inclusive boundary.
pub const RESET_TOKEN_LIFETIME_HOURS: i64 = 24;

/// A freshly minted session, returned on successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub expires_in: i64,
    pub account: Account,
}

/// Orchestrator for the account lifecycle: registration, login, activation
/// and password reset. All persistence and mail delivery happens behind the
/// injected seams, and every timestamp comes from the injected clock.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    codes: Arc<dyn ConfirmationCodeStore>,
    email: Arc<dyn EmailProvider>,
    jwt: JwtService,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        codes: Arc<dyn ConfirmationCodeStore>,
        email: Arc<dyn EmailProvider>,
        jwt: JwtService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            codes,
            email,
            jwt,
            clock,
        }
    }

    /// Create a new inactive account. Username is checked before email, so a
    /// request clashing on both reports the username conflict.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, ServiceError> {
        if self.accounts.username_taken(username).await? {
            return Err(ServiceError::UnavailableUsername);
        }

        if self.accounts.email_taken(email).await? {
            return Err(ServiceError::UnavailableEmail);
        }

        let password_hash = hash_password(&Password::new(password.to_string()))
            .map_err(ServiceError::Internal)?;

        let account = Account::new(
            username.to_string(),
            email.to_string(),
            password_hash.into_string(),
        );

        self.accounts.insert(&account).await?;

        tracing::info!(account_id = %account.id, "Account registered");

        Ok(account)
    }

    /// Authenticate by email and password and mint a session token. Inactive
    /// accounts may log in; activation only gates activation itself.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(ServiceError::NotFound("email"))?;

        verify_password(
            &Password::new(password.to_string()),
            &PasswordHashString::new(account.password_hash.clone()),
        )
        .map_err(|e| match e {
            PasswordError::Mismatch => ServiceError::PasswordMismatch,
            // An unreadable stored hash is corruption, not a credential error
            PasswordError::BadHash(_) => ServiceError::Internal(anyhow::anyhow!(e)),
        })?;

        let access_token = self
            .jwt
            .generate_session_token(&account.id, &account.email)
            .map_err(ServiceError::Internal)?;

        tracing::info!(account_id = %account.id, "Login succeeded");

        Ok(Session {
            access_token,
            expires_in: self.jwt.session_token_expiry_seconds(),
            account,
        })
    }

    /// Generate a six-digit confirmation code for an inactive account and
    /// mail it out. Re-requesting replaces the previous code.
    pub async fn send_confirmation_code(&self, email: &str) -> Result<(), ServiceError> {
        if !self.accounts.email_taken(email).await? {
            return Err(ServiceError::NotFound("email"));
        }

        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(ServiceError::NotFound("email"))?;

        if account.is_active() {
            return Err(ServiceError::AccountAlreadyActive);
        }

        let code = generate_confirmation_code();
        self.codes.store_for_email(&code, email).await?;

        self.email
            .send_confirmation_code(email, &code)
            .await
            .map_err(|e| ServiceError::Email(e.to_string()))?;

        tracing::info!(account_id = %account.id, "Confirmation code dispatched");

        Ok(())
    }

    /// Redeem a confirmation code and flip the account to active. The stored
    /// code is checked for expiry before it is compared, so a stale code
    /// reports `Expired` even when the digits do not match either.
    pub async fn activate_account(
        &self,
        email: &str,
        submitted_code: &str,
    ) -> Result<Account, ServiceError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(ServiceError::NotFound("email"))?;

        if account.is_active() {
            return Err(ServiceError::AccountAlreadyActive);
        }

        let code = self
            .codes
            .find_by_email(email)
            .await?
            .ok_or(ServiceError::ConfirmationCodeNotFound)?;

        let expiry_limit = self.clock.now() - Duration::hours(CONFIRMATION_CODE_LIFETIME_HOURS);
        if code.created_at <= expiry_limit {
            return Err(ServiceError::InvalidConfirmationCode(CodeRejection::Expired));
        }

        if code.code != submitted_code {
            return Err(ServiceError::InvalidConfirmationCode(
                CodeRejection::Mismatch,
            ));
        }

        let activated = self
            .accounts
            .update_by_id(
                &account.id,
                AccountUpdate {
                    status: Some(AccountStatus::Active),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(ServiceError::NotFound("email"))?;

        tracing::info!(account_id = %activated.id, "Account activated");

        Ok(activated)
    }

    /// Issue a password-reset token for an active account and mail it out.
    /// Only the token's digest is persisted; the token itself travels solely
    /// in the email.
    pub async fn send_reset_token(&self, email: &str) -> Result<(), ServiceError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(ServiceError::NotFound("email"))?;

        if !account.is_active() {
            return Err(ServiceError::AccountInactive);
        }

        let token = generate_reset_token();
        let issued_at = self.clock.now();

        self.accounts
            .update_by_id(
                &account.id,
                AccountUpdate {
                    reset_token_hash: Some(Account::hash_reset_token(&token)),
                    reset_token_issued_at: Some(issued_at),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(ServiceError::NotFound("email"))?;

        self.email
            .send_reset_token(email, &token)
            .await
            .map_err(|e| ServiceError::Email(e.to_string()))?;

        tracing::info!(account_id = %account.id, "Reset token dispatched");

        Ok(())
    }

    /// Redeem a reset token and set a new password. The token is left on the
    /// account afterwards; its lifetime alone bounds reuse.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Account, ServiceError> {
        let account = self
            .accounts
            .find_by_reset_token(&Account::hash_reset_token(token))
            .await?
            .ok_or(ServiceError::NotFound("token"))?;

        if !account.is_active() {
            return Err(ServiceError::AccountInactive);
        }

        let issued_at = account
            .reset_token_issued_at
            .ok_or(ServiceError::InvalidParam("token"))?;

        let expiry_limit = self.clock.now() - Duration::hours(RESET_TOKEN_LIFETIME_HOURS);
        if issued_at <= expiry_limit {
            return Err(ServiceError::InvalidParam("token"));
        }

        let password_hash = hash_password(&Password::new(new_password.to_string()))
            .map_err(ServiceError::Internal)?;

        let updated = self
            .accounts
            .update_by_id(
                &account.id,
                AccountUpdate {
                    password_hash: Some(password_hash.into_string()),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(ServiceError::NotFound("token"))?;

        tracing::info!(account_id = %updated.id, "Password reset");

        Ok(updated)
    }

    /// Liveness check against the backing store.
    pub async fn health(&self) -> Result<(), ServiceError> {
        self.accounts.ping().await
    }
}

/// Six decimal digits, zero-padded.
fn generate_confirmation_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

/// 32 random bytes, hex-encoded.
fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_codes_are_six_digits() {
        for _ in 0..50 {
            let code = generate_confirmation_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn reset_tokens_are_64_hex_chars() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
