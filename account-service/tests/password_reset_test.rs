mod common;

use account_service::models::{Account, AccountStatus};
use account_service::services::{ServiceError, RESET_TOKEN_LIFETIME_HOURS};
use account_service::utils::{verify_password, Password, PasswordHashString};
use chrono::Duration;
use common::{harness, seed_account, seed_reset_token};

#[tokio::test]
async fn token_dispatch_rejects_an_unregistered_email() {
    let h = harness();

    let err = h
        .service
        .send_reset_token("nobody@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound("email")));
}

#[tokio::test]
async fn token_dispatch_rejects_an_inactive_account() {
    let h = harness();
    seed_account(
        &h,
        "jdoe",
        "jdoe@example.com",
        "password123",
        AccountStatus::Inactive,
    );

    let err = h
        .service
        .send_reset_token("jdoe@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::AccountInactive));
}

#[tokio::test]
async fn token_dispatch_stores_only_the_digest() {
    let h = harness();
    seed_account(
        &h,
        "jdoe",
        "jdoe@example.com",
        "password123",
        AccountStatus::Active,
    );

    h.service
        .send_reset_token("jdoe@example.com")
        .await
        .expect("dispatch");

    let mail = h.mailer.last().expect("mail");
    let token = mail.body.rsplit(' ').next().expect("token in mail");
    assert_eq!(token.len(), 64);

    let stored = h.accounts.get("jdoe@example.com").expect("stored");
    assert_eq!(
        stored.reset_token_hash.as_deref(),
        Some(Account::hash_reset_token(token).as_str())
    );
    assert_eq!(stored.reset_token_issued_at, Some(h.now));
    // The token itself travels only in the email
    assert_ne!(stored.reset_token_hash.as_deref(), Some(token));
}

#[tokio::test]
async fn reset_rejects_an_unknown_token() {
    let h = harness();

    let err = h
        .service
        .reset_password("deadbeef", "newPassword123")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound("token")));
}

#[tokio::test]
async fn reset_rejects_an_inactive_account() {
    let h = harness();
    let account = seed_account(
        &h,
        "jdoe",
        "jdoe@example.com",
        "password123",
        AccountStatus::Inactive,
    );
    seed_reset_token(&h, &account, "token-1", h.now - Duration::hours(1)).await;

    let err = h
        .service
        .reset_password("token-1", "newPassword123")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::AccountInactive));
}

#[tokio::test]
async fn a_token_exactly_24_hours_old_is_expired() {
    let h = harness();
    let account = seed_account(
        &h,
        "jdoe",
        "jdoe@example.com",
        "password123",
        AccountStatus::Active,
    );
    seed_reset_token(
        &h,
        &account,
        "token-1",
        h.now - Duration::hours(RESET_TOKEN_LIFETIME_HOURS),
    )
    .await;

    let err = h
        .service
        .reset_password("token-1", "newPassword123")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidParam("token")));

    // The password is untouched
    let stored = h.accounts.get("jdoe@example.com").expect("stored");
    assert!(verify_password(
        &Password::new("password123".to_string()),
        &PasswordHashString::new(stored.password_hash),
    )
    .is_ok());
}

#[tokio::test]
async fn a_token_one_second_inside_the_window_still_works() {
    let h = harness();
    let account = seed_account(
        &h,
        "jdoe",
        "jdoe@example.com",
        "password123",
        AccountStatus::Active,
    );
    seed_reset_token(
        &h,
        &account,
        "token-1",
        h.now - Duration::hours(RESET_TOKEN_LIFETIME_HOURS) + Duration::seconds(1),
    )
    .await;

    h.service
        .reset_password("token-1", "newPassword123")
        .await
        .expect("reset");

    let stored = h.accounts.get("jdoe@example.com").expect("stored");
    assert!(verify_password(
        &Password::new("newPassword123".to_string()),
        &PasswordHashString::new(stored.password_hash.clone()),
    )
    .is_ok());
    assert!(verify_password(
        &Password::new("password123".to_string()),
        &PasswordHashString::new(stored.password_hash),
    )
    .is_err());
}

#[tokio::test]
async fn reset_leaves_the_token_on_the_account() {
    let h = harness();
    let account = seed_account(
        &h,
        "jdoe",
        "jdoe@example.com",
        "password123",
        AccountStatus::Active,
    );
    seed_reset_token(&h, &account, "token-1", h.now - Duration::hours(1)).await;

    h.service
        .reset_password("token-1", "newPassword123")
        .await
        .expect("reset");

    // The digest stays; only its age bounds reuse
    let stored = h.accounts.get("jdoe@example.com").expect("stored");
    assert_eq!(
        stored.reset_token_hash.as_deref(),
        Some(Account::hash_reset_token("token-1").as_str())
    );
    assert_eq!(stored.reset_token_issued_at, Some(h.now - Duration::hours(1)));
}
