mod common;

use account_service::models::AccountStatus;
use account_service::services::ServiceError;
use account_service::utils::{verify_password, Password, PasswordHashString};
use common::{harness, seed_account};

#[tokio::test]
async fn registration_creates_an_inactive_account() {
    let h = harness();

    let account = h
        .service
        .register("jdoe", "jdoe@example.com", "password123")
        .await
        .expect("register");

    assert_eq!(account.username, "jdoe");
    assert_eq!(account.email, "jdoe@example.com");
    assert_eq!(account.status, AccountStatus::Inactive);

    let stored = h.accounts.get("jdoe@example.com").expect("stored account");
    assert_eq!(stored.id, account.id);

    // The plaintext never lands in the store
    assert_ne!(stored.password_hash, "password123");
    assert!(verify_password(
        &Password::new("password123".to_string()),
        &PasswordHashString::new(stored.password_hash),
    )
    .is_ok());
}

#[tokio::test]
async fn registering_the_same_username_twice_is_rejected() {
    let h = harness();

    h.service
        .register("jdoe", "first@example.com", "password123")
        .await
        .expect("first registration");

    let err = h
        .service
        .register("jdoe", "second@example.com", "password123")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::UnavailableUsername));

    // The first account is untouched
    assert!(h.accounts.get("first@example.com").is_some());
    assert!(h.accounts.get("second@example.com").is_none());
}

#[tokio::test]
async fn registration_rejects_a_taken_email() {
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
        .register("other", "jdoe@example.com", "password123")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::UnavailableEmail));
}

#[tokio::test]
async fn username_conflict_wins_when_both_clash() {
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
        .register("jdoe", "jdoe@example.com", "password123")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::UnavailableUsername));
}
