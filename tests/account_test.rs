//! Customer accounts against an in-memory database.

mod common;

use std::sync::Arc;

use booking_desk::domain::{FederatedProfile, UpdateProfile};
use booking_desk::errors::AppError;
use booking_desk::infra::{Persistence, UnitOfWork};
use booking_desk::services::{
    AccountManager, AccountService, Audience, AuthService, Authenticator, BookingManager,
    BookingService,
};

use common::{submission, test_config, test_persistence};

fn accounts(uow: Arc<Persistence>) -> (AccountManager<Persistence>, Arc<dyn AuthService>) {
    let auth: Arc<dyn AuthService> = Arc::new(Authenticator::new(test_config()));
    (AccountManager::new(uow, auth.clone()), auth)
}

fn google(id: &str, email: Option<&str>, name: Option<&str>) -> FederatedProfile {
    FederatedProfile {
        provider: "google".to_string(),
        provider_user_id: id.to_string(),
        email: email.map(str::to_string),
        display_name: name.map(str::to_string),
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let (_db, uow) = test_persistence().await;
    let (service, auth) = accounts(uow);

    let user = service
        .register(
            "Jane Doe".to_string(),
            " Jane@Example.com ".to_string(),
            Some("555-0100".to_string()),
            "secret1".to_string(),
        )
        .await
        .unwrap();
    assert_eq!(user.email, "jane@example.com");
    assert!(user.has_password());

    let token = service
        .login("JANE@example.com".to_string(), "secret1".to_string())
        .await
        .unwrap();
    let claims = auth.verify_token(&token.access_token, Audience::Customer).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, "jane@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (_db, uow) = test_persistence().await;
    let (service, _) = accounts(uow);

    service
        .register("Jane".into(), "jane@example.com".into(), None, "secret1".into())
        .await
        .unwrap();
    let err = service
        .register("Other Jane".into(), "JANE@example.com".into(), None, "secret2".into())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.to_string(), "Email already exists");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (_db, uow) = test_persistence().await;
    let (service, _) = accounts(uow);

    let err = service
        .register("Jane".into(), "jane@example.com".into(), None, "123".into())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let (_db, uow) = test_persistence().await;
    let (service, _) = accounts(uow);

    service
        .register("Jane".into(), "jane@example.com".into(), None, "secret1".into())
        .await
        .unwrap();
    service
        .login_with_identity(google("g-1", Some("federated@example.com"), Some("Fed")))
        .await
        .unwrap();

    let attempts = [
        ("jane@example.com", "wrong-password"),
        ("nobody@example.com", "secret1"),
        // Account exists but has no password credential
        ("federated@example.com", "anything"),
    ];

    for (email, password) in attempts {
        let err = service
            .login(email.to_string(), password.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials(_)));
        assert_eq!(err.to_string(), "Invalid email or password");
    }
}

#[tokio::test]
async fn test_federated_login_links_existing_account_once() {
    let (_db, uow) = test_persistence().await;
    let (service, _) = accounts(uow.clone());

    let jane = service
        .register("Jane".into(), "jane@example.com".into(), None, "secret1".into())
        .await
        .unwrap();

    let first = service
        .login_with_identity(google("g-7", Some("Jane@Example.com"), Some("Jane G")))
        .await
        .unwrap();
    let second = service
        .login_with_identity(google("g-7", Some("jane@example.com"), None))
        .await
        .unwrap();

    assert_eq!(first.id, jane.id);
    assert_eq!(second.id, jane.id);
    // Existing account keeps its own name
    assert_eq!(second.name, "Jane");
    assert_eq!(uow.identities().count_for_user(jane.id).await.unwrap(), 1);

    let identity = uow
        .identities()
        .find_identity("google", "g-7")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(identity.user_id, jane.id);
    assert_eq!(identity.email.as_deref(), Some("jane@example.com"));
}

#[tokio::test]
async fn test_link_identity_reports_existing_owner() {
    let (_db, uow) = test_persistence().await;
    let (service, _) = accounts(uow.clone());

    let owner = service
        .login_with_identity(google("g-5", Some("owner@example.com"), Some("Owner")))
        .await
        .unwrap();
    let other = service
        .register("Other".into(), "other@example.com".into(), None, "secret1".into())
        .await
        .unwrap();

    // Losing side of two first sign-ins racing on the same provider account
    let identity = uow
        .identities()
        .link_identity(other.id, "google", "g-5", None)
        .await
        .unwrap();

    assert_eq!(identity.user_id, owner.id);
    assert_eq!(uow.identities().count_for_user(other.id).await.unwrap(), 0);

    let again = service
        .login_with_identity(google("g-5", Some("other@example.com"), None))
        .await
        .unwrap();
    assert_eq!(again.id, owner.id);
}

#[tokio::test]
async fn test_federated_login_creates_account_with_fallbacks() {
    let (_db, uow) = test_persistence().await;
    let (service, _) = accounts(uow.clone());

    let user = service
        .login_with_identity(google("g-99", None, None))
        .await
        .unwrap();

    assert_eq!(user.name, "User");
    assert_eq!(user.email, "google_g-99@noemail.local");
    assert!(!user.has_password());
    assert_eq!(uow.identities().count_for_user(user.id).await.unwrap(), 1);

    let again = service
        .login_with_identity(google("g-99", None, None))
        .await
        .unwrap();
    assert_eq!(again.id, user.id);
}

#[tokio::test]
async fn test_password_removal_requires_linked_identity() {
    let (_db, uow) = test_persistence().await;
    let (service, _) = accounts(uow);

    let jane = service
        .register("Jane".into(), "jane@example.com".into(), None, "secret1".into())
        .await
        .unwrap();

    let clear_password = || UpdateProfile {
        password: Some(None),
        ..Default::default()
    };

    let err = service
        .update_profile(jane.id, clear_password())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(service.get_profile(jane.id).await.unwrap().has_password());

    service
        .login_with_identity(google("g-1", Some("jane@example.com"), None))
        .await
        .unwrap();

    let updated = service.update_profile(jane.id, clear_password()).await.unwrap();
    assert!(!updated.has_password());
}

#[tokio::test]
async fn test_update_profile_changes_fields() {
    let (_db, uow) = test_persistence().await;
    let (service, _) = accounts(uow);

    let jane = service
        .register(
            "Jane".into(),
            "jane@example.com".into(),
            Some("555-0100".into()),
            "secret1".into(),
        )
        .await
        .unwrap();

    let updated = service
        .update_profile(
            jane.id,
            UpdateProfile {
                name: Some("Jane Doe".into()),
                phone: Some(None),
                password: Some(Some("new-secret".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Jane Doe");
    assert_eq!(updated.email, "jane@example.com");
    assert_eq!(updated.phone, None);

    assert!(service
        .login("jane@example.com".into(), "new-secret".into())
        .await
        .is_ok());
    assert!(service
        .login("jane@example.com".into(), "secret1".into())
        .await
        .is_err());

    let err = service
        .update_profile(jane.id + 1, UpdateProfile::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_dashboard_groups_own_bookings() {
    let (_db, uow) = test_persistence().await;
    let (service, _) = accounts(uow.clone());
    let bookings = BookingManager::new(uow);

    let jane = service
        .register("Jane".into(), "jane@example.com".into(), None, "secret1".into())
        .await
        .unwrap();

    let mine = bookings
        .submit(submission("Jane Doe", "Dog Walking"), Some(jane.id))
        .await
        .unwrap();
    bookings
        .submit(submission("Jane Doe", "Cat Sitting"), Some(jane.id))
        .await
        .unwrap();
    bookings
        .submit(submission("Someone Else", "Dog Walking"), None)
        .await
        .unwrap();
    bookings.update_status(mine.id, "Confirmed").await.unwrap();

    let dashboard = service.dashboard(jane.id).await.unwrap();

    assert_eq!(dashboard.bookings.len(), 2);
    assert!(dashboard.bookings.iter().all(|b| b.user_id == Some(jane.id)));
    assert_eq!(dashboard.by_status.new.len(), 1);
    assert_eq!(dashboard.by_status.confirmed.len(), 1);
    assert_eq!(dashboard.by_status.confirmed[0].id, mine.id);
    assert!(dashboard.by_status.completed.is_empty());
    assert!(dashboard.by_status.cancelled.is_empty());
}
