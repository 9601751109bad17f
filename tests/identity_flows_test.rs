mod common;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel, PaginatorTrait};

use egp_identity_backend::errors::internal::{CredentialError, InternalError};
use egp_identity_backend::types::db::{session, user};
use egp_identity_backend::types::dto::auth::LoginRequest;
use egp_identity_backend::types::internal::context::RequestContext;

use common::{
    buyer_registration, setup_harness, stored_reset_token, stored_verification_token,
    supplier_registration,
};

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_duplicate_supplier_registration_leaves_no_partial_rows() {
    let harness = setup_harness().await;
    let ctx = RequestContext::new();

    harness
        .identity_service
        .register(&ctx, &supplier_registration("maria@pacificworks.com.pg"))
        .await
        .expect("First registration failed");

    // Same legal name and TIN under a different email
    let duplicate = supplier_registration("imposter@example.com");
    let result = harness.identity_service.register(&ctx, &duplicate).await;

    match result {
        Err(InternalError::Credential(CredentialError::DuplicateSupplier { .. })) => {}
        other => panic!("Expected DuplicateSupplier, got {:?}", other.is_ok()),
    }

    // The user row created in the same transaction was rolled back
    let users = user::Entity::find().count(&harness.db).await.unwrap();
    assert_eq!(users, 1);
}

#[tokio::test]
async fn test_newer_reset_request_invalidates_older_token() {
    let harness = setup_harness().await;
    let ctx = RequestContext::new();

    harness
        .identity_service
        .register(&ctx, &supplier_registration("maria@pacificworks.com.pg"))
        .await
        .expect("Registration failed");

    harness
        .identity_service
        .request_password_reset(&ctx, "maria@pacificworks.com.pg")
        .await
        .expect("First reset request failed");
    let first = stored_reset_token(&harness.db, "maria@pacificworks.com.pg").await;

    harness
        .identity_service
        .request_password_reset(&ctx, "maria@pacificworks.com.pg")
        .await
        .expect("Second reset request failed");
    let second = stored_reset_token(&harness.db, "maria@pacificworks.com.pg").await;
    assert_ne!(first, second);

    let stale = harness
        .identity_service
        .check_reset_token(Some(&first))
        .await
        .expect("Check failed");
    assert!(!stale.valid);
    assert_eq!(stale.error.as_deref(), Some("Invalid reset token"));

    let fresh = harness
        .identity_service
        .check_reset_token(Some(&second))
        .await
        .expect("Check failed");
    assert!(fresh.valid);
}

#[tokio::test]
async fn test_expired_session_row_is_rejected_and_deleted() {
    let harness = setup_harness().await;
    let ctx = RequestContext::new();

    let registered = harness
        .identity_service
        .register(&ctx, &supplier_registration("maria@pacificworks.com.pg"))
        .await
        .expect("Registration failed");

    // A JWT still within its own lifetime, backed by an expired session row
    let (token, jti, _) = harness
        .token_service
        .generate_session_jwt(
            &registered.user.id,
            egp_identity_backend::types::internal::Role::SupplierUser,
        )
        .expect("JWT generation failed");
    let token_hash = harness.token_service.hash_session_token(&jti);
    harness
        .credential_store
        .store_session(
            &harness.db,
            &token_hash,
            &registered.user.id,
            Utc::now().timestamp() - 60,
        )
        .await
        .expect("Failed to store session");

    let result = harness.identity_service.session(&token).await;
    match result {
        Err(InternalError::Credential(CredentialError::ExpiredSession)) => {}
        other => panic!("Expected ExpiredSession, got {:?}", other.is_ok()),
    }

    // Expiry detection removed the row
    let remaining = session::Entity::find_by_id(&token_hash)
        .one(&harness.db)
        .await
        .unwrap();
    assert!(remaining.is_none());
}

#[tokio::test]
async fn test_login_records_last_login_timestamp() {
    let harness = setup_harness().await;
    let ctx = RequestContext::new();

    let registered = harness
        .identity_service
        .register(&ctx, &supplier_registration("maria@pacificworks.com.pg"))
        .await
        .expect("Registration failed");

    let before = user::Entity::find_by_id(&registered.user.id)
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();
    assert!(before.last_login_at.is_none());

    harness
        .identity_service
        .login(
            &ctx,
            &login_request("maria@pacificworks.com.pg", "str0ng-password"),
        )
        .await
        .expect("Login failed");

    let after = user::Entity::find_by_id(&registered.user.id)
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();
    assert!(after.last_login_at.is_some());
}

#[tokio::test]
async fn test_verification_marks_first_login() {
    let harness = setup_harness().await;
    let ctx = RequestContext::new();

    let registered = harness
        .identity_service
        .register(&ctx, &supplier_registration("maria@pacificworks.com.pg"))
        .await
        .expect("Registration failed");
    let token = stored_verification_token(&harness.db, "maria@pacificworks.com.pg").await;

    harness
        .identity_service
        .verify_email(&ctx, &token)
        .await
        .expect("Verification failed");

    let verified = user::Entity::find_by_id(&registered.user.id)
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();
    assert!(verified.email_verified_at.is_some());
    // Verification counts as the account's first sign-in
    assert!(verified.last_login_at.is_some());
}

#[tokio::test]
async fn test_registration_stats_exclude_non_active_accounts() {
    let harness = setup_harness().await;
    let ctx = RequestContext::new();

    harness
        .identity_service
        .register(&ctx, &supplier_registration("maria@pacificworks.com.pg"))
        .await
        .expect("Registration failed");
    let suspended = harness
        .identity_service
        .register(&ctx, &buyer_registration("john.wanma@health.gov.pg"))
        .await
        .expect("Registration failed");

    let row = user::Entity::find_by_id(&suspended.user.id)
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();
    let mut active = row.into_active_model();
    active.status = Set("SUSPENDED".to_string());
    active.update(&harness.db).await.unwrap();

    let stats = harness
        .identity_service
        .registration_stats()
        .await
        .expect("Stats failed");

    assert_eq!(stats.stats.total, 1);
    assert_eq!(stats.stats.by_role.get("SUPPLIER_USER"), Some(&1));
    assert_eq!(stats.stats.by_role.get("AGENCY_BUYER"), None);
    // The recent listing stays unfiltered
    assert_eq!(stats.recent_registrations.len(), 2);
}

#[tokio::test]
async fn test_suspended_account_cannot_sign_in_or_reset() {
    let harness = setup_harness().await;
    let ctx = RequestContext::new();

    let registered = harness
        .identity_service
        .register(&ctx, &supplier_registration("maria@pacificworks.com.pg"))
        .await
        .expect("Registration failed");

    let row = user::Entity::find_by_id(&registered.user.id)
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();
    let mut active = row.into_active_model();
    active.status = Set("SUSPENDED".to_string());
    active.update(&harness.db).await.unwrap();

    // Sign-in reports the same generic failure as a bad password
    let login = harness
        .identity_service
        .login(
            &ctx,
            &login_request("maria@pacificworks.com.pg", "str0ng-password"),
        )
        .await;
    match login {
        Err(InternalError::Credential(CredentialError::InvalidCredentials)) => {}
        other => panic!("Expected InvalidCredentials, got {:?}", other.is_ok()),
    }

    // Reset requests still answer generically and issue nothing
    harness
        .identity_service
        .request_password_reset(&ctx, "maria@pacificworks.com.pg")
        .await
        .expect("Reset request failed");
    use egp_identity_backend::types::db::verification_token::Entity as VerificationToken;
    let tokens = VerificationToken::find().count(&harness.db).await.unwrap();
    // Only the registration's verification token exists
    assert_eq!(tokens, 1);
}
