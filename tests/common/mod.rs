// Common test utilities for integration tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter};

use egp_identity_backend::audit::AuditLogger;
use egp_identity_backend::config::SmtpConfig;
use egp_identity_backend::services::{IdentityService, MailerService, TokenService};
use egp_identity_backend::stores::{AuditStore, CredentialStore, TokenStore};
use egp_identity_backend::types::db::verification_token::{Column, Entity as VerificationToken};
use egp_identity_backend::types::dto::auth::RegisterRequest;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_SESSION_SECRET: &str = "test-session-secret-minimum-32-chars";

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Everything a flow test needs, wired the way the binary wires it
pub struct TestHarness {
    pub db: DatabaseConnection,
    pub credential_store: Arc<CredentialStore>,
    pub token_store: Arc<TokenStore>,
    pub token_service: Arc<TokenService>,
    pub identity_service: Arc<IdentityService>,
}

/// Builds a full identity service over an in-memory database
///
/// The mailer points at a closed local port, so sends fail fast and
/// deterministically without touching the network.
pub async fn setup_harness() -> TestHarness {
    let db = setup_test_db().await;

    let credential_store = Arc::new(CredentialStore::new(
        db.clone(),
        "integration-test-pepper".to_string(),
    ));
    let token_store = Arc::new(TokenStore::new(db.clone()));
    let token_service = Arc::new(TokenService::new(
        TEST_JWT_SECRET.to_string(),
        TEST_SESSION_SECRET.to_string(),
    ));

    let smtp_config = SmtpConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        username: "test".to_string(),
        password: "test".to_string(),
        from_email: "noreply@png-egp.gov.pg".to_string(),
        from_name: "PNG e-GP".to_string(),
        base_url: "http://localhost:3000".to_string(),
    };
    let mailer = Arc::new(MailerService::new(&smtp_config).expect("Failed to build test mailer"));

    let audit_logger = AuditLogger::new(Arc::new(AuditStore::new(db.clone())));

    let identity_service = Arc::new(IdentityService::new(
        db.clone(),
        credential_store.clone(),
        token_store.clone(),
        token_service.clone(),
        mailer,
        audit_logger,
    ));

    TestHarness {
        db,
        credential_store,
        token_store,
        token_service,
        identity_service,
    }
}

/// Registration payload for a PNG supplier account
pub fn supplier_registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        full_name: "Maria Kila".to_string(),
        email: email.to_string(),
        phone: Some("+675 7012 3456".to_string()),
        password: "str0ng-password".to_string(),
        confirm_password: "str0ng-password".to_string(),
        role: "SUPPLIER_USER".to_string(),
        legal_name: Some("Pacific Works Ltd".to_string()),
        trading_name: Some("Pacific Works".to_string()),
        tin: Some("500123456".to_string()),
        address: Some("Section 34, Hohola, Port Moresby".to_string()),
        categories: Some(vec!["CONSTRUCTION".to_string()]),
        agency_code: None,
        agency_name: None,
        agency_type: None,
        position: None,
    }
}

/// Registration payload for an agency buyer account
pub fn buyer_registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        full_name: "John Wanma".to_string(),
        email: email.to_string(),
        phone: Some("+675 7000 0000".to_string()),
        password: "str0ng-password".to_string(),
        confirm_password: "str0ng-password".to_string(),
        role: "AGENCY_BUYER".to_string(),
        legal_name: None,
        trading_name: None,
        tin: None,
        address: None,
        categories: None,
        agency_code: Some("DOH".to_string()),
        agency_name: Some("Department of Health".to_string()),
        agency_type: Some("MINISTRY".to_string()),
        position: Some("Procurement Officer".to_string()),
    }
}

/// Fetch the stored verification token for an address
pub async fn stored_verification_token(db: &DatabaseConnection, email: &str) -> String {
    VerificationToken::find()
        .filter(Column::Identifier.eq(email))
        .filter(Column::Token.not_like("reset_%"))
        .one(db)
        .await
        .expect("Failed to query verification tokens")
        .expect("No verification token issued")
        .token
}

/// Fetch the stored reset token for an address, without its storage prefix
pub async fn stored_reset_token(db: &DatabaseConnection, email: &str) -> String {
    VerificationToken::find()
        .filter(Column::Identifier.eq(email))
        .filter(Column::Token.like("reset_%"))
        .one(db)
        .await
        .expect("Failed to query verification tokens")
        .expect("No reset token issued")
        .token
        .strip_prefix("reset_")
        .expect("Stored reset token lost its prefix")
        .to_string()
}
