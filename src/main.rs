use std::env;
use std::sync::Arc;

use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{DatabaseConnection, TransactionTrait};

use egp_identity_backend::api::{AuthApi, HealthApi};
use egp_identity_backend::audit::AuditLogger;
use egp_identity_backend::config::{
    init_database, init_logging, migrate_database, SecretManager, SmtpConfig,
};
use egp_identity_backend::errors::internal::{DatabaseError, InternalError};
use egp_identity_backend::services::{IdentityService, MailerService, TokenService};
use egp_identity_backend::stores::{AuditStore, CredentialStore, TokenStore};
use egp_identity_backend::types::internal::{AgencyType, Role};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let db = init_database().await.expect("Failed to connect to database");
    migrate_database(&db).await.expect("Failed to run migrations");

    // Fail fast on missing or weak secrets
    let secrets = SecretManager::init().expect("Secret validation failed");

    let smtp_config = SmtpConfig::from_env().expect("Invalid SMTP configuration");
    let mailer = Arc::new(MailerService::new(&smtp_config).expect("Failed to configure mailer"));

    let credential_store = Arc::new(CredentialStore::new(
        db.clone(),
        secrets.pepper().to_string(),
    ));
    let token_store = Arc::new(TokenStore::new(db.clone()));
    let token_service = Arc::new(TokenService::new(
        secrets.jwt_secret().to_string(),
        secrets.session_token_secret().to_string(),
    ));
    let audit_logger = AuditLogger::new(Arc::new(AuditStore::new(db.clone())));

    seed_reference_data(&db, &credential_store)
        .await
        .expect("Failed to seed reference data");

    let identity_service = Arc::new(IdentityService::new(
        db.clone(),
        credential_store,
        token_store,
        token_service,
        mailer,
        audit_logger,
    ));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let bind_address = format!("{}:{}", host, port);

    let api_service = OpenApiService::new(
        (AuthApi::new(identity_service), HealthApi),
        "PNG e-GP Identity Service",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/", bind_address));
    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/", api_service).nest("/docs", ui);

    tracing::info!("Starting server on http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/docs", bind_address);

    Server::new(TcpListener::bind(bind_address)).run(app).await
}

/// Seed the portal's reference agencies and the NPC admin account
///
/// Safe to run on every boot: agencies are looked up by code before
/// insertion and the admin account is only created while absent. The
/// admin seed is skipped entirely when `SEED_ADMIN_PASSWORD` is unset.
async fn seed_reference_data(
    db: &DatabaseConnection,
    credential_store: &CredentialStore,
) -> Result<(), InternalError> {
    let txn = db
        .begin()
        .await
        .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

    let npc = credential_store
        .create_agency_if_absent(
            &txn,
            "NPC",
            "National Procurement Commission",
            AgencyType::Authority,
            Some("info@npc.gov.pg".to_string()),
            None,
        )
        .await?;
    credential_store
        .create_agency_if_absent(
            &txn,
            "DOH",
            "Department of Health",
            AgencyType::Ministry,
            None,
            None,
        )
        .await?;
    credential_store
        .create_agency_if_absent(
            &txn,
            "DOE",
            "Department of Education",
            AgencyType::Ministry,
            None,
            None,
        )
        .await?;
    credential_store
        .create_agency_if_absent(
            &txn,
            "DOT",
            "Department of Transport",
            AgencyType::Ministry,
            None,
            None,
        )
        .await?;
    credential_store
        .create_agency_if_absent(&txn, "PNGPCL", "PNG Power Ltd", AgencyType::Soe, None, None)
        .await?;

    match env::var("SEED_ADMIN_PASSWORD") {
        Ok(password) => {
            let existing = credential_store.find_by_email("admin@npc.gov.pg").await?;
            if existing.is_none() {
                let admin = credential_store
                    .create_user(
                        &txn,
                        "NPC Administrator",
                        "admin@npc.gov.pg",
                        None,
                        &password,
                        Role::NpcAdmin,
                    )
                    .await?;
                credential_store
                    .assign_agency(&txn, &admin.id, &npc.id)
                    .await?;
                credential_store.mark_email_verified(&txn, &admin.id).await?;
                tracing::info!("Seeded NPC admin account");
            }
        }
        Err(_) => {
            tracing::debug!("SEED_ADMIN_PASSWORD not set, skipping admin seed");
        }
    }

    txn.commit()
        .await
        .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

    Ok(())
}
