use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::errors::internal::InternalError;

const DEFAULT_DATABASE_URL: &str = "sqlite://egp_identity.db?mode=rwc";

/// Connect to the application database
///
/// Reads `DATABASE_URL`, falling back to a local SQLite file. Does not run
/// migrations; call [`migrate_database`] separately.
pub async fn init_database() -> Result<DatabaseConnection, InternalError> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&database_url)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations on the provided connection
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Database migrations completed");

    Ok(())
}
