mod database;
mod logging;
mod secret_manager;
mod smtp;

pub use database::{init_database, migrate_database};
pub use logging::init_logging;
pub use secret_manager::{SecretConfig, SecretError, SecretManager, SecretType};
pub use smtp::SmtpConfig;
