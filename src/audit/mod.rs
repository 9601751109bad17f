pub mod audit_logger;
pub mod login;
pub mod password_reset;
pub mod registration;
pub mod verification;

pub use audit_logger::AuditLogger;
