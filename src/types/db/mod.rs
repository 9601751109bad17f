// Database entities - SeaORM models
pub mod agency;
pub mod audit_log;
pub mod session;
pub mod supplier;
pub mod user;
pub mod verification_token;
