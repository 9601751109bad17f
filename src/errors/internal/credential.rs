use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User with this email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Supplier with this legal name and TIN already exists: {legal_name} / {tin}")]
    DuplicateSupplier { legal_name: String, tin: String },

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Account is not active: {0}")]
    AccountInactive(String),

    #[error("Email is already verified: {0}")]
    EmailAlreadyVerified(String),

    #[error("New password matches the current password")]
    PasswordUnchanged,

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),

    #[error("Invalid session token: {0}")]
    InvalidSession(String),

    #[error("Session has expired")]
    ExpiredSession,
}
