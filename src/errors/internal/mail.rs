use thiserror::Error;

/// Failures in the outbound mail path
///
/// These never abort a committed identity operation; callers surface them
/// as an informational flag or, for the resend endpoint, as a 500.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mailer configuration invalid: {0}")]
    Configuration(String),

    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    BuildFailed(String),

    #[error("Failed to send message: {0}")]
    SendFailed(String),
}
