use thiserror::Error;

/// Failures around the one-time verification / reset tokens
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is not a 64-character lowercase hex string")]
    InvalidFormat,

    #[error("{purpose} token not found")]
    NotFound { purpose: &'static str },

    #[error("{purpose} token has expired")]
    Expired { purpose: &'static str },
}
