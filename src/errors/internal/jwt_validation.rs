use thiserror::Error;

/// Failures from decoding or verifying a session JWT
#[derive(Error, Debug)]
pub enum JwtValidationError {
    #[error("JWT has expired")]
    Expired,

    #[error("JWT is malformed or its signature is invalid: {0}")]
    Invalid(String),
}
