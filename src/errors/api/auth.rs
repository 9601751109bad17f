use crate::errors::internal::{CredentialError, InternalError, JwtValidationError, TokenError};
use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

/// Field-level detail attached to validation failures
#[derive(Object, Debug, Clone)]
pub struct ValidationDetail {
    /// Name of the offending field
    pub field: String,

    /// What was wrong with it
    pub message: String,
}

/// Standardized error response for identity endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// Field-level details, present on validation failures only
    pub details: Option<Vec<ValidationDetail>>,
}

impl AuthErrorResponse {
    fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
            details: None,
        }
    }
}

/// Identity lifecycle error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Request payload failed field validation
    #[oai(status = 400)]
    ValidationFailed(Json<AuthErrorResponse>),

    /// Token is malformed, unknown, or tied to an unusable account
    #[oai(status = 400)]
    InvalidToken(Json<AuthErrorResponse>),

    /// Token exists but its expiry has passed
    #[oai(status = 400)]
    ExpiredToken(Json<AuthErrorResponse>),

    /// Email address is already verified
    #[oai(status = 400)]
    AlreadyVerified(Json<AuthErrorResponse>),

    /// New password must differ from the current one
    #[oai(status = 400)]
    PasswordUnchanged(Json<AuthErrorResponse>),

    /// Invalid email or password (uniform across failure causes)
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Missing or unusable bearer session
    #[oai(status = 401)]
    Unauthorized(Json<AuthErrorResponse>),

    /// No account for the given identifier (where disclosure is safe)
    #[oai(status = 404)]
    NotFound(Json<AuthErrorResponse>),

    /// Duplicate unique key (email, or supplier legal name + TIN)
    #[oai(status = 409)]
    Conflict(Json<AuthErrorResponse>),

    /// Outbound email could not be delivered (resend endpoint only)
    #[oai(status = 500)]
    EmailSendFailed(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    /// Create a ValidationFailed error carrying field-level details
    pub fn validation_failed(details: Vec<ValidationDetail>) -> Self {
        let mut body = AuthErrorResponse::new("validation_failed", "Validation failed", 400);
        body.details = Some(details);
        AuthError::ValidationFailed(Json(body))
    }

    /// Create an InvalidToken error with a flow-specific message
    pub fn invalid_token(message: impl Into<String>) -> Self {
        AuthError::InvalidToken(Json(AuthErrorResponse::new("invalid_token", message, 400)))
    }

    /// Create an ExpiredToken error with a flow-specific message
    pub fn expired_token(message: impl Into<String>) -> Self {
        AuthError::ExpiredToken(Json(AuthErrorResponse::new("expired_token", message, 400)))
    }

    /// Create an AlreadyVerified error
    pub fn already_verified() -> Self {
        AuthError::AlreadyVerified(Json(AuthErrorResponse::new(
            "already_verified",
            "Email is already verified",
            400,
        )))
    }

    /// Create a PasswordUnchanged error
    pub fn password_unchanged() -> Self {
        AuthError::PasswordUnchanged(Json(AuthErrorResponse::new(
            "password_unchanged",
            "New password must be different from your current password",
            400,
        )))
    }

    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(AuthErrorResponse::new(
            "invalid_credentials",
            "Invalid email or password",
            401,
        )))
    }

    /// Create an Unauthorized error
    pub fn unauthorized() -> Self {
        AuthError::Unauthorized(Json(AuthErrorResponse::new(
            "unauthorized",
            "Authentication required",
            401,
        )))
    }

    /// Create a NotFound error for an unknown user
    pub fn user_not_found() -> Self {
        AuthError::NotFound(Json(AuthErrorResponse::new(
            "user_not_found",
            "User not found",
            404,
        )))
    }

    /// Create a Conflict error for a duplicate email
    pub fn duplicate_email() -> Self {
        AuthError::Conflict(Json(AuthErrorResponse::new(
            "duplicate_email",
            "User with this email already exists",
            409,
        )))
    }

    /// Create a Conflict error for a duplicate supplier identity
    pub fn duplicate_supplier() -> Self {
        AuthError::Conflict(Json(AuthErrorResponse::new(
            "duplicate_supplier",
            "Supplier with this legal name and TIN already exists",
            409,
        )))
    }

    /// Create an EmailSendFailed error
    pub fn email_send_failed() -> Self {
        AuthError::EmailSendFailed(Json(AuthErrorResponse::new(
            "email_send_failed",
            "Failed to send verification email",
            500,
        )))
    }

    /// Create a generic internal server error
    ///
    /// Always returns a fixed message without exposing internal details.
    pub fn internal_server_error() -> Self {
        AuthError::InternalError(Json(AuthErrorResponse::new(
            "internal_error",
            "An internal error occurred",
            500,
        )))
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API
    /// errors. Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::DuplicateEmail(email)) => {
                tracing::warn!("Duplicate email registration attempt: {}", email);
                Self::duplicate_email()
            }
            InternalError::Credential(CredentialError::DuplicateSupplier { legal_name, .. }) => {
                tracing::warn!("Duplicate supplier registration attempt: {}", legal_name);
                Self::duplicate_supplier()
            }
            InternalError::Credential(CredentialError::UserNotFound(identifier)) => {
                tracing::debug!("User not found: {}", identifier);
                Self::user_not_found()
            }
            InternalError::Credential(CredentialError::EmailAlreadyVerified(_)) => {
                Self::already_verified()
            }
            InternalError::Credential(CredentialError::PasswordUnchanged) => {
                Self::password_unchanged()
            }
            InternalError::Credential(CredentialError::AccountInactive(_)) => {
                Self::invalid_token("User account not found or inactive")
            }
            InternalError::Credential(CredentialError::InvalidSession(reason)) => {
                tracing::debug!("Invalid session token: {}", reason);
                Self::unauthorized()
            }
            InternalError::Credential(CredentialError::ExpiredSession) => {
                tracing::debug!("Expired session token");
                Self::unauthorized()
            }
            InternalError::Token(TokenError::InvalidFormat) => {
                Self::invalid_token("Invalid token format")
            }
            InternalError::Token(TokenError::NotFound { purpose }) => {
                Self::invalid_token(format!(
                    "Invalid or expired {} token",
                    purpose.to_lowercase()
                ))
            }
            InternalError::Token(TokenError::Expired { purpose }) => {
                Self::expired_token(format!("{} token has expired. Please request a new one.", purpose))
            }
            InternalError::Jwt(JwtValidationError::Expired) => {
                tracing::debug!("Expired session JWT presented");
                Self::unauthorized()
            }
            InternalError::Jwt(JwtValidationError::Invalid(reason)) => {
                tracing::debug!("Rejected session JWT: {}", reason);
                Self::unauthorized()
            }
            InternalError::Mail(mail_err) => {
                tracing::error!("Mail dispatch failed: {}", mail_err);
                Self::email_send_failed()
            }
            _ => {
                tracing::error!("Unexpected error in identity operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::ValidationFailed(json) => json.0.message.clone(),
            AuthError::InvalidToken(json) => json.0.message.clone(),
            AuthError::ExpiredToken(json) => json.0.message.clone(),
            AuthError::AlreadyVerified(json) => json.0.message.clone(),
            AuthError::PasswordUnchanged(json) => json.0.message.clone(),
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::Unauthorized(json) => json.0.message.clone(),
            AuthError::NotFound(json) => json.0.message.clone(),
            AuthError::Conflict(json) => json.0.message.clone(),
            AuthError::EmailSendFailed(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}
