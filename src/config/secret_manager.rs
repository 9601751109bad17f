use std::fmt;

/// Defines the source type for a secret
#[derive(Debug, Clone)]
pub enum SecretType {
    /// Load from environment variable
    EnvVar { name: String },
}

/// Validation rules for a single secret
pub struct SecretConfig {
    pub secret_type: SecretType,
    pub required: bool,
    pub min_length: Option<usize>,
}

impl SecretConfig {
    pub fn new(secret_type: SecretType) -> Self {
        Self {
            secret_type,
            required: true,
            min_length: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }
}

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
///
/// All three secrets are loaded and length-checked once at startup, so a
/// misconfigured deployment fails before it can serve a single request.
pub struct SecretManager {
    jwt_secret: String,
    session_token_secret: String,
    pepper: String,
}

impl SecretManager {
    /// Initialize the SecretManager by loading and validating all secrets
    pub fn init() -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(&Self::jwt_config())?;
        let session_token_secret = Self::load_secret(&Self::session_token_config())?;
        let pepper = Self::load_secret(&Self::pepper_config())?;

        Ok(Self {
            jwt_secret,
            session_token_secret,
            pepper,
        })
    }

    /// Configuration for the session JWT signing secret
    fn jwt_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "JWT_SECRET".to_string(),
        })
        .required(true)
        .min_length(32)
    }

    /// Configuration for the session-token hashing secret
    fn session_token_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "SESSION_TOKEN_SECRET".to_string(),
        })
        .required(true)
        .min_length(32)
    }

    /// Configuration for the password-hash pepper
    fn pepper_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "PEPPER".to_string(),
        })
        .required(true)
        .min_length(16)
    }

    /// Get the session JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the secret used to HMAC session ids before storage
    pub fn session_token_secret(&self) -> &str {
        &self.session_token_secret
    }

    /// Get the pepper for password hashing
    pub fn pepper(&self) -> &str {
        &self.pepper
    }

    /// Load a secret based on its configuration
    pub(crate) fn load_secret(config: &SecretConfig) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match std::env::var(name) {
                Ok(v) => v,
                Err(_) if !config.required => return Ok(String::new()),
                Err(_) => return Err(SecretError::missing(name)),
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                let name = match &config.secret_type {
                    SecretType::EnvVar { name } => name,
                };
                return Err(SecretError::invalid_length(name, min_len, value.len()));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("session_token_secret", &"<redacted>")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 3 }}")
    }
}
