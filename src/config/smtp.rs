use std::env;
use std::fmt;

use crate::errors::internal::InternalError;

/// SMTP relay and sender-identity settings for outbound email
///
/// Defaults mirror a development setup against an Ethereal test inbox; real
/// deployments override every field through the environment.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    /// Base URL embedded in emailed verification and reset links
    pub base_url: String,
}

impl SmtpConfig {
    /// Load SMTP configuration from environment variables
    pub fn from_env() -> Result<Self, InternalError> {
        let port = env::var("SMTP_PORT").unwrap_or_else(|_| "587".to_string());
        let port = port
            .parse()
            .map_err(|e| InternalError::parse("SMTP_PORT", format!("{}: {}", port, e)))?;

        Ok(Self {
            host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.ethereal.email".to_string()),
            port,
            username: env::var("SMTP_USERNAME")
                .unwrap_or_else(|_| "ethereal.user@ethereal.email".to_string()),
            password: env::var("SMTP_PASSWORD").unwrap_or_else(|_| "ethereal.pass".to_string()),
            from_email: env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@png-egp.gov.pg".to_string()),
            from_name: env::var("FROM_NAME").unwrap_or_else(|_| "PNG e-GP".to_string()),
            base_url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}
