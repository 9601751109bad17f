use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::prelude::*;
use std::fmt;
use uuid::Uuid;

use crate::errors::internal::{InternalError, JwtValidationError};
use crate::services::crypto;
use crate::types::internal::auth::Claims;
use crate::types::internal::Role;

/// Manages one-time account tokens and signed session tokens
///
/// Pure value logic: nothing here touches the database. Persisting and
/// consuming issued tokens is the caller's responsibility.
pub struct TokenService {
    jwt_secret: String,
    session_token_secret: String,
    session_expiration_hours: i64,
    verification_expiration_hours: i64,
    reset_expiration_minutes: i64,
}

impl TokenService {
    /// Create a new TokenService with the given JWT and session-hash secrets
    pub fn new(jwt_secret: String, session_token_secret: String) -> Self {
        Self {
            jwt_secret,
            session_token_secret,
            session_expiration_hours: 24,
            verification_expiration_hours: 24,
            reset_expiration_minutes: 60,
        }
    }

    /// Generate a cryptographically secure one-time token
    ///
    /// 32 random bytes, hex-encoded: always 64 lowercase hex characters.
    pub fn generate_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        hex::encode(random_bytes)
    }

    /// Check that a token has the exact shape this service generates
    ///
    /// Anything else is rejected before a storage lookup happens.
    pub fn is_valid_token_format(&self, token: &str) -> bool {
        token.len() == 64 && token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    /// Issue an email-verification token with its expiry (24 hours out)
    pub fn issue_verification_token(&self) -> (String, i64) {
        let expires_at = Utc::now().timestamp() + self.verification_expiration_hours * 60 * 60;
        (self.generate_token(), expires_at)
    }

    /// Issue a password-reset token with its expiry (1 hour out)
    pub fn issue_reset_token(&self) -> (String, i64) {
        let expires_at = Utc::now().timestamp() + self.reset_expiration_minutes * 60;
        (self.generate_token(), expires_at)
    }

    /// Strict expiry check: expired only once `now` has passed `expires_at`
    pub fn is_expired(&self, expires_at: i64) -> bool {
        Utc::now().timestamp() > expires_at
    }

    /// Generate a signed session JWT for an authenticated user
    ///
    /// Returns the encoded token, its session id (`jti`), and the expiry
    /// timestamp. The `jti` keys the server-side session row; the JWT alone
    /// is never sufficient once that row is gone.
    pub fn generate_session_jwt(
        &self,
        user_id: &str,
        role: Role,
    ) -> Result<(String, String, i64), InternalError> {
        let now = Utc::now().timestamp();
        let expiration = now + self.session_expiration_hours * 60 * 60;
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            jti: jti.clone(),
            exp: expiration,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("session JWT signing", e.to_string()))?;

        Ok((token, jti, expiration))
    }

    /// Validate a session JWT and return its claims
    ///
    /// Distinguishes an expired token from a malformed or forged one; both
    /// are rejected, but they log differently.
    pub fn validate_session_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                InternalError::Jwt(JwtValidationError::Expired)
            }
            _ => InternalError::Jwt(JwtValidationError::Invalid(e.to_string())),
        })?;

        Ok(token_data.claims)
    }

    /// Hash a session id for storage using HMAC-SHA256
    ///
    /// Session rows are keyed by this hash so a database leak cannot be
    /// replayed as live sessions.
    pub fn hash_session_token(&self, jti: &str) -> String {
        crypto::hmac_sha256_token(&self.session_token_secret, jti)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("session_token_secret", &"<redacted>")
            .field("session_expiration_hours", &self.session_expiration_hours)
            .field(
                "verification_expiration_hours",
                &self.verification_expiration_hours,
            )
            .field("reset_expiration_minutes", &self.reset_expiration_minutes)
            .finish()
    }
}

impl fmt::Display for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenService {{ session_expiration: {}h, verification_expiration: {}h, reset_expiration: {}min }}",
            self.session_expiration_hours,
            self.verification_expiration_hours,
            self.reset_expiration_minutes
        )
    }
}
