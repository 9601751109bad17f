use serde::{Deserialize, Serialize};

use crate::types::internal::identity::Role;

/// JWT Claims structure for session tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    /// Role of the authenticated user
    pub role: Role,

    /// Token identifier; its HMAC keys the server-side session row
    pub jti: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}
