use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Health check response model
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status indicator
    pub status: String,

    /// Current server timestamp (RFC 3339)
    pub timestamp: String,
}
