use std::net::IpAddr;

use poem::Request;
use uuid::Uuid;

use crate::types::internal::auth::Claims;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Contains contextual information about the current request that is needed
/// for logging, auditing, and tracing across API, service, and store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// User-Agent header of the client, captured for audit payloads
    pub user_agent: Option<String>,

    /// Whether the request is authenticated (session token validated)
    pub authenticated: bool,

    /// Full session claims if authenticated
    pub claims: Option<Claims>,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Create an unauthenticated RequestContext with a generated request_id
    pub fn new() -> Self {
        Self {
            request_id: RequestId(Uuid::new_v4()),
            ip_address: None,
            user_agent: None,
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "unknown".to_string(),
        }
    }

    /// Create a RequestContext from an incoming HTTP request
    ///
    /// Captures the client IP and User-Agent. Authentication state is
    /// attached separately via `with_auth` once the bearer token has been
    /// validated.
    pub fn from_request(req: &Request) -> Self {
        Self {
            request_id: RequestId(Uuid::new_v4()),
            ip_address: Self::extract_ip_address(req),
            user_agent: req.header("User-Agent").map(|ua| ua.to_string()),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "unknown".to_string(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            request_id: RequestId(Uuid::new_v4()),
            ip_address: None,
            user_agent: None,
            authenticated: false,
            claims: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Create a RequestContext for system operations
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            request_id: RequestId(Uuid::new_v4()),
            ip_address: None,
            user_agent: None,
            authenticated: false,
            claims: None,
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
        }
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Set authentication state with claims; the actor becomes the subject
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.actor_id = claims.sub.clone();
        self.claims = Some(claims);
        self
    }

    /// Set the actor_id
    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = actor_id.into();
        self
    }

    /// IP address as a string for audit storage, "unknown" when absent
    pub fn ip_string(&self) -> String {
        self.ip_address
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
