use std::sync::Arc;

use crate::stores::AuditStore;
use crate::types::internal::audit::{AuditAction, AuditEvent};
use crate::types::internal::context::RequestContext;

/// Builds and writes audit events for the identity flows
///
/// One logging method per recorded action, grouped into one file per
/// flow. Methods taking a connection participate in the caller's
/// transaction; the rest write directly and are best-effort.
pub struct AuditLogger {
    pub audit_store: Arc<AuditStore>,
}

impl AuditLogger {
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    /// Event targeting a user who is also the actor, stamped with the
    /// request's IP, User-Agent, and request id
    pub(crate) fn user_event(
        &self,
        ctx: &RequestContext,
        action: AuditAction,
        user_id: &str,
    ) -> AuditEvent {
        let mut event = AuditEvent::new(action, "User", user_id);
        event.actor_user_id = Some(user_id.to_string());
        event.ip = Some(ctx.ip_string());
        event.user_agent = ctx.user_agent.clone();
        event.payload.insert(
            "request_id".to_string(),
            serde_json::json!(ctx.request_id.to_string()),
        );
        event
    }
}
