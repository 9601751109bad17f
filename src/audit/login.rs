use serde_json::json;

use super::AuditLogger;
use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::audit::{AuditAction, AuditEvent};
use crate::types::internal::context::RequestContext;

impl AuditLogger {
    /// Log a successful sign-in (best-effort, after commit)
    pub async fn log_login_succeeded(
        &self,
        ctx: &RequestContext,
        user: &user::Model,
    ) -> Result<(), InternalError> {
        let mut event = self.user_event(ctx, AuditAction::LoginSucceeded, &user.id);
        event.payload.insert("email".to_string(), json!(user.email));
        event.payload.insert("role".to_string(), json!(user.role));

        self.audit_store.record(&event).await
    }

    /// Log a rejected sign-in attempt
    ///
    /// There may be no matching account, so the presented email stands in
    /// as the entity id and the actor stays unknown.
    pub async fn log_login_failed(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<(), InternalError> {
        let mut event = AuditEvent::new(AuditAction::LoginFailed, "User", email);
        event.ip = Some(ctx.ip_string());
        event.user_agent = ctx.user_agent.clone();
        event
            .payload
            .insert("request_id".to_string(), json!(ctx.request_id.to_string()));
        event.payload.insert("email".to_string(), json!(email));
        event
            .payload
            .insert("reason".to_string(), json!("invalid_credentials"));

        self.audit_store.record(&event).await
    }

    /// Log a logout (best-effort, after the session row is gone)
    pub async fn log_logout(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<(), InternalError> {
        let event = self.user_event(ctx, AuditAction::Logout, user_id);

        self.audit_store.record(&event).await
    }
}
