use sea_orm::ConnectionTrait;
use serde_json::json;

use super::AuditLogger;
use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::audit::AuditAction;
use crate::types::internal::context::RequestContext;

impl AuditLogger {
    /// Log a password-reset request
    ///
    /// Only written once the reset email went out; a failed send leaves
    /// no trace, matching the endpoint's deliberately silent contract.
    pub async fn log_password_reset_requested(
        &self,
        ctx: &RequestContext,
        user: &user::Model,
    ) -> Result<(), InternalError> {
        let mut event = self.user_event(ctx, AuditAction::PasswordResetRequested, &user.id);
        event.payload.insert("email".to_string(), json!(user.email));

        self.audit_store.record(&event).await
    }

    /// Log a completed password reset
    ///
    /// Written inside the reset transaction, alongside the new hash and
    /// the session purge.
    pub async fn log_password_reset_completed<C: ConnectionTrait>(
        &self,
        conn: &C,
        ctx: &RequestContext,
        user: &user::Model,
    ) -> Result<(), InternalError> {
        let mut event = self.user_event(ctx, AuditAction::PasswordResetCompleted, &user.id);
        event.payload.insert("email".to_string(), json!(user.email));
        event
            .payload
            .insert("reset_method".to_string(), json!("email_token"));

        self.audit_store.write_event(conn, &event).await
    }
}
