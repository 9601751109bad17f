use sea_orm::ConnectionTrait;
use serde_json::json;

use super::AuditLogger;
use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::audit::AuditAction;
use crate::types::internal::context::RequestContext;

impl AuditLogger {
    /// Log a successful email verification
    ///
    /// Written inside the verification transaction.
    pub async fn log_email_verified<C: ConnectionTrait>(
        &self,
        conn: &C,
        ctx: &RequestContext,
        user: &user::Model,
    ) -> Result<(), InternalError> {
        let mut event = self.user_event(ctx, AuditAction::EmailVerified, &user.id);
        event.payload.insert("email".to_string(), json!(user.email));
        event.payload.insert("role".to_string(), json!(user.role));
        event
            .payload
            .insert("verification_method".to_string(), json!("email_token"));

        self.audit_store.write_event(conn, &event).await
    }

    /// Log a re-sent verification email (best-effort, after the send)
    pub async fn log_verification_email_resent(
        &self,
        ctx: &RequestContext,
        user: &user::Model,
    ) -> Result<(), InternalError> {
        let mut event = self.user_event(ctx, AuditAction::VerificationEmailResent, &user.id);
        event.payload.insert("email".to_string(), json!(user.email));

        self.audit_store.record(&event).await
    }
}
