use sea_orm::ConnectionTrait;
use serde_json::json;

use super::AuditLogger;
use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::audit::AuditAction;
use crate::types::internal::context::RequestContext;

impl AuditLogger {
    /// Log a completed registration
    ///
    /// Written inside the registration transaction so the account and its
    /// audit entry commit together.
    pub async fn log_user_registered<C: ConnectionTrait>(
        &self,
        conn: &C,
        ctx: &RequestContext,
        user: &user::Model,
    ) -> Result<(), InternalError> {
        let mut event = self.user_event(ctx, AuditAction::UserRegistered, &user.id);
        event.payload.insert("role".to_string(), json!(user.role));
        event.payload.insert("email".to_string(), json!(user.email));
        event
            .payload
            .insert("registration_method".to_string(), json!("email"));

        self.audit_store.write_event(conn, &event).await
    }
}
