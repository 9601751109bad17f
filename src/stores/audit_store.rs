use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set};

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::services::crypto;
use crate::types::db::audit_log;
use crate::types::internal::audit::AuditEvent;

/// Repository for the append-only audit trail
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write an audit event on the given connection
    ///
    /// Flows that must commit their audit entry atomically with their
    /// state change pass their transaction here. The payload map is
    /// serialized to JSON; an absent actor is stored as "unknown".
    pub async fn write_event<C: ConnectionTrait>(
        &self,
        conn: &C,
        event: &AuditEvent,
    ) -> Result<(), InternalError> {
        let payload_json =
            serde_json::to_string(&event.payload).map_err(AuditError::SerializationFailed)?;

        let row = audit_log::ActiveModel {
            id: Set(crypto::generate_audit_id()),
            actor_user_id: Set(event
                .actor_user_id
                .clone()
                .unwrap_or_else(|| "unknown".to_string())),
            action: Set(event.action.to_string()),
            entity: Set(event.entity.clone()),
            entity_id: Set(event.entity_id.clone()),
            payload: Set(payload_json),
            ip: Set(event.ip.clone()),
            user_agent: Set(event.user_agent.clone()),
            created_at: Set(Utc::now().timestamp()),
        };

        row.insert(conn)
            .await
            .map_err(|e| AuditError::LogWriteFailed(e.to_string()))?;

        Ok(())
    }

    /// Write an audit event outside any transaction (best-effort paths)
    pub async fn record(&self, event: &AuditEvent) -> Result<(), InternalError> {
        self.write_event(&self.db, event).await
    }
}

impl std::fmt::Debug for AuditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuditStore {{ db: <connection> }}")
    }
}
