use std::collections::HashMap;
use std::fmt;

/// Actions recorded in the audit log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditAction {
    UserRegistered,
    EmailVerified,
    VerificationEmailResent,
    PasswordResetRequested,
    PasswordResetCompleted,
    LoginSucceeded,
    LoginFailed,
    Logout,
    Custom(String),
}

impl AuditAction {
    /// Convert AuditAction to string representation for database storage
    pub fn as_str(&self) -> &str {
        match self {
            Self::UserRegistered => "USER_REGISTERED",
            Self::EmailVerified => "EMAIL_VERIFIED",
            Self::VerificationEmailResent => "VERIFICATION_EMAIL_RESENT",
            Self::PasswordResetRequested => "PASSWORD_RESET_REQUESTED",
            Self::PasswordResetCompleted => "PASSWORD_RESET_COMPLETED",
            Self::LoginSucceeded => "LOGIN_SUCCEEDED",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::Logout => "LOGOUT",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<T: Into<String>> From<T> for AuditAction {
    fn from(s: T) -> Self {
        AuditAction::Custom(s.into())
    }
}

/// Audit event structure for building and storing audit log entries
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub actor_user_id: Option<String>,
    pub entity: String,
    pub entity_id: String,
    pub payload: HashMap<String, serde_json::Value>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl AuditEvent {
    /// Create a new audit event for the given action and target entity
    pub fn new(action: AuditAction, entity: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            action,
            actor_user_id: None,
            entity: entity.into(),
            entity_id: entity_id.into(),
            payload: HashMap::new(),
            ip: None,
            user_agent: None,
        }
    }
}
