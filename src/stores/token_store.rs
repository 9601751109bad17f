use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

use crate::errors::internal::TokenError;
use crate::errors::InternalError;
use crate::types::db::verification_token::{self, Entity as VerificationToken};
use crate::types::internal::TokenPurpose;

/// TokenStore manages the one-time email-verification and password-reset
/// tokens, which share a table and are told apart by a prefix on the
/// stored value.
pub struct TokenStore {
    db: DatabaseConnection,
}

impl TokenStore {
    /// Create a new TokenStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stored form of a token: reset tokens carry their prefix, raw
    /// tokens handed to users never do.
    fn storage_value(purpose: TokenPurpose, token: &str) -> String {
        format!("{}{}", purpose.storage_prefix(), token)
    }

    /// Issue a token for an identifier, superseding any live ones
    ///
    /// Deletes every existing token of the same purpose for the
    /// identifier, then inserts the new row. Callers run this inside a
    /// transaction so a race between two issues cannot leave two live
    /// tokens.
    pub async fn issue<C: ConnectionTrait>(
        &self,
        conn: &C,
        purpose: TokenPurpose,
        identifier: &str,
        token: &str,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        let scope = VerificationToken::delete_many()
            .filter(verification_token::Column::Identifier.eq(identifier));
        let scope = match purpose {
            TokenPurpose::EmailVerification => {
                scope.filter(verification_token::Column::Token.not_like("reset_%"))
            }
            TokenPurpose::PasswordReset => {
                scope.filter(verification_token::Column::Token.like("reset_%"))
            }
        };
        scope
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_superseded_tokens", e))?;

        let new_token = verification_token::ActiveModel {
            token: Set(Self::storage_value(purpose, token)),
            identifier: Set(identifier.to_string()),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().timestamp()),
        };

        new_token
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_token", e))?;

        Ok(())
    }

    /// Look up a live token row
    ///
    /// An expired row is deleted on detection and reported as `Expired`;
    /// a missing row is `NotFound`. The returned model's `identifier` is
    /// the email the token was issued for.
    pub async fn find_active(
        &self,
        purpose: TokenPurpose,
        token: &str,
    ) -> Result<verification_token::Model, InternalError> {
        let storage_value = Self::storage_value(purpose, token);

        let row = VerificationToken::find_by_id(&storage_value)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_token", e))?
            .ok_or(TokenError::NotFound {
                purpose: purpose.display_name(),
            })?;

        if Utc::now().timestamp() > row.expires_at {
            VerificationToken::delete_by_id(&storage_value)
                .exec(&self.db)
                .await
                .map_err(|e| InternalError::database("delete_expired_token", e))?;
            return Err(TokenError::Expired {
                purpose: purpose.display_name(),
            }
            .into());
        }

        Ok(row)
    }

    /// Delete a consumed token inside the caller's transaction
    pub async fn consume<C: ConnectionTrait>(
        &self,
        conn: &C,
        purpose: TokenPurpose,
        token: &str,
    ) -> Result<(), InternalError> {
        VerificationToken::delete_by_id(Self::storage_value(purpose, token))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("consume_token", e))?;

        Ok(())
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenStore {{ db: <connection> }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> (DatabaseConnection, TokenStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let token_store = TokenStore::new(db.clone());

        (db, token_store)
    }

    const TOKEN_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const TOKEN_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    #[tokio::test]
    async fn test_issue_and_find_roundtrip() {
        let (db, store) = setup_test_db().await;
        let expires_at = Utc::now().timestamp() + 3600;

        store
            .issue(&db, TokenPurpose::EmailVerification, "user@example.com", TOKEN_A, expires_at)
            .await
            .expect("Failed to issue token");

        let row = store
            .find_active(TokenPurpose::EmailVerification, TOKEN_A)
            .await
            .expect("Expected token to be found");

        assert_eq!(row.identifier, "user@example.com");
        assert_eq!(row.expires_at, expires_at);
    }

    #[tokio::test]
    async fn test_reset_tokens_are_stored_prefixed() {
        let (db, store) = setup_test_db().await;
        let expires_at = Utc::now().timestamp() + 3600;

        store
            .issue(&db, TokenPurpose::PasswordReset, "user@example.com", TOKEN_A, expires_at)
            .await
            .expect("Failed to issue token");

        // Visible under its own purpose, invisible to the other
        store
            .find_active(TokenPurpose::PasswordReset, TOKEN_A)
            .await
            .expect("Expected reset token to be found");

        let cross = store.find_active(TokenPurpose::EmailVerification, TOKEN_A).await;
        assert!(matches!(
            cross,
            Err(InternalError::Token(TokenError::NotFound { .. }))
        ));

        let raw = VerificationToken::find_by_id(format!("reset_{}", TOKEN_A))
            .one(&db)
            .await
            .expect("Failed to query token");
        assert!(raw.is_some());
    }

    #[tokio::test]
    async fn test_issue_supersedes_previous_token_of_same_purpose() {
        let (db, store) = setup_test_db().await;
        let expires_at = Utc::now().timestamp() + 3600;

        store
            .issue(&db, TokenPurpose::EmailVerification, "user@example.com", TOKEN_A, expires_at)
            .await
            .expect("Failed to issue first token");
        store
            .issue(&db, TokenPurpose::EmailVerification, "user@example.com", TOKEN_B, expires_at)
            .await
            .expect("Failed to issue second token");

        let old = store.find_active(TokenPurpose::EmailVerification, TOKEN_A).await;
        assert!(matches!(
            old,
            Err(InternalError::Token(TokenError::NotFound { .. }))
        ));

        store
            .find_active(TokenPurpose::EmailVerification, TOKEN_B)
            .await
            .expect("Expected replacement token to be live");
    }

    #[tokio::test]
    async fn test_issue_leaves_other_purpose_untouched() {
        let (db, store) = setup_test_db().await;
        let expires_at = Utc::now().timestamp() + 3600;

        store
            .issue(&db, TokenPurpose::EmailVerification, "user@example.com", TOKEN_A, expires_at)
            .await
            .expect("Failed to issue verification token");
        store
            .issue(&db, TokenPurpose::PasswordReset, "user@example.com", TOKEN_B, expires_at)
            .await
            .expect("Failed to issue reset token");

        // The reset issue must not have deleted the verification token
        store
            .find_active(TokenPurpose::EmailVerification, TOKEN_A)
            .await
            .expect("Expected verification token to survive");
        store
            .find_active(TokenPurpose::PasswordReset, TOKEN_B)
            .await
            .expect("Expected reset token to be live");
    }

    #[tokio::test]
    async fn test_issue_is_scoped_to_identifier() {
        let (db, store) = setup_test_db().await;
        let expires_at = Utc::now().timestamp() + 3600;

        store
            .issue(&db, TokenPurpose::EmailVerification, "first@example.com", TOKEN_A, expires_at)
            .await
            .expect("Failed to issue token");
        store
            .issue(&db, TokenPurpose::EmailVerification, "second@example.com", TOKEN_B, expires_at)
            .await
            .expect("Failed to issue token");

        store
            .find_active(TokenPurpose::EmailVerification, TOKEN_A)
            .await
            .expect("Expected first user's token to survive");
    }

    #[tokio::test]
    async fn test_find_active_deletes_expired_row() {
        let (db, store) = setup_test_db().await;

        store
            .issue(
                &db,
                TokenPurpose::PasswordReset,
                "user@example.com",
                TOKEN_A,
                Utc::now().timestamp() - 10,
            )
            .await
            .expect("Failed to issue token");

        let result = store.find_active(TokenPurpose::PasswordReset, TOKEN_A).await;
        match result {
            Err(InternalError::Token(TokenError::Expired { purpose })) => {
                assert_eq!(purpose, "Reset");
            }
            other => panic!("Expected Expired error, got {:?}", other.map(|r| r.token)),
        }

        // Deleted on detection, so the second lookup is a plain miss
        let second = store.find_active(TokenPurpose::PasswordReset, TOKEN_A).await;
        assert!(matches!(
            second,
            Err(InternalError::Token(TokenError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_consume_removes_single_row() {
        let (db, store) = setup_test_db().await;
        let expires_at = Utc::now().timestamp() + 3600;

        store
            .issue(&db, TokenPurpose::EmailVerification, "user@example.com", TOKEN_A, expires_at)
            .await
            .expect("Failed to issue verification token");
        store
            .issue(&db, TokenPurpose::PasswordReset, "user@example.com", TOKEN_B, expires_at)
            .await
            .expect("Failed to issue reset token");

        store
            .consume(&db, TokenPurpose::EmailVerification, TOKEN_A)
            .await
            .expect("Failed to consume token");

        let gone = store.find_active(TokenPurpose::EmailVerification, TOKEN_A).await;
        assert!(matches!(
            gone,
            Err(InternalError::Token(TokenError::NotFound { .. }))
        ));

        store
            .find_active(TokenPurpose::PasswordReset, TOKEN_B)
            .await
            .expect("Expected unrelated reset token to survive");
    }
}
