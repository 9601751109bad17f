use argon2::{
    password_hash, password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash,
    PasswordHasher, PasswordVerifier, Version,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::types::db::agency::{self, Entity as Agency};
use crate::types::db::session::{self, Entity as Session};
use crate::types::db::supplier::{self, Entity as Supplier};
use crate::types::db::user::{self, Entity as User};
use crate::types::internal::{AgencyType, KycStatus, Role, UserStatus};

/// CredentialStore manages user accounts, their password hashes, and the
/// server-side session rows keyed by hashed token id.
///
/// Mutating methods take a `ConnectionTrait` so callers can run several of
/// them inside one transaction; read paths go straight to the pooled
/// connection.
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection and password pepper
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - The secret key used for password hashing (from SecretManager)
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    /// Argon2id hasher keyed with the server-side pepper
    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("initialize Argon2 with secret", e.to_string()))
    }

    /// Hash a plaintext password with Argon2id and a fresh random salt
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// A mismatch is an `Ok(false)`, not an error; only hash parsing or
    /// Argon2 failures surface as errors.
    fn password_matches(&self, password: &str, stored_hash: &str) -> Result<bool, InternalError> {
        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|e| InternalError::crypto("parse stored password hash", e.to_string()))?;

        match self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(InternalError::crypto("verify password", e.to_string())),
        }
    }

    /// Find a user by email address
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// Find a user by id
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Find the supplier organisation owned by the given user, if any
    pub async fn find_supplier_by_owner(
        &self,
        user_id: &str,
    ) -> Result<Option<supplier::Model>, InternalError> {
        Supplier::find()
            .filter(supplier::Column::OwnerUserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_supplier_by_owner", e))
    }

    /// Find an agency by id
    pub async fn find_agency_by_id(
        &self,
        agency_id: &str,
    ) -> Result<Option<agency::Model>, InternalError> {
        Agency::find_by_id(agency_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_agency_by_id", e))
    }

    /// Create a new user account with a hashed password
    ///
    /// The account starts ACTIVE with an unverified email. Callers should
    /// pre-check for an existing email to report the conflict cleanly; the
    /// unique constraint on email still backstops concurrent registrations.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user row
    /// * `Err(InternalError)` - `DuplicateEmail` if the email is taken
    pub async fn create_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        full_name: &str,
        email: &str,
        phone: Option<String>,
        password: &str,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let password_hash = self.hash_password(password)?;
        let now = Utc::now().timestamp();

        let new_user = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            full_name: Set(full_name.to_string()),
            phone: Set(phone),
            role: Set(role.as_str().to_string()),
            status: Set(UserStatus::Active.as_str().to_string()),
            email_verified_at: Set(None),
            last_login_at: Set(None),
            agency_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_user.insert(conn).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                CredentialError::DuplicateEmail(email.to_string()).into()
            } else {
                InternalError::database("create_user", e)
            }
        })
    }

    /// Find an agency by code, creating it when no such code exists
    ///
    /// Registration lets the first buyer from an agency introduce it; later
    /// buyers with the same code attach to the existing row.
    pub async fn create_agency_if_absent<C: ConnectionTrait>(
        &self,
        conn: &C,
        code: &str,
        name: &str,
        agency_type: AgencyType,
        contact_email: Option<String>,
        contact_phone: Option<String>,
    ) -> Result<agency::Model, InternalError> {
        let existing = Agency::find()
            .filter(agency::Column::Code.eq(code))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_agency_by_code", e))?;

        if let Some(agency) = existing {
            return Ok(agency);
        }

        let new_agency = agency::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            agency_type: Set(agency_type.as_str().to_string()),
            contact_email: Set(contact_email),
            contact_phone: Set(contact_phone),
            created_at: Set(Utc::now().timestamp()),
        };

        new_agency
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_agency", e))
    }

    /// Attach a user to an agency
    pub async fn assign_agency<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        agency_id: &str,
    ) -> Result<(), InternalError> {
        let update = user::ActiveModel {
            id: Set(user_id.to_string()),
            agency_id: Set(Some(agency_id.to_string())),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        update
            .update(conn)
            .await
            .map_err(|e| InternalError::database("assign_agency", e))?;

        Ok(())
    }

    /// Create a supplier organisation owned by the given user
    ///
    /// The pair (legal name, TIN) identifies a supplier; a second
    /// registration with the same pair is rejected so the caller can roll
    /// the surrounding transaction back.
    ///
    /// # Returns
    /// * `Ok(supplier::Model)` - The created supplier row
    /// * `Err(InternalError)` - `DuplicateSupplier` when legal name + TIN already exist
    pub async fn create_supplier<C: ConnectionTrait>(
        &self,
        conn: &C,
        owner: &user::Model,
        legal_name: &str,
        trading_name: Option<String>,
        tin: &str,
        address: Option<String>,
        categories: &[String],
    ) -> Result<supplier::Model, InternalError> {
        let existing = Supplier::find()
            .filter(supplier::Column::LegalName.eq(legal_name))
            .filter(supplier::Column::Tin.eq(tin))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_supplier_by_legal_name_tin", e))?;

        if existing.is_some() {
            return Err(CredentialError::DuplicateSupplier {
                legal_name: legal_name.to_string(),
                tin: tin.to_string(),
            }
            .into());
        }

        let categories_json = serde_json::to_string(categories)
            .map_err(|e| InternalError::parse("supplier categories", e.to_string()))?;

        let new_supplier = supplier::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            legal_name: Set(legal_name.to_string()),
            trading_name: Set(trading_name),
            tin: Set(tin.to_string()),
            address: Set(address),
            contact_email: Set(owner.email.clone()),
            contact_phone: Set(owner.phone.clone()),
            categories: Set(categories_json),
            kyc_status: Set(KycStatus::Pending.as_str().to_string()),
            irc_status: Set("NOT_PROVIDED".to_string()),
            owner_user_id: Set(owner.id.clone()),
            created_at: Set(Utc::now().timestamp()),
        };

        new_supplier
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_supplier", e))
    }

    /// Mark a user's email as verified
    ///
    /// Sets `email_verified_at` and, because verification doubles as the
    /// account's first sign-in, `last_login_at` as well.
    pub async fn mark_email_verified<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();
        let update = user::ActiveModel {
            id: Set(user_id.to_string()),
            email_verified_at: Set(Some(now)),
            last_login_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        update
            .update(conn)
            .await
            .map_err(|e| InternalError::database("mark_email_verified", e))
    }

    /// Move a supplier's KYC status back to PENDING for document upload
    pub async fn mark_supplier_kyc_pending<C: ConnectionTrait>(
        &self,
        conn: &C,
        supplier_id: &str,
    ) -> Result<(), InternalError> {
        let update = supplier::ActiveModel {
            id: Set(supplier_id.to_string()),
            kyc_status: Set(KycStatus::Pending.as_str().to_string()),
            ..Default::default()
        };

        update
            .update(conn)
            .await
            .map_err(|e| InternalError::database("mark_supplier_kyc_pending", e))?;

        Ok(())
    }

    /// Record a successful sign-in
    pub async fn update_last_login<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<(), InternalError> {
        let now = Utc::now().timestamp();
        let update = user::ActiveModel {
            id: Set(user_id.to_string()),
            last_login_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        update
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_last_login", e))?;

        Ok(())
    }

    /// Replace a user's password hash
    ///
    /// Rejects a new password identical to the current one so a stolen
    /// reset token cannot be used as a silent no-op.
    ///
    /// # Returns
    /// * `Err(InternalError)` - `PasswordUnchanged` when the new password matches the stored hash
    pub async fn update_password<C: ConnectionTrait>(
        &self,
        conn: &C,
        user: &user::Model,
        new_password: &str,
    ) -> Result<(), InternalError> {
        if self.password_matches(new_password, &user.password_hash)? {
            return Err(CredentialError::PasswordUnchanged.into());
        }

        let password_hash = self.hash_password(new_password)?;
        let update = user::ActiveModel {
            id: Set(user.id.clone()),
            password_hash: Set(password_hash),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        update
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_password", e))?;

        Ok(())
    }

    /// Verify email and password and return the matching user
    ///
    /// Unknown email, wrong password, and a non-ACTIVE account all collapse
    /// into the same `InvalidCredentials` error. When the email is unknown
    /// the presented password is still hashed once so the two failure paths
    /// take comparable time.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let user = self.find_by_email(email).await?;

        let user = match user {
            Some(user) => user,
            None => {
                self.hash_password(password)?;
                return Err(CredentialError::InvalidCredentials.into());
            }
        };

        if !self.password_matches(password, &user.password_hash)? {
            return Err(CredentialError::InvalidCredentials.into());
        }

        let status = UserStatus::parse(&user.status)
            .ok_or_else(|| InternalError::parse("user status", user.status.clone()))?;
        if !status.is_active() {
            return Err(CredentialError::InvalidCredentials.into());
        }

        Ok(user)
    }

    /// Insert a server-side session row for a signed token
    ///
    /// # Arguments
    /// * `token_hash` - HMAC of the token id, never the raw id
    pub async fn store_session<C: ConnectionTrait>(
        &self,
        conn: &C,
        token_hash: &str,
        user_id: &str,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        let new_session = session::ActiveModel {
            token_hash: Set(token_hash.to_string()),
            user_id: Set(user_id.to_string()),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().timestamp()),
        };

        new_session
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("store_session", e))?;

        Ok(())
    }

    /// Look up a session row by hashed token id
    ///
    /// An expired row is deleted on detection and reported as
    /// `ExpiredSession`; a missing row is `InvalidSession`.
    pub async fn validate_session(
        &self,
        token_hash: &str,
    ) -> Result<session::Model, InternalError> {
        let session = Session::find_by_id(token_hash)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_session", e))?
            .ok_or_else(|| CredentialError::InvalidSession("no matching session".to_string()))?;

        if session.expires_at < Utc::now().timestamp() {
            Session::delete_by_id(token_hash)
                .exec(&self.db)
                .await
                .map_err(|e| InternalError::database("delete_expired_session", e))?;
            return Err(CredentialError::ExpiredSession.into());
        }

        Ok(session)
    }

    /// Delete a single session row (logout)
    pub async fn revoke_session(&self, token_hash: &str) -> Result<(), InternalError> {
        Session::delete_by_id(token_hash)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("revoke_session", e))?;

        Ok(())
    }

    /// Delete every session row belonging to a user
    ///
    /// Used by password-reset completion so stolen sessions die with the
    /// old password.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of sessions removed
    pub async fn revoke_all_sessions<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<u64, InternalError> {
        let result = Session::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("revoke_all_sessions", e))?;

        Ok(result.rows_affected)
    }

    /// Count ACTIVE user accounts
    pub async fn count_active_users(&self) -> Result<u64, InternalError> {
        User::find()
            .filter(user::Column::Status.eq(UserStatus::Active.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_active_users", e))
    }

    /// Count ACTIVE user accounts grouped by role
    pub async fn count_active_users_by_role(&self) -> Result<Vec<(String, i64)>, InternalError> {
        User::find()
            .select_only()
            .column(user::Column::Role)
            .column_as(user::Column::Id.count(), "count")
            .filter(user::Column::Status.eq(UserStatus::Active.as_str()))
            .group_by(user::Column::Role)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("count_active_users_by_role", e))
    }

    /// Most recent registrations with their agency / supplier, newest first
    ///
    /// Unlike the aggregate counts this is not filtered by status; the
    /// admin dashboard shows what just happened, including accounts that
    /// were since suspended.
    pub async fn recent_registrations(
        &self,
        limit: u64,
    ) -> Result<Vec<(user::Model, Option<agency::Model>, Option<supplier::Model>)>, InternalError>
    {
        let users = User::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_recent_registrations", e))?;

        let agencies = users
            .load_one(Agency, &self.db)
            .await
            .map_err(|e| InternalError::database("load_registration_agencies", e))?;

        let suppliers = users
            .load_one(Supplier, &self.db)
            .await
            .map_err(|e| InternalError::database("load_registration_suppliers", e))?;

        Ok(users
            .into_iter()
            .zip(agencies)
            .zip(suppliers)
            .map(|((user, agency), supplier)| (user, agency, supplier))
            .collect())
    }
}

// Manual Debug implementation to prevent password_pepper from being exposed in logs
impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CredentialStore {{ db: <connection>, password_pepper: <redacted> }}"
        )
    }
}
