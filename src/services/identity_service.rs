use std::collections::HashMap;
use std::sync::Arc;

use chrono::DateTime;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::audit::AuditLogger;
use crate::errors::internal::{CredentialError, DatabaseError, TokenError};
use crate::errors::InternalError;
use crate::services::{MailerService, TokenService};
use crate::stores::{CredentialStore, TokenStore};
use crate::types::db::{agency, supplier, user};
use crate::types::dto::auth::{
    AgencySummary, GenericMessageResponse, LoginRequest, LoginResponse, RecentRegistration,
    RegisterRequest, RegisterResponse, RegisteredUser, RegistrationStats,
    RegistrationStatsResponse, ResetPasswordRequest, ResetPasswordResponse, ResetTokenStatusResponse,
    ResetTokenUser, SessionResponse, SessionUser, SupplierSummary, VerifiedUser,
    VerifyEmailResponse,
};
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{AgencyType, Role, TokenPurpose, UserStatus};

/// Orchestrates the identity lifecycle: registration, email verification,
/// sign-in and sessions, and password reset.
///
/// Each flow runs its multi-row writes inside one transaction and keeps
/// outbound email strictly after the commit, so a slow or failing mail
/// provider can never hold a transaction open or unwind a committed
/// account change.
pub struct IdentityService {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    token_store: Arc<TokenStore>,
    token_service: Arc<TokenService>,
    mailer: Arc<MailerService>,
    audit_logger: AuditLogger,
}

fn agency_summary(agency: &agency::Model) -> AgencySummary {
    AgencySummary {
        id: agency.id.clone(),
        name: agency.name.clone(),
        code: agency.code.clone(),
        agency_type: agency.agency_type.clone(),
    }
}

fn supplier_summary(supplier: &supplier::Model) -> SupplierSummary {
    SupplierSummary {
        id: supplier.id.clone(),
        legal_name: supplier.legal_name.clone(),
        kyc_status: supplier.kyc_status.clone(),
    }
}

fn rfc3339(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0).map(|t| t.to_rfc3339())
}

fn is_active(user: &user::Model) -> bool {
    UserStatus::parse(&user.status)
        .map(|s| s.is_active())
        .unwrap_or(false)
}

impl IdentityService {
    pub fn new(
        db: DatabaseConnection,
        credential_store: Arc<CredentialStore>,
        token_store: Arc<TokenStore>,
        token_service: Arc<TokenService>,
        mailer: Arc<MailerService>,
        audit_logger: AuditLogger,
    ) -> Self {
        Self {
            db,
            credential_store,
            token_store,
            token_service,
            mailer,
            audit_logger,
        }
    }

    /// Register a new account
    ///
    /// One transaction creates the user, its role-specific organisation
    /// link, the verification token, and the audit entry. The
    /// verification email goes out after commit; a send failure only
    /// flips `email_sent` in the response.
    pub async fn register(
        &self,
        ctx: &RequestContext,
        request: &RegisterRequest,
    ) -> Result<RegisterResponse, InternalError> {
        let role = Role::parse(&request.role)
            .ok_or_else(|| InternalError::parse("role", request.role.clone()))?;

        // Explicit pre-check so the common case reports cleanly; the
        // unique constraint still decides races
        if self
            .credential_store
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(CredentialError::DuplicateEmail(request.email.clone()).into());
        }

        let (verification_token, token_expires_at) = self.token_service.issue_verification_token();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let user = self
            .credential_store
            .create_user(
                &txn,
                &request.full_name,
                &request.email,
                request.phone.clone(),
                &request.password,
                role,
            )
            .await?;

        match role {
            Role::SupplierUser => {
                let categories = request.categories.clone().unwrap_or_default();
                self.credential_store
                    .create_supplier(
                        &txn,
                        &user,
                        request.legal_name.as_deref().unwrap_or_default(),
                        request.trading_name.clone(),
                        request.tin.as_deref().unwrap_or_default(),
                        request.address.clone(),
                        &categories,
                    )
                    .await?;
            }
            Role::AgencyBuyer => {
                let agency_type = request
                    .agency_type
                    .as_deref()
                    .and_then(AgencyType::parse)
                    .unwrap_or(AgencyType::Ministry);
                let agency = self
                    .credential_store
                    .create_agency_if_absent(
                        &txn,
                        request.agency_code.as_deref().unwrap_or_default(),
                        request.agency_name.as_deref().unwrap_or_default(),
                        agency_type,
                        Some(user.email.clone()),
                        user.phone.clone(),
                    )
                    .await?;
                self.credential_store
                    .assign_agency(&txn, &user.id, &agency.id)
                    .await?;
            }
            // Admin and auditor accounts are provisioned out of band
            Role::NpcAdmin | Role::Auditor => {}
        }

        self.token_store
            .issue(
                &txn,
                TokenPurpose::EmailVerification,
                &user.email,
                &verification_token,
                token_expires_at,
            )
            .await?;

        self.audit_logger
            .log_user_registered(&txn, ctx, &user)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        let email_sent = match self
            .mailer
            .send_verification_email(&user.email, &user.full_name, &verification_token)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to send verification email: {}", e);
                false
            }
        };

        Ok(RegisterResponse {
            success: true,
            message: "Registration successful. Please check your email to verify your account."
                .to_string(),
            user: RegisteredUser {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
                role: user.role,
            },
            email_sent,
        })
    }

    /// Verify an email address with a one-time token
    ///
    /// A replayed link for an already-verified account short-circuits to
    /// success without touching anything, so the second click of an
    /// impatient user is not an error.
    pub async fn verify_email(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<VerifyEmailResponse, InternalError> {
        if !self.token_service.is_valid_token_format(token) {
            return Err(TokenError::InvalidFormat.into());
        }

        let row = self
            .token_store
            .find_active(TokenPurpose::EmailVerification, token)
            .await?;

        let user = self
            .credential_store
            .find_by_email(&row.identifier)
            .await?
            .ok_or_else(|| CredentialError::UserNotFound(row.identifier.clone()))?;

        if user.email_verified_at.is_some() {
            return Ok(VerifyEmailResponse {
                success: true,
                message: "Email already verified".to_string(),
                user: VerifiedUser {
                    id: user.id,
                    email: user.email,
                    full_name: user.full_name,
                    role: user.role,
                    email_verified: true,
                    agency: None,
                    supplier: None,
                },
                welcome_email_sent: false,
            });
        }

        let supplier = self.credential_store.find_supplier_by_owner(&user.id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let updated = self.credential_store.mark_email_verified(&txn, &user.id).await?;

        if let Some(supplier) = &supplier {
            self.credential_store
                .mark_supplier_kyc_pending(&txn, &supplier.id)
                .await?;
        }

        self.token_store
            .consume(&txn, TokenPurpose::EmailVerification, token)
            .await?;

        self.audit_logger
            .log_email_verified(&txn, ctx, &updated)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        let role = Role::parse(&updated.role)
            .ok_or_else(|| InternalError::parse("role", updated.role.clone()))?;
        let welcome_email_sent = match self
            .mailer
            .send_welcome_email(&updated.email, &updated.full_name, role)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to send welcome email: {}", e);
                false
            }
        };

        let agency = match updated.agency_id.as_deref() {
            Some(agency_id) => self.credential_store.find_agency_by_id(agency_id).await?,
            None => None,
        };

        Ok(VerifyEmailResponse {
            success: true,
            message: "Email verified successfully! Welcome to PNG e-GP.".to_string(),
            user: VerifiedUser {
                id: updated.id,
                email: updated.email,
                full_name: updated.full_name,
                role: updated.role,
                email_verified: true,
                agency: agency.as_ref().map(agency_summary),
                supplier: supplier.as_ref().map(supplier_summary),
            },
            welcome_email_sent,
        })
    }

    /// Re-issue a verification token and send a fresh email
    ///
    /// Unlike elsewhere, the email send is the whole point here, so a
    /// failure is the operation's failure.
    pub async fn resend_verification(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<GenericMessageResponse, InternalError> {
        let user = self
            .credential_store
            .find_by_email(email)
            .await?
            .ok_or_else(|| CredentialError::UserNotFound(email.to_string()))?;

        if user.email_verified_at.is_some() {
            return Err(CredentialError::EmailAlreadyVerified(user.email).into());
        }

        let (verification_token, token_expires_at) = self.token_service.issue_verification_token();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        self.token_store
            .issue(
                &txn,
                TokenPurpose::EmailVerification,
                &user.email,
                &verification_token,
                token_expires_at,
            )
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        self.mailer
            .send_verification_email(&user.email, &user.full_name, &verification_token)
            .await?;

        if let Err(audit_err) = self
            .audit_logger
            .log_verification_email_resent(ctx, &user)
            .await
        {
            tracing::error!("Failed to log verification resend: {:?}", audit_err);
        }

        Ok(GenericMessageResponse {
            success: true,
            message: "Verification email sent successfully".to_string(),
        })
    }

    /// Sign a user in and open a server-side session
    pub async fn login(
        &self,
        ctx: &RequestContext,
        request: &LoginRequest,
    ) -> Result<LoginResponse, InternalError> {
        let user = match self
            .credential_store
            .verify_credentials(&request.email, &request.password)
            .await
        {
            Ok(user) => user,
            Err(err) => {
                if matches!(
                    err,
                    InternalError::Credential(CredentialError::InvalidCredentials)
                ) {
                    if let Err(audit_err) =
                        self.audit_logger.log_login_failed(ctx, &request.email).await
                    {
                        tracing::error!("Failed to log login failure: {:?}", audit_err);
                    }
                }
                return Err(err);
            }
        };

        let role = Role::parse(&user.role)
            .ok_or_else(|| InternalError::parse("role", user.role.clone()))?;
        let (token, jti, expires_at) = self.token_service.generate_session_jwt(&user.id, role)?;
        let token_hash = self.token_service.hash_session_token(&jti);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        self.credential_store.update_last_login(&txn, &user.id).await?;
        self.credential_store
            .store_session(&txn, &token_hash, &user.id, expires_at)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        if let Err(audit_err) = self.audit_logger.log_login_succeeded(ctx, &user).await {
            tracing::error!("Failed to log login success: {:?}", audit_err);
        }

        let session_user = self.session_user(&user).await?;

        Ok(LoginResponse {
            token,
            user: session_user,
        })
    }

    /// Validate a bearer session token and resolve its user
    ///
    /// Both the JWT signature and the server-side session row must check
    /// out; a revoked session invalidates an otherwise well-formed token.
    pub async fn authenticate(&self, token: &str) -> Result<(Claims, user::Model), InternalError> {
        let claims = self.token_service.validate_session_jwt(token)?;
        let token_hash = self.token_service.hash_session_token(&claims.jti);
        self.credential_store.validate_session(&token_hash).await?;

        let user = self
            .credential_store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                CredentialError::InvalidSession("session user no longer exists".to_string())
            })?;

        if !is_active(&user) {
            return Err(
                CredentialError::InvalidSession("session user is not active".to_string()).into(),
            );
        }

        Ok((claims, user))
    }

    /// Return the authenticated user for a valid bearer session
    pub async fn session(&self, token: &str) -> Result<SessionResponse, InternalError> {
        let (_claims, user) = self.authenticate(token).await?;
        let user = self.session_user(&user).await?;

        Ok(SessionResponse { user })
    }

    /// Delete the session row behind a bearer token
    pub async fn logout(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<GenericMessageResponse, InternalError> {
        let (claims, _user) = self.authenticate(token).await?;
        let token_hash = self.token_service.hash_session_token(&claims.jti);
        self.credential_store.revoke_session(&token_hash).await?;

        if let Err(audit_err) = self.audit_logger.log_logout(ctx, &claims.sub).await {
            tracing::error!("Failed to log logout: {:?}", audit_err);
        }

        Ok(GenericMessageResponse {
            success: true,
            message: "Signed out successfully".to_string(),
        })
    }

    /// Issue a password-reset token and email its link
    ///
    /// The response body is byte-identical whether or not the account
    /// exists; only an existing ACTIVE account gets a token and an email,
    /// and the audit entry is written only once the email went out.
    pub async fn request_password_reset(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<GenericMessageResponse, InternalError> {
        if let Some(user) = self.credential_store.find_by_email(email).await? {
            if is_active(&user) {
                let (reset_token, token_expires_at) = self.token_service.issue_reset_token();

                let txn = self
                    .db
                    .begin()
                    .await
                    .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

                self.token_store
                    .issue(
                        &txn,
                        TokenPurpose::PasswordReset,
                        &user.email,
                        &reset_token,
                        token_expires_at,
                    )
                    .await?;

                txn.commit()
                    .await
                    .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

                match self
                    .mailer
                    .send_password_reset_email(&user.email, &user.full_name, &reset_token)
                    .await
                {
                    Ok(()) => {
                        if let Err(audit_err) = self
                            .audit_logger
                            .log_password_reset_requested(ctx, &user)
                            .await
                        {
                            tracing::error!(
                                "Failed to log password reset request: {:?}",
                                audit_err
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to send password reset email: {}", e);
                    }
                }
            }
        }

        Ok(GenericMessageResponse {
            success: true,
            message: "If an account with that email exists, we have sent a password reset link."
                .to_string(),
        })
    }

    /// Report whether a reset token is usable, without consuming it
    ///
    /// Policy misses come back as `valid: false` with a reason; only
    /// infrastructure failures surface as errors.
    pub async fn check_reset_token(
        &self,
        token: Option<&str>,
    ) -> Result<ResetTokenStatusResponse, InternalError> {
        fn rejected(error: &str) -> ResetTokenStatusResponse {
            ResetTokenStatusResponse {
                valid: false,
                error: Some(error.to_string()),
                user: None,
                expires_at: None,
            }
        }

        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(rejected("Reset token is required")),
        };

        if !self.token_service.is_valid_token_format(token) {
            return Ok(rejected("Invalid token format"));
        }

        let row = match self
            .token_store
            .find_active(TokenPurpose::PasswordReset, token)
            .await
        {
            Ok(row) => row,
            Err(InternalError::Token(TokenError::NotFound { .. })) => {
                return Ok(rejected("Invalid reset token"))
            }
            Err(InternalError::Token(TokenError::Expired { .. })) => {
                return Ok(rejected("Reset token has expired"))
            }
            Err(err) => return Err(err),
        };

        let user = match self.credential_store.find_by_email(&row.identifier).await? {
            Some(user) if is_active(&user) => user,
            _ => return Ok(rejected("User account not found or inactive")),
        };

        Ok(ResetTokenStatusResponse {
            valid: true,
            error: None,
            user: Some(ResetTokenUser {
                email: user.email,
                full_name: user.full_name,
            }),
            expires_at: rfc3339(row.expires_at),
        })
    }

    /// Complete a password reset with a one-time token
    ///
    /// One transaction writes the new hash, consumes the token, and
    /// deletes every session the user had, so a stolen session dies with
    /// the old password. No auto-login.
    pub async fn complete_password_reset(
        &self,
        ctx: &RequestContext,
        request: &ResetPasswordRequest,
    ) -> Result<ResetPasswordResponse, InternalError> {
        // A malformed token can never match a stored one; report the
        // same miss without a lookup
        if !self.token_service.is_valid_token_format(&request.token) {
            return Err(TokenError::NotFound {
                purpose: TokenPurpose::PasswordReset.display_name(),
            }
            .into());
        }

        let row = self
            .token_store
            .find_active(TokenPurpose::PasswordReset, &request.token)
            .await?;

        let user = self
            .credential_store
            .find_by_email(&row.identifier)
            .await?
            .ok_or_else(|| CredentialError::AccountInactive(row.identifier.clone()))?;
        if !is_active(&user) {
            return Err(CredentialError::AccountInactive(user.email).into());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        self.credential_store
            .update_password(&txn, &user, &request.password)
            .await?;

        self.token_store
            .consume(&txn, TokenPurpose::PasswordReset, &request.token)
            .await?;

        self.credential_store
            .revoke_all_sessions(&txn, &user.id)
            .await?;

        self.audit_logger
            .log_password_reset_completed(&txn, ctx, &user)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        Ok(ResetPasswordResponse {
            success: true,
            message: "Password reset successfully. Please sign in with your new password."
                .to_string(),
            user: ResetTokenUser {
                email: user.email,
                full_name: user.full_name,
            },
        })
    }

    /// Registration statistics for the admin dashboard
    ///
    /// Aggregates count ACTIVE accounts only; the recent listing is
    /// unfiltered so the dashboard shows what just happened.
    pub async fn registration_stats(&self) -> Result<RegistrationStatsResponse, InternalError> {
        let total = self.credential_store.count_active_users().await?;
        let by_role = self
            .credential_store
            .count_active_users_by_role()
            .await?
            .into_iter()
            .map(|(role, count)| (role, count as u64))
            .collect::<HashMap<_, _>>();

        let recent_registrations = self
            .credential_store
            .recent_registrations(10)
            .await?
            .into_iter()
            .map(|(user, agency, supplier)| RecentRegistration {
                id: user.id,
                full_name: user.full_name,
                email: user.email,
                role: user.role,
                created_at: rfc3339(user.created_at).unwrap_or_default(),
                agency: agency.as_ref().map(agency_summary),
                supplier: supplier.as_ref().map(supplier_summary),
            })
            .collect();

        Ok(RegistrationStatsResponse {
            stats: RegistrationStats { total, by_role },
            recent_registrations,
        })
    }

    /// User summary carried by login and session responses
    async fn session_user(&self, user: &user::Model) -> Result<SessionUser, InternalError> {
        let agency = match user.agency_id.as_deref() {
            Some(agency_id) => self.credential_store.find_agency_by_id(agency_id).await?,
            None => None,
        };
        let supplier = self.credential_store.find_supplier_by_owner(&user.id).await?;

        Ok(SessionUser {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.clone(),
            agency_id: user.agency_id.clone(),
            agency: agency.as_ref().map(agency_summary),
            supplier_id: supplier.map(|s| s.id),
        })
    }
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdentityService {{ db: <connection>, .. }}")
    }
}
