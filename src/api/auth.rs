use std::sync::Arc;

use poem::Request;
use poem_openapi::{auth::Bearer, param::Query, payload::Json, OpenApi, SecurityScheme, Tags};

use crate::errors::{AuthError, ValidationDetail};
use crate::services::{validation, IdentityService};
use crate::types::dto::auth::{
    ForgotPasswordRequest, GenericMessageResponse, LoginRequest, LoginResponse,
    RegisterApiResponse, RegisterRequest, RegistrationStatsResponse, ResendVerificationRequest,
    ResetPasswordRequest, ResetPasswordResponse, ResetTokenCheckApiResponse, SessionResponse,
    VerifyEmailRequest, VerifyEmailResponse,
};
use crate::types::internal::context::RequestContext;

/// Identity lifecycle API endpoints
pub struct AuthApi {
    identity_service: Arc<IdentityService>,
}

impl AuthApi {
    /// Create a new AuthApi backed by the given IdentityService
    pub fn new(identity_service: Arc<IdentityService>) -> Self {
        Self { identity_service }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(Bearer);

/// API tags for identity endpoints
#[derive(Tags)]
enum AuthTags {
    /// Registration, verification, sessions, and password reset
    Identity,
}

fn ensure_valid(details: Vec<ValidationDetail>) -> Result<(), AuthError> {
    if details.is_empty() {
        Ok(())
    } else {
        Err(AuthError::validation_failed(details))
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a supplier or agency account and send a verification email
    #[oai(path = "/register", method = "post", tag = "AuthTags::Identity")]
    async fn register(
        &self,
        req: &Request,
        body: Json<RegisterRequest>,
    ) -> Result<RegisterApiResponse, AuthError> {
        ensure_valid(validation::validate_registration(&body))?;

        let ctx = RequestContext::from_request(req);
        let response = self.identity_service.register(&ctx, &body).await?;

        Ok(RegisterApiResponse::Created(Json(response)))
    }

    /// Registration statistics for the admin dashboard
    #[oai(path = "/register", method = "get", tag = "AuthTags::Identity")]
    async fn registration_stats(&self) -> Result<Json<RegistrationStatsResponse>, AuthError> {
        let response = self.identity_service.registration_stats().await?;

        Ok(Json(response))
    }

    /// Verify an email address with the token from the verification email
    #[oai(path = "/verify-email", method = "post", tag = "AuthTags::Identity")]
    async fn verify_email(
        &self,
        req: &Request,
        body: Json<VerifyEmailRequest>,
    ) -> Result<Json<VerifyEmailResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);
        let response = self.identity_service.verify_email(&ctx, &body.token).await?;

        Ok(Json(response))
    }

    /// Re-send the verification email for an unverified account
    #[oai(path = "/verify-email", method = "put", tag = "AuthTags::Identity")]
    async fn resend_verification(
        &self,
        req: &Request,
        body: Json<ResendVerificationRequest>,
    ) -> Result<Json<GenericMessageResponse>, AuthError> {
        ensure_valid(validation::validate_resend_verification(&body))?;

        let ctx = RequestContext::from_request(req);
        let response = self
            .identity_service
            .resend_verification(&ctx, &body.email)
            .await?;

        Ok(Json(response))
    }

    /// Sign in with email and password to receive a session token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Identity")]
    async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, AuthError> {
        ensure_valid(validation::validate_login(&body))?;

        let ctx = RequestContext::from_request(req);
        let response = self.identity_service.login(&ctx, &body).await?;

        Ok(Json(response))
    }

    /// Return the authenticated user for the presented session token
    #[oai(path = "/session", method = "get", tag = "AuthTags::Identity")]
    async fn session(&self, auth: BearerAuth) -> Result<Json<SessionResponse>, AuthError> {
        let response = self.identity_service.session(&auth.0.token).await?;

        Ok(Json(response))
    }

    /// Sign out, revoking the presented session
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Identity")]
    async fn logout(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<GenericMessageResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);
        let response = self.identity_service.logout(&ctx, &auth.0.token).await?;

        Ok(Json(response))
    }

    /// Request a password-reset email
    ///
    /// Responds identically whether or not the address has an account.
    #[oai(path = "/forgot-password", method = "post", tag = "AuthTags::Identity")]
    async fn forgot_password(
        &self,
        req: &Request,
        body: Json<ForgotPasswordRequest>,
    ) -> Result<Json<GenericMessageResponse>, AuthError> {
        ensure_valid(validation::validate_forgot_password(&body))?;

        let ctx = RequestContext::from_request(req);
        let response = self
            .identity_service
            .request_password_reset(&ctx, &body.email)
            .await?;

        Ok(Json(response))
    }

    /// Check whether a password-reset token is still usable
    #[oai(path = "/reset-password", method = "get", tag = "AuthTags::Identity")]
    async fn check_reset_token(
        &self,
        token: Query<Option<String>>,
    ) -> Result<ResetTokenCheckApiResponse, AuthError> {
        let status = self
            .identity_service
            .check_reset_token(token.0.as_deref())
            .await?;

        if status.valid {
            Ok(ResetTokenCheckApiResponse::Valid(Json(status)))
        } else {
            Ok(ResetTokenCheckApiResponse::Invalid(Json(status)))
        }
    }

    /// Complete a password reset with the emailed token
    #[oai(path = "/reset-password", method = "post", tag = "AuthTags::Identity")]
    async fn reset_password(
        &self,
        req: &Request,
        body: Json<ResetPasswordRequest>,
    ) -> Result<Json<ResetPasswordResponse>, AuthError> {
        ensure_valid(validation::validate_password_reset(&body))?;

        let ctx = RequestContext::from_request(req);
        let response = self
            .identity_service
            .complete_password_reset(&ctx, &body)
            .await?;

        Ok(Json(response))
    }
}
