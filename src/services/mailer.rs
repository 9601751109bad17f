use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::{authentication::Credentials, PoolConfig},
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};

use crate::config::SmtpConfig;
use crate::errors::internal::{InternalError, MailError};
use crate::types::internal::Role;

/// Sends the portal's transactional emails over pooled async SMTP
///
/// Every send returns a plain result; callers decide whether a failure is
/// fatal (resend endpoint) or just an `email_sent: false` flag. Sends must
/// only ever happen after the surrounding database work has committed.
#[derive(Clone)]
pub struct MailerService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
    base_url: String,
}

impl MailerService {
    pub fn new(config: &SmtpConfig) -> Result<Self, InternalError> {
        if config.host.is_empty() {
            return Err(MailError::Configuration("SMTP host is empty".to_string()).into());
        }
        if config.username.is_empty() {
            return Err(MailError::Configuration("SMTP username is empty".to_string()).into());
        }
        if config.password.is_empty() {
            return Err(MailError::Configuration("SMTP password is empty".to_string()).into());
        }
        if config.from_email.is_empty() {
            return Err(MailError::Configuration("From email is empty".to_string()).into());
        }

        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| {
                MailError::Configuration(format!("Failed to configure SMTP relay: {}", e))
            })?
            .port(config.port)
            .credentials(credentials)
            .pool_config(PoolConfig::default())
            .build();

        let from_mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("Invalid from address: {}", e)))?;

        Ok(Self {
            mailer,
            from_mailbox,
            base_url: config.base_url.clone(),
        })
    }

    /// Send the account-verification email with its 24-hour link
    pub async fn send_verification_email(
        &self,
        to_email: &str,
        full_name: &str,
        token: &str,
    ) -> Result<(), InternalError> {
        let subject = "Verify Your PNG e-GP Account";
        let body = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background: linear-gradient(135deg, #dc2626 0%, #ea580c 100%); color: white; padding: 20px; text-align: center;">
    <h1 style="margin: 0;">PNG e-Government Procurement</h1>
    <p style="margin: 5px 0 0 0; opacity: 0.9;">National Procurement Commission</p>
  </div>
  <div style="padding: 30px; background: #f9fafb;">
    <h2 style="color: #1f2937; margin-bottom: 20px;">Verify Your Account</h2>
    <p style="color: #4b5563; line-height: 1.6;">
      Hello {full_name},<br><br>
      Welcome to PNG e-GP! Please click the button below to verify your email address and activate your account.
    </p>
    <div style="text-align: center; margin: 30px 0;">
      <a href="{base_url}/auth/verify-email?token={token}"
         style="background: #dc2626; color: white; padding: 12px 30px; text-decoration: none; border-radius: 6px; display: inline-block; font-weight: bold;">
        Verify Email Address
      </a>
    </div>
    <p style="color: #6b7280; font-size: 14px; line-height: 1.5;">
      This verification link will expire in 24 hours. If you didn't create an account with PNG e-GP, please ignore this email.
    </p>
    <hr style="border: none; border-top: 1px solid #e5e7eb; margin: 30px 0;">
    <p style="color: #9ca3af; font-size: 12px; text-align: center;">
      © 2025 National Procurement Commission (PNG). All rights reserved.
    </p>
  </div>
</div>"#,
            full_name = full_name,
            base_url = self.base_url,
            token = token,
        );

        self.send_email(to_email, subject, &body).await
    }

    /// Send the post-verification welcome email with role-specific next steps
    pub async fn send_welcome_email(
        &self,
        to_email: &str,
        full_name: &str,
        role: Role,
    ) -> Result<(), InternalError> {
        let subject = "Welcome to PNG e-Government Procurement";
        let next_steps = match role {
            Role::SupplierUser => {
                "<li>Complete your supplier profile</li>\
                 <li>Upload required compliance documents</li>\
                 <li>Browse available tenders</li>\
                 <li>Submit your first bid</li>"
            }
            _ => {
                "<li>Set up your procurement plan</li>\
                 <li>Create your first tender</li>\
                 <li>Manage bid evaluations</li>\
                 <li>Track contract performance</li>"
            }
        };

        let body = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background: linear-gradient(135deg, #dc2626 0%, #ea580c 100%); color: white; padding: 20px; text-align: center;">
    <h1 style="margin: 0;">Welcome to PNG e-GP!</h1>
    <p style="margin: 5px 0 0 0; opacity: 0.9;">Your account has been verified</p>
  </div>
  <div style="padding: 30px; background: #f9fafb;">
    <h2 style="color: #1f2937; margin-bottom: 20px;">Get Started</h2>
    <p style="color: #4b5563; line-height: 1.6;">
      Hello {full_name},<br><br>
      Your PNG e-GP account has been successfully verified! You can now access all features of the platform.
    </p>
    <div style="background: white; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #dc2626;">
      <h3 style="margin: 0 0 10px 0; color: #1f2937;">Next Steps:</h3>
      <ul style="color: #4b5563; line-height: 1.6; margin: 0; padding-left: 20px;">
        {next_steps}
      </ul>
    </div>
    <div style="text-align: center; margin: 30px 0;">
      <a href="{base_url}/dashboard"
         style="background: #dc2626; color: white; padding: 12px 30px; text-decoration: none; border-radius: 6px; display: inline-block; font-weight: bold;">
        Access Dashboard
      </a>
    </div>
  </div>
</div>"#,
            full_name = full_name,
            next_steps = next_steps,
            base_url = self.base_url,
        );

        self.send_email(to_email, subject, &body).await
    }

    /// Send the password-reset email with its 1-hour link
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        full_name: &str,
        token: &str,
    ) -> Result<(), InternalError> {
        let subject = "Reset Your PNG e-GP Password";
        let body = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background: linear-gradient(135deg, #dc2626 0%, #ea580c 100%); color: white; padding: 20px; text-align: center;">
    <h1 style="margin: 0;">Password Reset Request</h1>
    <p style="margin: 5px 0 0 0; opacity: 0.9;">PNG e-Government Procurement</p>
  </div>
  <div style="padding: 30px; background: #f9fafb;">
    <h2 style="color: #1f2937; margin-bottom: 20px;">Reset Your Password</h2>
    <p style="color: #4b5563; line-height: 1.6;">
      Hello {full_name},<br><br>
      We received a request to reset your password. Click the button below to set a new password.
    </p>
    <div style="text-align: center; margin: 30px 0;">
      <a href="{base_url}/auth/reset-password?token={token}"
         style="background: #dc2626; color: white; padding: 12px 30px; text-decoration: none; border-radius: 6px; display: inline-block; font-weight: bold;">
        Reset Password
      </a>
    </div>
    <p style="color: #6b7280; font-size: 14px; line-height: 1.5;">
      This reset link will expire in 1 hour. If you didn't request a password reset, please ignore this email.
    </p>
  </div>
</div>"#,
            full_name = full_name,
            base_url = self.base_url,
            token = token,
        );

        self.send_email(to_email, subject, &body).await
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), InternalError> {
        let to_mailbox: Mailbox = to_email
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("Invalid recipient email: {}", e)))?;

        let email = Message::builder()
            .from(self.from_mailbox.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| MailError::BuildFailed(format!("Failed to build email: {}", e)))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| MailError::SendFailed(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
