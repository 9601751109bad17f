use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request model for account registration
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Full name of the person registering
    pub full_name: String,

    /// Email address, used as the login identifier
    pub email: String,

    /// Contact phone number
    pub phone: Option<String>,

    /// Password (minimum 8 characters)
    pub password: String,

    /// Password confirmation, must match `password`
    pub confirm_password: String,

    /// Requested role (NPC_ADMIN, AGENCY_BUYER, SUPPLIER_USER, AUDITOR)
    pub role: String,

    /// Supplier legal name (SUPPLIER_USER only)
    pub legal_name: Option<String>,

    /// Supplier trading name (SUPPLIER_USER only)
    pub trading_name: Option<String>,

    /// Supplier tax identification number (SUPPLIER_USER only)
    pub tin: Option<String>,

    /// Supplier registered address (SUPPLIER_USER only)
    pub address: Option<String>,

    /// Supplier procurement categories (SUPPLIER_USER only)
    pub categories: Option<Vec<String>>,

    /// Agency short code (AGENCY_BUYER only)
    pub agency_code: Option<String>,

    /// Agency full name (AGENCY_BUYER only)
    pub agency_name: Option<String>,

    /// Agency type (MINISTRY, AUTHORITY, SOE, PROVINCIAL, defaults to MINISTRY)
    pub agency_type: Option<String>,

    /// Position held within the agency (AGENCY_BUYER only)
    pub position: Option<String>,
}

/// Request model for email verification
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    /// Verification token from the emailed link
    pub token: String,
}

/// Request model for resending the verification email
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ResendVerificationRequest {
    /// Email address the original verification was sent to
    pub email: String,
}

/// Request model for sign-in
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address for authentication
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Request model for initiating a password reset
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Email address of the account to reset
    pub email: String,
}

/// Request model for completing a password reset
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// Reset token from the emailed link
    pub token: String,

    /// New password (minimum 8 characters)
    pub password: String,

    /// New password confirmation, must match `password`
    pub confirm_password: String,
}

/// Newly created user, as returned from registration
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// User ID (UUID)
    pub id: String,

    /// Email address
    pub email: String,

    /// Full name
    pub full_name: String,

    /// Assigned role
    pub role: String,
}

/// Response model for registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Always true on the success path
    pub success: bool,

    /// Human-readable outcome message
    pub message: String,

    /// The created user
    pub user: RegisteredUser,

    /// Whether the verification email was actually dispatched
    pub email_sent: bool,
}

/// Agency as embedded in user-facing responses
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct AgencySummary {
    /// Agency ID (UUID)
    pub id: String,

    /// Agency full name
    pub name: String,

    /// Agency short code
    pub code: String,

    /// Agency type
    pub agency_type: String,
}

/// Supplier as embedded in user-facing responses
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct SupplierSummary {
    /// Supplier ID (UUID)
    pub id: String,

    /// Registered legal name
    pub legal_name: String,

    /// KYC review status
    pub kyc_status: String,
}

/// User summary returned after email verification
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedUser {
    /// User ID (UUID)
    pub id: String,

    /// Email address
    pub email: String,

    /// Full name
    pub full_name: String,

    /// Assigned role
    pub role: String,

    /// Whether the email address is verified (always true here)
    pub email_verified: bool,

    /// Linked agency, for agency roles
    pub agency: Option<AgencySummary>,

    /// Owned supplier, for supplier users
    pub supplier: Option<SupplierSummary>,
}

/// Response model for email verification
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct VerifyEmailResponse {
    /// Always true on the success path
    pub success: bool,

    /// Human-readable outcome message
    pub message: String,

    /// The verified user
    pub user: VerifiedUser,

    /// Whether the welcome email was actually dispatched
    pub welcome_email_sent: bool,
}

/// Generic success/message response
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct GenericMessageResponse {
    /// Whether the operation succeeded
    pub success: bool,

    /// Human-readable outcome message
    pub message: String,
}

/// Authenticated user as carried by a session
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// User ID (UUID)
    pub id: String,

    /// Email address
    pub email: String,

    /// Full name
    pub full_name: String,

    /// Assigned role
    pub role: String,

    /// Linked agency ID, for agency roles
    pub agency_id: Option<String>,

    /// Linked agency, for agency roles
    pub agency: Option<AgencySummary>,

    /// Owned supplier ID, for supplier users
    pub supplier_id: Option<String>,
}

/// Response model for sign-in
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer session token for subsequent requests
    pub token: String,

    /// The authenticated user
    pub user: SessionUser,
}

/// Response model for the session endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// The authenticated user
    pub user: SessionUser,
}

/// User identity attached to a valid reset token
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ResetTokenUser {
    /// Email address
    pub email: String,

    /// Full name
    pub full_name: String,
}

/// Response model for checking a reset token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResetTokenStatusResponse {
    /// Whether the token is valid and usable
    pub valid: bool,

    /// Reason the token was rejected, when invalid
    pub error: Option<String>,

    /// Account the token belongs to, when valid
    pub user: Option<ResetTokenUser>,

    /// Token expiry (RFC 3339), when valid
    pub expires_at: Option<String>,
}

/// Response model for completing a password reset
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResetPasswordResponse {
    /// Always true on the success path
    pub success: bool,

    /// Human-readable outcome message
    pub message: String,

    /// Account whose password was reset
    pub user: ResetTokenUser,
}

/// Aggregate registration counts
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegistrationStats {
    /// Total number of active users
    pub total: u64,

    /// Active user counts keyed by role
    pub by_role: HashMap<String, u64>,
}

/// One entry in the recent-registrations listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RecentRegistration {
    /// User ID (UUID)
    pub id: String,

    /// Full name
    pub full_name: String,

    /// Email address
    pub email: String,

    /// Assigned role
    pub role: String,

    /// Registration time (RFC 3339)
    pub created_at: String,

    /// Linked agency, for agency roles
    pub agency: Option<AgencySummary>,

    /// Owned supplier, for supplier users
    pub supplier: Option<SupplierSummary>,
}

/// Response model for registration statistics
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegistrationStatsResponse {
    /// Aggregate counts over active users
    pub stats: RegistrationStats,

    /// Ten most recent registrations
    pub recent_registrations: Vec<RecentRegistration>,
}

/// API response for the reset-token check endpoint
///
/// Both arms carry the same body shape so clients can branch on `valid`
/// without inspecting the status code.
#[derive(ApiResponse)]
pub enum ResetTokenCheckApiResponse {
    /// Token is valid and usable
    #[oai(status = 200)]
    Valid(Json<ResetTokenStatusResponse>),

    /// Token is missing, unknown, expired, or tied to an unusable account
    #[oai(status = 400)]
    Invalid(Json<ResetTokenStatusResponse>),
}

/// API response for successful registration
#[derive(ApiResponse)]
pub enum RegisterApiResponse {
    /// Account created; verification email dispatch already attempted
    #[oai(status = 201)]
    Created(Json<RegisterResponse>),
}
