use crate::errors::api::ValidationDetail;
use crate::types::dto::auth::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResendVerificationRequest,
    ResetPasswordRequest,
};
use crate::types::internal::{AgencyType, Role};

/// Structural email check
///
/// Deliberately loose: the real proof of ownership is the verification
/// email, so this only rejects obvious garbage.
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@')
        && email.contains('.')
        && !email.contains(' ')
        && email.chars().filter(|&c| c == '@').count() == 1
        && email.len() >= 5
}

fn detail(field: &str, message: &str) -> ValidationDetail {
    ValidationDetail {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Validate a registration request
///
/// Returns every failed rule as a field-level detail; an empty result
/// means the request is acceptable. Role-specific rules only apply once
/// the role itself parses to one of the self-registerable roles.
pub fn validate_registration(request: &RegisterRequest) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    if request.full_name.chars().count() < 2 {
        details.push(detail("full_name", "Full name must be at least 2 characters"));
    }
    if !is_valid_email(&request.email) {
        details.push(detail("email", "Invalid email address"));
    }
    if request.password.chars().count() < 8 {
        details.push(detail("password", "Password must be at least 8 characters"));
    }
    if request.password != request.confirm_password {
        details.push(detail("confirm_password", "Passwords don't match"));
    }

    match Role::parse(&request.role) {
        Some(Role::SupplierUser) => {
            let legal_name_ok = request
                .legal_name
                .as_deref()
                .map(|v| v.chars().count() >= 2)
                .unwrap_or(false);
            if !legal_name_ok {
                details.push(detail("legal_name", "Legal company name is required"));
            }

            let tin_ok = request
                .tin
                .as_deref()
                .map(|v| !v.is_empty())
                .unwrap_or(false);
            if !tin_ok {
                details.push(detail("tin", "TIN is required"));
            }
        }
        Some(Role::AgencyBuyer) => {
            let code_ok = request
                .agency_code
                .as_deref()
                .map(|v| v.chars().count() >= 2)
                .unwrap_or(false);
            if !code_ok {
                details.push(detail("agency_code", "Agency code is required"));
            }

            let name_ok = request
                .agency_name
                .as_deref()
                .map(|v| v.chars().count() >= 2)
                .unwrap_or(false);
            if !name_ok {
                details.push(detail("agency_name", "Agency name is required"));
            }

            let position_ok = request
                .position
                .as_deref()
                .map(|v| v.chars().count() >= 2)
                .unwrap_or(false);
            if !position_ok {
                details.push(detail("position", "Position/title is required"));
            }

            if let Some(agency_type) = request.agency_type.as_deref() {
                if AgencyType::parse(agency_type).is_none() {
                    details.push(detail("agency_type", "Invalid agency type"));
                }
            }
        }
        // Admin and auditor accounts are provisioned, never self-registered
        _ => {
            details.push(detail("role", "Role must be SUPPLIER_USER or AGENCY_BUYER"));
        }
    }

    details
}

/// Validate a sign-in request
pub fn validate_login(request: &LoginRequest) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    if !is_valid_email(&request.email) {
        details.push(detail("email", "Invalid email address"));
    }
    if request.password.is_empty() {
        details.push(detail("password", "Password is required"));
    }

    details
}

/// Validate a resend-verification request
///
/// Presence only. A well-formed but unknown address is reported by the
/// lookup, not here.
pub fn validate_resend_verification(
    request: &ResendVerificationRequest,
) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    if request.email.trim().is_empty() {
        details.push(detail("email", "Email is required"));
    }

    details
}

/// Validate a password-reset request
pub fn validate_forgot_password(request: &ForgotPasswordRequest) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    if !is_valid_email(&request.email) {
        details.push(detail("email", "Invalid email address"));
    }

    details
}

/// Validate a password-reset completion request
pub fn validate_password_reset(request: &ResetPasswordRequest) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    if request.token.is_empty() {
        details.push(detail("token", "Reset token is required"));
    }
    if request.password.chars().count() < 8 {
        details.push(detail("password", "Password must be at least 8 characters"));
    }
    if request.password != request.confirm_password {
        details.push(detail("confirm_password", "Passwords don't match"));
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier_request() -> RegisterRequest {
        RegisterRequest {
            full_name: "Maria Kila".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            password: "str0ng-password".to_string(),
            confirm_password: "str0ng-password".to_string(),
            role: "SUPPLIER_USER".to_string(),
            legal_name: Some("Kila Construction Ltd".to_string()),
            trading_name: None,
            tin: Some("500123456".to_string()),
            address: None,
            categories: None,
            agency_code: None,
            agency_name: None,
            agency_type: None,
            position: None,
        }
    }

    fn buyer_request() -> RegisterRequest {
        RegisterRequest {
            full_name: "John Wanma".to_string(),
            email: "john.wanma@health.gov.pg".to_string(),
            phone: Some("+675 7000 0000".to_string()),
            password: "str0ng-password".to_string(),
            confirm_password: "str0ng-password".to_string(),
            role: "AGENCY_BUYER".to_string(),
            legal_name: None,
            trading_name: None,
            tin: None,
            address: None,
            categories: None,
            agency_code: Some("DOH".to_string()),
            agency_name: Some("Department of Health".to_string()),
            agency_type: Some("MINISTRY".to_string()),
            position: Some("Procurement Officer".to_string()),
        }
    }

    #[test]
    fn test_is_valid_email_accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn test_is_valid_email_rejects_garbage() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("has space@example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_valid_supplier_registration_passes() {
        let details = validate_registration(&supplier_request());

        assert!(details.is_empty(), "unexpected details: {:?}", details);
    }

    #[test]
    fn test_valid_buyer_registration_passes() {
        let details = validate_registration(&buyer_request());

        assert!(details.is_empty(), "unexpected details: {:?}", details);
    }

    #[test]
    fn test_short_full_name_is_rejected() {
        let mut request = supplier_request();
        request.full_name = "M".to_string();

        let details = validate_registration(&request);

        assert!(details.iter().any(|d| d.field == "full_name"));
    }

    #[test]
    fn test_short_password_is_rejected() {
        let mut request = supplier_request();
        request.password = "short".to_string();
        request.confirm_password = "short".to_string();

        let details = validate_registration(&request);

        assert!(details.iter().any(|d| d.field == "password"));
    }

    #[test]
    fn test_mismatched_passwords_are_rejected() {
        let mut request = supplier_request();
        request.confirm_password = "different-password".to_string();

        let details = validate_registration(&request);

        assert!(details
            .iter()
            .any(|d| d.field == "confirm_password" && d.message == "Passwords don't match"));
    }

    #[test]
    fn test_supplier_without_legal_name_or_tin_is_rejected() {
        let mut request = supplier_request();
        request.legal_name = None;
        request.tin = Some(String::new());

        let details = validate_registration(&request);

        assert!(details.iter().any(|d| d.field == "legal_name"));
        assert!(details.iter().any(|d| d.field == "tin"));
    }

    #[test]
    fn test_buyer_without_agency_fields_is_rejected() {
        let mut request = buyer_request();
        request.agency_code = None;
        request.agency_name = Some("D".to_string());
        request.position = None;

        let details = validate_registration(&request);

        assert!(details.iter().any(|d| d.field == "agency_code"));
        assert!(details.iter().any(|d| d.field == "agency_name"));
        assert!(details.iter().any(|d| d.field == "position"));
    }

    #[test]
    fn test_unknown_agency_type_is_rejected() {
        let mut request = buyer_request();
        request.agency_type = Some("KINGDOM".to_string());

        let details = validate_registration(&request);

        assert!(details.iter().any(|d| d.field == "agency_type"));
    }

    #[test]
    fn test_missing_agency_type_is_allowed() {
        let mut request = buyer_request();
        request.agency_type = None;

        let details = validate_registration(&request);

        assert!(details.is_empty());
    }

    #[test]
    fn test_non_registerable_roles_are_rejected() {
        for role in ["NPC_ADMIN", "AUDITOR", "SUPER_USER", ""] {
            let mut request = supplier_request();
            request.role = role.to_string();

            let details = validate_registration(&request);

            assert!(
                details.iter().any(|d| d.field == "role"),
                "role {:?} should be rejected",
                role
            );
        }
    }

    #[test]
    fn test_login_requires_email_and_password() {
        let details = validate_login(&LoginRequest {
            email: "bad-email".to_string(),
            password: String::new(),
        });

        assert!(details.iter().any(|d| d.field == "email"));
        assert!(details.iter().any(|d| d.field == "password"));
    }

    #[test]
    fn test_valid_login_passes() {
        let details = validate_login(&LoginRequest {
            email: "user@example.com".to_string(),
            password: "whatever".to_string(),
        });

        assert!(details.is_empty());
    }

    #[test]
    fn test_resend_verification_checks_presence_only() {
        let missing = validate_resend_verification(&ResendVerificationRequest {
            email: "   ".to_string(),
        });
        assert!(missing.iter().any(|d| d.message == "Email is required"));

        // Malformed addresses pass here and fall through to the user lookup
        let malformed = validate_resend_verification(&ResendVerificationRequest {
            email: "not-an-email".to_string(),
        });
        assert!(malformed.is_empty());
    }

    #[test]
    fn test_forgot_password_requires_well_formed_email() {
        let bad = validate_forgot_password(&ForgotPasswordRequest {
            email: "not-an-email".to_string(),
        });
        assert!(bad.iter().any(|d| d.field == "email"));

        let good = validate_forgot_password(&ForgotPasswordRequest {
            email: "user@example.com".to_string(),
        });
        assert!(good.is_empty());
    }

    #[test]
    fn test_password_reset_rules() {
        let details = validate_password_reset(&ResetPasswordRequest {
            token: String::new(),
            password: "short".to_string(),
            confirm_password: "different".to_string(),
        });

        assert!(details.iter().any(|d| d.field == "token"));
        assert!(details.iter().any(|d| d.field == "password"));
        assert!(details.iter().any(|d| d.field == "confirm_password"));
    }

    #[test]
    fn test_valid_password_reset_passes() {
        let details = validate_password_reset(&ResetPasswordRequest {
            token: "a".repeat(64),
            password: "new-str0ng-password".to_string(),
            confirm_password: "new-str0ng-password".to_string(),
        });

        assert!(details.is_empty());
    }
}
