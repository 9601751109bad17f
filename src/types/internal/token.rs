/// Distinguishes the two uses of the shared verification-token table
///
/// Both purposes share one table; reset rows carry a fixed prefix on the
/// stored value so the purposes can never satisfy each other's lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

impl TokenPurpose {
    /// Prefix applied to the stored value, never to the emailed token
    pub fn storage_prefix(&self) -> &'static str {
        match self {
            TokenPurpose::EmailVerification => "",
            TokenPurpose::PasswordReset => "reset_",
        }
    }

    /// Capitalized noun for user-facing messages
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenPurpose::EmailVerification => "Verification",
            TokenPurpose::PasswordReset => "Reset",
        }
    }
}
