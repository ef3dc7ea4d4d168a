//! Credential validation applied before calling the auth provider.

use brandflow_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Minimum password length accepted at sign-up (auth provider default).
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Maximum password length; the provider hashes with bcrypt, which truncates past 72 bytes.
pub const PASSWORD_MAX_LENGTH: usize = 72;

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Rejects blank sign-in passwords without leaking any policy detail.
pub fn validate_sign_in_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::Validation("password is required".to_owned()));
    }

    Ok(())
}

/// Validates a new account password before it is sent to the provider.
pub fn validate_sign_up_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();
    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if password.len() > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} bytes"
        )));
    }

    if is_common_password(password) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|entry| *entry == lowered)
}

static COMMON_PASSWORDS: &[&str] = &[
    "password",
    "123456",
    "12345678",
    "1234567890",
    "qwerty",
    "abc123",
    "111111",
    "iloveyou",
    "sunshine",
    "qwerty123",
    "password1",
    "password123",
    "welcome",
    "letmein",
    "passw0rd",
    "123123",
    "654321",
    "1234567",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_is_normalised() {
        let email = EmailAddress::new("  Owner@Branded-Flow.COM ");
        assert!(matches!(email, Ok(ref value) if value.as_str() == "owner@branded-flow.com"));
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for candidate in ["", "noatsign", "user@nodot", "@example.com", "a@b@c.com"] {
            assert!(EmailAddress::new(candidate).is_err(), "{candidate}");
        }
    }

    #[test]
    fn sign_in_only_requires_a_password() {
        assert!(validate_sign_in_password("").is_err());
        assert!(validate_sign_in_password("x").is_ok());
    }

    #[test]
    fn sign_up_enforces_length_and_common_list() {
        assert!(validate_sign_up_password("short").is_err());
        assert!(validate_sign_up_password("letmein").is_err());
        assert!(validate_sign_up_password(&"b".repeat(PASSWORD_MAX_LENGTH + 1)).is_err());
        assert!(validate_sign_up_password("flow-portal-2025").is_ok());
    }
}
