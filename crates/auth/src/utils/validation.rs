//! Input validation applied before any provider call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::errors::{AuthError, AuthResult};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Validate email format
pub fn validate_email(email: &str) -> AuthResult<()> {
    if email.is_empty() {
        return Err(AuthError::Validation("email is required".to_string()));
    }
    if email.len() > 255 {
        return Err(AuthError::Validation("email too long".to_string()));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(AuthError::Validation("invalid email format".to_string()));
    }
    Ok(())
}

/// Validate password length requirements
pub fn validate_password(password: &str, min_length: usize) -> AuthResult<()> {
    if password.is_empty() {
        return Err(AuthError::Validation("password is required".to_string()));
    }
    if password.len() < min_length {
        return Err(AuthError::Validation(format!(
            "password must be at least {min_length} characters long"
        )));
    }
    if password.len() > 128 {
        return Err(AuthError::Validation(
            "password must be less than 128 characters long".to_string(),
        ));
    }
    Ok(())
}

/// Validate a new password and its confirmation together
pub fn validate_new_password(
    new_password: &str,
    confirmation: &str,
    min_length: usize,
) -> AuthResult<()> {
    validate_password(new_password, min_length)?;
    if new_password != confirmation {
        return Err(AuthError::Validation("passwords do not match".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("maya@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("password123", 8).is_ok());
        assert!(validate_password("seven77", 8).is_err());
        assert!(validate_password("", 8).is_err());
        assert!(validate_password(&"x".repeat(129), 8).is_err());
    }

    #[test]
    fn test_validate_new_password_confirmation() {
        assert!(validate_new_password("password123", "password123", 8).is_ok());

        let error = validate_new_password("password123", "password124", 8)
            .expect_err("mismatch must fail");
        assert_eq!(
            error,
            AuthError::Validation("passwords do not match".to_string())
        );
    }

    #[test]
    fn test_length_is_checked_before_confirmation() {
        let error =
            validate_new_password("short77", "different", 8).expect_err("short must fail");
        assert!(error.to_string().contains("at least 8 characters"));
    }
}
