// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation.
//!
//! This module enforces password requirements for account credentials.
//! The same policy applies to registration, password changes and
//! administrative resets.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password has no uppercase letter.
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    /// Password has no lowercase letter.
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    /// Password has no digit.
    #[error("Password must contain at least one number")]
    MissingDigit,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 6 }
    }
}

impl PasswordPolicy {
    /// Validates a password against the policy.
    ///
    /// # Errors
    ///
    /// Returns the first [`PasswordPolicyError`] the password violates,
    /// checking length before character classes.
    pub fn validate(&self, password: &str) -> Result<(), PasswordPolicyError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert!(policy.validate("Secret1").is_ok());
        // Exactly the minimum length
        assert!(policy.validate("Abc123").is_ok());
        // Symbols are allowed but not required
        assert!(policy.validate("P@ssw0rd!").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert_eq!(
            policy.validate("Ab1cd"),
            Err(PasswordPolicyError::TooShort { min_length: 6 })
        );
        assert_eq!(
            policy.validate(""),
            Err(PasswordPolicyError::TooShort { min_length: 6 })
        );
    }

    #[test]
    fn test_missing_character_classes() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert_eq!(
            policy.validate("secret123"),
            Err(PasswordPolicyError::MissingUppercase)
        );
        assert_eq!(
            policy.validate("SECRET123"),
            Err(PasswordPolicyError::MissingLowercase)
        );
        assert_eq!(
            policy.validate("SecretWord"),
            Err(PasswordPolicyError::MissingDigit)
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        // Five characters, more than six bytes
        assert_eq!(
            policy.validate("Äb1éü"),
            Err(PasswordPolicyError::TooShort { min_length: 6 })
        );
    }

    #[test]
    fn test_custom_minimum_length() {
        let policy: PasswordPolicy = PasswordPolicy { min_length: 10 };

        assert_eq!(
            policy.validate("Secret123"),
            Err(PasswordPolicyError::TooShort { min_length: 10 })
        );
        assert!(policy.validate("Secret1234").is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PasswordPolicyError::TooShort { min_length: 6 }.to_string(),
            "Password must be at least 6 characters long"
        );
        assert_eq!(
            PasswordPolicyError::MissingDigit.to_string(),
            "Password must contain at least one number"
        );
    }
}
