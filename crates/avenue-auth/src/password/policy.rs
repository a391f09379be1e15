//! Password length rules.

use avenue_core::config::AuthConfig;
use avenue_core::error::AppError;

/// Length bounds applied at registration and on password change.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
    min_new_length: usize,
    max_new_length: usize,
}

impl PasswordPolicy {
    /// Build the policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.min_password_length,
            max_length: config.max_password_length,
            min_new_length: config.min_new_password_length,
            max_new_length: config.max_new_password_length,
        }
    }

    /// Check a password chosen at registration.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        Self::check(password, self.min_length, self.max_length)
    }

    /// Check a replacement password.
    pub fn validate_new(&self, password: &str) -> Result<(), AppError> {
        Self::check(password, self.min_new_length, self.max_new_length)
    }

    fn check(password: &str, min: usize, max: usize) -> Result<(), AppError> {
        let len = password.chars().count();
        if len < min {
            return Err(AppError::validation(format!(
                "Password must be at least {min} characters long"
            )));
        }
        if len > max {
            return Err(AppError::validation(format!(
                "Password must be at most {max} characters long"
            )));
        }
        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(&AuthConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_bounds() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate("abc").is_err());
        assert!(policy.validate("abcd").is_ok());
        assert!(policy.validate(&"x".repeat(64)).is_ok());
        assert!(policy.validate(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_change_needs_longer_password() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate_new("abcd").is_err());
        assert!(policy.validate_new("abcdefgh").is_ok());
    }

    #[test]
    fn test_change_allows_longer_maximum() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate(&"x".repeat(100)).is_err());
        assert!(policy.validate_new(&"x".repeat(100)).is_ok());
        assert!(policy.validate_new(&"x".repeat(128)).is_ok());
        assert!(policy.validate_new(&"x".repeat(129)).is_err());
    }
}
