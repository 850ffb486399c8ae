//! Password-strength policy
//!
//! Two independently configurable policies exist on purpose: the gate
//! enforces the interactive minimum (12 characters) on administrative
//! credential operations, while provisioning tooling applies a stricter
//! 16-character minimum when minting accounts in bulk.

use serde::{Deserialize, Serialize};

use crate::models::PasswordRequirements;

/// Special characters accepted toward the special-character requirement.
pub const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Password-strength requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::interactive()
    }
}

impl PasswordPolicy {
    /// Policy enforced by the gate for interactive credential changes.
    pub fn interactive() -> Self {
        PasswordPolicy {
            min_length: 12,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }

    /// Stricter policy applied by provisioning tooling.
    pub fn provisioning() -> Self {
        PasswordPolicy {
            min_length: 16,
            ..Self::interactive()
        }
    }

    /// Validate a password, returning every violated requirement.
    ///
    /// An empty list means the password is acceptable.
    pub fn validate(&self, password: &str) -> Vec<String> {
        let mut issues = Vec::new();

        if password.chars().count() < self.min_length {
            issues.push(format!(
                "Password must be at least {} characters",
                self.min_length
            ));
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            issues.push("Password must contain at least one uppercase letter".to_string());
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            issues.push("Password must contain at least one lowercase letter".to_string());
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            issues.push("Password must contain at least one digit".to_string());
        }

        if self.require_special && !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            issues.push(format!(
                "Password must contain at least one special character: {}",
                SPECIAL_CHARS
            ));
        }

        issues
    }

    pub fn is_valid(&self, password: &str) -> bool {
        self.validate(password).is_empty()
    }

    pub fn requirements(&self) -> PasswordRequirements {
        PasswordRequirements {
            min_length: self.min_length,
            requires_uppercase: self.require_uppercase,
            requires_lowercase: self.require_lowercase,
            requires_digit: self.require_digit,
            requires_special: self.require_special,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_too_short() {
        let policy = PasswordPolicy::interactive();
        assert!(!policy.is_valid("short1!"));
        let issues = policy.validate("short1!");
        assert!(issues.iter().any(|i| i.contains("at least 12 characters")));
    }

    #[test]
    fn test_rejects_missing_uppercase() {
        let policy = PasswordPolicy::interactive();
        assert!(!policy.is_valid("alllowercase123!"));
        let issues = policy.validate("alllowercase123!");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("uppercase"));
    }

    #[test]
    fn test_rejects_missing_lowercase_digit_special() {
        let policy = PasswordPolicy::interactive();
        assert!(!policy.is_valid("ALLUPPERCASE123!"));
        assert!(!policy.is_valid("NoDigitsAtAll!!!"));
        assert!(!policy.is_valid("NoSpecials12345x"));
    }

    #[test]
    fn test_accepts_compliant_password() {
        let policy = PasswordPolicy::interactive();
        assert!(policy.is_valid("Valid#Pass1234"));
        assert!(policy.validate("Valid#Pass1234").is_empty());
    }

    #[test]
    fn test_reports_every_violation() {
        let policy = PasswordPolicy::interactive();
        // Too short, no uppercase, no digit, no special
        let issues = policy.validate("weak");
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_provisioning_policy_is_stricter() {
        let interactive = PasswordPolicy::interactive();
        let provisioning = PasswordPolicy::provisioning();

        // 14 characters: fine interactively, too short for provisioning
        assert!(interactive.is_valid("Valid#Pass1234"));
        assert!(!provisioning.is_valid("Valid#Pass1234"));
        assert!(provisioning.is_valid("Valid#Pass123456"));
    }
}
