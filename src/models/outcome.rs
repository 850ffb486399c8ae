use serde::{Deserialize, Serialize};

use crate::store::UserRecord;

/// Result of one authentication call.
///
/// Every expected failure mode (bad input, rate limited, wrong
/// credentials, store outage) is carried here as data; the gate never
/// returns an error for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthOutcome {
    pub success: bool,
    /// User record on success; never carries hash or salt material
    pub user: Option<UserRecord>,
    pub message: String,
    /// Set when the store demands a password change before normal use
    pub password_change_required: bool,
}

impl AuthOutcome {
    pub fn success(user: UserRecord, message: &str, password_change_required: bool) -> Self {
        AuthOutcome {
            success: true,
            user: Some(user),
            message: message.to_string(),
            password_change_required,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        AuthOutcome {
            success: false,
            user: None,
            message: message.into(),
            password_change_required: false,
        }
    }
}

/// Two-part result of an administrative operation.
///
/// "Not found" and "already exists" are normal outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpOutcome {
    pub success: bool,
    pub message: String,
}

impl OpOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        OpOutcome {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        OpOutcome {
            success: false,
            message: message.into(),
        }
    }
}

/// Static password-strength requirements, reported for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub requires_uppercase: bool,
    pub requires_lowercase: bool,
    pub requires_digit: bool,
    pub requires_special: bool,
}

/// Diagnostic snapshot of the gate's security configuration.
///
/// Pure data derived from static configuration; the pepper value itself
/// never appears here, only whether one is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityInfo {
    pub hash_algorithm: String,
    pub pepper_configured: bool,
    pub rate_limiting_enabled: bool,
    pub max_attempts: usize,
    pub time_window_seconds: i64,
    pub account_lockout_enabled: bool,
    pub password_requirements: PasswordRequirements,
}
