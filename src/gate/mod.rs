//! Credential gate
//!
//! Single entry point for interactive authentication and administrative
//! credential operations. The gate validates input, consults the
//! in-memory rate limiter before any store I/O, delegates credential
//! verification to the configured [`UserStore`], and enforces the
//! password policy on administrative operations.

pub mod password_policy;
pub mod rate_limiter;

pub use password_policy::PasswordPolicy;
pub use rate_limiter::RateLimiter;

use std::env;
use std::sync::Arc;

use crate::config::GateConfig;
use crate::models::{AuthOutcome, OpOutcome, SecurityInfo};
use crate::store::{UserRecord, UserStore};

/// Environment variable holding the server-side pepper. Only its
/// presence is ever reported; the value stays inside the store layer.
pub const PEPPER_ENV: &str = "AUTHGATE_PEPPER";

const MSG_CREDENTIALS_REQUIRED: &str = "Username and password are required";
const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password";
const MSG_AUTH_SUCCESS: &str = "Authentication successful";
const MSG_PASSWORD_CHANGE_REQUIRED: &str = "Password change required";
const MSG_SYSTEM_ERROR: &str = "Authentication system error";
const MSG_WEAK_PASSWORD: &str = "Password does not meet security requirements";

/// Orchestrates login attempts and administrative credential operations.
///
/// Explicitly constructed and passed by reference; independent
/// instances never share state, so tests and embedders can run several
/// gates side by side.
pub struct CredentialGate {
    store: Arc<dyn UserStore>,
    rate_limiter: RateLimiter,
    password_policy: PasswordPolicy,
    pepper_configured: bool,
}

impl CredentialGate {
    pub fn new(store: Arc<dyn UserStore>, config: GateConfig) -> Self {
        CredentialGate {
            store,
            rate_limiter: RateLimiter::new(config.rate_limit),
            password_policy: config.password_policy,
            pepper_configured: env::var(PEPPER_ENV).is_ok(),
        }
    }

    /// Authenticate a user.
    ///
    /// Expected failure modes (empty input, rate limited, wrong
    /// credentials, store outage) all come back as a failed
    /// [`AuthOutcome`]; this method never returns an error.
    pub fn authenticate(&self, username: &str, password: &str) -> AuthOutcome {
        if username.is_empty() || password.is_empty() {
            log::warn!("Authentication attempt with empty credentials");
            return AuthOutcome::failure(MSG_CREDENTIALS_REQUIRED);
        }

        // Checked before any store I/O; a limited identity never
        // reaches the hash comparison.
        let (limited, wait_seconds) = self.rate_limiter.is_limited(username);
        if limited {
            log::warn!(
                "Rate limited authentication attempt for user: {} (wait {}s)",
                username,
                wait_seconds
            );
            return AuthOutcome::failure(format!(
                "Too many failed attempts. Try again in {} seconds.",
                wait_seconds
            ));
        }

        // Every attempt that reaches the store counts toward the
        // window, successes included; a success clears the whole
        // window below.
        self.rate_limiter.record_attempt(username);

        // Runs with no rate-limiter lock held; the Argon2id comparison
        // in the store is deliberately slow.
        match self.store.verify_credentials(username, password) {
            Ok(Some(user)) => {
                self.rate_limiter.clear(username);

                if user.requires_password_change {
                    log::info!(
                        "Successful authentication for user: {} (password change required)",
                        username
                    );
                    return AuthOutcome::success(user, MSG_PASSWORD_CHANGE_REQUIRED, true);
                }

                log::info!("Successful authentication for user: {}", username);
                AuthOutcome::success(user, MSG_AUTH_SUCCESS, false)
            }
            // Unknown username and wrong password share one message so
            // callers cannot enumerate accounts
            Ok(None) => {
                log::warn!("Failed authentication attempt for user: {}", username);
                AuthOutcome::failure(MSG_INVALID_CREDENTIALS)
            }
            Err(e) => {
                log::error!("Authentication error for user {}: {}", username, e);
                AuthOutcome::failure(MSG_SYSTEM_ERROR)
            }
        }
    }

    /// Boolean-only authentication for callers that need no detail.
    pub fn authenticate_simple(&self, username: &str, password: &str) -> bool {
        self.authenticate(username, password).success
    }

    /// Create a new user account.
    pub fn create_user(
        &self,
        username: &str,
        password: &str,
        role: &str,
        email: Option<&str>,
        permissions: Option<&[String]>,
        created_by: Option<&str>,
    ) -> OpOutcome {
        if !self.password_policy.is_valid(password) {
            return OpOutcome::failed(MSG_WEAK_PASSWORD);
        }

        let permissions: Vec<String> = match permissions {
            Some(p) => p.to_vec(),
            None => Self::default_permissions(role),
        };

        match self
            .store
            .create_user(username, password, role, email, &permissions)
        {
            Ok(true) => {
                log::info!(
                    "User created: {} (role: {}) by {}",
                    username,
                    role,
                    created_by.unwrap_or("system")
                );
                OpOutcome::ok("User created successfully")
            }
            Ok(false) => OpOutcome::failed("Username already exists"),
            Err(e) => {
                log::error!("Failed to create user {}: {}", username, e);
                OpOutcome::failed("Failed to create user")
            }
        }
    }

    /// Change a user's password after verifying the current one.
    pub fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> OpOutcome {
        let verified = match self.store.verify_credentials(username, current_password) {
            Ok(user) => user,
            Err(e) => {
                log::error!("Password change error for {}: {}", username, e);
                return OpOutcome::failed("Password change failed");
            }
        };

        if verified.is_none() {
            log::warn!(
                "Password change failed - invalid current password for: {}",
                username
            );
            return OpOutcome::failed("Current password is incorrect");
        }

        if !self.password_policy.is_valid(new_password) {
            return OpOutcome::failed("New password does not meet security requirements");
        }

        match self.store.change_password(username, new_password) {
            Ok(true) => {
                log::info!("Password changed for user: {}", username);
                OpOutcome::ok("Password changed successfully")
            }
            Ok(false) => OpOutcome::failed("Failed to change password"),
            Err(e) => {
                log::error!("Password change error for {}: {}", username, e);
                OpOutcome::failed("Password change failed")
            }
        }
    }

    /// Admin password reset, bypassing current-password verification.
    pub fn reset_password(&self, username: &str, new_password: &str, admin_user: &str) -> OpOutcome {
        if !self.password_policy.is_valid(new_password) {
            return OpOutcome::failed(MSG_WEAK_PASSWORD);
        }

        match self.store.change_password(username, new_password) {
            Ok(true) => {
                log::info!("Password reset for user: {} by admin: {}", username, admin_user);
                OpOutcome::ok("Password reset successfully")
            }
            Ok(false) => OpOutcome::failed("User not found"),
            Err(e) => {
                log::error!("Password reset error for {}: {}", username, e);
                OpOutcome::failed("Password reset failed")
            }
        }
    }

    /// Unlock a user account and drop its rate-limit history.
    pub fn unlock_user(&self, username: &str, admin_user: &str) -> OpOutcome {
        match self.store.unlock_user(username) {
            Ok(true) => {
                self.rate_limiter.clear(username);
                log::info!("User unlocked: {} by admin: {}", username, admin_user);
                OpOutcome::ok("User account unlocked")
            }
            Ok(false) => OpOutcome::failed("User not found"),
            Err(e) => {
                log::error!("Failed to unlock user {}: {}", username, e);
                OpOutcome::failed("Failed to unlock user")
            }
        }
    }

    /// Delete a user account.
    pub fn delete_user(&self, username: &str, admin_user: &str) -> OpOutcome {
        match self.store.delete_user(username) {
            Ok(true) => {
                log::info!("User deleted: {} by admin: {}", username, admin_user);
                OpOutcome::ok("User deleted successfully")
            }
            Ok(false) => OpOutcome::failed("User not found"),
            Err(e) => {
                log::error!("Failed to delete user {}: {}", username, e);
                OpOutcome::failed("Failed to delete user")
            }
        }
    }

    /// Fetch a user record, or `None` when absent or the store failed.
    pub fn get_user(&self, username: &str) -> Option<UserRecord> {
        match self.store.get_user(username) {
            Ok(user) => user,
            Err(e) => {
                log::error!("Failed to get user {}: {}", username, e);
                None
            }
        }
    }

    /// List all user records; empty when the store failed.
    pub fn list_users(&self) -> Vec<UserRecord> {
        match self.store.list_users() {
            Ok(users) => users,
            Err(e) => {
                log::error!("Failed to list users: {}", e);
                Vec::new()
            }
        }
    }

    /// Check the store's authoritative long-term lockout flag.
    pub fn is_account_locked(&self, username: &str) -> bool {
        match self.store.get_user(username) {
            Ok(user) => user.map(|u| u.account_locked).unwrap_or(false),
            Err(e) => {
                log::error!("Failed to check lock status for {}: {}", username, e);
                false
            }
        }
    }

    /// Diagnostic snapshot of the active security configuration.
    ///
    /// Side-effect free; reports the pepper's presence, never its value.
    pub fn get_security_info(&self) -> SecurityInfo {
        SecurityInfo {
            hash_algorithm: "Argon2id".to_string(),
            pepper_configured: self.pepper_configured,
            rate_limiting_enabled: true,
            max_attempts: self.rate_limiter.max_attempts(),
            time_window_seconds: self.rate_limiter.window_seconds(),
            account_lockout_enabled: true,
            password_requirements: self.password_policy.requirements(),
        }
    }

    fn default_permissions(role: &str) -> Vec<String> {
        let names: &[&str] = match role {
            "admin" => &[
                "user_management",
                "system_settings",
                "view_logs",
                "unlock_accounts",
                "create_users",
                "delete_users",
                "modify_roles",
            ],
            "operator" => &[
                "system_monitoring",
                "view_logs",
                "health_checks",
                "basic_maintenance",
            ],
            _ => &["session_access", "personal_settings"],
        };
        names.iter().map(|s| s.to_string()).collect()
    }
}
