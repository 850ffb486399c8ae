//! Credential store interface
//!
//! The gate consumes a credential store but does not implement one.
//! Implementations own the Argon2id hash comparison (with a server-side
//! pepper) and the persisted failure counters and long-term lockout
//! flag; the in-memory rate limiter in front of them is a deliberately
//! redundant, faster line of defense.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a credential-store backend can raise.
///
/// These represent genuine store failures (I/O, corrupt data). "User
/// not found" and "username taken" are normal outcomes and are encoded
/// in the method return values instead.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// A user account as exposed outside the store.
///
/// Hash and salt material never leave the store, so this record is safe
/// to hand to callers as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub role: String,
    pub email: Option<String>,
    pub permissions: Vec<String>,
    /// Authoritative long-term lockout flag, owned by the store
    pub account_locked: bool,
    pub requires_password_change: bool,
}

/// Trait for credential-store backends.
///
/// The store performs the actual password-hash comparison and maintains
/// its own persisted lockout state, independent of the gate's in-memory
/// rate limiting.
pub trait UserStore: Send + Sync {
    /// Verify credentials against the stored hash.
    ///
    /// Returns the user record on success, `None` when the user does
    /// not exist or the password is wrong (the two cases are not
    /// distinguished), or an error when the store itself failed.
    fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Create a new account.
    ///
    /// Returns `false` when the username is already taken.
    fn create_user(
        &self,
        username: &str,
        password: &str,
        role: &str,
        email: Option<&str>,
        permissions: &[String],
    ) -> Result<bool, StoreError>;

    /// Replace a user's password.
    ///
    /// Returns `false` when the user does not exist.
    fn change_password(&self, username: &str, new_password: &str) -> Result<bool, StoreError>;

    /// Clear the store's persisted lockout state for a user.
    ///
    /// Returns `false` when the user does not exist.
    fn unlock_user(&self, username: &str) -> Result<bool, StoreError>;

    /// Fetch a single user record.
    fn get_user(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// List all user records.
    fn list_users(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Delete an account.
    ///
    /// Returns `false` when the user does not exist.
    fn delete_user(&self, username: &str) -> Result<bool, StoreError>;
}
