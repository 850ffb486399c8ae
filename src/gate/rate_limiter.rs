//! Sliding-window attempt limiting
//!
//! Tracks login attempts per identity inside a trailing time window to
//! bound brute-force volume before any credential check happens. State
//! is in-memory only and lost on restart; the credential store's
//! persisted lockout flag covers the longer time scale.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::config::RateLimitConfig;

/// Per-identity sliding-window attempt counter.
///
/// All state sits behind one coarse lock; prune-then-check runs under a
/// single acquisition so concurrent calls for the same identity observe
/// a consistent window.
pub struct RateLimiter {
    /// identity -> attempt timestamps (epoch seconds, non-decreasing)
    attempts: Mutex<HashMap<String, Vec<i64>>>,
    window_seconds: i64,
    max_attempts: usize,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        RateLimiter {
            attempts: Mutex::new(HashMap::new()),
            window_seconds: config.window_seconds,
            max_attempts: config.max_attempts,
        }
    }

    pub fn window_seconds(&self) -> i64 {
        self.window_seconds
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Check whether an identity is currently limited.
    ///
    /// Returns the limit decision and, when limited, the seconds until
    /// the oldest retained attempt exits the window.
    pub fn is_limited(&self, identity: &str) -> (bool, i64) {
        self.is_limited_at(identity, Utc::now().timestamp())
    }

    /// Clock-injected variant of [`is_limited`](Self::is_limited).
    pub fn is_limited_at(&self, identity: &str, now: i64) -> (bool, i64) {
        let mut attempts = self.attempts.lock().unwrap();

        let Some(entry) = attempts.get_mut(identity) else {
            return (false, 0);
        };

        // Prune attempts that have aged out of the window
        let cutoff = now - self.window_seconds;
        entry.retain(|&t| t > cutoff);

        if entry.is_empty() {
            attempts.remove(identity);
            return (false, 0);
        }

        if entry.len() >= self.max_attempts {
            let oldest = entry[0];
            // Clamp to tolerate clock anomalies
            let retry_after = (oldest + self.window_seconds - now).max(0);
            return (true, retry_after);
        }

        (false, 0)
    }

    /// Record an attempt for an identity, creating its window if absent.
    pub fn record_attempt(&self, identity: &str) {
        self.record_attempt_at(identity, Utc::now().timestamp());
    }

    /// Clock-injected variant of [`record_attempt`](Self::record_attempt).
    pub fn record_attempt_at(&self, identity: &str, now: i64) {
        let mut attempts = self.attempts.lock().unwrap();
        attempts.entry(identity.to_string()).or_default().push(now);
    }

    /// Drop all attempt history for an identity. Idempotent.
    pub fn clear(&self, identity: &str) {
        let mut attempts = self.attempts.lock().unwrap();
        attempts.remove(identity);
    }

    /// Current retained attempt count for an identity (diagnostics).
    pub fn attempt_count(&self, identity: &str) -> usize {
        let attempts = self.attempts.lock().unwrap();
        attempts.get(identity).map(|e| e.len()).unwrap_or(0)
    }
}
