use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Severity of a security event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Kind of authentication event reconstructed from a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Failed authentication attempt (wrong or unknown credentials)
    Failed,
    /// Authentication timed out before the store answered
    Timeout,
    /// Attempt rejected by the rate limiter
    RateLimited,
    /// Line carrying the test/development marker
    TestMarker,
}

/// A single authentication event parsed from the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub timestamp: NaiveDateTime,
    pub kind: EventKind,
    pub username: String,
    pub severity: Severity,
    /// Original log line, trimmed
    pub raw: String,
}

impl SecurityEvent {
    /// Whether this event counts as an authentication failure
    /// (failed and timed-out attempts do; rate-limited ones were
    /// rejected before any credential check).
    pub fn is_failure(&self) -> bool {
        matches!(self.kind, EventKind::Failed | EventKind::Timeout)
    }
}
