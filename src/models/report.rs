use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Severity;

/// Details of a suspected brute-force attack against one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BruteForceCandidate {
    /// Total failed attempts inside the analysis window
    pub total_attempts: usize,
    /// Adjacent failure pairs under 60 seconds apart
    pub rapid_attempts: usize,
    /// Span from first to last failure, in minutes
    pub time_span_minutes: f64,
    pub severity: Severity,
}

/// Aggregate result of one log-analysis run.
///
/// Recomputed from scratch on every run; nothing here is persisted.
/// Maps are keyed by username, so serializing and deserializing the
/// report preserves every entry and the recommendation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_events: usize,
    /// Username -> failed + timed-out attempt count
    pub failed_attempts: BTreeMap<String, usize>,
    pub brute_force_attempts: BTreeMap<String, BruteForceCandidate>,
    pub suspicious_usernames: Vec<String>,
    /// Usernames whose failure count exceeds the frequency threshold
    pub frequent_failures: BTreeMap<String, usize>,
    /// Raw text of every test-marker line found in the log
    pub test_data_in_logs: Vec<String>,
    pub recommendations: Vec<String>,
    /// Populated when the log source was missing or unreadable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisReport {
    /// Report for an unavailable log source. Carries zero counts and an
    /// explicit error field instead of failing the analysis call.
    pub fn unavailable(error: String, recommendation: String) -> Self {
        AnalysisReport {
            recommendations: vec![recommendation],
            error: Some(error),
            ..Default::default()
        }
    }
}
