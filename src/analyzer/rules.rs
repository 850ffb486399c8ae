//! Classification rule tables
//!
//! The severity ladder and the recommendation generators are explicit,
//! ordered tables rather than nested conditionals, so each rule can be
//! exercised on its own and the evaluation order is visible in one
//! place.

use std::collections::BTreeSet;

use crate::models::{AnalysisReport, EventKind, Severity};

/// Maximum gap between two failures for them to count as rapid.
pub const RAPID_GAP_SECONDS: i64 = 60;

/// Rapid attempts needed before an identity becomes a brute-force
/// candidate.
pub const BRUTE_FORCE_CANDIDATE_THRESHOLD: usize = 3;

/// Rapid attempts at which a candidate's severity escalates to high.
pub const BRUTE_FORCE_HIGH_THRESHOLD: usize = 5;

/// Failure count above which an identity lands in the frequent-failure
/// map.
pub const FREQUENT_FAILURE_THRESHOLD: usize = 3;

/// Failure count above which an identity counts toward the lockout
/// recommendation.
pub const HIGH_FAILURE_THRESHOLD: usize = 10;

/// Inputs to the severity rules for one event.
pub struct EventContext<'a> {
    pub kind: EventKind,
    pub username: &'a str,
    pub suspicious_usernames: &'a BTreeSet<String>,
}

/// One entry in the severity ladder.
pub struct SeverityRule {
    pub name: &'static str,
    pub applies: fn(&EventContext) -> bool,
    pub severity: Severity,
}

/// Severity rules in evaluation order; the first match wins.
pub fn severity_rules() -> &'static [SeverityRule] {
    static RULES: [SeverityRule; 4] = [
        SeverityRule {
            name: "test marker in production log",
            applies: |ctx| ctx.kind == EventKind::TestMarker,
            severity: Severity::High,
        },
        SeverityRule {
            name: "rate limited attempt",
            applies: |ctx| ctx.kind == EventKind::RateLimited,
            severity: Severity::High,
        },
        SeverityRule {
            name: "authentication timeout",
            applies: |ctx| ctx.kind == EventKind::Timeout,
            severity: Severity::Medium,
        },
        SeverityRule {
            name: "suspicious username",
            applies: |ctx| ctx.suspicious_usernames.contains(ctx.username),
            severity: Severity::Medium,
        },
    ];
    &RULES
}

/// Assess one event against the ladder; unmatched events are low.
pub fn assess_severity(ctx: &EventContext) -> Severity {
    severity_rules()
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .map(|rule| rule.severity)
        .unwrap_or(Severity::Low)
}

/// One recommendation generator; fires when its aggregate condition
/// holds.
pub struct RecommendationRule {
    pub name: &'static str,
    pub evaluate: fn(&AnalysisReport) -> Option<String>,
}

/// Recommendation rules in output order.
pub fn recommendation_rules() -> &'static [RecommendationRule] {
    static RULES: [RecommendationRule; 4] = [
        RecommendationRule {
            name: "test data in logs",
            evaluate: |report| {
                if report.test_data_in_logs.is_empty() {
                    return None;
                }
                Some(
                    "CRITICAL: Remove test data from production logs. \
                     Test code should not run in production."
                        .to_string(),
                )
            },
        },
        RecommendationRule {
            name: "brute force candidates",
            evaluate: |report| {
                if report.brute_force_attempts.is_empty() {
                    return None;
                }
                Some(format!(
                    "WARNING: Detected {} potential brute force attacks. \
                     Consider implementing CAPTCHA or temporary IP blocking.",
                    report.brute_force_attempts.len()
                ))
            },
        },
        RecommendationRule {
            name: "suspicious usernames",
            evaluate: |report| {
                if report.suspicious_usernames.is_empty() {
                    return None;
                }
                Some(format!(
                    "ALERT: Authentication attempts on {} suspicious usernames: {}. \
                     Consider monitoring these more closely.",
                    report.suspicious_usernames.len(),
                    report.suspicious_usernames.join(", ")
                ))
            },
        },
        RecommendationRule {
            name: "very high failure rates",
            evaluate: |report| {
                let high_failure_count = report
                    .frequent_failures
                    .values()
                    .filter(|&&count| count > HIGH_FAILURE_THRESHOLD)
                    .count();
                if high_failure_count == 0 {
                    return None;
                }
                Some(format!(
                    "WARNING: {} users with very high failure rates (>10 attempts). \
                     Consider temporary account lockouts.",
                    high_failure_count
                ))
            },
        },
    ];
    &RULES
}

/// Fallback recommendation when no rule fires.
pub const NO_CONCERNS: &str = "No immediate security concerns detected.";

/// Evaluate every recommendation rule in order.
pub fn generate_recommendations(report: &AnalysisReport) -> Vec<String> {
    let mut recommendations: Vec<String> = recommendation_rules()
        .iter()
        .filter_map(|rule| (rule.evaluate)(report))
        .collect();

    if recommendations.is_empty() {
        recommendations.push(NO_CONCERNS.to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BruteForceCandidate;

    fn suspicious() -> BTreeSet<String> {
        ["admin", "root"].iter().map(|s| s.to_string()).collect()
    }

    fn ctx<'a>(
        kind: EventKind,
        username: &'a str,
        suspicious_usernames: &'a BTreeSet<String>,
    ) -> EventContext<'a> {
        EventContext {
            kind,
            username,
            suspicious_usernames,
        }
    }

    #[test]
    fn test_test_marker_always_high() {
        let set = suspicious();
        // High even for a harmless username
        assert_eq!(
            assess_severity(&ctx(EventKind::TestMarker, "alice", &set)),
            Severity::High
        );
    }

    #[test]
    fn test_rate_limited_high() {
        let set = suspicious();
        assert_eq!(
            assess_severity(&ctx(EventKind::RateLimited, "alice", &set)),
            Severity::High
        );
    }

    #[test]
    fn test_timeout_medium() {
        let set = suspicious();
        assert_eq!(
            assess_severity(&ctx(EventKind::Timeout, "alice", &set)),
            Severity::Medium
        );
    }

    #[test]
    fn test_suspicious_username_medium() {
        let set = suspicious();
        assert_eq!(
            assess_severity(&ctx(EventKind::Failed, "admin", &set)),
            Severity::Medium
        );
    }

    #[test]
    fn test_plain_failure_low() {
        let set = suspicious();
        assert_eq!(
            assess_severity(&ctx(EventKind::Failed, "alice", &set)),
            Severity::Low
        );
    }

    #[test]
    fn test_kind_rules_outrank_suspicious_username() {
        let set = suspicious();
        // A rate-limited attempt on "admin" matches two rules; the
        // earlier (high) one wins
        assert_eq!(
            assess_severity(&ctx(EventKind::RateLimited, "admin", &set)),
            Severity::High
        );
    }

    #[test]
    fn test_no_findings_single_default_recommendation() {
        let report = AnalysisReport::default();
        let recs = generate_recommendations(&report);
        assert_eq!(recs, vec![NO_CONCERNS.to_string()]);
    }

    #[test]
    fn test_test_data_rule_is_critical_and_first() {
        let mut report = AnalysisReport::default();
        report
            .test_data_in_logs
            .push("2025-06-01 10:00:00 [ERROR] app - Test: stub".to_string());
        report.suspicious_usernames.push("admin".to_string());

        let recs = generate_recommendations(&report);
        assert!(recs[0].starts_with("CRITICAL"));
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn test_brute_force_rule_reports_count() {
        let mut report = AnalysisReport::default();
        for name in ["admin", "root"] {
            report.brute_force_attempts.insert(
                name.to_string(),
                BruteForceCandidate {
                    total_attempts: 6,
                    rapid_attempts: 5,
                    time_span_minutes: 2.0,
                    severity: Severity::High,
                },
            );
        }

        let recs = generate_recommendations(&report);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("Detected 2 potential brute force attacks"));
    }

    #[test]
    fn test_suspicious_rule_lists_names() {
        let mut report = AnalysisReport::default();
        report.suspicious_usernames = vec!["admin".to_string(), "root".to_string()];

        let recs = generate_recommendations(&report);
        assert!(recs[0].starts_with("ALERT"));
        assert!(recs[0].contains("admin, root"));
    }

    #[test]
    fn test_high_failure_rule_needs_over_ten() {
        let mut report = AnalysisReport::default();
        report.frequent_failures.insert("alice".to_string(), 10);

        // Exactly ten does not fire
        assert_eq!(generate_recommendations(&report), vec![NO_CONCERNS.to_string()]);

        report.frequent_failures.insert("bob".to_string(), 11);
        let recs = generate_recommendations(&report);
        assert!(recs[0].contains("1 users with very high failure rates"));
    }

    #[test]
    fn test_rules_fire_in_fixed_order() {
        let mut report = AnalysisReport::default();
        report.test_data_in_logs.push("x".to_string());
        report.brute_force_attempts.insert(
            "admin".to_string(),
            BruteForceCandidate {
                total_attempts: 4,
                rapid_attempts: 3,
                time_span_minutes: 1.5,
                severity: Severity::Medium,
            },
        );
        report.suspicious_usernames.push("admin".to_string());
        report.frequent_failures.insert("admin".to_string(), 12);

        let recs = generate_recommendations(&report);
        assert_eq!(recs.len(), 4);
        assert!(recs[0].starts_with("CRITICAL"));
        assert!(recs[1].starts_with("WARNING: Detected"));
        assert!(recs[2].starts_with("ALERT"));
        assert!(recs[3].starts_with("WARNING:"));
    }
}
