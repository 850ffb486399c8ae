//! Offline authentication-log analysis
//!
//! Reconstructs structured security events from the plain-text
//! authentication log and aggregates them into an [`AnalysisReport`]:
//! per-identity failure counts, brute-force candidates, suspicious
//! usernames, and test artifacts that leaked into production logs.
//! Read-only and batch; safe to run while live traffic is still being
//! logged.

pub mod rules;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDateTime};
use regex::Regex;

use crate::config::AnalyzerConfig;
use crate::models::{AnalysisReport, BruteForceCandidate, EventKind, SecurityEvent, Severity};
use self::rules::{
    assess_severity, generate_recommendations, EventContext, BRUTE_FORCE_CANDIDATE_THRESHOLD,
    BRUTE_FORCE_HIGH_THRESHOLD, FREQUENT_FAILURE_THRESHOLD, RAPID_GAP_SECONDS,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const LOG_UNAVAILABLE_RECOMMENDATION: &str =
    "Log file not found. Check if logging is properly configured.";

struct LogPattern {
    kind: EventKind,
    regex: Regex,
}

/// Batch analyzer for the authentication log.
pub struct SecurityLogAnalyzer {
    log_file: PathBuf,
    suspicious_usernames: BTreeSet<String>,
    patterns: Vec<LogPattern>,
}

impl SecurityLogAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let compile = |pattern: &str| Regex::new(pattern).expect("hard-coded log pattern");

        // Fixed line formats emitted by the credential gate's logging;
        // evaluated in this order for every line
        let patterns = vec![
            LogPattern {
                kind: EventKind::Failed,
                regex: compile(
                    r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) \[ERROR\] .* Failed authentication attempt for user: (\w+)",
                ),
            },
            LogPattern {
                kind: EventKind::Timeout,
                regex: compile(
                    r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) \[ERROR\] .* Authentication timeout for user: (\w+)",
                ),
            },
            LogPattern {
                kind: EventKind::RateLimited,
                regex: compile(
                    r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) \[ERROR\] .* Rate limited authentication attempt for user: (\w+)",
                ),
            },
            LogPattern {
                kind: EventKind::TestMarker,
                regex: compile(r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) \[ERROR\] .* Test:"),
            },
        ];

        SecurityLogAnalyzer {
            log_file: config.log_file,
            suspicious_usernames: config.suspicious_usernames.into_iter().collect(),
            patterns,
        }
    }

    /// Analyze events from the last `hours_back` hours of the log.
    pub fn analyze_logs(&self, hours_back: i64) -> AnalysisReport {
        self.analyze_logs_at(hours_back, Local::now().naive_local())
    }

    /// Clock-injected variant of [`analyze_logs`](Self::analyze_logs);
    /// the cutoff is computed against the given reference time.
    pub fn analyze_logs_at(&self, hours_back: i64, now: NaiveDateTime) -> AnalysisReport {
        if !self.log_file.exists() {
            log::warn!("Log file not found: {}", self.log_file.display());
            return AnalysisReport::unavailable(
                format!("Log file not found: {}", self.log_file.display()),
                LOG_UNAVAILABLE_RECOMMENDATION.to_string(),
            );
        }

        let file = match File::open(&self.log_file) {
            Ok(file) => file,
            Err(e) => {
                log::error!("Error opening log file {}: {}", self.log_file.display(), e);
                return AnalysisReport::unavailable(
                    format!("Failed to read log file: {}", e),
                    LOG_UNAVAILABLE_RECOMMENDATION.to_string(),
                );
            }
        };

        let cutoff = now - Duration::hours(hours_back);
        let events = self.parse_events(BufReader::new(file), cutoff);

        let mut report = AnalysisReport {
            total_events: events.len(),
            failed_attempts: Self::count_failed_attempts(&events),
            brute_force_attempts: Self::detect_brute_force(&events),
            suspicious_usernames: self.find_suspicious_usernames(&events),
            frequent_failures: BTreeMap::new(),
            test_data_in_logs: Self::detect_test_data(&events),
            recommendations: Vec::new(),
            error: None,
        };
        report.frequent_failures = Self::find_frequent_failures(&report.failed_attempts);
        report.recommendations = generate_recommendations(&report);

        report
    }

    /// Scan the log line by line, reconstructing events newer than the
    /// cutoff. Malformed lines are skipped individually; scanning never
    /// aborts.
    fn parse_events<R: BufRead>(&self, reader: R, cutoff: NaiveDateTime) -> Vec<SecurityEvent> {
        let mut events = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line_num = index + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("Skipping unreadable log line {}: {}", line_num, e);
                    continue;
                }
            };

            for pattern in &self.patterns {
                let Some(caps) = pattern.regex.captures(&line) else {
                    continue;
                };

                let timestamp_str = caps.get(1).map(|m| m.as_str()).unwrap_or("unknown");
                let timestamp =
                    match NaiveDateTime::parse_from_str(timestamp_str, TIMESTAMP_FORMAT) {
                        Ok(ts) => ts,
                        Err(e) => {
                            log::warn!(
                                "Could not parse timestamp '{}' on line {}: {}",
                                timestamp_str,
                                line_num,
                                e
                            );
                            continue;
                        }
                    };

                if timestamp < cutoff {
                    continue;
                }

                let username = caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "unknown".to_string());

                let severity = assess_severity(&EventContext {
                    kind: pattern.kind,
                    username: &username,
                    suspicious_usernames: &self.suspicious_usernames,
                });

                events.push(SecurityEvent {
                    timestamp,
                    kind: pattern.kind,
                    username,
                    severity,
                    raw: line.trim().to_string(),
                });
            }
        }

        events
    }

    fn count_failed_attempts(events: &[SecurityEvent]) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for event in events.iter().filter(|e| e.is_failure()) {
            *counts.entry(event.username.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Cluster failure timestamps per identity and count adjacent pairs
    /// closer than [`RAPID_GAP_SECONDS`].
    fn detect_brute_force(events: &[SecurityEvent]) -> BTreeMap<String, BruteForceCandidate> {
        let mut timestamps_by_user: BTreeMap<String, Vec<NaiveDateTime>> = BTreeMap::new();
        for event in events.iter().filter(|e| e.is_failure()) {
            timestamps_by_user
                .entry(event.username.clone())
                .or_default()
                .push(event.timestamp);
        }

        let mut candidates = BTreeMap::new();
        for (username, mut timestamps) in timestamps_by_user {
            timestamps.sort();

            let rapid_attempts = timestamps
                .windows(2)
                .filter(|pair| (pair[1] - pair[0]).num_seconds() < RAPID_GAP_SECONDS)
                .count();

            if rapid_attempts < BRUTE_FORCE_CANDIDATE_THRESHOLD {
                continue;
            }

            let first = timestamps[0];
            let last = timestamps[timestamps.len() - 1];
            let severity = if rapid_attempts >= BRUTE_FORCE_HIGH_THRESHOLD {
                Severity::High
            } else {
                Severity::Medium
            };

            candidates.insert(
                username,
                BruteForceCandidate {
                    total_attempts: timestamps.len(),
                    rapid_attempts,
                    time_span_minutes: (last - first).num_seconds() as f64 / 60.0,
                    severity,
                },
            );
        }

        candidates
    }

    fn find_suspicious_usernames(&self, events: &[SecurityEvent]) -> Vec<String> {
        let observed: BTreeSet<&str> = events.iter().map(|e| e.username.as_str()).collect();
        self.suspicious_usernames
            .iter()
            .filter(|name| observed.contains(name.as_str()))
            .cloned()
            .collect()
    }

    fn find_frequent_failures(failed: &BTreeMap<String, usize>) -> BTreeMap<String, usize> {
        failed
            .iter()
            .filter(|(_, &count)| count > FREQUENT_FAILURE_THRESHOLD)
            .map(|(user, &count)| (user.clone(), count))
            .collect()
    }

    fn detect_test_data(events: &[SecurityEvent]) -> Vec<String> {
        events
            .iter()
            .filter(|e| e.kind == EventKind::TestMarker)
            .map(|e| e.raw.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_suspicious_usernames;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const NOW: &str = "2025-06-01 12:00:00";

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str(NOW, TIMESTAMP_FORMAT).unwrap()
    }

    fn analyzer_for(path: PathBuf) -> SecurityLogAnalyzer {
        SecurityLogAnalyzer::new(AnalyzerConfig {
            log_file: path,
            hours_back: 24,
            suspicious_usernames: default_suspicious_usernames(),
        })
    }

    fn write_log(lines: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn failed_line(ts: &str, user: &str) -> String {
        format!(
            "{} [ERROR] auth.gate - Failed authentication attempt for user: {}",
            ts, user
        )
    }

    fn timeout_line(ts: &str, user: &str) -> String {
        format!(
            "{} [ERROR] auth.gate - Authentication timeout for user: {}",
            ts, user
        )
    }

    fn rate_limited_line(ts: &str, user: &str) -> String {
        format!(
            "{} [ERROR] auth.gate - Rate limited authentication attempt for user: {} (wait 240s)",
            ts, user
        )
    }

    fn test_marker_line(ts: &str) -> String {
        format!("{} [ERROR] auth.gate - Test: simulated failure injection", ts)
    }

    #[test]
    fn test_missing_log_file_reports_error() {
        let analyzer = analyzer_for(PathBuf::from("/nonexistent/authgate-test.log"));
        let report = analyzer.analyze_logs_at(24, now());

        assert_eq!(report.total_events, 0);
        assert!(report.error.as_ref().unwrap().contains("not found"));
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].contains("Log file not found"));
    }

    #[test]
    fn test_empty_log_has_default_recommendation() {
        let file = write_log(&[]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        assert_eq!(report.total_events, 0);
        assert!(report.error.is_none());
        assert_eq!(
            report.recommendations,
            vec!["No immediate security concerns detected.".to_string()]
        );
    }

    #[test]
    fn test_parses_failed_attempts_per_user() {
        let file = write_log(&[
            failed_line("2025-06-01 10:00:00", "alice"),
            failed_line("2025-06-01 10:05:00", "alice"),
            timeout_line("2025-06-01 10:10:00", "bob"),
            "2025-06-01 10:15:00 [INFO] auth.gate - Successful authentication for user: alice"
                .to_string(),
        ]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        assert_eq!(report.total_events, 3);
        assert_eq!(report.failed_attempts.get("alice"), Some(&2));
        assert_eq!(report.failed_attempts.get("bob"), Some(&1));
    }

    #[test]
    fn test_events_outside_window_discarded() {
        let file = write_log(&[
            failed_line("2025-05-30 10:00:00", "alice"),
            failed_line("2025-06-01 10:00:00", "alice"),
        ]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        assert_eq!(report.total_events, 1);
        assert_eq!(report.failed_attempts.get("alice"), Some(&1));
    }

    #[test]
    fn test_unparseable_timestamp_skipped() {
        let file = write_log(&[
            failed_line("2025-13-40 27:61:61", "alice"),
            failed_line("2025-06-01 10:00:00", "alice"),
        ]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        // The malformed line is dropped, scanning continues
        assert_eq!(report.total_events, 1);
    }

    #[test]
    fn test_brute_force_candidate_at_three_rapid_attempts() {
        // 4 failures at 30-second gaps: 3 adjacent rapid pairs
        let file = write_log(&[
            failed_line("2025-06-01 10:00:00", "admin"),
            failed_line("2025-06-01 10:00:30", "admin"),
            failed_line("2025-06-01 10:01:00", "admin"),
            failed_line("2025-06-01 10:01:30", "admin"),
        ]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        let candidate = report.brute_force_attempts.get("admin").unwrap();
        assert_eq!(candidate.total_attempts, 4);
        assert_eq!(candidate.rapid_attempts, 3);
        assert_eq!(candidate.severity, Severity::Medium);
        assert!((candidate.time_span_minutes - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_brute_force_escalates_to_high_at_five_rapid_attempts() {
        let lines: Vec<String> = (0..6)
            .map(|i| {
                failed_line(
                    &format!("2025-06-01 10:0{}:{:02}", i / 2, (i % 2) * 30),
                    "admin",
                )
            })
            .collect();
        let file = write_log(&lines);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        let candidate = report.brute_force_attempts.get("admin").unwrap();
        assert_eq!(candidate.rapid_attempts, 5);
        assert_eq!(candidate.severity, Severity::High);
    }

    #[test]
    fn test_slow_failures_are_not_brute_force() {
        // Gaps of 5 minutes never count as rapid
        let file = write_log(&[
            failed_line("2025-06-01 10:00:00", "alice"),
            failed_line("2025-06-01 10:05:00", "alice"),
            failed_line("2025-06-01 10:10:00", "alice"),
            failed_line("2025-06-01 10:15:00", "alice"),
        ]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        assert!(report.brute_force_attempts.is_empty());
        // But four failures still land in the frequent-failure map
        assert_eq!(report.frequent_failures.get("alice"), Some(&4));
    }

    #[test]
    fn test_admin_is_always_suspicious() {
        let file = write_log(&[failed_line("2025-06-01 10:00:00", "admin")]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        assert_eq!(report.suspicious_usernames, vec!["admin".to_string()]);
        assert!(report.recommendations.iter().any(|r| r.starts_with("ALERT")));
    }

    #[test]
    fn test_rate_limited_event_is_high_but_not_a_failure() {
        let file = write_log(&[rate_limited_line("2025-06-01 10:00:00", "alice")]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        assert_eq!(report.total_events, 1);
        assert!(report.failed_attempts.is_empty());
    }

    #[test]
    fn test_test_marker_always_flagged_and_critical() {
        let file = write_log(&[
            test_marker_line("2025-06-01 10:00:00"),
            failed_line("2025-06-01 10:01:00", "alice"),
        ]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        assert_eq!(report.test_data_in_logs.len(), 1);
        assert!(report.test_data_in_logs[0].contains("Test: simulated failure injection"));
        assert!(report.recommendations[0].starts_with("CRITICAL"));
    }

    #[test]
    fn test_full_report_json_round_trip() {
        let file = write_log(&[
            failed_line("2025-06-01 10:00:00", "admin"),
            failed_line("2025-06-01 10:00:30", "admin"),
            failed_line("2025-06-01 10:01:00", "admin"),
            failed_line("2025-06-01 10:01:30", "admin"),
            timeout_line("2025-06-01 10:02:00", "bob"),
            test_marker_line("2025-06-01 10:03:00"),
        ]);
        let analyzer = analyzer_for(file.path().to_path_buf());
        let report = analyzer.analyze_logs_at(24, now());

        let json = serde_json::to_string_pretty(&report).unwrap();
        let restored: AnalysisReport = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, report);
        assert_eq!(restored.recommendations, report.recommendations);
    }
}
