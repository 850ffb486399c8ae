use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::gate::password_policy::PasswordPolicy;

/// Configuration for the authentication security subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Credential-gate configuration
    pub gate: GateConfig,
    /// Log-analyzer configuration
    pub analyzer: AnalyzerConfig,
    /// Report output configuration
    pub output: OutputConfig,
}

/// Credential-gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Sliding-window rate limiting in front of the credential store
    pub rate_limit: RateLimitConfig,
    /// Policy enforced on interactive credential operations
    pub password_policy: PasswordPolicy,
    /// Stricter policy for bulk provisioning tooling
    pub provisioning_policy: PasswordPolicy,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Time window in seconds
    pub window_seconds: i64,
    /// Maximum login attempts per identity within the window
    pub max_attempts: usize,
}

/// Log-analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Path to the authentication log file
    pub log_file: PathBuf,
    /// Default analysis window in hours
    pub hours_back: i64,
    /// Static dictionary of usernames that attract attack traffic
    pub suspicious_usernames: Vec<String>,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "json", "jsonl", or "console"
    pub format: String,
    /// Output file path (if format is not "console")
    pub file_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gate: GateConfig {
                rate_limit: RateLimitConfig {
                    window_seconds: 300,
                    max_attempts: 5,
                },
                password_policy: PasswordPolicy::interactive(),
                provisioning_policy: PasswordPolicy::provisioning(),
            },
            analyzer: AnalyzerConfig {
                log_file: PathBuf::from("data/logs/errors.log"),
                hours_back: 24,
                suspicious_usernames: default_suspicious_usernames(),
            },
            output: OutputConfig {
                format: "console".to_string(),
                file_path: None,
            },
        }
    }
}

/// Usernames that attackers probe by default, independent of any real
/// account existing under the name.
pub fn default_suspicious_usernames() -> Vec<String> {
    [
        "admin",
        "administrator",
        "root",
        "test",
        "guest",
        "demo",
        "user",
        "password",
        "login",
        "system",
        "oracle",
        "postgres",
        "mysql",
        "sa",
        "support",
        "service",
        "default",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = Config::default();
        assert_eq!(config.gate.rate_limit.window_seconds, 300);
        assert_eq!(config.gate.rate_limit.max_attempts, 5);
        assert_eq!(config.gate.password_policy.min_length, 12);
        assert_eq!(config.gate.provisioning_policy.min_length, 16);
        assert_eq!(config.analyzer.hours_back, 24);
        assert!(config
            .analyzer
            .suspicious_usernames
            .contains(&"admin".to_string()));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            restored.gate.rate_limit.max_attempts,
            config.gate.rate_limit.max_attempts
        );
        assert_eq!(
            restored.analyzer.suspicious_usernames,
            config.analyzer.suspicious_usernames
        );
        assert_eq!(restored.output.format, "console");
    }
}
