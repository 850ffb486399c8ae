pub mod analyzer;
pub mod config;
pub mod gate;
pub mod models;
pub mod output;
pub mod store;

// Re-export commonly used types
pub use analyzer::SecurityLogAnalyzer;
pub use config::Config;
pub use gate::{CredentialGate, PasswordPolicy, RateLimiter};
pub use models::{AnalysisReport, AuthOutcome, OpOutcome, SecurityEvent, SecurityInfo, Severity};
pub use store::{StoreError, UserRecord, UserStore};
