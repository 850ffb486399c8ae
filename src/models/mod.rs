pub mod event;
pub mod outcome;
pub mod report;

pub use event::{EventKind, SecurityEvent, Severity};
pub use outcome::{AuthOutcome, OpOutcome, PasswordRequirements, SecurityInfo};
pub use report::{AnalysisReport, BruteForceCandidate};
