use crate::models::AnalysisReport;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Output handler for analysis reports
pub struct ReportWriter {
    format: OutputFormat,
    writer: Option<Box<dyn Write + Send>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Jsonl,
    Console,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "jsonl" => OutputFormat::Jsonl,
            "console" => OutputFormat::Console,
            _ => OutputFormat::Console, // Default
        }
    }
}

impl ReportWriter {
    /// Create a new report writer
    pub fn new(
        format: OutputFormat,
        file_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let writer: Option<Box<dyn Write + Send>> = match (&format, file_path) {
            (OutputFormat::Console, _) => None,
            (_, Some(path)) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Some(Box::new(BufWriter::new(file)))
            }
            (_, None) => None,
        };

        Ok(ReportWriter { format, writer })
    }

    /// Write an analysis report
    pub fn write_report(&mut self, report: &AnalysisReport) -> Result<(), Box<dyn std::error::Error>> {
        match &self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(report)?;
                self.write_output(&format!("{}\n", json))?;
            }
            OutputFormat::Jsonl => {
                let json = serde_json::to_string(report)?;
                self.write_output(&format!("{}\n", json))?;
            }
            OutputFormat::Console => {
                let rendered = Self::render_console(report);
                self.write_output(&rendered)?;
            }
        }
        Ok(())
    }

    /// Human-readable rendering of a report, section by section
    fn render_console(report: &AnalysisReport) -> String {
        let mut out = String::new();

        out.push_str("Security Analysis Report\n");
        out.push_str("========================\n");

        if let Some(ref error) = report.error {
            out.push_str(&format!("Error: {}\n", error));
        }

        out.push_str(&format!("Total Events: {}\n", report.total_events));

        if !report.failed_attempts.is_empty() {
            out.push_str("\nFailed Authentication Attempts:\n");
            for (username, count) in &report.failed_attempts {
                out.push_str(&format!("  {}: {} attempts\n", username, count));
            }
        }

        if !report.brute_force_attempts.is_empty() {
            out.push_str("\nPotential Brute Force Attacks:\n");
            for (username, details) in &report.brute_force_attempts {
                out.push_str(&format!(
                    "  {}: {} attempts ({} rapid) in {:.1} minutes, severity {}\n",
                    username,
                    details.total_attempts,
                    details.rapid_attempts,
                    details.time_span_minutes,
                    details.severity
                ));
            }
        }

        if !report.suspicious_usernames.is_empty() {
            out.push_str("\nSuspicious Username Attempts:\n");
            for username in &report.suspicious_usernames {
                out.push_str(&format!("  {}\n", username));
            }
        }

        if !report.test_data_in_logs.is_empty() {
            out.push_str(&format!(
                "\nTest Data in Production Logs: {} entries\n",
                report.test_data_in_logs.len()
            ));
        }

        out.push_str("\nRecommendations:\n");
        for (i, recommendation) in report.recommendations.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, recommendation));
        }

        out
    }

    fn write_output(&mut self, data: &str) -> Result<(), Box<dyn std::error::Error>> {
        match &mut self.writer {
            Some(writer) => {
                writer.write_all(data.as_bytes())?;
                writer.flush()?;
            }
            None => {
                print!("{}", data);
                std::io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}
