use std::path::PathBuf;
use structopt::StructOpt;

use authgate::analyzer::SecurityLogAnalyzer;
use authgate::config::Config;
use authgate::gate::PasswordPolicy;
use authgate::output::{OutputFormat, ReportWriter};

/// Authentication security toolkit command line interface
#[derive(StructOpt, Debug)]
#[structopt(name = "authgate", about = "Authentication security CLI")]
pub enum Cli {
    /// Analyze the authentication log for attack patterns
    Analyze {
        /// Path to configuration file
        #[structopt(short, long, default_value = "authgate.toml")]
        config: PathBuf,
        /// Analysis window in hours (overrides the configured default)
        #[structopt(short, long)]
        hours: Option<i64>,
        /// Output format: console, json, or jsonl (overrides the config)
        #[structopt(short, long)]
        format: Option<String>,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "authgate.toml")]
        output: PathBuf,
    },
    /// Validate a candidate password against the strength policy
    CheckPassword {
        /// Password to validate
        password: String,
        /// Apply the stricter provisioning policy (16-character minimum)
        #[structopt(long)]
        provisioning: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::from_args();

    match cli {
        Cli::Analyze {
            config,
            hours,
            format,
        } => {
            let config = if config.exists() {
                Config::from_file(&config)?
            } else {
                log::warn!("Config file not found, using defaults");
                Config::default()
            };

            let hours_back = hours.unwrap_or(config.analyzer.hours_back);
            let output_format =
                OutputFormat::from_str(format.as_deref().unwrap_or(&config.output.format));

            let analyzer = SecurityLogAnalyzer::new(config.analyzer);
            let report = analyzer.analyze_logs(hours_back);

            let mut writer = ReportWriter::new(output_format, config.output.file_path)?;
            writer.write_report(&report)?;
            writer.flush()?;
        }
        Cli::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
        Cli::CheckPassword {
            password,
            provisioning,
        } => {
            let policy = if provisioning {
                PasswordPolicy::provisioning()
            } else {
                PasswordPolicy::interactive()
            };

            let issues = policy.validate(&password);
            if issues.is_empty() {
                println!("Password meets all requirements");
            } else {
                for issue in &issues {
                    eprintln!("{}", issue);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
