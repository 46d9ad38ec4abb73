// Command-line arguments and subcommands for the prescription analyzer,
// defined with `clap` derive.
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use prescription_analyzer_data::client::ClientConfig;

#[derive(Parser, Debug)]
#[command(name = "prescription-analyzer")]
#[command(version)]
#[command(about = "Analyze prescription images and set medication reminders")]
pub struct Cli {
    /// Base URL of the analysis service
    #[arg(long, global = true, env = "PRESCRIPTION_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds; the HTTP client's default when unset
    #[arg(long, global = true, env = "PRESCRIPTION_API_TIMEOUT_SECS", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands for the prescription analyzer
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a prescription image and show what was extracted
    Analyze(AnalyzeArgs),
    /// Set a medication reminder directly
    Remind(RemindArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeArgs {
    /// Prescription image to upload
    #[arg(value_name = "IMAGE", value_hint = clap::ValueHint::FilePath)]
    pub image: PathBuf,

    /// Write a PDF report after a successful analysis
    #[arg(long)]
    pub report: bool,

    /// Directory the report is written to
    #[arg(long, env = "REPORT_OUTPUT_DIR", default_value = ".", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Print the raw analysis result as JSON instead of the panels
    #[arg(long)]
    pub json: bool,

    /// Set a reminder for medication N (1-based) after the analysis
    #[arg(long, value_name = "N", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub remind: Option<usize>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RemindArgs {
    /// Medication the reminder is for
    #[arg(long)]
    pub medication: String,

    /// Ten-digit mobile number
    #[arg(long)]
    pub phone: String,

    /// Time of day, HH:MM
    #[arg(long, value_name = "HH:MM")]
    pub time: String,

    /// "daily" or "weekly"
    #[arg(long, default_value = "daily")]
    pub interval: String,

    /// Number of days or weeks
    #[arg(long, default_value = "7")]
    pub duration: String,
}

impl Cli {
    /// Client configuration from the environment, overridden by flags
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(api_url) = &self.api_url {
            config.base_url = api_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Some(Duration::from_secs(secs));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_flags() {
        let cli = Cli::try_parse_from([
            "prescription-analyzer",
            "--api-url",
            "http://10.0.0.5:8080",
            "analyze",
            "rx.png",
            "--report",
            "--out-dir",
            "reports",
            "--remind",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://10.0.0.5:8080"));
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.image, PathBuf::from("rx.png"));
        assert!(args.report);
        assert!(!args.json);
        assert_eq!(args.out_dir, PathBuf::from("reports"));
        assert_eq!(args.remind, Some(2));
    }

    #[test]
    fn test_remind_position_is_one_based() {
        let result = Cli::try_parse_from(["prescription-analyzer", "analyze", "rx.png", "--remind", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_remind_defaults() {
        let cli = Cli::try_parse_from([
            "prescription-analyzer",
            "remind",
            "--medication",
            "Paracetamol",
            "--phone",
            "1234567890",
            "--time",
            "09:00",
            "--timeout-secs",
            "30",
        ])
        .unwrap();

        let config = cli.client_config();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        let Command::Remind(args) = cli.command else {
            panic!("expected remind");
        };
        assert_eq!(args.interval, "daily");
        assert_eq!(args.duration, "7");
    }
}
