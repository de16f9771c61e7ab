use crate::config::ConfigOverrides;
use crate::utils::logger::LogFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "bmi-tracker")]
#[command(about = "Calculate BMI and track it against a remote BMI service")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Base URL of the BMI API")]
    pub api_base_url: Option<String>,

    #[arg(long, global = true, help = "Decimal places used when rounding BMI")]
    pub precision: Option<u32>,

    #[arg(long, global = true, help = "Per-request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Calculate BMI without saving it
    Calc {
        #[arg(long, allow_hyphen_values = true, help = "Height in meters, e.g. 1.75")]
        height: String,
        #[arg(long, allow_hyphen_values = true, help = "Weight in kilograms, e.g. 70.5")]
        weight: String,
    },
    /// Calculate BMI and save the record
    Save {
        #[arg(long, allow_hyphen_values = true, help = "Height in meters, e.g. 1.75")]
        height: String,
        #[arg(long, allow_hyphen_values = true, help = "Weight in kilograms, e.g. 70.5")]
        weight: String,
        #[arg(long, default_value = "", allow_hyphen_values = true, help = "Age in years, e.g. 25")]
        age: String,
    },
    /// Show saved BMI records
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Delete a saved BMI record
    Delete {
        id: String,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Export saved BMI records to CSV
    Export {
        #[arg(long, short = 'o')]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl CliConfig {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_base_url: self.api_base_url.clone(),
            precision: self.precision,
            timeout_seconds: self.timeout_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_save_command() {
        let cli = CliConfig::parse_from([
            "bmi-tracker",
            "save",
            "--height",
            "1.75",
            "--weight",
            "70",
            "--age",
            "30",
            "--api-base-url",
            "http://127.0.0.1:9000",
        ]);

        assert_eq!(cli.api_base_url.as_deref(), Some("http://127.0.0.1:9000"));
        match cli.command {
            Command::Save {
                height,
                weight,
                age,
            } => {
                assert_eq!(height, "1.75");
                assert_eq!(weight, "70");
                assert_eq!(age, "30");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_delete_and_list() {
        let cli = CliConfig::parse_from(["bmi-tracker", "--verbose", "delete", "17", "-y"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Delete { ref id, yes: true } if id == "17"));

        let cli = CliConfig::parse_from(["bmi-tracker", "list", "--format", "json", "--precision", "1"]);
        assert!(matches!(cli.command, Command::List { format: OutputFormat::Json }));
        assert_eq!(cli.overrides().precision, Some(1));
    }
}
