use bmi_tracker::core::RecordId;
use bmi_tracker::utils::logger;
use bmi_tracker::{app::runner, BmiTracker, CliConfig, HttpBmiApi, TrackerConfig};
use clap::Parser;
use std::io::{BufRead, Write};

fn confirm_delete(id: &RecordId) -> bool {
    print!("Are you sure you want to delete BMI record {}? [y/N] ", id);
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_format);

    tracing::info!("Starting bmi-tracker CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match TrackerConfig::resolve(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_message());
            std::process::exit(e.severity().exit_code());
        }
    };

    let api = match HttpBmiApi::from_config(&config) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            std::process::exit(e.severity().exit_code());
        }
    };
    tracing::debug!("Using BMI API at {}", api.base_url());

    let mut tracker = BmiTracker::new(api, config.precision);
    let mut stdout = std::io::stdout();

    if let Err(e) = runner::run_command(&mut tracker, cli.command, confirm_delete, &mut stdout).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.severity().exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
