#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::engine::DEFAULT_PRECISION;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// 合併設定檔與命令列參數後的最終配置
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub api_base_url: String,
    pub timeout_seconds: Option<u64>,
    pub headers: HashMap<String, String>,
    pub precision: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: None,
            headers: HashMap::new(),
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub precision: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

impl TrackerConfig {
    /// Defaults, then the optional TOML file, then command-line overrides.
    pub fn resolve(config_file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let file_config = match config_file {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                let file_config = TomlConfig::from_file(path)?;
                file_config.validate()?;
                file_config
            }
            None => TomlConfig::default(),
        };

        let defaults = TrackerConfig::default();
        let config = TrackerConfig {
            api_base_url: overrides
                .api_base_url
                .or_else(|| file_config.base_url().map(String::from))
                .unwrap_or(defaults.api_base_url),
            timeout_seconds: overrides.timeout_seconds.or(file_config.timeout_seconds()),
            headers: file_config.headers(),
            precision: overrides
                .precision
                .or(file_config.precision())
                .unwrap_or(defaults.precision),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Validate for TrackerConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_url("api.base_url", &self.api_base_url)?;
        crate::utils::validation::validate_range("calculator.precision", self.precision, 0, 4)?;
        if let Some(timeout) = self.timeout_seconds {
            crate::utils::validation::validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }
        Ok(())
    }
}

impl ConfigProvider for TrackerConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    fn precision(&self) -> u32 {
        self.precision
    }
}
