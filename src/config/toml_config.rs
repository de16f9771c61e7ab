use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: Option<ApiConfig>,
    pub calculator: Option<CalculatorConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculatorConfig {
    pub precision: Option<u32>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BMI_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrackerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.api.as_ref().and_then(|a| a.base_url.as_deref())
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.api.as_ref().and_then(|a| a.timeout_seconds)
    }

    pub fn headers(&self) -> HashMap<String, String> {
        self.api
            .as_ref()
            .and_then(|a| a.headers.clone())
            .unwrap_or_default()
    }

    pub fn precision(&self) -> Option<u32> {
        self.calculator.as_ref().and_then(|c| c.precision)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = self.base_url() {
            crate::utils::validation::validate_url("api.base_url", base_url)?;
        }
        if let Some(timeout) = self.timeout_seconds() {
            crate::utils::validation::validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(precision) = self.precision() {
            crate::utils::validation::validate_range("calculator.precision", precision, 0, 4)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "https://bmi.example.com"
timeout_seconds = 10
headers = { Authorization = "Bearer abc" }

[calculator]
precision = 1
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), Some("https://bmi.example.com"));
        assert_eq!(config.timeout_seconds(), Some(10));
        assert_eq!(config.headers().get("Authorization").unwrap(), "Bearer abc");
        assert_eq!(config.precision(), Some(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.base_url(), None);
        assert!(config.headers().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BMI_TRACKER_TEST_TOKEN", "secret-token");

        let toml_content = r#"
[api]
base_url = "http://localhost:3000"
headers = { Authorization = "Bearer ${BMI_TRACKER_TEST_TOKEN}", X-Trace = "${BMI_TRACKER_UNSET_VAR}" }
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let headers = config.headers();
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer secret-token");
        assert_eq!(headers.get("X-Trace").unwrap(), "${BMI_TRACKER_UNSET_VAR}");

        std::env::remove_var("BMI_TRACKER_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str("[api]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_precision = TomlConfig::from_toml_str("[calculator]\nprecision = 7\n").unwrap();
        assert!(bad_precision.validate().is_err());

        let bad_timeout = TomlConfig::from_toml_str("[api]\ntimeout_seconds = 0\n").unwrap();
        assert!(bad_timeout.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let err = TomlConfig::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, TrackerError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nbase_url = \"http://127.0.0.1:8080\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_url(), Some("http://127.0.0.1:8080"));
    }
}
