use thiserror::Error;

/// 對外部 API 的操作種類，用於產生使用者訊息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    ListRecords,
    CreateRecord,
    DeleteRecord,
}

impl ApiOperation {
    /// API 回傳非 2xx 時顯示的訊息
    pub fn failure_message(&self) -> &'static str {
        match self {
            ApiOperation::ListRecords => "Failed to fetch BMI history.",
            ApiOperation::CreateRecord => "Failed to save BMI data.",
            ApiOperation::DeleteRecord => "Failed to delete BMI record.",
        }
    }

    /// 連線層失敗（沒有 HTTP 回應）時顯示的訊息
    pub fn fallback_message(&self) -> &'static str {
        match self {
            ApiOperation::ListRecords => "Failed to load BMI history.",
            ApiOperation::CreateRecord => "Something went wrong while saving.",
            ApiOperation::DeleteRecord => "Failed to delete record.",
        }
    }
}

impl std::fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ApiOperation::ListRecords => "list records",
            ApiOperation::CreateRecord => "create record",
            ApiOperation::DeleteRecord => "delete record",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("API request to {operation} failed with status {status}")]
    ApiStatus {
        operation: ApiOperation,
        status: u16,
        message: Option<String>,
    },

    #[error("API request to {operation} could not be completed: {source}")]
    Transport {
        operation: ApiOperation,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Another request is already in progress")]
    Busy,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 1,
            ErrorSeverity::High => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl TrackerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        TrackerError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackerError::InvalidInput { .. } | TrackerError::Busy => ErrorCategory::Input,
            TrackerError::ApiStatus { .. }
            | TrackerError::Transport { .. }
            | TrackerError::HttpClientError(_) => ErrorCategory::Network,
            TrackerError::ConfigError { .. }
            | TrackerError::ConfigValidationError { .. }
            | TrackerError::InvalidConfigValueError { .. }
            | TrackerError::MissingConfigError { .. }
            | TrackerError::UrlError(_) => ErrorCategory::Configuration,
            TrackerError::IoError(_)
            | TrackerError::SerializationError(_)
            | TrackerError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Network => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 顯示給使用者的單一訊息字串
    pub fn user_message(&self) -> String {
        match self {
            TrackerError::InvalidInput { message } => message.clone(),
            TrackerError::ApiStatus {
                operation, message, ..
            } => match (operation, message) {
                // 只有建立紀錄時才採用伺服器回傳的 message
                (ApiOperation::CreateRecord, Some(server_message)) if !server_message.is_empty() => {
                    server_message.clone()
                }
                _ => operation.failure_message().to_string(),
            },
            TrackerError::Transport { operation, .. } => operation.fallback_message().to_string(),
            TrackerError::Busy => "Please wait for the current request to finish.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrackerError::InvalidInput { .. } => "Check the entered height, weight and age",
            TrackerError::Busy => "Retry once the pending request completes",
            TrackerError::ApiStatus { status, .. } if *status >= 500 => {
                "The BMI service reported an internal error, try again later"
            }
            TrackerError::ApiStatus { .. } => "Check the request data and API credentials",
            TrackerError::Transport { .. } | TrackerError::HttpClientError(_) => {
                "Check that the API base URL is reachable"
            }
            TrackerError::ConfigError { .. }
            | TrackerError::ConfigValidationError { .. }
            | TrackerError::InvalidConfigValueError { .. }
            | TrackerError::MissingConfigError { .. }
            | TrackerError::UrlError(_) => "Fix the configuration file or command-line flags",
            TrackerError::IoError(_) => "Check file paths and permissions",
            TrackerError::SerializationError(_) => "The API returned data in an unexpected format",
            TrackerError::CsvError(_) => "Check the export destination",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
