use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{service} returned HTTP {status}: {message}")]
    UnexpectedStatus {
        service: String,
        status: u16,
        message: String,
    },

    #[error("{service} response is missing field {field}")]
    MissingField { service: String, field: String },

    #[error("Event stream error: {message}")]
    StreamError { message: String },

    #[error("Assistant error: {message}")]
    AssistantError { message: String },

    #[error("Invalid tool arguments: {message}")]
    ToolArgumentError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Assistant,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BotError::HttpError(_) | BotError::UnexpectedStatus { .. } | BotError::StreamError { .. } => {
                ErrorCategory::Network
            }
            BotError::UrlError(_)
            | BotError::ConfigValidationError { .. }
            | BotError::InvalidConfigValueError { .. }
            | BotError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BotError::SerializationError(_)
            | BotError::MissingField { .. }
            | BotError::ToolArgumentError { .. } => ErrorCategory::Data,
            BotError::AssistantError { .. } => ErrorCategory::Assistant,
            BotError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data | ErrorCategory::Assistant => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run that stops on this error. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BotError::HttpError(_) | BotError::StreamError { .. } => {
                "Check the network connection and try again"
            }
            BotError::UnexpectedStatus { status: 401, .. } => {
                "Check that OPENAI_API_KEY (or assistant.api_key) is valid"
            }
            BotError::UnexpectedStatus { status: 429, .. } => {
                "The service is rate limiting requests; wait a moment and retry"
            }
            BotError::UnexpectedStatus { .. } => "Check the service base URL and request parameters",
            BotError::MissingConfigError { .. } => {
                "Set the missing value in the config file or environment"
            }
            BotError::UrlError(_)
            | BotError::ConfigValidationError { .. }
            | BotError::InvalidConfigValueError { .. } => "Fix the configuration value and rerun",
            BotError::SerializationError(_) | BotError::MissingField { .. } => {
                "The service returned an unexpected payload; rerun with --verbose for details"
            }
            BotError::ToolArgumentError { .. } => "Rephrase the question with a city and state",
            BotError::AssistantError { .. } => "Inspect the run on the assistant platform",
            BotError::IoError(_) => "Check file permissions and paths",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach a remote service: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
            ErrorCategory::Assistant => format!("The assistant run failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_retryable_network_errors() {
        let err = BotError::UnexpectedStatus {
            service: "openai".to_string(),
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "openai returned HTTP 500: boom");
    }

    #[test]
    fn test_unauthorized_suggests_api_key() {
        let err = BotError::UnexpectedStatus {
            service: "openai".to_string(),
            status: 401,
            message: String::new(),
        };
        assert!(err.recovery_suggestion().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_missing_config_is_high_severity() {
        let err = BotError::MissingConfigError {
            field: "assistant.api_key".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Configuration problem"));
    }

    #[test]
    fn test_every_category_exits_nonzero() {
        let errors = [
            BotError::StreamError {
                message: "closed".to_string(),
            },
            BotError::MissingConfigError {
                field: "assistant.api_key".to_string(),
            },
            BotError::MissingField {
                service: "geocode.xyz".to_string(),
                field: "latt".to_string(),
            },
            BotError::AssistantError {
                message: "server error".to_string(),
            },
            BotError::IoError(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout")),
        ];

        let codes: Vec<i32> = errors.iter().map(BotError::exit_code).collect();
        assert_eq!(codes, vec![2, 1, 1, 1, 3]);
    }
}
