use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Stock API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Stock API returned status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Commit task failed: {0}")]
    CommitTaskFailed(#[from] tokio::task::JoinError),

    #[error("Cart invariant violated: {message}")]
    InvariantViolation { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Configuration,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::ApiError(_) | CartError::UnexpectedStatus { .. } => ErrorCategory::Network,
            CartError::IoError(_) | CartError::CommitTaskFailed(_) => ErrorCategory::Storage,
            CartError::SerializationError(_) | CartError::InvariantViolation { .. } => {
                ErrorCategory::Data
            }
            CartError::ConfigError { .. }
            | CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => "Could not reach the inventory service".to_string(),
            ErrorCategory::Storage => "Could not access the saved cart".to_string(),
            ErrorCategory::Data => "Cart data is invalid".to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CartError::ApiError(e) if e.is_timeout() => {
                "Increase the request timeout or check the inventory service load"
            }
            CartError::ApiError(_) => "Check that the inventory service URL is reachable",
            CartError::UnexpectedStatus { status: 404, .. } => {
                "Check that the product id exists in the inventory service"
            }
            CartError::UnexpectedStatus { .. } => "Retry later; the inventory service reported an error",
            CartError::IoError(_) => "Check permissions on the storage directory",
            CartError::CommitTaskFailed(_) => "Retry the operation; the snapshot write was interrupted",
            CartError::SerializationError(_) | CartError::InvariantViolation { .. } => {
                "Remove the stored cart snapshot and try again"
            }
            CartError::ConfigError { .. }
            | CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. } => "Fix the configuration value and rerun",
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        let io = CartError::IoError(std::io::Error::other("disk"));
        assert_eq!(io.category(), ErrorCategory::Storage);

        let status = CartError::UnexpectedStatus {
            url: "http://localhost/stock/9".to_string(),
            status: 404,
        };
        assert_eq!(status.category(), ErrorCategory::Network);
        assert!(status.recovery_suggestion().contains("product id"));

        let invalid = CartError::InvalidConfigValueError {
            field: "service.base_url".to_string(),
            value: "ftp://x".to_string(),
            reason: "Stock service must use http or https, got ftp".to_string(),
        };
        assert_eq!(invalid.category(), ErrorCategory::Configuration);
        assert!(invalid.user_friendly_message().contains("service.base_url"));
    }
}
