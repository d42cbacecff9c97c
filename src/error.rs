//! Error types for Analyst
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Analyst
#[derive(Debug, Error)]
pub enum AnalystError {
    /// Configuration loading or validation error
    #[error("Config error: {0}")]
    Config(String),

    /// Downstream analytic service error (transport or non-2xx status)
    #[error("Service error: {0}")]
    Service(String),

    /// Malformed date in configuration or CLI input
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Analyst operations
pub type Result<T> = std::result::Result<T, AnalystError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = AnalystError::Config("router.sentiment keywords empty".to_string());
        assert_eq!(err.to_string(), "Config error: router.sentiment keywords empty");
    }

    #[test]
    fn test_service_error() {
        let err = AnalystError::Service("risk: 503 Service Unavailable".to_string());
        assert_eq!(err.to_string(), "Service error: risk: 503 Service Unavailable");
    }

    #[test]
    fn test_invalid_date_error() {
        let err = AnalystError::InvalidDate("2024-13-01".to_string());
        assert_eq!(err.to_string(), "Invalid date: 2024-13-01");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AnalystError = io_err.into();
        assert!(matches!(err, AnalystError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: AnalystError = json_err.into();
        assert!(matches!(err, AnalystError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(AnalystError::Service("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
