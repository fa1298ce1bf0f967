//! Error types for sitemeta.

use thiserror::Error;

/// Result type alias using sitemeta's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sitemeta operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Content-store query failed (network, timeout, non-2xx status)
    #[error("Content store error: {0}")]
    ContentStore(String),

    /// Cache backend operation failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_content_store() {
        let err = Error::ContentStore("query timed out".to_string());
        assert_eq!(err.to_string(), "Content store error: query timed out");
    }

    #[test]
    fn test_error_display_cache() {
        let err = Error::Cache("connection refused".to_string());
        assert_eq!(err.to_string(), "Cache error: connection refused");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing project id".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing project id");
    }

    #[test]
    fn test_error_display_request() {
        let err = Error::Request("connection reset".to_string());
        assert_eq!(err.to_string(), "Request error: connection reset");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::ContentStore("bad projection".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("ContentStore"));
    }
}
