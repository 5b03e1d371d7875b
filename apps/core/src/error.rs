use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
///
/// The scoring functions never produce one of these: they are total. Errors only
/// appear at the boundary (request validation, configuration) and around the
/// auto-reply actor.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors (e.g., binding the listener).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents errors specific to the actor system, such as a closed channel.
    #[error("Actor error: {0}")]
    Actor(String),

    /// Represents data validation errors (e.g., a malformed request body).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., an unparsable environment variable).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A referenced entity (template, customer) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The auto-reply system or the target platform is switched off.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Represents an error indicating that a rate limit has been exceeded.
    #[error("Rate limit exceeded for {0}")]
    RateLimited(String),
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Actor(s) => AppError::Actor(s.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::NotFound(s) => AppError::NotFound(s.clone()),
            AppError::Unavailable(s) => AppError::Unavailable(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
            AppError::RateLimited(s) => AppError::RateLimited(s.clone()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Auto-reply actor did not answer: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<std::net::AddrParseError> for AppError {
    fn from(err: std::net::AddrParseError) -> Self {
        AppError::Config(format!("Invalid socket address: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_preserves_variant_and_message() {
        let err = AppError::RateLimited("ig_sender".to_string());
        let cloned = err.clone();
        assert!(matches!(cloned, AppError::RateLimited(ref s) if s == "ig_sender"));
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_json_error_becomes_validation() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = parse.into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
