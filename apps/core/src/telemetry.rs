use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;
use crate::error::AppError;

const SERVICE_NAME: &str = "storepulse";

/// Builds an `EnvFilter` from a directive string such as `info,tower_http=debug`.
pub fn env_filter(directives: &str) -> Result<EnvFilter, AppError> {
    EnvFilter::try_new(directives)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", directives, e)))
}

/// Installs the global subscriber. Fails if one is already set.
pub fn init_tracing(directives: &str, format: LogFormat) -> Result<(), AppError> {
    let filter = env_filter(directives)?;

    let (pretty, bunyan) = match format {
        LogFormat::Pretty => (Some(fmt::layer().with_target(true)), None),
        LogFormat::Json => (
            None,
            Some(BunyanFormattingLayer::new(
                SERVICE_NAME.to_string(),
                std::io::stdout,
            )),
        ),
    };
    // The storage layer has to sit in front of the bunyan formatter
    let storage = bunyan.as_ref().map(|_| JsonStorageLayer);

    tracing_subscriber::registry()
        .with(filter)
        .with(storage)
        .with(bunyan)
        .with(pretty)
        .try_init()
        .map_err(|e| AppError::Internal(format!("Failed to install tracing subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_directives() {
        assert!(env_filter("info").is_ok());
        assert!(env_filter("storepulse_core=debug,tower_http=warn").is_ok());
    }

    #[test]
    fn test_env_filter_rejects_garbage() {
        assert!(matches!(
            env_filter("storepulse_core=loud"),
            Err(AppError::Config(_))
        ));
    }
}
