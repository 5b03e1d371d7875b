//! Runtime configuration.
//!
//! Everything is read from environment variables at startup. A `.env` file in
//! the working directory is honoured for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::brain::FillerSettings;
use crate::error::AppError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines for a terminal.
    #[default]
    Pretty,
    /// Bunyan-style JSON, one object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    /// Directive string handed to `EnvFilter`.
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Whether auto-replies start switched on.
    pub auto_reply_enabled: bool,
    pub auto_reply_timeout: Duration,
    pub tracking_link: String,
    pub next_drop_date: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let filler = FillerSettings::default();
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_filter: "info".to_string(),
            log_format: LogFormat::Pretty,
            auto_reply_enabled: true,
            auto_reply_timeout: Duration::from_secs(5),
            tracking_link: filler.tracking_link,
            next_drop_date: filler.drop_date,
        }
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}

impl AppConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// `.env` loading is skipped under `cfg(test)` so tests stay hermetic.
    pub fn from_env() -> Result<Self, AppError> {
        if !cfg!(test) {
            dotenv::dotenv().ok();
        }

        let defaults = Self::default();

        let bind_address = match var("BIND_ADDRESS") {
            Some(addr) => addr.parse::<SocketAddr>()?,
            None => defaults.bind_address,
        };

        let log_filter = var("RUST_LOG").unwrap_or(defaults.log_filter);

        let log_format = match var("LOG_FORMAT") {
            Some(format) => format.parse()?,
            None => defaults.log_format,
        };

        let auto_reply_enabled = match var("AUTO_REPLY_ENABLED") {
            Some(flag) => parse_bool("AUTO_REPLY_ENABLED", &flag)?,
            None => defaults.auto_reply_enabled,
        };

        let auto_reply_timeout = match var("AUTO_REPLY_TIMEOUT_SECS") {
            Some(secs) => {
                let secs = secs.trim().parse::<u64>().map_err(|e| {
                    AppError::Config(format!("AUTO_REPLY_TIMEOUT_SECS: {}", e))
                })?;
                if secs == 0 {
                    return Err(AppError::Config(
                        "AUTO_REPLY_TIMEOUT_SECS must be at least 1".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.auto_reply_timeout,
        };

        Ok(Self {
            bind_address,
            log_filter,
            log_format,
            auto_reply_enabled,
            auto_reply_timeout,
            tracking_link: var("TRACKING_LINK").unwrap_or(defaults.tracking_link),
            next_drop_date: var("NEXT_DROP_DATE").unwrap_or(defaults.next_drop_date),
        })
    }

    /// Literal values for the template filler.
    pub fn filler_settings(&self) -> FillerSettings {
        FillerSettings {
            tracking_link: self.tracking_link.clone(),
            drop_date: self.next_drop_date.clone(),
            ..FillerSettings::default()
        }
    }
}
