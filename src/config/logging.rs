use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use super::{parse_or, Lookup};
use crate::core::{AppError, Result};

/// Log level names accepted in PAYPAL_LOG_LEVEL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Logging toggle, level and destination
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub enabled: bool,
    pub level: LogLevel,
    /// Append to this file instead of stdout
    pub file: Option<PathBuf>,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Debug,
            file: None,
            json: false,
        }
    }
}

impl LogConfig {
    pub(super) fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        Ok(LogConfig {
            enabled: parse_or(lookup, "PAYPAL_LOG_ENABLED", true)?,
            level: parse_or(lookup, "PAYPAL_LOG_LEVEL", LogLevel::Debug)?,
            file: lookup("PAYPAL_LOG_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            json: parse_or(lookup, "LOG_JSON", false)?,
        })
    }

    /// Filter used when RUST_LOG is not set
    pub fn default_directives(&self) -> String {
        let crate_level = if self.enabled {
            self.level.directive()
        } else {
            "off"
        };
        format!("paypal_checkout={},actix_web=info", crate_level)
    }
}

/// Install the global tracing subscriber
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::configuration(format!(
                        "Cannot open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            let writer = Mutex::new(file);
            if config.json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            }
        }
        None if config.json => fmt::layer().json().boxed(),
        None => fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| AppError::configuration(format!("Failed to initialise logging: {}", e)))
}
