use crate::config::ConfigError;
use crate::estimate::pricing::RateCardError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Failures that stop the estimate service or one of its commands before any
/// quote is produced.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    /// Binding the listener, serving, or writing command output.
    Io(std::io::Error),
    /// The configured size table could not be loaded.
    RateCard(RateCardError),
    /// Command arguments that cannot produce a quote.
    Input(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "invalid estimate service configuration: {}", err),
            AppError::Telemetry(err) => write!(f, "could not start logging: {}", err),
            AppError::Io(err) => write!(f, "i/o failure: {}", err),
            AppError::RateCard(err) => write!(f, "rate card could not be loaded: {}", err),
            AppError::Input(message) => write!(f, "cannot quote this move: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::RateCard(err) => Some(err),
            AppError::Input(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RateCardError> for AppError {
    fn from(value: RateCardError) -> Self {
        Self::RateCard(value)
    }
}
