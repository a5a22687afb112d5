//! Domain error types

use thiserror::Error;

/// Error when a sample rate is not a positive number of hertz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid sample rate specified: {hz} Hz (must be between 1 and {max})", max = u32::MAX)]
pub struct InvalidSampleRate {
    pub hz: i64,
}

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected <number>h, <number>m, <number>s or a combination (e.g., 30s, 5m, 1h30m)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a status code does not name a known event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown status event code: {0}")]
pub struct UnknownStatusCode(pub i32);

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
