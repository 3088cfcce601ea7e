//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a user selection cannot be mapped to capture parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSelection {
    #[error("Invalid recording type: {key}. Valid keys are 1..={max}")]
    UnknownMode { key: u32, max: u32 },

    #[error("Invalid resolution: {key}. Valid keys are 1..={max}")]
    UnknownResolution { key: u32, max: u32 },

    #[error("Invalid resolution \"{input}\". Expected <width>x<height> with both greater than zero")]
    MalformedResolution { input: String },

    #[error("Invalid frame rate: {0}. Must be greater than zero")]
    FrameRate(u32),
}

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
