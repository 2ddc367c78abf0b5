// src/error.rs
use thiserror::Error;

/// Errors raised by the scanner and the simulator.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Caller supplied a value the core cannot work with.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalyzerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AnalyzerError::InvalidInput(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AnalyzerError::InvalidInput(_))
    }
}

impl From<config::ConfigError> for AnalyzerError {
    fn from(e: config::ConfigError) -> Self {
        AnalyzerError::Config(e.to_string())
    }
}

pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;
