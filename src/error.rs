//! Error types for the blogsmith generation pipeline.

use thiserror::Error;

/// Failures of a single pipeline step (text call, title parsing, content cleanup).
///
/// Image generation deliberately has no variant here: it resolves to `None` instead.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl GenerationError {
    /// Short, stable label used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Transport(_) => "transport",
            GenerationError::HttpStatus { .. } => "http_status",
            GenerationError::Parse(_) => "parse",
            GenerationError::EmptyResponse(_) => "empty_response",
        }
    }
}

/// Errors outside the pipeline: configuration, logging setup, client construction, CLI I/O.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
