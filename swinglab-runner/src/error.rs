//! Structured error types for the runner.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to read bar file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse bar file: {0}")]
    Csv(#[from] csv::Error),

    #[error("bar validation failed: {0}")]
    Validation(String),

    #[error("failed to parse run config: {0}")]
    Config(#[from] toml::de::Error),
}
