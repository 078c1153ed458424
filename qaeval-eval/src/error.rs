//! Error types for the evaluation engine

use thiserror::Error;

/// Result type alias for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur while loading, evaluating, or saving a dataset
#[derive(Error, Debug)]
pub enum EvalError {
    /// Failed to read the input file
    #[error("Failed to load dataset: {0}")]
    LoadError(String),

    /// Input file lacks a required column
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumn(Vec<String>),

    /// Malformed CSV content
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Evaluation run failed
    #[error("Evaluation failed: {0}")]
    ExecutionError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Embedding service error during scoring
    #[error("Scoring error: {0}")]
    ScoringError(String),

    /// LLM judge error
    #[error("LLM judge error: {0}")]
    JudgeError(String),

    /// Failed to write results
    #[error("Failed to write results: {0}")]
    WriteError(String),
}

impl From<qaeval_core::CoreError> for EvalError {
    fn from(err: qaeval_core::CoreError) -> Self {
        match err {
            qaeval_core::CoreError::Config(message) => EvalError::ConfigError(message),
            qaeval_core::CoreError::Io(e) => EvalError::IoError(e),
            other => EvalError::ExecutionError(other.to_string()),
        }
    }
}
