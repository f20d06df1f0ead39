//! Error handling module for the splxt CLI.
//!
//! This module provides custom error types using `thiserror` for structured
//! error handling throughout the application.

use thiserror::Error;

use splx_lex::ConfigError;
use splx_util::SourceMapError;

/// Main error type for the splxt CLI application.
#[derive(Error, Debug)]
pub enum SplxtError {
    /// Error when the CLI configuration cannot be read or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when a rule file fails to load or build.
    #[error("Rule file error: {0}")]
    Rules(#[from] ConfigError),

    /// Error when no lexer matches the requested name or file.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// Error when input validation fails.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error when a token cannot be resolved against its document.
    #[error("Source error: {0}")]
    Source(#[from] SourceMapError),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using SplxtError.
pub type Result<T> = std::result::Result<T, SplxtError>;
