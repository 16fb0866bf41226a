// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for the prcheck application.
//!
//! Retrieval and configuration errors are fatal to a run. Validation
//! failures are recoverable by policy, and publish errors are only logged.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for prcheck operations.
#[derive(Error, Debug)]
pub enum PrCheckError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Commit / pull request retrieval errors
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // Format violations that survived the ignore policy
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    // LLM errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    // Report delivery errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid regular expression for '{key}': `{pattern}` ({message})")]
    InvalidPattern {
        key: String,
        pattern: String,
        message: String,
    },

    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    #[error("Configuration file already exists: {path}")]
    AlreadyExists { path: PathBuf },
}

/// Errors raised while fetching commits or pull request data.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Authentication rejected by {url} (HTTP {status})")]
    Unauthorized {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Resource not found: {url}")]
    NotFound { url: String, body: String },

    #[error("Request to {url} failed with HTTP {status}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response shape from {url}: expected {expected}")]
    UnexpectedShape {
        url: String,
        expected: String,
        payload: String,
    },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Invalid git reference: {reference}")]
    InvalidReference { reference: String },

    #[error("Git operation '{operation}' failed: {message}")]
    Git { operation: String, message: String },
}

impl RetrievalError {
    /// Raw diagnostic payload worth echoing for operator debugging.
    pub fn payload(&self) -> Option<&str> {
        match self {
            RetrievalError::Http { body, .. }
            | RetrievalError::Unauthorized { body, .. }
            | RetrievalError::NotFound { body, .. } => Some(body),
            RetrievalError::UnexpectedShape { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// One or more checked items failed their format check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{count} of {total} {subject} did not pass")]
pub struct ValidationFailure {
    /// Number of failing items.
    pub count: usize,
    /// Number of items examined.
    pub total: usize,
    /// What was checked ("commits", "PR checks", ...).
    pub subject: String,
}

/// Errors from the OpenAI chat completion collaborator.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API request failed with HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors while delivering a rendered outcome to a sink.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Sink '{sink}' is missing required setting: {key}")]
    MissingSetting { sink: String, key: String },

    #[error("Sink '{sink}' rejected by {url} (HTTP {status}): {body}")]
    Rejected {
        sink: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Sink '{sink}' failed: {message}")]
    Failed { sink: String, message: String },
}

/// Result type alias for prcheck operations.
pub type Result<T> = std::result::Result<T, PrCheckError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PrCheckError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}
