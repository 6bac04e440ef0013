//! n8ncli - A command-line client for the n8n workflow-automation API.
//!
//! This library provides the core functionality for the `n8ncli` binary:
//! configuration storage and resolution, the REST client, and the command
//! implementations.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;

/// Library-level error type for n8ncli operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("host is required")]
    MissingHost,

    #[error("apiKey is required")]
    MissingApiKey,

    #[error("Authentication failed. Check your API key.")]
    Authentication,

    #[error("Failed to connect to n8n at {host}: {detail}")]
    Connection { host: String, detail: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for n8ncli operations.
pub type Result<T> = std::result::Result<T, Error>;
