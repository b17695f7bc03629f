//! Error types for the Krishi advisory server.

use thiserror::Error;

/// Main error type for Krishi operations.
#[derive(Error, Debug)]
pub enum KrishiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("AI gateway error: {0}")]
    Ai(#[from] AiError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Storage-related errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// AI gateway errors. All of these surface to clients as a single
/// generic processing failure; the detail stays in the logs.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("API key not provided and PERPLEXITY_API_KEY env var not set")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error ({0}): {1}")]
    Api(u16, String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Response contained no answer")]
    MissingAnswer,

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired session token")]
    InvalidToken,
}

/// Result type alias for Krishi operations.
pub type Result<T> = std::result::Result<T, KrishiError>;
