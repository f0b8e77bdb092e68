use thiserror::Error;

/// Main error type for the ECG inference service
#[derive(Error, Debug)]
pub enum EcgdError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Input validation errors (client-facing, HTTP 400)
    #[error("{0}")]
    Validation(String),

    // Model handle absent at predict time (HTTP 503)
    #[error("model unavailable")]
    ModelUnavailable,

    // Inference engine failures
    #[error("Inference error: {0}")]
    Inference(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for EcgdError
pub type Result<T> = std::result::Result<T, EcgdError>;
