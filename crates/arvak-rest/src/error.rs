//! Error types for the REST helper layer.

use thiserror::Error;

/// Errors that can occur while preparing, tracking or decoding a remote job.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestError {
    /// No usable credential source was found.
    #[error("Credential configuration not found: {0}")]
    ConfigNotFound(String),

    /// The credential file violates the expected format.
    #[error("Malformed credential configuration: {0}")]
    MalformedConfig(String),

    /// The remote service reported an execution failure.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// The remote service reported cancellation or deletion.
    #[error("Job cancelled: {0}")]
    JobCancelled(String),

    /// The terminal response does not match the expected result schema.
    #[error("Failed to parse job result: {0}")]
    ResultParse(String),

    /// A job was requested for an empty batch of kernels.
    #[error("Cannot create a job from an empty batch")]
    EmptyBatch,

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// A response did not have the shape the helper expects.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Non-success HTTP status from the remote service.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No helper is registered under the requested name.
    #[error("Server helper not available: {0}")]
    HelperUnavailable(String),

    /// Timeout waiting for job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),
}

/// Result type for REST helper operations.
pub type RestResult<T> = Result<T, RestError>;
