//! Error types for the Qudora adapter.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for Qudora operations.
pub type QudoraResult<T> = Result<T, QudoraError>;

/// Errors that can occur when talking to Qudora Cloud.
#[derive(Debug, Error)]
pub enum QudoraError {
    /// No credential file at the resolved location.
    #[error("Cannot find Qudora config file with credentials ({})", .0.display())]
    ConfigNotFound(PathBuf),

    /// The home directory could not be determined for the default config path.
    #[error("Cannot determine home directory for the default Qudora config file")]
    NoHomeDir,

    /// Reading the credential file failed.
    #[error("Failed to read Qudora config file ({}): {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential file violates the `<key> : <value>` format.
    #[error("Ill-formed configuration file ({}): {reason}", .path.display())]
    MalformedConfig { path: PathBuf, reason: String },

    /// Job execution failed on the service.
    #[error("Job failed to execute. See Qudora Cloud for more details.")]
    JobFailed,

    /// Job was cancelled or deleted on the service.
    #[error("Job was cancelled (status: {0})")]
    JobCancelled(String),

    /// A status response is missing the expected fields.
    #[error("Unexpected status response: {0}")]
    UnexpectedResponse(String),

    /// A completed response does not contain valid results.
    #[error("Failed to parse Qudora result: {0}")]
    ResultParse(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<QudoraError> for arvak_rest::RestError {
    fn from(e: QudoraError) -> Self {
        match e {
            QudoraError::ConfigNotFound(_) | QudoraError::NoHomeDir => {
                arvak_rest::RestError::ConfigNotFound(e.to_string())
            }
            QudoraError::ConfigRead { .. } | QudoraError::MalformedConfig { .. } => {
                arvak_rest::RestError::MalformedConfig(e.to_string())
            }
            QudoraError::JobFailed => arvak_rest::RestError::JobFailed(e.to_string()),
            QudoraError::JobCancelled(status) => arvak_rest::RestError::JobCancelled(status),
            QudoraError::UnexpectedResponse(msg) => {
                arvak_rest::RestError::UnexpectedResponse(msg)
            }
            QudoraError::ResultParse(msg) => arvak_rest::RestError::ResultParse(msg),
            QudoraError::Json(err) => arvak_rest::RestError::Serialization(err),
        }
    }
}
