//! Qudora Cloud wire format.
//!
//! Jobs are posted to the jobs endpoint as a single JSON object per batch;
//! status and results come back from
//! `GET <jobs>?job_id=<id>&include_results=True` as an array whose first
//! element carries `status` and, once completed, `result`: one JSON-encoded
//! histogram string per submitted circuit.

use std::fmt;

use arvak_rest::{Counts, ExecutionResult, SampleResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QudoraError, QudoraResult};

/// Program format accepted by the service.
pub const LANGUAGE_QIR_BITCODE: &str = "QIR_BITCODE";

/// Job submission body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Display name of the job.
    pub name: String,
    /// Program format; always [`LANGUAGE_QIR_BITCODE`].
    pub language: String,
    /// Shots per circuit, parallel to `input_data`.
    pub shots: Vec<u32>,
    /// Target device.
    pub target: String,
    /// Compiled circuits in batch order.
    pub input_data: Vec<String>,
    /// Always serialized, as `null`.
    pub backend_settings: Option<Value>,
}

impl JobRequest {
    /// Create an empty request for `target`.
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: LANGUAGE_QIR_BITCODE.to_string(),
            shots: Vec::new(),
            target: target.into(),
            input_data: Vec::new(),
            backend_settings: None,
        }
    }

    /// Append one circuit, keeping `shots` and `input_data` aligned.
    pub fn push_circuit(&mut self, shots: u32, code: impl Into<String>) {
        self.shots.push(shots);
        self.input_data.push(code.into());
    }

    /// Number of circuits in the request.
    pub fn num_circuits(&self) -> usize {
        self.input_data.len()
    }
}

/// Job lifecycle status in Qudora's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QudoraStatus {
    Created,
    Queued,
    Running,
    Completed,
    Failed,
    Canceled,
    Cancelling,
    Deleted,
    /// Any status string the adapter does not know.
    Other(String),
}

impl QudoraStatus {
    /// Decode a status string. Matching is exact.
    pub fn parse(status: &str) -> Self {
        match status {
            "Created" => Self::Created,
            "Queued" => Self::Queued,
            "Running" => Self::Running,
            "Completed" => Self::Completed,
            "Failed" => Self::Failed,
            "Canceled" => Self::Canceled,
            "Cancelling" => Self::Cancelling,
            "Deleted" => Self::Deleted,
            other => Self::Other(other.to_string()),
        }
    }

    /// The status string as sent by the service.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "Created",
            Self::Queued => "Queued",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Canceled => "Canceled",
            Self::Cancelling => "Cancelling",
            Self::Deleted => "Deleted",
            Self::Other(s) => s,
        }
    }

    /// Cancelled, being cancelled, or deleted.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Canceled | Self::Cancelling | Self::Deleted)
    }

    /// No further transition will happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed) || self.is_cancelled()
    }
}

impl fmt::Display for QudoraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First element of a status response.
fn job_entry(response: &Value) -> QudoraResult<&Map<String, Value>> {
    response
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(Value::as_object)
        .ok_or_else(|| {
            QudoraError::UnexpectedResponse(format!(
                "expected a non-empty array of job objects, got {response}"
            ))
        })
}

/// Extract the job status from a status response.
pub fn parse_status(response: &Value) -> QudoraResult<QudoraStatus> {
    job_entry(response)?
        .get("status")
        .and_then(Value::as_str)
        .map(QudoraStatus::parse)
        .ok_or_else(|| QudoraError::UnexpectedResponse("missing `status` field".into()))
}

/// Decode the per-circuit histograms of a completed status response.
///
/// Each entry becomes one result tagged with the global register, in the
/// order the service returned them. Any malformed entry fails the whole
/// batch.
pub fn parse_results(response: &Value) -> QudoraResult<SampleResult> {
    let entry = job_entry(response).map_err(|e| QudoraError::ResultParse(e.to_string()))?;

    let entries = entry
        .get("result")
        .ok_or_else(|| QudoraError::ResultParse("missing `result` field".into()))?
        .as_array()
        .ok_or_else(|| QudoraError::ResultParse("`result` is not an array".into()))?;

    let results = entries
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let encoded = value.as_str().ok_or_else(|| {
                QudoraError::ResultParse(format!("result {index} is not a string"))
            })?;
            let counts: Counts = serde_json::from_str(encoded).map_err(|e| {
                QudoraError::ResultParse(format!("result {index} is not a histogram: {e}"))
            })?;
            Ok::<_, QudoraError>(ExecutionResult::global(counts))
        })
        .collect::<QudoraResult<Vec<_>>>()?;

    Ok(SampleResult::new(results))
}
