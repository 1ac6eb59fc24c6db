//! Job identity and polling state.
//!
//! The job state machine as seen by the host loop:
//!
//! ```text
//!   POST ──→ job id ──→ GET ──→ Pending ──(sleep)──→ GET ──→ … ──→ Done
//!                                  │
//!                                  └──→ JobFailed / JobCancelled (error)
//! ```
//!
//! Failure states are reported as errors by the helper, so the only
//! observable states are [`JobState::Pending`] and [`JobState::Done`].

use serde::{Deserialize, Serialize};

/// Unique identifier for a remote job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Progress of a job that has not failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Not yet terminal; poll again later.
    Pending,
    /// Completed successfully; results can be processed.
    Done,
}

impl JobState {
    /// Check if the job completed.
    pub fn is_done(&self) -> bool {
        matches!(self, JobState::Done)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Pending => write!(f, "Pending"),
            JobState::Done => write!(f, "Done"),
        }
    }
}
