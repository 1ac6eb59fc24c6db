//! Server helper trait and the request types it works with.
//!
//! A [`ServerHelper`] maps the host's job lifecycle onto one vendor's REST
//! schema. It performs no network I/O itself; the host (see
//! [`crate::executor::RestExecutor`]) posts the payloads it builds and feeds
//! the responses back:
//!
//! ```text
//!   create_job() ──→ POST ──→ extract_job_id() ──→ job_path()
//!                                                     │
//!        process_results() ←── Done ←── job_state() ←─┘ (GET, repeat
//!                                                         every polling_interval())
//! ```
//!
//! | Method | Returns |
//! |--------|---------|
//! | `name()` | `&str` |
//! | `headers()` | `RestResult<RestHeaders>` |
//! | `create_job()` | `RestResult<ServerJobPayload>` |
//! | `extract_job_id()` | `RestResult<JobId>` |
//! | `job_path()` | `String` |
//! | `job_state()` | `RestResult<JobState>` |
//! | `polling_interval()` | `Duration` |
//! | `process_results()` | `RestResult<SampleResult>` |

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BackendConfig;
use crate::error::RestResult;
use crate::job::{JobId, JobState};
use crate::result::SampleResult;

/// HTTP headers as name → value.
pub type RestHeaders = BTreeMap<String, String>;

/// One compiled circuit to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelExecution {
    /// Kernel name.
    pub name: String,
    /// Compiled program, opaque to the helper layer.
    pub code: String,
    /// Number of shots.
    pub shots: u32,
}

impl KernelExecution {
    /// Create a new kernel execution request.
    pub fn new(name: impl Into<String>, code: impl Into<String>, shots: u32) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            shots,
        }
    }
}

/// Everything the host needs to submit a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerJobPayload {
    /// Endpoint to POST each message to.
    pub url: String,
    /// Headers for the POST requests.
    pub headers: RestHeaders,
    /// Request bodies, each submitted as its own job.
    pub messages: Vec<Value>,
}

/// Trait for vendor-specific REST server helpers.
///
/// All methods are synchronous and side-effect free apart from credential
/// lookups, so a helper can be shared across concurrent submissions.
pub trait ServerHelper: Send + Sync {
    /// Name the helper is registered under.
    fn name(&self) -> &str;

    /// Headers for status and result requests.
    fn headers(&self) -> RestResult<RestHeaders>;

    /// Build the submission payload for an ordered batch of kernels.
    fn create_job(&self, kernels: &[KernelExecution]) -> RestResult<ServerJobPayload>;

    /// Extract the job id from a submission response.
    fn extract_job_id(&self, post_response: &Value) -> RestResult<JobId>;

    /// URL to query the status (and results) of a job.
    fn job_path(&self, job_id: &JobId) -> String;

    /// URL to query the job created by a submission response.
    fn job_path_from_response(&self, post_response: &Value) -> RestResult<String> {
        let job_id = self.extract_job_id(post_response)?;
        Ok(self.job_path(&job_id))
    }

    /// Interpret a status response.
    ///
    /// Returns an error if the job reached a failed or cancelled state.
    fn job_state(&self, get_response: &Value) -> RestResult<JobState>;

    /// How long to wait before the next status request.
    fn polling_interval(&self, get_response: &Value) -> Duration;

    /// Convert a completed status response into measurement results.
    fn process_results(&self, get_response: &Value, job_id: &JobId) -> RestResult<SampleResult>;
}

/// Trait for creating helpers from configuration.
pub trait ServerHelperFactory: ServerHelper + Sized {
    /// Create and initialize a helper from configuration.
    fn from_config(config: BackendConfig) -> RestResult<Self>;
}
