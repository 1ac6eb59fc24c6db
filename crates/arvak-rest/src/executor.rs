//! Host-side job loop over HTTP.
//!
//! [`RestExecutor`] drives a [`ServerHelper`] through a full job: it posts the
//! payloads the helper builds, polls the status endpoint at the interval the
//! helper recommends, and hands the terminal response back for translation.
//! Failed requests are reported immediately; nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument};

use crate::error::{RestError, RestResult};
use crate::helper::{KernelExecution, RestHeaders, ServerHelper};
use crate::job::{JobId, JobState};
use crate::result::SampleResult;

/// Per-request HTTP timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs batches of kernels against a remote service through a helper.
pub struct RestExecutor {
    client: Client,
    helper: Arc<dyn ServerHelper>,
    /// Overall limit on waiting for one job; unlimited when `None`.
    timeout: Option<Duration>,
}

impl RestExecutor {
    /// Create an executor with a default HTTP client.
    pub fn new(helper: Arc<dyn ServerHelper>) -> RestResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, helper))
    }

    /// Create an executor with a caller-provided HTTP client.
    pub fn with_client(client: Client, helper: Arc<dyn ServerHelper>) -> Self {
        Self {
            client,
            helper,
            timeout: None,
        }
    }

    /// Give up waiting on a job after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The helper this executor drives.
    pub fn helper(&self) -> &dyn ServerHelper {
        self.helper.as_ref()
    }

    /// Submit a batch, wait for every job, and return one result per kernel.
    #[instrument(skip(self, kernels), fields(helper = self.helper.name(), kernels = kernels.len()))]
    pub async fn execute(&self, kernels: &[KernelExecution]) -> RestResult<SampleResult> {
        let job_ids = self.submit(kernels).await?;

        let mut results = SampleResult::default();
        for job_id in &job_ids {
            results.extend(self.wait(job_id).await?);
        }

        if results.len() != kernels.len() {
            return Err(RestError::ResultParse(format!(
                "expected {} circuit results, got {}",
                kernels.len(),
                results.len()
            )));
        }

        Ok(results)
    }

    /// Post the payloads for a batch and return the created job ids in order.
    #[instrument(skip(self, kernels))]
    pub async fn submit(&self, kernels: &[KernelExecution]) -> RestResult<Vec<JobId>> {
        let payload = self.helper.create_job(kernels)?;
        let headers = header_map(&payload.headers)?;

        let mut job_ids = Vec::with_capacity(payload.messages.len());
        for message in &payload.messages {
            debug!("Posting job to {}", payload.url);
            let response = self
                .client
                .post(&payload.url)
                .headers(headers.clone())
                .body(serde_json::to_vec(message)?)
                .send()
                .await?;
            let body = read_json(response).await?;
            let job_id = self.helper.extract_job_id(&body)?;
            info!("Job submitted: {}", job_id);
            job_ids.push(job_id);
        }

        Ok(job_ids)
    }

    /// Query a job once.
    ///
    /// Returns the interpreted state together with the raw response so a
    /// `Done` response can be translated without another request.
    #[instrument(skip(self))]
    pub async fn poll(&self, job_id: &JobId) -> RestResult<(JobState, Value)> {
        let url = self.helper.job_path(job_id);
        let headers = header_map(&self.helper.headers()?)?;

        debug!("Getting job status from {}", url);
        let response = self.client.get(&url).headers(headers).send().await?;
        let body = read_json(response).await?;
        let state = self.helper.job_state(&body)?;
        Ok((state, body))
    }

    /// Poll a job until it completes and translate its results.
    #[instrument(skip(self))]
    pub async fn wait(&self, job_id: &JobId) -> RestResult<SampleResult> {
        let deadline = self.timeout.map(|t| Instant::now() + t);

        loop {
            let (state, body) = self.poll(job_id).await?;
            if state.is_done() {
                info!("Job completed: {}", job_id);
                return self.helper.process_results(&body, job_id);
            }

            let interval = self.helper.polling_interval(&body);
            if let Some(deadline) = deadline {
                if Instant::now() + interval > deadline {
                    return Err(RestError::Timeout(job_id.to_string()));
                }
            }
            debug!("Job {} pending, next poll in {:?}", job_id, interval);
            sleep(interval).await;
        }
    }
}

/// Convert helper headers into a `reqwest` header map.
fn header_map(headers: &RestHeaders) -> RestResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            RestError::Configuration(format!("Invalid header name '{name}': {e}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            RestError::Configuration(format!("Invalid value for header '{name}': {e}"))
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

async fn read_json(response: reqwest::Response) -> RestResult<Value> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(RestError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map() {
        let headers: RestHeaders = [
            ("Authorization".to_string(), "Bearer abc".to_string()),
            ("Accept".to_string(), "*/*".to_string()),
        ]
        .into_iter()
        .collect();

        let map = header_map(&headers).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("authorization").unwrap(), "Bearer abc");
        assert_eq!(map.get("accept").unwrap(), "*/*");
    }

    #[test]
    fn test_header_map_rejects_invalid_value() {
        let headers: RestHeaders = [("Authorization".to_string(), "Bearer a\nb".to_string())]
            .into_iter()
            .collect();

        let err = header_map(&headers).unwrap_err();
        assert!(matches!(err, RestError::Configuration(msg) if msg.contains("Authorization")));
    }

    #[test]
    fn test_header_map_rejects_invalid_name() {
        let headers: RestHeaders = [("Bad Header".to_string(), "x".to_string())]
            .into_iter()
            .collect();

        assert!(header_map(&headers).is_err());
    }
}
