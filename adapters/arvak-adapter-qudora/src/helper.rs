//! Qudora server helper.
//!
//! Maps the host job lifecycle onto Qudora Cloud's REST schema: one QIR
//! bitcode job per batch, bearer-token authentication, status polling once
//! per second, and one flat histogram per circuit in the result.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, instrument};

use arvak_rest::{
    BackendConfig, JobId, JobState, KernelExecution, RestError, RestHeaders, RestResult,
    SampleResult, ServerHelper, ServerHelperFactory, ServerJobPayload,
};

use crate::api::{self, JobRequest, QudoraStatus};
use crate::credentials::{CredentialEnv, CredentialResolver, ResolvedCredentials};
use crate::error::{QudoraError, QudoraResult};

/// Name the helper is registered under.
pub const HELPER_NAME: &str = "qudora";

/// Default jobs endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.qudora.com/jobs/";

/// Default target device.
pub const DEFAULT_MACHINE: &str = "QVLS-Q1";

/// Interval between status requests.
pub const POLLING_INTERVAL: Duration = Duration::from_secs(1);

/// Prefix of every submitted job name.
const JOB_NAME_PREFIX: &str = "CUDA-Q ";

/// Server helper for Qudora Cloud.
///
/// Recognized options: `machine` (target device, default `QVLS-Q1`), `url`
/// (jobs endpoint, normalized to end in `/`) and `credentials` (path to a
/// credential file). Configuration is fixed at construction; credentials are
/// resolved again on every call that needs them.
///
/// # Example
///
/// ```ignore
/// use arvak_adapter_qudora::QudoraServerHelper;
/// use arvak_rest::{BackendConfig, KernelExecution, ServerHelper, ServerHelperFactory};
///
/// let helper = QudoraServerHelper::from_config(
///     BackendConfig::new("qudora").with_option("machine", "QVLS-Q1"),
/// )?;
///
/// let payload = helper.create_job(&[KernelExecution::new("bell", bitcode, 100)])?;
/// assert_eq!(payload.messages.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct QudoraServerHelper {
    config: BackendConfig,
    base_url: String,
    machine: String,
    resolver: CredentialResolver,
}

impl QudoraServerHelper {
    /// Create a helper with default settings.
    pub fn new() -> Self {
        Self::from_config_impl(BackendConfig::new(HELPER_NAME))
    }

    fn from_config_impl(config: BackendConfig) -> Self {
        let machine = config
            .get_non_empty("machine")
            .unwrap_or(DEFAULT_MACHINE)
            .to_string();

        let mut base_url = config
            .get_non_empty("url")
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let resolver = CredentialResolver::new(config.get("credentials").map(String::from));

        debug!("Initialized Qudora helper: machine={}, url={}", machine, base_url);

        Self {
            config,
            base_url,
            machine,
            resolver,
        }
    }

    /// Replace the environment used for credential lookups.
    pub fn with_credential_env(mut self, env: Arc<dyn CredentialEnv>) -> Self {
        self.resolver = self.resolver.with_env(env);
        self
    }

    /// Jobs endpoint, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Target device.
    pub fn machine(&self) -> &str {
        &self.machine
    }

    /// The configuration the helper was built from.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Resolve credentials now.
    pub fn resolve_credentials(&self) -> QudoraResult<ResolvedCredentials> {
        self.resolver.resolve()
    }

    /// Build the authentication and content headers.
    ///
    /// Resolves credentials on every call.
    pub fn request_headers(&self) -> QudoraResult<RestHeaders> {
        let resolved = self.resolve_credentials()?;
        Ok(RestHeaders::from([
            (
                "Authorization".to_string(),
                format!("Bearer {}", resolved.credentials.api_key),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Connection".to_string(), "keep-alive".to_string()),
            ("Accept".to_string(), "*/*".to_string()),
        ]))
    }

    /// Build the submission body for a batch, in batch order.
    pub fn build_job_request(&self, kernels: &[KernelExecution]) -> RestResult<JobRequest> {
        let first = kernels.first().ok_or(RestError::EmptyBatch)?;

        let mut request = JobRequest::new(format!("{JOB_NAME_PREFIX}{}", first.name), &self.machine);
        for kernel in kernels {
            if kernel.shots == 0 {
                return Err(RestError::InvalidShots(format!(
                    "kernel '{}' requests 0 shots",
                    kernel.name
                )));
            }
            request.push_circuit(kernel.shots, kernel.code.as_str());
        }
        Ok(request)
    }
}

impl Default for QudoraServerHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerHelper for QudoraServerHelper {
    fn name(&self) -> &str {
        HELPER_NAME
    }

    fn headers(&self) -> RestResult<RestHeaders> {
        Ok(self.request_headers()?)
    }

    #[instrument(skip(self, kernels), fields(kernels = kernels.len()))]
    fn create_job(&self, kernels: &[KernelExecution]) -> RestResult<ServerJobPayload> {
        let request = self.build_job_request(kernels)?;
        let headers = self.request_headers()?;

        info!(
            "Created job payload for Qudora with {} circuits, language is QIR 1.0, targeting {}",
            request.num_circuits(),
            self.machine
        );

        Ok(ServerJobPayload {
            url: self.base_url.clone(),
            headers,
            messages: vec![serde_json::to_value(&request)?],
        })
    }

    fn extract_job_id(&self, post_response: &Value) -> RestResult<JobId> {
        if post_response.is_null() {
            return Err(RestError::UnexpectedResponse(
                "submission response is empty".into(),
            ));
        }
        // The service expects the id back exactly as it serialized it.
        let id = serde_json::to_string(post_response)?;
        debug!("Extracted job id {}", id);
        Ok(JobId::new(id))
    }

    fn job_path(&self, job_id: &JobId) -> String {
        format!("{}?job_id={}&include_results=True", self.base_url, job_id)
    }

    fn job_state(&self, get_response: &Value) -> RestResult<JobState> {
        let status = api::parse_status(get_response)?;
        debug!("Qudora job status: {}", status);

        match status {
            QudoraStatus::Failed => Err(QudoraError::JobFailed.into()),
            s if s.is_cancelled() => Err(QudoraError::JobCancelled(s.to_string()).into()),
            QudoraStatus::Completed => Ok(JobState::Done),
            _ => Ok(JobState::Pending),
        }
    }

    fn polling_interval(&self, _get_response: &Value) -> Duration {
        POLLING_INTERVAL
    }

    #[instrument(skip(self, get_response))]
    fn process_results(&self, get_response: &Value, job_id: &JobId) -> RestResult<SampleResult> {
        let result = api::parse_results(get_response)?;
        for (index, circuit) in result.results().iter().enumerate() {
            debug!(
                "Circuit {} of job {}: {} outcomes, {} shots",
                index,
                job_id,
                circuit.counts.len(),
                circuit.counts.total_shots()
            );
        }
        Ok(result)
    }
}

impl ServerHelperFactory for QudoraServerHelper {
    fn from_config(config: BackendConfig) -> RestResult<Self> {
        Ok(Self::from_config_impl(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::FixedEnv;
    use serde_json::json;

    fn helper_with_token(config: BackendConfig, token: &str) -> QudoraServerHelper {
        QudoraServerHelper::from_config(config)
            .unwrap()
            .with_credential_env(Arc::new(FixedEnv::new().with_inline_credentials(token)))
    }

    fn default_helper() -> QudoraServerHelper {
        helper_with_token(BackendConfig::new(HELPER_NAME), "test-token")
    }

    #[test]
    fn test_from_config_defaults() {
        let helper = QudoraServerHelper::from_config(BackendConfig::new(HELPER_NAME)).unwrap();
        assert_eq!(helper.name(), "qudora");
        assert_eq!(helper.machine(), DEFAULT_MACHINE);
        assert_eq!(helper.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_config_overrides() {
        let config = BackendConfig::new(HELPER_NAME)
            .with_option("machine", "QVLS-Q2")
            .with_option("url", "http://localhost:8100/jobs");
        let helper = QudoraServerHelper::from_config(config).unwrap();

        assert_eq!(helper.machine(), "QVLS-Q2");
        assert_eq!(helper.base_url(), "http://localhost:8100/jobs/");
    }

    #[test]
    fn test_url_with_trailing_slash_unchanged() {
        let config = BackendConfig::new(HELPER_NAME).with_option("url", "http://host/jobs/");
        let helper = QudoraServerHelper::from_config(config).unwrap();
        assert_eq!(helper.base_url(), "http://host/jobs/");
    }

    #[test]
    fn test_headers() {
        let headers = default_helper().headers().unwrap();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers["Authorization"], "Bearer test-token");
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["Connection"], "keep-alive");
        assert_eq!(headers["Accept"], "*/*");
    }

    #[test]
    fn test_headers_without_credentials() {
        let home = tempfile::tempdir().unwrap();
        let helper = QudoraServerHelper::new()
            .with_credential_env(Arc::new(FixedEnv::new().with_home_dir(home.path())));

        let err = helper.headers().unwrap_err();
        assert!(matches!(err, RestError::ConfigNotFound(_)));
    }

    #[test]
    fn test_headers_from_user_specified_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qudora_creds");
        std::fs::write(&path, "key : file-key\nrefresh : file-refresh\n").unwrap();

        let config = BackendConfig::new(HELPER_NAME)
            .with_option("credentials", path.to_str().unwrap());
        let helper = QudoraServerHelper::from_config(config)
            .unwrap()
            .with_credential_env(Arc::new(FixedEnv::new()));

        assert_eq!(helper.headers().unwrap()["Authorization"], "Bearer file-key");
    }

    #[test]
    fn test_create_job_single_circuit() {
        let config = BackendConfig::new(HELPER_NAME).with_option("url", "https://api.qudora.com/jobs/");
        let helper = helper_with_token(config, "tok");

        let payload = helper
            .create_job(&[KernelExecution::new("bell", "QklUQ09ERQ==", 100)])
            .unwrap();

        assert_eq!(payload.url, "https://api.qudora.com/jobs/");
        assert_eq!(payload.headers["Authorization"], "Bearer tok");
        assert_eq!(
            payload.messages,
            vec![json!({
                "name": "CUDA-Q bell",
                "language": "QIR_BITCODE",
                "shots": [100],
                "target": "QVLS-Q1",
                "input_data": ["QklUQ09ERQ=="],
                "backend_settings": null,
            })]
        );
    }

    #[test]
    fn test_create_job_preserves_batch_order() {
        let kernels = vec![
            KernelExecution::new("first", "code-a", 10),
            KernelExecution::new("second", "code-b", 20),
            KernelExecution::new("third", "code-c", 30),
        ];

        let payload = default_helper().create_job(&kernels).unwrap();
        assert_eq!(payload.messages.len(), 1);

        let message = &payload.messages[0];
        assert_eq!(message["name"], "CUDA-Q first");
        assert_eq!(message["shots"], json!([10, 20, 30]));
        assert_eq!(message["input_data"], json!(["code-a", "code-b", "code-c"]));
    }

    #[test]
    fn test_create_job_empty_batch() {
        let err = default_helper().create_job(&[]).unwrap_err();
        assert!(matches!(err, RestError::EmptyBatch));
    }

    #[test]
    fn test_create_job_zero_shots() {
        let kernels = vec![
            KernelExecution::new("ok", "a", 10),
            KernelExecution::new("bad", "b", 0),
        ];
        let err = default_helper().create_job(&kernels).unwrap_err();
        assert!(matches!(err, RestError::InvalidShots(msg) if msg.contains("bad")));
    }

    #[test]
    fn test_create_job_requires_credentials() {
        let helper = QudoraServerHelper::new().with_credential_env(Arc::new(FixedEnv::new()));
        let err = helper
            .create_job(&[KernelExecution::new("bell", "x", 1)])
            .unwrap_err();
        assert!(matches!(err, RestError::ConfigNotFound(_)));
    }

    #[test]
    fn test_extract_job_id_keeps_json_encoding() {
        let helper = default_helper();
        let id = helper.extract_job_id(&json!("4f1c")).unwrap();
        assert_eq!(id.as_str(), "\"4f1c\"");

        let id = helper.extract_job_id(&json!(42)).unwrap();
        assert_eq!(id.as_str(), "42");

        assert!(helper.extract_job_id(&Value::Null).is_err());
    }

    #[test]
    fn test_job_path() {
        let helper = default_helper();
        assert_eq!(
            helper.job_path(&JobId::new("abc")),
            "https://api.qudora.com/jobs/?job_id=abc&include_results=True"
        );
        assert_eq!(
            helper.job_path_from_response(&json!("abc")).unwrap(),
            "https://api.qudora.com/jobs/?job_id=\"abc\"&include_results=True"
        );
    }

    #[test]
    fn test_job_state_pending() {
        let helper = default_helper();
        for status in ["Created", "Queued", "Running", "SomethingNew"] {
            let state = helper.job_state(&json!([{"status": status}])).unwrap();
            assert_eq!(state, JobState::Pending, "{status}");
        }
    }

    #[test]
    fn test_job_state_completed() {
        let state = default_helper()
            .job_state(&json!([{"status": "Completed", "result": []}]))
            .unwrap();
        assert_eq!(state, JobState::Done);
    }

    #[test]
    fn test_job_state_failed() {
        let err = default_helper()
            .job_state(&json!([{"status": "Failed"}]))
            .unwrap_err();
        assert!(matches!(err, RestError::JobFailed(_)));
    }

    #[test]
    fn test_job_state_cancelled() {
        let helper = default_helper();
        for status in ["Canceled", "Deleted", "Cancelling"] {
            let err = helper.job_state(&json!([{"status": status}])).unwrap_err();
            assert!(matches!(err, RestError::JobCancelled(ref s) if s == status), "{status}");
        }
    }

    #[test]
    fn test_job_state_malformed() {
        let err = default_helper().job_state(&json!({})).unwrap_err();
        assert!(matches!(err, RestError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_polling_interval_is_fixed() {
        let helper = default_helper();
        assert_eq!(
            helper.polling_interval(&json!([{"status": "Running"}])),
            Duration::from_secs(1)
        );
        assert_eq!(helper.polling_interval(&Value::Null), Duration::from_secs(1));
    }

    #[test]
    fn test_process_results() {
        let response = json!([{"status": "Completed", "result": ["{\"00\":50,\"11\":50}"]}]);
        let result = default_helper()
            .process_results(&response, &JobId::new("job"))
            .unwrap();

        assert_eq!(result.len(), 1);
        let register = &result.results()[0];
        assert_eq!(register.register, "__global__");
        assert_eq!(register.counts.len(), 2);
        assert_eq!(register.counts.get("00"), Some(50));
        assert_eq!(register.counts.get("11"), Some(50));
    }

    #[test]
    fn test_process_results_discards_batch_on_bad_entry() {
        let response = json!([{"status": "Completed", "result": ["{\"0\":1}", "{oops"]}]);
        let err = default_helper()
            .process_results(&response, &JobId::new("job"))
            .unwrap_err();
        assert!(matches!(err, RestError::ResultParse(_)));
    }
}
