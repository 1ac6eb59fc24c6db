//! Arvak Adapter for Qudora Cloud
//!
//! This crate provides a [`ServerHelper`] for submitting compiled QIR
//! programs to Qudora's trapped-ion systems through the Qudora Cloud REST API
//! (`https://api.qudora.com/jobs/`).
//!
//! # Job Flow
//!
//! 1. [`QudoraServerHelper::create_job`] turns a batch of base64 QIR bitcode
//!    kernels into one `QIR_BITCODE` job with per-circuit shot counts.
//! 2. The host posts it and polls
//!    `<url>?job_id=<id>&include_results=True` once per second.
//! 3. `Completed` responses carry one JSON histogram per circuit, translated
//!    into a [`SampleResult`](arvak_rest::SampleResult) in batch order.
//!    `Failed`, `Canceled`, `Cancelling` and `Deleted` end the job with an error.
//!
//! # Authentication
//!
//! Either set `CUDAQ_QUDORA_CREDENTIALS` to an API key, or write a credential
//! file (default `~/.qudora_config`, or the path in the `credentials`
//! option):
//!
//! ```text
//! key : <api key>
//! refresh : <refresh key>
//! time : <optional timestamp>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use arvak_rest::{BackendConfig, HelperRegistry, KernelExecution, RestExecutor};
//!
//! let mut registry = HelperRegistry::new();
//! arvak_adapter_qudora::register(&mut registry);
//!
//! let config = BackendConfig::new("qudora").with_option("machine", "QVLS-Q1");
//! let executor = RestExecutor::new(registry.create("qudora", config)?)?;
//!
//! let result = executor
//!     .execute(&[KernelExecution::new("bell", bitcode_base64, 1000)])
//!     .await?;
//! println!("{:?}", result.results()[0].counts.sorted());
//! ```

pub mod api;
pub mod credentials;
pub mod error;
mod helper;

pub use credentials::{
    CREDENTIALS_ENV_VAR, CredentialEnv, CredentialResolver, CredentialSource, Credentials,
    DEFAULT_CONFIG_FILE, FixedEnv, ProcessEnv, ResolvedCredentials,
};
pub use error::{QudoraError, QudoraResult};
pub use helper::{DEFAULT_BASE_URL, DEFAULT_MACHINE, HELPER_NAME, POLLING_INTERVAL, QudoraServerHelper};

// Re-export common types for convenience.
pub use arvak_rest::{BackendConfig, ServerHelper, ServerHelperFactory};

use arvak_rest::HelperRegistry;

/// Register the Qudora helper under [`HELPER_NAME`].
pub fn register(registry: &mut HelperRegistry) {
    registry.register::<QudoraServerHelper>(HELPER_NAME);
}
