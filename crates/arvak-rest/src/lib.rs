//! Arvak REST server-helper layer
//!
//! This crate provides the host side of job execution on remote quantum
//! services that speak HTTP/JSON: a vendor-neutral [`ServerHelper`] trait,
//! an explicit [`HelperRegistry`], uniform results via [`SampleResult`] and
//! [`Counts`], and a [`RestExecutor`] that runs the submit → poll → result
//! loop with `reqwest`.
//!
//! # Overview
//!
//! Helpers translate between the host's [`KernelExecution`] batches and a
//! vendor's JSON schema. They never perform network I/O; the executor (or
//! any other host runtime) owns the transport and the polling loop.
//!
//! # Supported Helpers
//!
//! | Service | Crate | Authentication |
//! |---------|-------|----------------|
//! | Qudora Cloud | `arvak-adapter-qudora` | `CUDAQ_QUDORA_CREDENTIALS` env var or `~/.qudora_config` |
//!
//! # Example: Running a Batch
//!
//! ```ignore
//! use arvak_rest::{BackendConfig, HelperRegistry, KernelExecution, RestExecutor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut registry = HelperRegistry::new();
//!     arvak_adapter_qudora::register(&mut registry);
//!
//!     let helper = registry.create("qudora", BackendConfig::new("qudora"))?;
//!     let executor = RestExecutor::new(helper)?;
//!
//!     let kernels = vec![KernelExecution::new("bell", bitcode_base64, 100)];
//!     let result = executor.execute(&kernels).await?;
//!
//!     for (bitstring, count) in result.results()[0].counts.sorted() {
//!         println!("{bitstring}: {count}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod helper;
pub mod job;
pub mod registry;
pub mod result;

pub use config::BackendConfig;
pub use error::{RestError, RestResult};
pub use executor::RestExecutor;
pub use helper::{KernelExecution, RestHeaders, ServerHelper, ServerHelperFactory, ServerJobPayload};
pub use job::{JobId, JobState};
pub use registry::HelperRegistry;
pub use result::{Counts, ExecutionResult, GLOBAL_REGISTER_NAME, SampleResult};
