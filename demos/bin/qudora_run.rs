//! Qudora Job Runner
//!
//! Submits base64-encoded QIR bitcode files to Qudora Cloud as one batch and
//! prints the measured histograms.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arvak_adapter_qudora::{DEFAULT_BASE_URL, DEFAULT_MACHINE, HELPER_NAME};
use arvak_demos::{print_header, print_result, print_sample_result, print_section, print_success};
use arvak_rest::{BackendConfig, HelperRegistry, KernelExecution, RestExecutor};

#[derive(Parser, Debug)]
#[command(name = "qudora-run")]
#[command(about = "Run QIR bitcode on Qudora Cloud")]
struct Args {
    /// Files holding base64-encoded QIR bitcode, one circuit each
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Shots per circuit
    #[arg(short, long, default_value = "1000")]
    shots: u32,

    /// Target device
    #[arg(short, long, default_value = DEFAULT_MACHINE)]
    machine: String,

    /// Jobs endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Credential file (overridden by CUDAQ_QUDORA_CREDENTIALS)
    #[arg(long)]
    credentials: Option<String>,

    /// Give up waiting after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Outcomes to print per circuit
    #[arg(long, default_value = "16")]
    top: usize,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Circuit name derived from the file stem.
fn kernel_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "kernel".to_string())
}

fn load_kernel(path: &Path, shots: u32) -> anyhow::Result<KernelExecution> {
    let code = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let code: String = code.split_whitespace().collect();
    if code.is_empty() {
        bail!("{} is empty", path.display());
    }
    Ok(KernelExecution::new(kernel_name(path), code, shots))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let kernels = args
        .inputs
        .iter()
        .map(|path| load_kernel(path, args.shots))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut config = BackendConfig::new(HELPER_NAME)
        .with_option("machine", &args.machine)
        .with_option("url", &args.url);
    if let Some(credentials) = &args.credentials {
        config = config.with_option("credentials", credentials);
    }

    let mut registry = HelperRegistry::new();
    arvak_adapter_qudora::register(&mut registry);
    let helper = registry.create(HELPER_NAME, config)?;

    let mut executor = RestExecutor::new(helper)?;
    if let Some(secs) = args.timeout {
        executor = executor.with_timeout(Duration::from_secs(secs));
    }

    print_header("Qudora Cloud Run");
    print_result("Machine", &args.machine);
    print_result("Endpoint", &args.url);
    print_result("Circuits", kernels.len());
    print_result("Shots per circuit", args.shots);

    info!("Submitting {} circuit(s)", kernels.len());
    let result = executor.execute(&kernels).await?;

    print_section("Results");
    let names: Vec<String> = kernels.iter().map(|k| k.name.clone()).collect();
    print_sample_result(&names, &result, args.top);

    println!();
    print_success(&format!("{} circuit(s) completed", result.len()));
    Ok(())
}
