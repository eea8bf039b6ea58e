//! mathlock-rest: REST API demo for Math-Lock FHE
//!
//! Encrypts two numbers, runs all four operations over the ciphertexts,
//! decrypts the results and then times a batch of multiplications.

use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mathlock::config::ConfigFile;
use mathlock::rest::{run_perf_test, run_test, MathLockClient, DEFAULT_PERF_ITERATIONS};

#[derive(Parser)]
#[command(name = "mathlock-rest")]
#[command(about = "Math-Lock FHE REST API demo")]
#[command(version)]
struct Args {
    /// JSON config file (optional `rest` section)
    #[arg(long)]
    config: Option<PathBuf>,

    /// API base URL without port, e.g. https://math-lock.com
    #[arg(long, env = "MATHLOCK_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "MATHLOCK_PORT")]
    port: Option<u16>,

    /// Explicit Host header
    #[arg(long)]
    host_header: Option<String>,

    /// Don't send a Host header override
    #[arg(long, conflicts_with = "host_header")]
    no_host_header: bool,

    /// Multiplications in the latency loop
    #[arg(long, default_value_t = DEFAULT_PERF_ITERATIONS)]
    iterations: u32,

    /// Skip the latency loop
    #[arg(long)]
    skip_perf: bool,

    /// First operand
    #[arg(default_value = "15.5", allow_negative_numbers = true)]
    num1: String,

    /// Second operand
    #[arg(default_value = "-89.56544", allow_negative_numbers = true)]
    num2: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut rest = ConfigFile::load_or_default(args.config.as_deref())
        .with_context(|| "Failed to load config file")?
        .rest;
    if let Some(base_url) = args.base_url {
        rest.base_url = base_url;
    }
    if let Some(port) = args.port {
        rest.port = port;
    }
    if args.host_header.is_some() {
        rest.host_header = args.host_header;
    }
    if args.no_host_header {
        rest.host_header = None;
    }

    info!("Math-Lock REST demo");
    info!("Endpoint: {}", rest.endpoint(""));

    let client = MathLockClient::new(rest);

    run_test(&client, &args.num1, &args.num2)
        .await
        .with_context(|| "REST demo failed")?;

    if args.skip_perf {
        return Ok(());
    }

    println!();
    println!(
        "Running simple perf test: {} POST requests for multiplication.",
        args.iterations
    );
    println!("This measures REST round trips (network, serialization), not the scheme itself.");

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Multiplying...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = run_perf_test(&client, &args.num1, &args.num2, args.iterations)
        .await
        .with_context(|| "REST perf test failed")?;

    pb.finish_and_clear();
    info!(
        "Average latency: {:.2?}",
        report.elapsed / report.iterations.max(1)
    );

    Ok(())
}
