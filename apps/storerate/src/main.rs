//! storerate command-line dashboard.
//!
//! ```bash
//! storerate init
//! storerate login --email admin@example.com --password 'Admin@1234'
//! storerate add-store --name "Fresh Mart" --address "12 Market St" --rating 4.2
//! storerate rate 1 4.5
//! storerate stats --json
//! ```
//!
//! Logs go to stderr and are filtered with `RUST_LOG`.

use clap::Parser;
use std::process::ExitCode;
use storerate::cli::{Cli, run};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "storerate=info,storerate_client=info,storerate_core=warn";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
