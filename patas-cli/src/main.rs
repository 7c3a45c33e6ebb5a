//! patas - Patas Unidas developer CLI
//!
//! Drives the same view-models as the mobile app against the real backend (or
//! a local one), keeping the session in a directory on disk.
//!
//! ```bash
//! patas login --email ana@x.com            # password from PATAS_PASSWORD
//! patas feed --lat -19.747 --long -47.939
//! patas animal show 12 --lat -19.747 --long -47.939
//! patas --base-url http://localhost:8080 whoami
//! ```

mod cli;
mod commands;

use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};
use patas_core::storage::{FileKeyValueStore, SESSION_NAMESPACE};
use patas_core::{AppContext, ClientConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Routes `log` records from the SDK and `tracing` events to stderr.
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,patas_core=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing_log::LogTracer::init().ok();
    }
}

fn open_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = cli.resolve_data_dir()?;
    let store = FileKeyValueStore::open(&data_dir, SESSION_NAMESPACE)
        .wrap_err_with(|| format!("failed to open session store in {}", data_dir.display()))?;
    tracing::debug!("session store at {}", store.path().display());

    let config = ClientConfig {
        base_url: cli.base_url.clone(),
        timeout_secs: cli.timeout,
        user_agent: Some(format!("patas-cli/{}", env!("CARGO_PKG_VERSION"))),
    };
    AppContext::start(config, Arc::new(store)).wrap_err("failed to start the client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = open_context(&cli)?;
    tracing::debug!("starting at the {} screen", ctx.initial_route());
    commands::run(ctx, cli.command).await
}
