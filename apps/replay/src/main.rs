use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{AppStores, NoopBackend};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod replay;

use config::load_settings;

/// Replays a newline-delimited backend event log through the frontend
/// reconciliation layer and reports the resulting state.
#[derive(Parser, Debug)]
struct Args {
    /// Event log to replay; `-` or omitted reads stdin.
    #[arg(long)]
    events: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the final store snapshot as JSON.
    #[arg(long)]
    print_state: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match args.events.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open event log '{}'", path.display()))?;
            Box::new(BufReader::new(file))
        }
        _ => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let stores = AppStores::new();
    let summary = replay::replay(reader, &settings, stores.clone(), Arc::new(NoopBackend)).await?;

    info!(
        lines = summary.lines,
        emitted = summary.emitted,
        malformed = summary.malformed,
        applied = summary.dispatch.applied,
        stale = summary.dispatch.stale,
        unknown = summary.dispatch.unknown,
        failed = summary.dispatch.failed,
        "replay finished"
    );

    if args.print_state || settings.print_state {
        let snapshot = stores.snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}
