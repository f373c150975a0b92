//! Vigil CLI - vigil command

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use watcher::{ConsoleReporter, Engine};

/// Vigil - watch files and directories by polling their metadata
#[derive(Parser)]
#[command(name = "vigil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files or directories to watch
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Milliseconds to sleep between poll passes
    #[arg(long, default_value = "250")]
    interval: u64,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let reporter = if cli.no_color {
        ConsoleReporter::with_color(false)
    } else {
        ConsoleReporter::new()
    };

    let mut engine = Engine::new(reporter, Duration::from_millis(cli.interval));
    engine.register(&cli.paths);

    // Ctrl-C trips the stop handle; the loop exits at its next boundary.
    let handle = engine.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping");
            handle.stop();
        }
    });

    tokio::task::spawn_blocking(move || engine.run()).await?;

    Ok(())
}
