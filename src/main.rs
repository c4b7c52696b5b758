mod cli;

use std::{fs::File, path::Path, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nexstock::{ClientConfig, Dashboard, ViewConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{app::App, list::ListArgs};

/// Inventory dashboard for a NexStock REST backend.
#[derive(Debug, Parser)]
#[command(name = "nexstock", version, about)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "NEXSTOCK_API_URL", default_value = "http://localhost:3000", global = true)]
    api_url: String,

    /// Per-request timeout
    #[arg(long, default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// Rows per page; defaults to 10 for products and 5 for orders and customers
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Quiet period before a search term is applied
    #[arg(long, default_value_t = 500, global = true)]
    debounce_ms: u64,

    /// Append logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, env = "NEXSTOCK_LOG", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal dashboard (default)
    Tui,
    /// Print one page of a collection and exit
    List(ListArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);

    // stderr would tear the alternate screen, so the TUI only logs to a file
    init_tracing(cli.log_file.as_deref(), matches!(command, Command::List(_)))?;

    let client_config =
        ClientConfig::new(&cli.api_url).timeout(Duration::from_secs(cli.timeout_secs));
    let view_config = ViewConfig::default().debounce(Duration::from_millis(cli.debounce_ms));
    let dashboard = Dashboard::connect(client_config, view_config)
        .with_context(|| format!("invalid backend url '{}'", cli.api_url))?;
    info!(api = %dashboard.api().base_url(), "dashboard configured");

    match command {
        Command::Tui => App::new(dashboard, cli.page_size).run().await,
        Command::List(args) => {
            let table = cli::list::run(&dashboard, &args, cli.page_size).await?;
            print!("{table}");
            Ok(())
        }
    }
}

fn init_tracing(log_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nexstock=info"));

    if let Some(path) = log_file {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else if to_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}
