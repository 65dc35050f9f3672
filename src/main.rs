mod config;
mod db;
mod models;
mod remote;
mod server;
mod ui;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Track who owes what: a small client ledger with an HTTP API and a terminal front end.
#[derive(Parser)]
#[command(name = "client-ledger", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve {
        /// Port to listen on, overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Open the terminal front end
    Tui {
        /// Base URL of the API, overrides API_URL
        #[arg(long)]
        api_url: Option<String>,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::init()?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            tracing_subscriber::fmt().with_env_filter(env_filter()).init();

            if let Some(port) = port {
                config.port = port;
            }
            server::start_server(&config).await?;
        }
        Command::Tui { api_url } => {
            // The terminal belongs to the UI, so logs go to a file.
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .init();

            if let Some(api_url) = api_url {
                config.api_url = api_url;
            }
            ui::run(&config).await?;
        }
    }

    Ok(())
}
