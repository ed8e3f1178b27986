//! Game-analysis server and its worker process.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use minimax_server::config::Config;
use minimax_server::{server, worker};

#[derive(Parser)]
#[clap(name = "minimax-server")]
#[clap(about = "Tic-tac-toe and connect-four analysis over WebSocket and HTTP")]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the server (default)
    Serve {
        /// Interface to bind, overrides MINIMAX_BIND_ADDR
        #[clap(long)]
        bind: Option<String>,

        /// Port to listen on, overrides MINIMAX_PORT
        #[clap(short, long)]
        port: Option<u16>,
    },

    /// Run one analysis: job on stdin, report on stdout
    Worker,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; a worker's stdout is its report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("minimax_server=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Command::Worker) => worker::run_worker(),
        Some(Command::Serve { bind, port }) => serve(bind, port),
        None => serve(None, None),
    }
}

fn serve(bind: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }
    if let Some(port) = port {
        config.port = port;
    }

    info!(
        "Starting minimax-server on {}:{} (worker_limit = {}, session_limit = {})",
        config.bind_addr, config.port, config.worker_limit, config.session_limit
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::run(config))
}
