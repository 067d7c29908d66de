//! Depflow CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "depflow")]
#[command(about = "Cross-language dependency graphs for code repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Settings file (defaults to ./depflow.toml when present)
    #[arg(short, long, env = "DEPFLOW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },
    /// Compute one graph and print it as JSON
    Graph {
        /// Repository as owner/repo
        target: Option<String>,

        /// Branch to analyze
        #[arg(short, long)]
        branch: Option<String>,

        /// Analyze a local checkout instead of a hosted repository
        #[arg(long, conflicts_with = "target")]
        path: Option<PathBuf>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("depflow={}", log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Serve { port, host } => {
            let settings = commands::load_settings(cli.config.as_deref())?;
            commands::serve(settings, host, port).await
        }
        Commands::Graph { target, branch, path } => {
            let settings = commands::load_settings(cli.config.as_deref())?;
            commands::graph(settings, target, branch, path).await
        }
        Commands::Version => {
            println!("Depflow v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
