use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser)]
#[command(about = "Local gateway emulating the provider's KV management API")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Serve the KV management API
    Serve {
        /// Path to the YAML configuration file
        #[arg(long, default_value = "localkv.yaml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        CliCommand::Serve { config: path } => {
            let config = match config::Config::from_file(&path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::error!(path = %path.display(), error = %err, "failed to load config");
                    process::exit(1);
                }
            };

            let stores = config.build_stores();
            let state = gateway::GatewayState::new(config.namespaces.clone(), stores);

            if let Err(err) = gateway::run(&config.listener, state).await {
                tracing::error!(error = %err, "gateway exited");
                process::exit(1);
            }
        }
    }
}
