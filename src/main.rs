use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use booking_stream_router::app::ports::SinkStatus;
use booking_stream_router::config::Config;
use booking_stream_router::{lambda, logging};

#[derive(Parser)]
#[command(name = "booking_stream_router")]
#[command(about = "Routes booking events from a Kinesis stream to an HTTP sink")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the Kinesis handler under the Lambda runtime (default)
    Lambda,
    /// Run one batch from a Kinesis event JSON file and print the response
    Replay {
        /// Path to a file shaped like {"Records": [...]}
        #[arg(long)]
        file: PathBuf,
    },
    /// Probe the configured sink and report its status
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Lambda) {
        Commands::Lambda => {
            lambda::run(config).await.map_err(|e| anyhow::anyhow!(e))?;
        }
        Commands::Replay { file } => {
            let batch = lambda::load_batch(&file)
                .with_context(|| format!("failed to load Kinesis event from {}", file.display()))?;
            let use_case = lambda::build_use_case(&config)?;
            match lambda::replay(&use_case, &batch).await {
                Ok(response) => println!("{}", response),
                Err(e) => {
                    error!("Replay failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Probe => {
            let status = lambda::probe(&config).await?;
            println!("{}", status);
            if status != SinkStatus::Up {
                bail!("sink is not usable: {}", status);
            }
        }
    }
    Ok(())
}
