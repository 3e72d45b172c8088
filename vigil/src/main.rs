use std::process::ExitCode;

use args::{Args, Command};
use clap::Parser;
use config::TelemetryConfig;

mod args;
mod commands;
mod logger;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    logger::init(&args.log_filter);

    match run(args.command, &TelemetryConfig::from_env()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &TelemetryConfig) -> anyhow::Result<()> {
    // Every command talks to the collector, and the collector rejects
    // unauthenticated requests; fail before going on the network.
    if config.api_key.is_none() {
        anyhow::bail!("no API key configured, set VIGIL_API_KEY and retry");
    }

    match command {
        Command::Doctor => commands::doctor(config).await,
        Command::Mock => commands::mock(config).await,
        Command::Ping => commands::ping(config).await,
    }
}
