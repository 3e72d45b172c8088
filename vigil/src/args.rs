use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vigil", about = "Diagnostics for the Vigil telemetry collector", version)]
pub struct Args {
    /// Log filter, e.g. `info` or `vigil=debug`.
    #[arg(long = "log", env = "VIGIL_LOG", default_value = "info")]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check the API key and collector connectivity, with advice on failure.
    Doctor,
    /// Send a realistic sample event to verify the ingestion path end to end.
    Mock,
    /// Send a minimal event and exit non-zero if the collector refuses it.
    Ping,
}
