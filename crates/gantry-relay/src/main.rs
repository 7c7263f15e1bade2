//! Binary entrypoint for the telemetry relay.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gantry_relay::{
    DEFAULT_DESTINATION, DEFAULT_FIELD, DEFAULT_SERIES, LineProtocol, bind_socket, relay,
    resolve_destination,
};

/// Command-line interface for the stdin→UDP line-protocol relay.
#[derive(Parser, Debug)]
#[command(name = "gantry-relay", disable_help_subcommand = true)]
struct RelayOptions {
    /// Series name for forwarded lines.
    #[arg(long, default_value = DEFAULT_SERIES)]
    series: String,
    /// Field name for forwarded lines.
    #[arg(long, default_value = DEFAULT_FIELD)]
    field: String,
    /// Destination `host:port` of the database's UDP listener.
    #[arg(value_name = "HOST:PORT", default_value = DEFAULT_DESTINATION)]
    destination: String,
}

fn main() -> ExitCode {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();

    let options = RelayOptions::parse();
    let protocol = LineProtocol::new(options.series, options.field);

    let run = || {
        let destination = resolve_destination(&options.destination)?;
        let socket = bind_socket()?;
        relay(io::stdin().lock(), &socket, destination, &protocol)
    };
    match run() {
        Ok(stats) => {
            info!(sent = stats.sent, failed = stats.failed, "relay finished");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("gantry-relay: {error}");
            ExitCode::FAILURE
        }
    }
}
