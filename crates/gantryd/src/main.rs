//! Binary entrypoint for the gantry dispatch daemon.

use std::process::ExitCode;

use clap::Parser;

use gantry_config::DaemonOptions;

fn main() -> ExitCode {
    let options = DaemonOptions::parse();
    let daemon = match gantryd::bootstrap(options) {
        Ok(daemon) => daemon,
        Err(error) => {
            eprintln!("gantryd: {error}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(error) = daemon.serve() {
        eprintln!("gantryd: {error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
