//! Binary entrypoint for the link-setup tool.
//!
//! Reads `<root>/commands` and materialises `<root>/links/<name>` symlinks
//! for every valid entry. Invalid definitions lines are reported and
//! skipped; filesystem failures and a missing installation root abort with
//! a non-zero status.

use std::process::ExitCode;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gantry_config::InstallLayout;
use gantry_links::materialise_links;
use gantry_table::CommandTable;

fn main() -> ExitCode {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let layout = match InstallLayout::from_env() {
        Ok(layout) => layout,
        Err(error) => {
            eprintln!("gantry-linkset: {error}");
            return ExitCode::FAILURE;
        }
    };

    let parsed = match CommandTable::load(&layout) {
        Ok(parsed) => parsed,
        Err(error) => {
            eprintln!("gantry-linkset: {error}");
            return ExitCode::FAILURE;
        }
    };
    for line in &parsed.invalid {
        warn!(line = line.number, text = %line.text, "invalid definitions line");
    }

    match materialise_links(&layout, &parsed.table) {
        Ok(report) => {
            info!(
                created = report.created,
                replaced = report.replaced,
                links = %layout.links_dir(),
                "command links materialised"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("gantry-linkset: {error}");
            ExitCode::FAILURE
        }
    }
}
