//! Daemon bootstrap orchestration.
//!
//! Startup is strictly staged: resolve configuration, install telemetry,
//! load the command table, then bind the acceptor pool. Any failure aborts
//! before the next stage; there is no partial startup.

use std::ffi::OsString;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use gantry_config::{Config, ConfigError, DaemonOptions};
use gantry_table::{CommandTable, TableError};

use crate::dispatch::DispatchConnectionHandler;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{AcceptorPool, ListenerError};

const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to resolve.
    #[error("failed to resolve configuration: {source}")]
    Configuration {
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        #[source]
        source: TelemetryError,
    },
    /// The command table could not be loaded.
    #[error("failed to load command table: {source}")]
    Table {
        #[source]
        source: TableError,
    },
}

/// A bootstrapped daemon ready to serve.
#[derive(Debug)]
pub struct Daemon {
    config: Config,
    table: CommandTable,
    #[expect(dead_code, reason = "held so telemetry lifetime matches the daemon's")]
    telemetry: TelemetryHandle,
}

impl Daemon {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Binds the listener and runs the worker pool.
    ///
    /// In normal operation this never returns: the pool has no shutdown
    /// signal and the daemon is expected to run until the host stops it.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the socket cannot be bound or the
    /// pool fails to start.
    pub fn serve(self) -> Result<(), ListenerError> {
        let (host, port) = self.config.listen_addr();
        let pool = AcceptorPool::bind(host, port)?;
        info!(
            target: BOOTSTRAP_TARGET,
            addr = %pool.local_addr(),
            form = %self.config.form,
            "dispatch server listening"
        );
        let handler = Arc::new(DispatchConnectionHandler::new(&self.config, self.table));
        let handle = pool.start(handler, self.config.workers)?;
        handle.join()
    }
}

/// Bootstraps the daemon from parsed options and the process environment.
///
/// # Errors
///
/// Returns a [`BootstrapError`] naming the stage that failed.
pub fn bootstrap(options: DaemonOptions) -> Result<Daemon, BootstrapError> {
    bootstrap_stages(Config::resolve(options))
}

/// Bootstraps against an explicit `GANTRY_HOME` value, primarily for tests.
///
/// # Errors
///
/// See [`bootstrap`].
pub fn bootstrap_with_home(
    options: DaemonOptions,
    home: Option<OsString>,
) -> Result<Daemon, BootstrapError> {
    bootstrap_stages(Config::resolve_with_home(options, home))
}

fn bootstrap_stages(config: Result<Config, ConfigError>) -> Result<Daemon, BootstrapError> {
    let config = config.map_err(|source| BootstrapError::Configuration { source })?;

    let telemetry = telemetry::initialise(&config)
        .map_err(|source| BootstrapError::Telemetry { source })?;

    let parsed = CommandTable::load(&config.layout)
        .map_err(|source| BootstrapError::Table { source })?;
    for line in &parsed.invalid {
        warn!(
            target: BOOTSTRAP_TARGET,
            line = line.number,
            text = %line.text,
            "ignoring invalid definitions line"
        );
    }
    info!(
        target: BOOTSTRAP_TARGET,
        commands = parsed.table.len(),
        root = %config.layout.root(),
        "command table loaded"
    );

    Ok(Daemon {
        config,
        table: parsed.table,
        telemetry,
    })
}
