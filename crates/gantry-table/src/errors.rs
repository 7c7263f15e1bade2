//! Error types for command-table construction and resolution.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced while loading or querying the command table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The definitions file could not be read.
    #[error("failed to read command definitions at {path}: {source}")]
    ReadDefinitions {
        /// Definitions file path.
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// No entry exists for the requested command name.
    #[error("unknown command '{name}'")]
    UnknownCommand {
        /// The name that failed to resolve.
        name: String,
    },
}

impl TableError {
    /// Creates a read error for the given definitions path.
    pub fn read_definitions(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::ReadDefinitions {
            path: path.into(),
            source,
        }
    }

    /// Creates an unknown-command error.
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }
}
