//! Stdin→UDP line-protocol telemetry forwarding.
//!
//! Each input line becomes one datagram of the form
//! `<series> <field>="<value>"` aimed at the time-series database's UDP
//! listener. Delivery is fire-and-forget: a failed send is logged and
//! skipped, never retried, so a dead database can never stall the producer
//! feeding the relay.

use std::io::{self, BufRead};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use thiserror::Error;
use tracing::warn;

const RELAY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::relay");

/// Default destination, the database host's UDP line-protocol listener.
pub const DEFAULT_DESTINATION: &str = "influx.local:8089";

/// Default series name for forwarded lines.
pub const DEFAULT_SERIES: &str = "logs";

/// Default field name for forwarded lines.
pub const DEFAULT_FIELD: &str = "log";

/// Formats input lines as line-protocol string fields.
#[derive(Debug, Clone)]
pub struct LineProtocol {
    series: String,
    field: String,
}

impl LineProtocol {
    /// Builds a formatter for the given series and field names.
    #[must_use]
    pub fn new(series: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            field: field.into(),
        }
    }

    /// Renders one value as a line-protocol record.
    ///
    /// Quotes and backslashes in the value are escaped so arbitrary log
    /// text cannot break the field out of its string literal.
    #[must_use]
    pub fn format(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for ch in value.chars() {
            if matches!(ch, '"' | '\\') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        format!("{} {}=\"{}\"", self.series, self.field, escaped)
    }
}

/// Counters for one relay run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    /// Datagrams handed to the socket.
    pub sent: u64,
    /// Datagrams dropped on send failure.
    pub failed: u64,
}

/// Errors surfaced while setting up or running the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The destination host:port failed to resolve.
    #[error("failed to resolve destination '{destination}': {source}")]
    Resolve {
        /// Destination as given on the command line.
        destination: String,
        #[source]
        source: io::Error,
    },
    /// Resolution produced no usable address.
    #[error("no addresses resolved for destination '{destination}'")]
    ResolveEmpty {
        /// Destination as given on the command line.
        destination: String,
    },
    /// The local UDP socket could not be bound.
    #[error("failed to bind relay socket: {source}")]
    Bind {
        #[source]
        source: io::Error,
    },
    /// Reading the input stream failed.
    #[error("failed to read input: {source}")]
    ReadInput {
        #[source]
        source: io::Error,
    },
}

/// Resolves the destination to a single socket address.
///
/// # Errors
///
/// Returns a [`RelayError`] when resolution fails or yields nothing.
pub fn resolve_destination(destination: &str) -> Result<SocketAddr, RelayError> {
    let mut addrs = destination
        .to_socket_addrs()
        .map_err(|source| RelayError::Resolve {
            destination: destination.to_owned(),
            source,
        })?;
    addrs.next().ok_or_else(|| RelayError::ResolveEmpty {
        destination: destination.to_owned(),
    })
}

/// Binds an ephemeral local socket for sending.
///
/// # Errors
///
/// Returns [`RelayError::Bind`] when the bind fails.
pub fn bind_socket() -> Result<UdpSocket, RelayError> {
    UdpSocket::bind(("0.0.0.0", 0)).map_err(|source| RelayError::Bind { source })
}

/// Forwards every input line as one datagram.
///
/// Send failures are counted and logged but never retried or propagated;
/// only an input-read failure ends the run early.
///
/// # Errors
///
/// Returns [`RelayError::ReadInput`] when the reader fails.
pub fn relay<R: BufRead>(
    reader: R,
    socket: &UdpSocket,
    destination: SocketAddr,
    protocol: &LineProtocol,
) -> Result<RelayStats, RelayError> {
    let mut stats = RelayStats::default();
    for line in reader.lines() {
        let line = line.map_err(|source| RelayError::ReadInput { source })?;
        let datagram = protocol.format(&line);
        match socket.send_to(datagram.as_bytes(), destination) {
            Ok(_) => stats.sent += 1,
            Err(error) => {
                // Fire and forget: drop the line and carry on.
                warn!(target: RELAY_TARGET, %error, "failed to send datagram");
                stats.failed += 1;
            }
        }
    }
    Ok(stats)
}
