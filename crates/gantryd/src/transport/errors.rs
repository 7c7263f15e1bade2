//! Error types for acceptor pool operations.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced while binding or running the acceptor pool.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listen address failed to resolve.
    #[error("failed to resolve listen address {host}:{port}: {source}")]
    Resolve {
        /// Configured host name.
        host: String,
        /// Configured port.
        port: u16,
        #[source]
        source: io::Error,
    },
    /// Resolution produced no usable address.
    #[error("no addresses resolved for {host}:{port}")]
    ResolveEmpty {
        /// Configured host name.
        host: String,
        /// Configured port.
        port: u16,
    },
    /// Binding the TCP listener failed.
    #[error("failed to bind listener at {addr}: {source}")]
    Bind {
        /// The address that failed to bind.
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// Switching the listener to non-blocking mode failed.
    #[error("failed to enable non-blocking listener: {source}")]
    NonBlocking {
        #[source]
        source: io::Error,
    },
    /// Spawning an acceptor worker thread failed.
    #[error("failed to spawn acceptor worker {worker}: {source}")]
    SpawnWorker {
        /// Zero-based worker index.
        worker: usize,
        #[source]
        source: io::Error,
    },
    /// An acceptor worker thread panicked.
    #[error("acceptor worker thread panicked")]
    ThreadPanic,
}
