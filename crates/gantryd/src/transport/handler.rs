//! Connection handling seam between the acceptor pool and the dispatcher.

use std::net::TcpStream;

/// Handles accepted socket connections.
///
/// Implementations run on an acceptor worker thread and must fully consume
/// the connection before returning; the worker does not accept again until
/// `handle` completes. Implementations should avoid panicking — a panicked
/// worker is never respawned.
pub trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection.
    fn handle(&self, stream: TcpStream);
}
