//! Acceptor pool for the dispatch server's listening socket.
//!
//! The transport module binds the TCP listener once and runs a fixed number
//! of worker threads over it. Each worker handles one connection at a time,
//! so the pool size bounds how many requests execute concurrently.

mod errors;
mod handler;
mod listener;

pub use self::errors::ListenerError;
pub use self::handler::ConnectionHandler;
pub use self::listener::{AcceptorPool, PoolHandle};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
