//! The gantry command-dispatch daemon.
//!
//! `gantryd` accepts plain-text HTTP commands from pad-side consoles and
//! turns them into local process executions. The flow per connection is
//! strictly serial: one acceptor worker reads the request, validates the
//! narrow `text/plain` contract, resolves the command through the immutable
//! [`gantry_table::CommandTable`], runs the child process to completion, and
//! answers with one of two status codes (200 on child success, 418 on any
//! rejection or failure). A bounded pool of such workers shares the listening
//! socket so a burst of slow commands does not serialise behind one loop.
//!
//! Startup is fail-fast: a missing `GANTRY_HOME`, an unreadable definitions
//! file, or an unusable listen address abort the process with a diagnostic
//! before any worker starts.

mod bootstrap;
mod dispatch;
mod http;
mod telemetry;
mod transport;

pub use bootstrap::{BootstrapError, Daemon, bootstrap, bootstrap_with_home};
pub use dispatch::{
    CommandExecutor, CommandText, DispatchConnectionHandler, DispatchOutcome, ExecutionError,
    Invocation, ProcessExecutor, ValidationError,
};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::{AcceptorPool, ConnectionHandler, ListenerError, PoolHandle};

#[cfg(test)]
mod tests;
