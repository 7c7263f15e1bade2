//! Plain-text command dispatch for the HTTP endpoint.
//!
//! A `POST /` body of one or two whitespace-separated tokens names work to
//! run on the ground-support host: two tokens are a control command
//! (`<control-id> <state>` handed to the configured control executable),
//! one token names a program file fed to the interpreter (dual form only).
//! The outcome collapses to exactly two client-visible results: HTTP 200
//! when the child exits cleanly, HTTP 418 for everything else. `OPTIONS`
//! answers the CORS preflight without executing anything.

mod errors;
mod executor;
mod handler;
mod validator;

pub use self::errors::{ExecutionError, ValidationError};
pub use self::executor::{CommandExecutor, Invocation, ProcessExecutor};
pub use self::handler::{DispatchConnectionHandler, DispatchOutcome};
pub use self::validator::CommandText;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
