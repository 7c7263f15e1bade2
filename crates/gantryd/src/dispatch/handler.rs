//! Connection handler tying validation, resolution, and execution together.

use std::net::TcpStream;
use std::sync::Arc;

use camino::Utf8PathBuf;
use tracing::{debug, info, warn};

use gantry_config::{Config, DispatchForm};
use gantry_table::{CommandTable, TableError};

use crate::http::{HttpRequest, ResponseWriter, Status};
use crate::transport::ConnectionHandler;

use super::DISPATCH_TARGET;
use super::errors::ValidationError;
use super::executor::{CommandExecutor, Invocation, ProcessExecutor};
use super::validator::{CommandText, validate};

/// Exit status reported internally when a command cannot be resolved or
/// spawned, mirroring the shell's command-not-found code. The client sees
/// the same 418 either way.
const UNKNOWN_COMMAND_STATUS: i32 = 127;

/// Result of dispatching one request.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The child process ran and exited cleanly.
    Accepted,
    /// Validation failed; no process was spawned.
    Rejected(ValidationError),
    /// The command failed to resolve, spawn, or exit cleanly.
    Failed(i32),
}

/// Connection handler for the dispatch endpoint.
///
/// Each connection is handled synchronously on its acceptor worker: read
/// one request, dispatch it, write one empty-bodied response, close.
pub struct DispatchConnectionHandler {
    form: DispatchForm,
    control_command: String,
    interpreter: Utf8PathBuf,
    programs_dir: Utf8PathBuf,
    table: CommandTable,
    executor: Arc<dyn CommandExecutor>,
}

impl DispatchConnectionHandler {
    /// Creates a handler that runs real child processes.
    #[must_use]
    pub fn new(config: &Config, table: CommandTable) -> Self {
        Self::with_executor(config, table, Arc::new(ProcessExecutor::new()))
    }

    /// Creates a handler with a caller-supplied executor.
    #[must_use]
    pub fn with_executor(
        config: &Config,
        table: CommandTable,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            form: config.form,
            control_command: config.control_command.clone(),
            interpreter: config.interpreter.clone(),
            programs_dir: config.layout.programs_dir(),
            table,
            executor,
        }
    }

    fn serve(&self, mut stream: TcpStream) {
        let request = match HttpRequest::read_from(&mut stream) {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                respond(&mut stream, Status::Teapot, &[]);
                return;
            }
        };

        debug!(
            target: DISPATCH_TARGET,
            method = request.method(),
            path = request.target(),
            "request received"
        );

        match request.method() {
            "OPTIONS" => {
                // Preflight only: answer the CORS contract, execute nothing.
                respond(
                    &mut stream,
                    Status::Ok,
                    &[
                        ("Access-Control-Allow-Origin", "*"),
                        ("Access-Control-Allow-Methods", self.form.allowed_methods()),
                        ("Access-Control-Allow-Headers", "Content-Type"),
                    ],
                );
            }
            "POST" => {
                let outcome = self.dispatch(&request);
                let status = match outcome {
                    DispatchOutcome::Accepted => Status::Ok,
                    DispatchOutcome::Rejected(_) | DispatchOutcome::Failed(_) => Status::Teapot,
                };
                respond(&mut stream, status, &[]);
            }
            other => {
                debug!(target: DISPATCH_TARGET, method = other, "unsupported method");
                respond(&mut stream, Status::NotImplemented, &[]);
            }
        }
    }

    fn dispatch(&self, request: &HttpRequest) -> DispatchOutcome {
        let command = match validate(self.form, request.header("content-type"), request.body()) {
            Ok(command) => command,
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "rejecting request");
                return DispatchOutcome::Rejected(error);
            }
        };

        let invocation = match self.resolve(&command) {
            Ok(invocation) => invocation,
            Err(error) => {
                // An unresolvable name is indistinguishable from a failing
                // command at the client; only the log keeps the difference.
                warn!(target: DISPATCH_TARGET, %error, "command resolution failed");
                return DispatchOutcome::Failed(UNKNOWN_COMMAND_STATUS);
            }
        };

        debug!(target: DISPATCH_TARGET, invocation = ?invocation, "executing command");
        match self.executor.execute(&invocation) {
            Ok(0) => DispatchOutcome::Accepted,
            Ok(code) => {
                info!(target: DISPATCH_TARGET, code, "command exited nonzero");
                DispatchOutcome::Failed(code)
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "command could not run");
                DispatchOutcome::Failed(UNKNOWN_COMMAND_STATUS)
            }
        }
    }

    fn resolve(&self, command: &CommandText) -> Result<Invocation, TableError> {
        match command {
            CommandText::Control { control, state } => {
                let program = self.table.resolve(&self.control_command)?;
                Ok(Invocation::Control {
                    program: program.to_path_buf(),
                    control: control.clone(),
                    state: state.clone(),
                })
            }
            CommandText::Program { name } => {
                // Program names are bare file names; anything that could
                // escape the programs directory resolves like an unknown
                // command.
                if name.contains(['/', '\\']) || name == ".." {
                    return Err(TableError::unknown_command(name.clone()));
                }
                Ok(Invocation::Program {
                    interpreter: self.interpreter.clone(),
                    source: self.programs_dir.join(name.as_str()),
                })
            }
        }
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, stream: TcpStream) {
        self.serve(stream);
    }
}

fn respond(stream: &mut TcpStream, status: Status, extra: &[(&str, &str)]) {
    if let Err(error) = ResponseWriter::new(&mut *stream).write_with_headers(status, extra) {
        warn!(target: DISPATCH_TARGET, %error, "failed to write response");
    }
}
