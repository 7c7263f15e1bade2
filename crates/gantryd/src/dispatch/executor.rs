//! Synchronous child-process execution.

use std::fs::File;
use std::process::{Command, ExitStatus, Stdio};

use camino::Utf8PathBuf;

use super::errors::ExecutionError;

/// A fully resolved process invocation.
///
/// Arguments travel as discrete argv entries; nothing here passes through a
/// shell, so token content cannot change what runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Control command: executable plus the two validated tokens.
    Control {
        /// Resolved executable path.
        program: Utf8PathBuf,
        /// Control identifier argument.
        control: String,
        /// Requested state argument.
        state: String,
    },
    /// Named program: interpreter fed the program file on stdin.
    Program {
        /// Interpreter executable path.
        interpreter: Utf8PathBuf,
        /// Program file path.
        source: Utf8PathBuf,
    },
}

/// Runs resolved invocations to completion.
///
/// Implementations block the calling worker until the child terminates.
/// There is deliberately no timeout: a hung child blocks its worker
/// indefinitely, exactly as the deployed system behaves.
pub trait CommandExecutor: Send + Sync + 'static {
    /// Executes the invocation and returns the child's exit code.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] when the child cannot be started at
    /// all; a child that starts and fails reports through the exit code.
    fn execute(&self, invocation: &Invocation) -> Result<i32, ExecutionError>;
}

/// Executor backed by `std::process::Command`.
///
/// Child stdout/stderr are inherited; nothing is captured for the HTTP
/// client.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Builds a new executor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<i32, ExecutionError> {
        match invocation {
            Invocation::Control {
                program,
                control,
                state,
            } => {
                let status = Command::new(program.as_std_path())
                    .arg(control)
                    .arg(state)
                    .stdin(Stdio::null())
                    .status()
                    .map_err(|source| ExecutionError::spawn(program.clone(), source))?;
                Ok(exit_code(status))
            }
            Invocation::Program {
                interpreter,
                source,
            } => {
                let file = File::open(source.as_std_path())
                    .map_err(|error| ExecutionError::open_program(source.clone(), error))?;
                let status = Command::new(interpreter.as_std_path())
                    .stdin(Stdio::from(file))
                    .status()
                    .map_err(|error| ExecutionError::spawn(interpreter.clone(), error))?;
                Ok(exit_code(status))
            }
        }
    }
}

/// Signal-terminated children report as -1, which callers treat as failure.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
