//! Error types for request validation and command execution.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Per-request validation failures, all surfaced to the client as HTTP 418.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The request carried a content type other than `text/plain`.
    #[error("unsupported content type '{found}'")]
    BadContentType {
        /// The offending value, or empty when the header was absent.
        found: String,
    },
    /// The body split into an unsupported number of tokens.
    #[error("expected {expected} command tokens, found {found}")]
    BadArity {
        /// Token counts the configured form accepts.
        expected: &'static str,
        /// Observed token count.
        found: usize,
    },
    /// The body is not valid UTF-8.
    #[error("request body is not valid UTF-8")]
    BadEncoding,
}

impl ValidationError {
    /// Creates a bad-content-type error.
    pub fn bad_content_type(found: impl Into<String>) -> Self {
        Self::BadContentType {
            found: found.into(),
        }
    }

    /// Creates a bad-arity error.
    pub fn bad_arity(expected: &'static str, found: usize) -> Self {
        Self::BadArity { expected, found }
    }
}

/// Failures while starting or waiting on a child process.
///
/// These never reach the client in any detail; the handler collapses them
/// into the same 418 a failing command produces.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The child process could not be spawned.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Executable path that failed to start.
        program: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// A named program file could not be opened for the interpreter.
    #[error("failed to open program file '{path}': {source}")]
    OpenProgram {
        /// Program file path.
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExecutionError {
    /// Creates a spawn error.
    pub fn spawn(program: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates an open-program error.
    pub fn open_program(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::OpenProgram {
            path: path.into(),
            source,
        }
    }
}
