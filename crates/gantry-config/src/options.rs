//! Command-line options for the dispatch daemon.

use std::num::NonZeroUsize;

use camino::Utf8PathBuf;
use clap::Parser;

use crate::defaults::{
    DEFAULT_CONTROL_COMMAND, DEFAULT_INTERPRETER, DEFAULT_LOG_FILTER, DEFAULT_WORKERS,
};
use crate::form::DispatchForm;
use crate::logging::LogFormat;

/// Command-line interface for the gantry dispatch daemon.
#[derive(Parser, Debug)]
#[command(name = "gantryd", disable_help_subcommand = true)]
pub struct DaemonOptions {
    /// TCP port to listen on (defaults to 8080).
    #[arg(value_name = "PORT")]
    pub port: Option<u16>,
    /// Number of acceptor workers in the pool.
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: NonZeroUsize,
    /// Request form served by the dispatch endpoint.
    #[arg(long, value_enum, default_value_t = DispatchForm::Control)]
    pub form: DispatchForm,
    /// Symbolic name of the control-command executable.
    #[arg(long, default_value = DEFAULT_CONTROL_COMMAND)]
    pub control_command: String,
    /// Interpreter fed named program files on stdin.
    #[arg(long, default_value = DEFAULT_INTERPRETER)]
    pub interpreter: Utf8PathBuf,
    /// Log filter expression (tracing `EnvFilter` syntax).
    #[arg(long, default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}
