//! Shared configuration for the gantry ground-support tools.
//!
//! The daemon and the setup tooling agree on one installation layout rooted
//! at the directory named by the `GANTRY_HOME` environment variable. This
//! crate owns that layout, the daemon's command-line options, and the small
//! set of shared enums (dispatch form, log format) so the binaries cannot
//! drift apart.

mod defaults;
mod form;
mod layout;
mod logging;
mod options;

use std::env;
use std::ffi::OsString;
use std::num::NonZeroUsize;

use camino::Utf8PathBuf;
use thiserror::Error;

pub use defaults::{
    DEFAULT_CONTROL_COMMAND, DEFAULT_INTERPRETER, DEFAULT_LOG_FILTER, DEFAULT_PORT,
    DEFAULT_WORKERS, HOME_ENV,
};
pub use form::DispatchForm;
pub use layout::InstallLayout;
pub use logging::{LogFormat, LogFormatParseError};
pub use options::DaemonOptions;

/// Resolved daemon configuration.
///
/// Built once at startup from the environment and command line; read-only
/// for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Installation layout rooted at `GANTRY_HOME`.
    pub layout: InstallLayout,
    /// TCP port the dispatch server listens on.
    pub port: u16,
    /// Number of acceptor workers in the pool.
    pub workers: NonZeroUsize,
    /// Request form served by the dispatch endpoint.
    pub form: DispatchForm,
    /// Symbolic name of the control-command executable.
    pub control_command: String,
    /// Interpreter fed named program files on stdin.
    pub interpreter: Utf8PathBuf,
    /// Log filter expression for the tracing subscriber.
    pub log_filter: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Config {
    /// Resolves the configuration from parsed options and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHome`] when `GANTRY_HOME` is unset and
    /// [`ConfigError::NonUtf8Home`] when it is not valid UTF-8.
    pub fn resolve(options: DaemonOptions) -> Result<Self, ConfigError> {
        Self::resolve_with_home(options, env::var_os(HOME_ENV))
    }

    /// Resolves the configuration against an explicit `GANTRY_HOME` value,
    /// primarily for tests.
    ///
    /// # Errors
    ///
    /// See [`Config::resolve`].
    pub fn resolve_with_home(
        options: DaemonOptions,
        home: Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let layout = InstallLayout::from_home(home)?;
        Ok(Self {
            layout,
            port: options.port.unwrap_or(DEFAULT_PORT),
            workers: options.workers,
            form: options.form,
            control_command: options.control_command,
            interpreter: options.interpreter,
            log_filter: options.log_filter,
            log_format: options.log_format,
        })
    }

    /// Address string the listener binds to.
    #[must_use]
    pub fn listen_addr(&self) -> (&'static str, u16) {
        // The original servers bind the wildcard address; operators reach
        // them from the pad network.
        ("0.0.0.0", self.port)
    }
}

/// Errors surfaced while resolving the shared configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The installation root variable is unset.
    #[error("{HOME_ENV} is not set; source the installation environment first")]
    MissingHome,
    /// The installation root variable holds a non-UTF-8 path.
    #[error("{HOME_ENV} is not valid UTF-8: {value}")]
    NonUtf8Home {
        /// Lossy rendering of the offending value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn options(args: &[&str]) -> DaemonOptions {
        let mut argv = vec!["gantryd"];
        argv.extend_from_slice(args);
        DaemonOptions::try_parse_from(argv).expect("parse options")
    }

    #[test]
    fn resolves_defaults() {
        let config = Config::resolve_with_home(options(&[]), Some("/srv/gantry".into()))
            .expect("resolve config");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.form, DispatchForm::Control);
        assert_eq!(config.layout.root(), "/srv/gantry");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn positional_port_overrides_default() {
        let config = Config::resolve_with_home(options(&["9000"]), Some("/srv/gantry".into()))
            .expect("resolve config");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn missing_home_is_fatal() {
        let error = Config::resolve_with_home(options(&[]), None).expect_err("should fail");
        assert!(matches!(error, ConfigError::MissingHome));
        assert!(error.to_string().contains(HOME_ENV));
    }

    #[test]
    fn dual_form_is_selectable() {
        let config = Config::resolve_with_home(
            options(&["--form", "dual"]),
            Some("/srv/gantry".into()),
        )
        .expect("resolve config");
        assert_eq!(config.form, DispatchForm::Dual);
    }
}
