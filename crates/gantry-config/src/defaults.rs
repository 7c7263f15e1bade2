use std::num::NonZeroUsize;

/// Environment variable naming the installation root directory.
pub const HOME_ENV: &str = "GANTRY_HOME";

/// Default TCP port for the dispatch server.
pub const DEFAULT_PORT: u16 = 8080;

/// Default acceptor pool size.
///
/// The observed deployments ran between 5 and 15 listener processes; eight
/// workers sits inside that envelope.
pub const DEFAULT_WORKERS: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(workers) => workers,
    None => NonZeroUsize::MIN,
};

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default symbolic name of the control-command executable.
pub const DEFAULT_CONTROL_COMMAND: &str = "ec_cmd";

/// Default interpreter for named program files.
pub const DEFAULT_INTERPRETER: &str = "/bin/sh";
