//! Shared fixtures for the behaviour tests.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clap::Parser;

use gantry_config::{Config, DaemonOptions};
use gantry_table::CommandTable;

use crate::dispatch::{CommandExecutor, DispatchConnectionHandler, ExecutionError, Invocation};
use crate::transport::ConnectionHandler;

/// Definitions used by most tests: one control command under the root.
pub(crate) const DEFINITIONS: &str = "ec_cmd bin/ec_cmd\n";

/// A CORS preflight request.
pub(crate) const OPTIONS_REQUEST: &[u8] = b"OPTIONS / HTTP/1.1\r\n\r\n";

/// Executor stub that records invocations and returns a fixed exit code.
pub(crate) struct StubExecutor {
    code: i32,
    delay: Duration,
    invocations: Mutex<Vec<Invocation>>,
}

impl StubExecutor {
    pub(crate) fn new(code: i32) -> Self {
        Self::with_delay(code, Duration::ZERO)
    }

    pub(crate) fn with_delay(code: i32, delay: Duration) -> Self {
        Self {
            code,
            delay,
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().expect("invocation lock").clone()
    }
}

impl CommandExecutor for StubExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<i32, ExecutionError> {
        self.invocations
            .lock()
            .expect("invocation lock")
            .push(invocation.clone());
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(self.code)
    }
}

/// Resolves a config from extra CLI arguments and a fixed test root.
pub(crate) fn config(args: &[&str]) -> Config {
    let mut argv = vec!["gantryd"];
    argv.extend_from_slice(args);
    let options = DaemonOptions::try_parse_from(argv).expect("parse options");
    Config::resolve_with_home(options, Some("/srv/gantry".into())).expect("resolve config")
}

/// Builds a handler over parsed definitions and the stub executor.
pub(crate) fn handler(
    config: &Config,
    definitions: &str,
    executor: Arc<StubExecutor>,
) -> DispatchConnectionHandler {
    let parsed = CommandTable::parse(definitions, &config.layout);
    DispatchConnectionHandler::with_executor(config, parsed.table, executor)
}

/// Serves a fixed number of connections on a background thread.
pub(crate) fn serve_connections(
    handler: Arc<DispatchConnectionHandler>,
    connections: usize,
) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
    let addr = listener.local_addr().expect("listener address");
    let server = thread::spawn(move || {
        for _ in 0..connections {
            let (stream, _) = listener.accept().expect("accept connection");
            handler.handle(stream);
        }
    });
    (addr, server)
}

/// Sends raw request bytes and collects the full response text.
pub(crate) fn send_request(addr: SocketAddr, raw: &[u8]) -> String {
    let mut client = TcpStream::connect(addr).expect("connect client");
    client.write_all(raw).expect("write request");
    client.flush().expect("flush request");
    let mut response = String::new();
    client
        .read_to_string(&mut response)
        .expect("read response");
    response
}

/// Builds a `POST /` request with the given content type and body.
pub(crate) fn post(content_type: &str, body: &str) -> Vec<u8> {
    format!(
        "POST / HTTP/1.1\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    )
    .into_bytes()
}
