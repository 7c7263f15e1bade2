//! Bounded worker pool over a shared TCP listener.
//!
//! The original deployment forked N single-threaded listener processes onto
//! one SO_REUSEPORT socket and let the kernel spread connections across
//! them. Here the same capacity bound is a fixed pool of threads blocking on
//! one shared listener: each worker serves exactly one connection at a time,
//! and a burst wider than the pool queues in the kernel backlog.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::num::NonZeroUsize;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use super::{ConnectionHandler, LISTENER_TARGET, ListenerError};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// A bound listening socket ready to start its worker pool.
#[derive(Debug)]
pub struct AcceptorPool {
    listener: Arc<TcpListener>,
    local_addr: SocketAddr,
}

impl AcceptorPool {
    /// Binds the listening socket.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the address does not resolve or the
    /// bind fails.
    pub fn bind(host: &str, port: u16) -> Result<Self, ListenerError> {
        let mut addrs = (host, port)
            .to_socket_addrs()
            .map_err(|source| ListenerError::Resolve {
                host: host.to_owned(),
                port,
                source,
            })?;
        let addr = addrs
            .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
            .ok_or_else(|| ListenerError::ResolveEmpty {
                host: host.to_owned(),
                port,
            })?;
        let listener =
            TcpListener::bind(addr).map_err(|source| ListenerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ListenerError::Bind { addr, source })?;
        Ok(Self {
            listener: Arc::new(listener),
            local_addr,
        })
    }

    /// The address the listener actually bound (useful with port 0).
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Starts the worker pool.
    ///
    /// Every worker runs a serial accept→handle loop against the shared
    /// listener until the returned handle signals shutdown.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the listener cannot be switched to
    /// non-blocking mode or a worker thread fails to spawn.
    pub fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
        workers: NonZeroUsize,
    ) -> Result<PoolHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::with_capacity(workers.get());
        for worker in 0..workers.get() {
            let listener = Arc::clone(&self.listener);
            let shutdown_flag = Arc::clone(&shutdown);
            let worker_handler = Arc::clone(&handler);
            let handle = thread::Builder::new()
                .name(format!("acceptor-{worker}"))
                .spawn(move || run_accept_loop(&listener, &shutdown_flag, &*worker_handler, worker))
                .map_err(|source| ListenerError::SpawnWorker { worker, source })?;
            handles.push(handle);
        }

        info!(
            target: LISTENER_TARGET,
            addr = %self.local_addr,
            workers = workers.get(),
            "acceptor pool active"
        );
        Ok(PoolHandle { shutdown, handles })
    }
}

/// Handle to the running worker pool.
pub struct PoolHandle {
    shutdown: Arc<AtomicBool>,
    handles: Vec<thread::JoinHandle<()>>,
}

impl PoolHandle {
    /// Signals all workers to exit after their current connection.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for every worker to exit.
    ///
    /// The daemon calls this without ever signalling shutdown, so in normal
    /// operation it blocks for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadPanic`] when any worker panicked.
    pub fn join(mut self) -> Result<(), ListenerError> {
        let mut panicked = false;
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                panicked = true;
            }
        }
        if panicked {
            Err(ListenerError::ThreadPanic)
        } else {
            Ok(())
        }
    }
}

impl Drop for PoolHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &TcpListener,
    shutdown: &AtomicBool,
    handler: &dyn ConnectionHandler,
    worker: usize,
) {
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match accept_connection(listener) {
            Ok(Some(stream)) => {
                last_error = None;
                // Serial by design: the worker is busy until the request,
                // including its child process, completes.
                handler.handle(stream);
            }
            Ok(None) => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        worker,
                        error = %error,
                        "socket accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
}

fn accept_connection(listener: &TcpListener) -> Result<Option<TcpStream>, io::Error> {
    match listener.accept() {
        Ok((stream, _)) => {
            stream.set_nonblocking(false)?;
            Ok(Some(stream))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpStream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ConnectionHandler for CountingHandler {
        fn handle(&self, _stream: TcpStream) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn wait_for_count(count: &AtomicUsize, expected: usize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if count.load(Ordering::SeqCst) >= expected {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    fn pool_size(workers: usize) -> NonZeroUsize {
        NonZeroUsize::new(workers).expect("non-zero pool size")
    }

    #[test]
    fn pool_accepts_connections() {
        let pool = AcceptorPool::bind("127.0.0.1", 0).expect("bind pool");
        let addr = pool.local_addr();
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(CountingHandler {
            count: Arc::clone(&count),
        });
        let handle = pool.start(handler, pool_size(2)).expect("start pool");

        TcpStream::connect(addr).expect("connect first client");
        TcpStream::connect(addr).expect("connect second client");

        assert!(wait_for_count(&count, 2), "expected two connections");
        handle.shutdown();
        handle.join().expect("join pool");
    }

    #[test]
    fn blocked_worker_does_not_stall_its_peer() {
        struct SlowHandler {
            count: Arc<AtomicUsize>,
        }

        impl ConnectionHandler for SlowHandler {
            fn handle(&self, mut stream: TcpStream) {
                // Hold the connection open until the client closes it.
                let mut sink = Vec::new();
                let _ = stream.read_to_end(&mut sink);
                self.count.fetch_add(1, Ordering::SeqCst);
            }
        }

        let pool = AcceptorPool::bind("127.0.0.1", 0).expect("bind pool");
        let addr = pool.local_addr();
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(SlowHandler {
            count: Arc::clone(&count),
        });
        let handle = pool.start(handler, pool_size(2)).expect("start pool");

        let slow = TcpStream::connect(addr).expect("connect slow client");
        let fast = TcpStream::connect(addr).expect("connect fast client");
        drop(fast);

        assert!(
            wait_for_count(&count, 1),
            "second worker should finish the fast connection"
        );
        drop(slow);
        assert!(wait_for_count(&count, 2), "slow connection should finish");
        handle.shutdown();
        handle.join().expect("join pool");
    }
}
