//! Concurrency behaviour of the acceptor pool under slow commands.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::transport::{AcceptorPool, PoolHandle};

use super::support::{self, DEFINITIONS, StubExecutor};

/// How long the stub executor holds each worker.
const EXECUTION_WINDOW: Duration = Duration::from_secs(1);

fn start_pool(workers: usize, executor: Arc<StubExecutor>) -> (SocketAddr, PoolHandle) {
    let config = support::config(&[]);
    let handler = Arc::new(support::handler(&config, DEFINITIONS, executor));
    let pool = AcceptorPool::bind("127.0.0.1", 0).expect("bind pool");
    let addr = pool.local_addr();
    let handle = pool
        .start(handler, NonZeroUsize::new(workers).expect("pool size"))
        .expect("start pool");
    (addr, handle)
}

fn concurrent_requests(addr: SocketAddr, count: usize) -> Vec<(String, Duration)> {
    let start = Instant::now();
    let clients: Vec<_> = (0..count)
        .map(|_| {
            thread::spawn(move || {
                let response =
                    support::send_request(addr, &support::post("text/plain", "100 1"));
                (response, start.elapsed())
            })
        })
        .collect();
    clients
        .into_iter()
        .map(|client| client.join().expect("client thread"))
        .collect()
}

#[test]
fn simultaneous_requests_are_not_serialised() {
    let executor = Arc::new(StubExecutor::with_delay(0, EXECUTION_WINDOW));
    let (addr, handle) = start_pool(3, executor);

    let results = concurrent_requests(addr, 3);
    for (response, elapsed) in &results {
        assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
        assert!(
            *elapsed < EXECUTION_WINDOW + Duration::from_millis(800),
            "request took {elapsed:?}; the pool serialised it"
        );
    }

    handle.shutdown();
    handle.join().expect("join pool");
}

#[test]
fn requests_beyond_the_pool_wait_for_a_free_worker() {
    let executor = Arc::new(StubExecutor::with_delay(0, EXECUTION_WINDOW));
    let (addr, handle) = start_pool(3, executor);

    let mut elapsed: Vec<Duration> = concurrent_requests(addr, 4)
        .into_iter()
        .map(|(response, duration)| {
            assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
            duration
        })
        .collect();
    elapsed.sort();

    let third = elapsed.get(2).copied().expect("third request");
    let fourth = elapsed.get(3).copied().expect("fourth request");
    assert!(
        third < EXECUTION_WINDOW + Duration::from_millis(800),
        "third request took {third:?}; the pool serialised it"
    );
    assert!(
        fourth >= EXECUTION_WINDOW + Duration::from_millis(700),
        "fourth request took {fourth:?}; it should have waited for a worker"
    );

    handle.shutdown();
    handle.join().expect("join pool");
}
