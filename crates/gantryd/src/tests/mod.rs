//! Behaviour tests exercising the dispatch endpoint end to end.
//!
//! These drive real TCP connections against the handler (and the acceptor
//! pool) with a recording stub in place of the process executor.

mod pool_behaviour;
mod support;
