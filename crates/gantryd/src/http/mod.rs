//! Minimal HTTP/1.1 handling for the dispatch endpoint.
//!
//! The dispatch contract is narrow enough (one `POST` or `OPTIONS` per
//! connection, `text/plain` body, empty responses) that the daemon frames
//! HTTP by hand the same way the wire protocol is framed elsewhere in this
//! codebase: bounded chunked reads over the raw stream, no streaming, no
//! keep-alive.

mod errors;
mod request;
mod response;

pub(crate) use self::errors::HttpError;
pub(crate) use self::request::HttpRequest;
pub(crate) use self::response::{ResponseWriter, Status};
