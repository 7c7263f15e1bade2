//! Empty-bodied HTTP/1.1 response writing.

use std::io::Write;

use super::errors::HttpError;

/// The three status codes the dispatch endpoint ever emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    /// Request accepted and the child process exited cleanly.
    Ok,
    /// Request rejected or the child process failed.
    Teapot,
    /// Verb outside the supported surface.
    NotImplemented,
}

impl Status {
    /// Numeric status code.
    pub(crate) fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Teapot => 418,
            Self::NotImplemented => 501,
        }
    }

    /// Reason phrase sent on the status line.
    pub(crate) fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Teapot => "I'm a teapot",
            Self::NotImplemented => "Not Implemented",
        }
    }
}

/// Writer for the fixed empty-body response shape.
///
/// Every response closes the connection; the original servers handled one
/// request per connection and clients rely on that.
pub(crate) struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a response writer over the given stream.
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes a status-only response.
    ///
    /// # Errors
    ///
    /// Returns an error when writing or flushing fails.
    pub(crate) fn write_empty(&mut self, status: Status) -> Result<(), HttpError> {
        self.write_with_headers(status, &[])
    }

    /// Writes a response with additional headers and an empty body.
    ///
    /// # Errors
    ///
    /// Returns an error when writing or flushing fails.
    pub(crate) fn write_with_headers(
        &mut self,
        status: Status,
        extra: &[(&str, &str)],
    ) -> Result<(), HttpError> {
        write!(self.writer, "HTTP/1.1 {} {}\r\n", status.code(), status.reason())?;
        for (name, value) in extra {
            write!(self.writer, "{name}: {value}\r\n")?;
        }
        write!(self.writer, "Content-Length: 0\r\nConnection: close\r\n\r\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_status_line_and_framing() {
        let mut output = Vec::new();
        let mut writer = ResponseWriter::new(&mut output);
        writer.write_empty(Status::Teapot).expect("write response");

        let response = String::from_utf8(output).expect("valid utf8");
        assert!(response.starts_with("HTTP/1.1 418 I'm a teapot\r\n"));
        assert!(response.contains("Content-Length: 0\r\n"));
        assert!(response.contains("Connection: close\r\n"));
        assert!(response.ends_with("\r\n\r\n"));
    }

    #[test]
    fn writes_extra_headers_before_framing() {
        let mut output = Vec::new();
        let mut writer = ResponseWriter::new(&mut output);
        writer
            .write_with_headers(Status::Ok, &[("Access-Control-Allow-Origin", "*")])
            .expect("write response");

        let response = String::from_utf8(output).expect("valid utf8");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Access-Control-Allow-Origin: *\r\n"));
    }
}
