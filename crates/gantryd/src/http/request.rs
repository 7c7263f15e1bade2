//! Bounded HTTP/1.1 request reading.

use std::io::{self, Read};
use std::str;

use super::errors::HttpError;

/// Maximum size of the request line plus headers in bytes.
pub(crate) const MAX_HEAD_BYTES: usize = 8 * 1024;

/// Maximum declared body size in bytes.
///
/// Command bodies are a handful of ASCII tokens; anything near this limit
/// is not a dispatch request.
pub(crate) const MAX_BODY_BYTES: usize = 64 * 1024;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// A parsed inbound request.
///
/// Header names are lowercased at parse time; lookups are therefore
/// case-insensitive as HTTP requires.
#[derive(Debug)]
pub(crate) struct HttpRequest {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl HttpRequest {
    /// Reads one request from the stream.
    ///
    /// Returns `Ok(None)` when the client disconnects before sending any
    /// data. The body is read to the declared `Content-Length`; a missing
    /// header is treated as a zero-length body.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] when the head or body exceeds its bound,
    /// the framing does not parse, or the stream fails.
    pub(crate) fn read_from<R: Read>(stream: &mut R) -> Result<Option<Self>, HttpError> {
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 1024];

        let head_end = loop {
            if let Some(position) = find_terminator(&buffer) {
                break position;
            }
            if buffer.len() > MAX_HEAD_BYTES {
                return Err(HttpError::request_too_large(buffer.len(), MAX_HEAD_BYTES));
            }

            let bytes_read = read_with_retry(stream, &mut chunk)?;
            if bytes_read == 0 {
                if buffer.is_empty() {
                    return Ok(None);
                }
                return Err(HttpError::malformed(
                    "connection closed before end of request head",
                ));
            }
            buffer.extend_from_slice(&chunk[..bytes_read]);
        };

        let head = buffer.get(..head_end).unwrap_or_default();
        let head_text = str::from_utf8(head)
            .map_err(|_| HttpError::malformed("request head is not valid UTF-8"))?;
        let mut lines = head_text.split("\r\n");
        let request_line = lines
            .next()
            .ok_or_else(|| HttpError::malformed("missing request line"))?;
        let (method, target) = parse_request_line(request_line)?;
        let headers = lines
            .filter(|line| !line.is_empty())
            .map(parse_header_line)
            .collect::<Result<Vec<_>, _>>()?;

        let declared = declared_content_length(&headers)?;
        if declared > MAX_BODY_BYTES {
            return Err(HttpError::request_too_large(declared, MAX_BODY_BYTES));
        }

        let mut body: Vec<u8> = buffer
            .get(head_end + HEAD_TERMINATOR.len()..)
            .unwrap_or_default()
            .to_vec();
        while body.len() < declared {
            let bytes_read = read_with_retry(stream, &mut chunk)?;
            if bytes_read == 0 {
                return Err(HttpError::malformed(
                    "connection closed before end of request body",
                ));
            }
            body.extend_from_slice(&chunk[..bytes_read]);
        }
        body.truncate(declared);

        Ok(Some(Self {
            method,
            target,
            headers,
            body,
        }))
    }

    /// Request method, verbatim.
    pub(crate) fn method(&self) -> &str {
        &self.method
    }

    /// Request target, verbatim.
    pub(crate) fn target(&self) -> &str {
        &self.target
    }

    /// Case-insensitive header lookup.
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(header, _)| *header == wanted)
            .map(|(_, value)| value.as_str())
    }

    /// Request body bytes.
    pub(crate) fn body(&self) -> &[u8] {
        &self.body
    }
}

fn find_terminator(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
}

fn read_with_retry<R: Read>(stream: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

fn parse_request_line(line: &str) -> Result<(String, String), HttpError> {
    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(HttpError::malformed(format!(
            "unparseable request line '{line}'"
        )));
    };
    if !version.starts_with("HTTP/") {
        return Err(HttpError::malformed(format!(
            "unsupported protocol version '{version}'"
        )));
    }
    Ok((method.to_owned(), target.to_owned()))
}

fn parse_header_line(line: &str) -> Result<(String, String), HttpError> {
    let Some((name, value)) = line.split_once(':') else {
        return Err(HttpError::malformed(format!(
            "unparseable header line '{line}'"
        )));
    };
    Ok((
        name.trim().to_ascii_lowercase(),
        value.trim().to_owned(),
    ))
}

fn declared_content_length(headers: &[(String, String)]) -> Result<usize, HttpError> {
    let Some((_, value)) = headers.iter().find(|(name, _)| name == "content-length") else {
        return Ok(0);
    };
    value
        .parse::<usize>()
        .map_err(|_| HttpError::invalid_content_length(value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(raw: &[u8]) -> Result<Option<HttpRequest>, HttpError> {
        HttpRequest::read_from(&mut Cursor::new(raw.to_vec()))
    }

    #[test]
    fn parses_post_with_body() {
        let raw = b"POST / HTTP/1.1\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\n100 1";
        let request = read(raw).expect("read").expect("request");
        assert_eq!(request.method(), "POST");
        assert_eq!(request.target(), "/");
        assert_eq!(request.header("content-type"), Some("text/plain"));
        assert_eq!(request.body(), b"100 1");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let raw = b"POST / HTTP/1.1\r\ncontent-TYPE: text/plain\r\n\r\n";
        let request = read(raw).expect("read").expect("request");
        assert_eq!(request.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn missing_content_length_means_empty_body() {
        let raw = b"POST / HTTP/1.1\r\nContent-Type: text/plain\r\n\r\n";
        let request = read(raw).expect("read").expect("request");
        assert!(request.body().is_empty());
    }

    #[test]
    fn empty_stream_is_a_disconnect() {
        assert!(read(b"").expect("read").is_none());
    }

    #[test]
    fn truncated_head_is_malformed() {
        let result = read(b"POST / HTTP/1.1\r\nContent-");
        assert!(matches!(result, Err(HttpError::Malformed { .. })));
    }

    #[test]
    fn truncated_body_is_malformed() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nshort";
        let result = read(raw);
        assert!(matches!(result, Err(HttpError::Malformed { .. })));
    }

    #[test]
    fn rejects_oversized_declared_body() {
        let raw = format!(
            "POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_BYTES + 1
        );
        let result = read(raw.as_bytes());
        assert!(matches!(result, Err(HttpError::RequestTooLarge { .. })));
    }

    #[test]
    fn rejects_garbage_request_line() {
        let result = read(b"NOT-HTTP\r\n\r\n");
        assert!(matches!(result, Err(HttpError::Malformed { .. })));
    }

    #[test]
    fn rejects_non_numeric_content_length() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: many\r\n\r\n";
        let result = read(raw);
        assert!(matches!(result, Err(HttpError::InvalidContentLength { .. })));
    }
}
