//! Per-connection request accumulation.

use std::collections::HashMap;

use crate::parser::error::Error;
use crate::parser::request::ParsedRequest;

const HEADER_BOUNDARY: &[u8] = b"\r\n\r\n";

/// Fields parsed out of a complete header block, held while the body is
/// still arriving.
#[derive(Debug)]
struct HeadFields {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    content_length: usize,
}

#[derive(Debug)]
enum Phase {
    /// Still waiting for the `\r\n\r\n` that terminates the header block.
    /// `scan_from` is where the boundary search resumes, so repeated pushes
    /// stay linear in the total request size.
    Head { scan_from: usize },
    /// Header block parsed; waiting for `content_length` bytes of body.
    Body { head: HeadFields, body_start: usize },
    /// The request completed (or failed) once; further bytes are ignored.
    Done,
}

/// Accumulates one connection's inbound bytes and detects message completion.
///
/// Feed every chunk read from the socket to [`push`](Self::push). The buffer
/// yields a [`ParsedRequest`] exactly once, after the header block is complete
/// and at least `Content-Length` bytes of body have arrived. Any bytes beyond
/// `Content-Length` are discarded: pipelined follow-up requests on the same
/// connection are not supported.
#[derive(Debug)]
pub struct RequestBuffer {
    buf: Vec<u8>,
    phase: Phase,
}

impl Default for RequestBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuffer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            phase: Phase::Head { scan_from: 0 },
        }
    }

    /// Append a chunk and check for completion.
    ///
    /// Returns `Ok(None)` while the request is still incomplete and
    /// `Ok(Some(request))` exactly once, when it completes. After completion
    /// (or a parse error) every further push returns `Ok(None)`.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Option<ParsedRequest>, Error> {
        if matches!(self.phase, Phase::Done) {
            return Ok(None);
        }

        self.buf.extend_from_slice(chunk);

        if let Phase::Head { scan_from } = self.phase {
            let Some(boundary) = find_boundary(&self.buf, scan_from) else {
                // The boundary may straddle the next chunk; back up so a
                // partial `\r\n\r` at the end of the buffer is re-examined.
                self.phase = Phase::Head {
                    scan_from: self.buf.len().saturating_sub(HEADER_BOUNDARY.len() - 1),
                };
                return Ok(None);
            };

            let head = match parse_head(&self.buf[..boundary]) {
                Ok(head) => head,
                Err(e) => {
                    self.phase = Phase::Done;
                    return Err(e);
                }
            };

            self.phase = Phase::Body {
                head,
                body_start: boundary + HEADER_BOUNDARY.len(),
            };
        }

        if let Phase::Body { head, body_start } = &self.phase {
            if self.buf.len() - body_start < head.content_length {
                // Still buffering the body.
                return Ok(None);
            }

            // Truncate to exactly Content-Length bytes; trailing bytes are
            // dropped by design.
            let body_bytes = &self.buf[*body_start..body_start + head.content_length];
            let body = String::from_utf8_lossy(body_bytes).into_owned();

            let Phase::Body { head, .. } = std::mem::replace(&mut self.phase, Phase::Done) else {
                unreachable!();
            };

            return Ok(Some(ParsedRequest {
                method: head.method,
                path: head.path,
                headers: head.headers,
                body,
            }));
        }

        Ok(None)
    }
}

/// Find the header/body boundary, searching no earlier than `from`.
fn find_boundary(buf: &[u8], from: usize) -> Option<usize> {
    if buf.len() < HEADER_BOUNDARY.len() {
        return None;
    }
    buf[from..]
        .windows(HEADER_BOUNDARY.len())
        .position(|w| w == HEADER_BOUNDARY)
        .map(|pos| from + pos)
}

/// Parse the request line and header fields out of a complete header block.
fn parse_head(head: &[u8]) -> Result<HeadFields, Error> {
    let head_str = String::from_utf8_lossy(head);
    let mut lines = head_str.split("\r\n");

    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    };

    let mut headers = HashMap::new();
    let mut content_length = None;
    for line in lines {
        if line.is_empty() {
            continue;
        }

        // Lines without a colon are silently skipped rather than failing
        // the whole request.
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        // First Content-Length wins if a client sends duplicates. A
        // non-numeric value counts as 0, so a malformed client completes
        // immediately instead of hanging the connection forever.
        if content_length.is_none() && name.eq_ignore_ascii_case("content-length") {
            content_length = Some(value.parse::<usize>().unwrap_or(0));
        }

        headers
            .entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }

    Ok(HeadFields {
        method: method.to_string(),
        path: path.to_string(),
        headers,
        content_length: content_length.unwrap_or(0),
    })
}
