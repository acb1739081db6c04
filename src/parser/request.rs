//! Parsed request representation.

use std::collections::HashMap;

/// A read-only view over one connection's buffer once parsing succeeded.
///
/// Method and path are taken verbatim from the request line: no URL decoding
/// is performed and any query string stays inside `path` as one opaque token.
/// The body is exactly `Content-Length` bytes long, decoded as UTF-8 text.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    /// The HTTP method (GET, POST, ...), verbatim
    pub method: String,
    /// The request path, including any query string
    pub path: String,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The request body
    pub body: String,
}

impl ParsedRequest {
    /// Get a header value.
    ///
    /// Headers are case-insensitive, so the lookup is too.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                Some(v)
            } else {
                None
            }
        })
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }
}
