//! HTTP response synthesis.

/// The handler-supplied triple used to synthesize the outgoing byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSpec {
    /// The HTTP status code
    pub status: u16,
    /// The value of the Content-Type header
    pub content_type: String,
    /// The response body
    pub body: String,
}

impl ResponseSpec {
    /// Create a new response.
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Convert the response to bytes.
    ///
    /// The reason phrase is always `OK` regardless of the status code; the
    /// browser client only looks at the numeric code. `Content-Length` is the
    /// encoded byte length of the body, not its character count, and every
    /// response carries `Connection: close` because each connection serves a
    /// single request.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        let status_line = format!("HTTP/1.1 {} OK\r\n", self.status);
        bytes.extend_from_slice(status_line.as_bytes());

        let body_bytes = self.body.as_bytes();
        let headers = format!(
            "Content-Type: {}\r\nContent-Length: {}\r\nAccess-Control-Allow-Origin: *\r\nConnection: close\r\n",
            self.content_type,
            body_bytes.len()
        );
        bytes.extend_from_slice(headers.as_bytes());

        // Empty line separating headers from body
        bytes.extend_from_slice(b"\r\n");
        bytes.extend_from_slice(body_bytes);

        bytes
    }
}
