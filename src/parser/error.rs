//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur during HTTP request parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// The request line is malformed (missing method or path).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),
}
