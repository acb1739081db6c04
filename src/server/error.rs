//! Error types for the HTTP server.

use std::time::Duration;
use thiserror::Error;

use crate::parser::Error as ParserError;

/// Errors that can occur during server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    Parse(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The handler dropped its responder without ever replying.
    #[error("Handler dropped the responder without replying")]
    NoResponse,

    /// The handler did not resolve a response in time.
    #[error("Handler did not reply within {0:?}")]
    ResponseTimeout(Duration),
}
