//! Incremental HTTP request parsing.
//!
//! This module turns the byte chunks arriving on a connection into a parsed
//! request. Nothing is parsed until the full header block is buffered, and a
//! request only materializes once `Content-Length` bytes of body have arrived.

mod buffer;
mod error;
mod request;

// Re-export public items
pub use buffer::RequestBuffer;
pub use error::Error;
pub use request::ParsedRequest;
