//! The book transfer handler.
//!
//! This module supplies the application side of the server: it serves the
//! browser upload page on `GET /`, accepts base64-encoded book files as JSON
//! on `POST /upload`, stages the decoded bytes to disk and hands them to the
//! import pipeline. Everything else is answered `404`.

mod handler;
mod import;
mod page;
mod tests;
mod upload;

// Re-export public items
pub use handler::{TransferHandler, TransferError};
pub use import::{BookImporter, ImportError};
pub use upload::{classify_upload, UploadParse, UploadRequest};
