//! The import pipeline boundary.

use std::path::Path;
use thiserror::Error;

/// Errors the import pipeline can report back to the transfer handler.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file is not a format the reader can open.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// I/O error while moving the file into the library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The pipeline rejected the file for any other reason.
    #[error("Import rejected: {0}")]
    Rejected(String),
}

/// The application's import pipeline, as seen from the transfer server.
///
/// The handler stages uploaded bytes to a file and calls
/// [`import_file`](Self::import_file) with the staged path and the name the
/// user chose in the browser. What happens to the file afterwards (copying it
/// into the library, database bookkeeping, user notification) is the
/// implementor's business.
pub trait BookImporter: Send + Sync {
    fn import_file(&self, path: &Path, display_name: &str) -> Result<(), ImportError>;
}
