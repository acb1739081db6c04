//! A local HTTP transfer server for importing e-books from a desktop browser.
//!
//! This library provides a minimal, non-persistent HTTP/1.1 server built
//! directly on TCP streams. It is meant for one job: letting a browser on the
//! same Wi-Fi segment upload a book file to the device. Each accepted
//! connection handles exactly one request/response cycle and is then closed.
//!
//! # Features
//!
//! - Incremental request parsing from streamed byte chunks
//! - Message completion via the `Content-Length` header
//! - Single-use respond token, so a handler cannot answer twice
//! - Explicit `start`/`stop` lifecycle with idempotent stop
//! - A ready-made transfer handler serving an upload page and accepting
//!   base64-encoded file uploads as JSON
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use bookdrop::{HttpServer, ServerConfig, TransferHandler};
//! use bookdrop::transfer::{BookImporter, ImportError};
//!
//! struct Shelf;
//!
//! impl BookImporter for Shelf {
//!     fn import_file(&self, path: &std::path::Path, display_name: &str) -> Result<(), ImportError> {
//!         println!("imported {} from {}", display_name, path.display());
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> Result<(), bookdrop::ServerError> {
//! let handler = TransferHandler::new(Arc::new(Shelf), std::env::temp_dir());
//! let mut server = HttpServer::new(ServerConfig::default());
//! server.start(handler.into_handler()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! See `demos/transfer_server.rs` for a complete runnable example.

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Export the transfer handler module
pub mod transfer;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, ParsedRequest, RequestBuffer};
pub use server::{
    Error as ServerError, HandlerFn, HandlerFuture, HttpServer, Responder, ResponseSpec,
    ServerConfig,
};
pub use transfer::{BookImporter, TransferHandler};
