//! HTTP server implementation for bookdrop.
//!
//! This module provides the minimal transfer server: an explicit
//! `start`/`stop` lifecycle around a listening socket, one request/response
//! cycle per accepted connection, and a caller-supplied handler deciding how
//! to answer.

mod config;
mod error;
mod handler;
mod http_server;
mod response;

// Re-export public items
pub use config::ServerConfig;
pub use error::Error;
pub use handler::{HandlerFn, HandlerFuture, Responder};
pub use http_server::HttpServer;
pub use response::ResponseSpec;
