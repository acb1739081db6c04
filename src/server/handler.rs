//! Request handlers and the single-use respond token.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::debug;
use tokio::sync::oneshot;

use crate::parser::ParsedRequest;
use crate::server::response::ResponseSpec;

/// Type alias for a boxed future returned by a handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type alias for the server's handler function.
///
/// The handler receives the parsed request and a [`Responder`]. It may resolve
/// the response after asynchronous work (for example, after writing an
/// uploaded file to disk); the connection stays open until it does, up to the
/// configured response timeout.
pub type HandlerFn = Arc<dyn Fn(ParsedRequest, Responder) -> HandlerFuture + Send + Sync>;

/// Single-use token through which a handler emits its response.
///
/// [`send`](Self::send) consumes the token, so answering the same connection
/// twice is impossible. Dropping the token without sending abandons the
/// connection without a response.
#[derive(Debug)]
pub struct Responder {
    tx: oneshot::Sender<ResponseSpec>,
}

impl Responder {
    /// Create a responder and the receiving side the connection task awaits.
    pub(crate) fn new() -> (Self, oneshot::Receiver<ResponseSpec>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Emit the response for this connection.
    pub fn send(self, status: u16, content_type: &str, body: impl Into<String>) {
        let spec = ResponseSpec::new(status, content_type, body);
        if self.tx.send(spec).is_err() {
            // The connection is already gone; nothing left to answer.
            debug!("response discarded, connection closed before respond");
        }
    }
}
