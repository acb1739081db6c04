//! Transfer server lifecycle and connection handling.

use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, error, info};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::parser::RequestBuffer;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::handler::{HandlerFn, Responder};
use crate::server::response::ResponseSpec;

/// State held only while the server is listening.
struct Running {
    local_addr: SocketAddr,
    // Dropping the sender is the shutdown signal for the accept loop.
    shutdown: watch::Sender<()>,
    accept_task: JoinHandle<()>,
}

/// The local transfer server.
///
/// Owns the listening socket and the registered handler. Constructed idle;
/// [`start`](Self::start) transitions to listening, [`stop`](Self::stop) back
/// to idle. The owner of this value is responsible for its scope; there is no
/// implicit global instance.
pub struct HttpServer {
    config: ServerConfig,
    running: Option<Running>,
}

impl HttpServer {
    /// Create an idle server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            running: None,
        }
    }

    /// Bind the wildcard address on the configured port and begin accepting
    /// connections, answering each with `handler`.
    ///
    /// If the server is already listening it is stopped first, so the
    /// previous socket and handler are replaced together and nothing leaks.
    /// The old listener is fully released before the new bind, which makes
    /// restarting on the same port reliable.
    pub async fn start(&mut self, handler: HandlerFn) -> Result<(), Error> {
        if let Some(running) = self.running.take() {
            drop(running.shutdown);
            let _ = running.accept_task.await;
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("transfer server listening on http://{local_addr}");

        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let read_buffer_size = self.config.read_buffer_size;
        let response_timeout = self.config.response_timeout;

        let accept_task = tokio::spawn(accept_loop(
            listener,
            handler,
            read_buffer_size,
            response_timeout,
            shutdown_rx,
        ));

        self.running = Some(Running {
            local_addr,
            shutdown: shutdown_tx,
            accept_task,
        });

        Ok(())
    }

    /// Close the listening socket and drop the handler reference.
    ///
    /// Idempotent: stopping an idle server is a no-op. Connections already
    /// accepted run on their own tasks and are allowed to finish their
    /// request/response cycle.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            drop(running.shutdown);
            info!("transfer server stopped");
        }
    }

    /// Whether the server is currently listening.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The bound address while listening, e.g. to build the URL shown to the
    /// user from the device's local IP and the actual port.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    /// Handle a single connection: accumulate the request, dispatch it to the
    /// handler, write the response, close.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        handler: HandlerFn,
        read_buffer_size: usize,
        response_timeout: Duration,
    ) -> Result<(), Error> {
        let mut request_buf = RequestBuffer::new();
        let mut chunk = vec![0; read_buffer_size];

        let request = loop {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                // Peer closed before a complete request arrived.
                return Ok(());
            }

            match request_buf.push(&chunk[..n]) {
                Ok(Some(request)) => break request,
                Ok(None) => continue,
                Err(e) => {
                    let response = ResponseSpec::new(400, "text/plain", "Bad Request");
                    socket.write_all(&response.to_bytes()).await?;
                    socket.shutdown().await?;
                    return Err(Error::Parse(e));
                }
            }
        };

        debug!("dispatching {} {}", request.method, request.path);

        let (responder, response_rx) = Responder::new();
        handler(request, responder).await;

        // The handler may have moved the responder into a task of its own;
        // wait for the response, but never forever.
        let response = match timeout(response_timeout, response_rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(Error::NoResponse),
            Err(_) => return Err(Error::ResponseTimeout(response_timeout)),
        };

        socket.write_all(&response.to_bytes()).await?;
        socket.shutdown().await?;
        Ok(())
    }
}

impl Drop for HttpServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Accept connections until the shutdown handle is dropped.
async fn accept_loop(
    listener: TcpListener,
    handler: HandlerFn,
    read_buffer_size: usize,
    response_timeout: Duration,
    mut shutdown_rx: watch::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                debug!("accept loop shutting down");
                break;
            }

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((mut socket, addr)) => {
                        debug!("connection from {addr}");
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            if let Err(e) = HttpServer::handle_connection(
                                &mut socket,
                                handler,
                                read_buffer_size,
                                response_timeout,
                            )
                            .await
                            {
                                // Never fatal: the connection is abandoned and
                                // the server keeps listening.
                                error!("connection from {addr} failed: {e}");
                            }
                        });
                    }
                    Err(e) => {
                        error!("error accepting connection: {e}");
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                }
            }
        }
    }
}
