//! Server configuration.

use std::time::Duration;

/// Transfer server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The TCP port to listen on. The bind address is always the wildcard
    /// address, so the device is reachable from the local network.
    pub port: u16,
    /// The read buffer size for each connection.
    pub read_buffer_size: usize,
    /// How long to wait for a handler to resolve its response before the
    /// connection is forcibly closed.
    pub response_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            read_buffer_size: 8192,
            response_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Configuration with a specific port and defaults for everything else.
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }
}
