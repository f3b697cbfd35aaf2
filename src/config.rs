//! Server configuration

use std::time::Duration;

/// Server configuration options
///
/// Immutable once the server is bound.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Reading a request head must complete within this time
    pub timeout: Duration,

    /// Cadence of the exposed-frame refresh tick
    pub refresh_interval: Duration,

    /// Outbound part queue depth per streaming client; a client whose queue
    /// is full skips frames instead of buffering without bound
    pub client_queue_depth: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            timeout: Duration::from_secs(10),
            refresh_interval: Duration::from_micros(30_000), // ~30 refreshes per second
            client_queue_depth: 8,
        }
    }
}

impl ServerConfig {
    /// Set the host to bind to
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port to bind to
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the request-head timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the refresh tick interval
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the per-client outbound queue depth (minimum 1)
    pub fn client_queue_depth(mut self, depth: usize) -> Self {
        self.client_queue_depth = depth.max(1);
        self
    }
}
