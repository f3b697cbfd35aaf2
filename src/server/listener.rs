//! HTTP listener: bind, accept loop, and server lifecycle.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::registry::ClientRegistry;
use crate::server::conn;
use crate::server::core::{Command, ServingCore};
use crate::source::StreamSource;

/// The MJPEG HTTP server.
///
/// Bind first, then drive with [`run`](Self::run) or
/// [`run_until`](Self::run_until); both consume the server. Keep a
/// [`handle`](Self::handle) around for observation.
pub struct HttpServer {
    config: ServerConfig,
    listener: TcpListener,
    local_addr: SocketAddr,
    source: Arc<StreamSource>,
    registry: ClientRegistry,
}

/// Cheap observer onto a running (or bound) server.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    clients: Arc<AtomicUsize>,
}

impl ServerHandle {
    /// The actually bound address (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Number of currently attached streaming clients.
    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }
}

impl HttpServer {
    /// Bind the listen socket. Failure here is configuration-fatal.
    pub async fn bind(config: ServerConfig, source: Arc<StreamSource>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        tracing::debug!(addr = %addr, "binding HTTP");

        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .await
            .map_err(|error| Error::Bind {
                addr: addr.clone(),
                source: error,
            })?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "listening HTTP");

        Ok(Self {
            config,
            listener,
            local_addr,
            source,
            registry: ClientRegistry::new(),
        })
    }

    /// The actually bound address (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Observer handle that stays valid while the server runs.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            local_addr: self.local_addr,
            clients: self.registry.counter(),
        }
    }

    /// Run forever (until the task is aborted).
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run until `shutdown` resolves, then drop every client connection.
    /// No goodbye frame is sent; TCP close is the signal.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let (commands_tx, commands_rx) = mpsc::channel(32);
        let core = ServingCore::new(
            Arc::clone(&self.source),
            self.registry,
            commands_rx,
            self.config.clone(),
        );

        tracing::info!("starting HTTP serving loop");
        tokio::select! {
            _ = shutdown => tracing::info!("shutdown signal received"),
            _ = accept_loop(self.listener, self.config, commands_tx) => {}
            _ = core.run() => {}
        }
        tracing::info!("HTTP serving loop stopped");
        Ok(())
    }
}

async fn accept_loop(
    listener: TcpListener,
    config: ServerConfig,
    commands: mpsc::Sender<Command>,
) {
    loop {
        match listener.accept().await {
            Ok((socket, peer_addr)) => {
                let config = config.clone();
                let commands = commands.clone();
                tokio::spawn(async move {
                    if let Err(error) =
                        conn::handle_connection(socket, peer_addr, config, commands).await
                    {
                        tracing::debug!(peer = %peer_addr, error = %error, "connection error");
                    }
                });
            }
            Err(error) => tracing::error!(error = %error, "failed to accept connection"),
        }
    }
}
