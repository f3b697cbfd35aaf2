//! Serving core: one task owning the exposed frame, the client registry,
//! and the refresh tick.
//!
//! ```text
//!                       ┌─────────────────────────┐
//!   connection tasks ──▶│ Command channel         │
//!   client tasks     ──▶│ Detach channel          │
//!                       │                         │
//!   refresh interval ──▶│ ServingCore             │
//!                       │   exposed: ExposedFrame │
//!                       │   registry              │──▶ per-client part
//!                       └─────────────┬───────────┘    queues
//!                                     │
//!                          StreamSource mutex
//!                          (producer thread)
//! ```
//!
//! Everything that reads or mutates the exposed frame or the registry runs
//! here, so neither needs a lock. The source mutex is taken only inside
//! `try_consume`, never while a client write is in flight.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use crate::config::ServerConfig;
use crate::frame::ExposedFrame;
use crate::protocol::mjpeg::{StreamPart, PART_TRAILER, STREAM_PREAMBLE};
use crate::registry::{ClientId, ClientRegistry, StreamClient};
use crate::source::{Consume, StreamSource};

/// Commands from connection tasks to the core.
#[derive(Debug)]
pub(crate) enum Command {
    /// Hand over a hijacked `/stream` socket.
    Attach {
        socket: TcpStream,
        peer_addr: SocketAddr,
    },
    /// Snapshot the exposed frame for `/ping` and `/snapshot`.
    Inspect(oneshot::Sender<FrameInfo>),
}

/// Point-in-time view of the exposed frame.
#[derive(Debug, Clone)]
pub(crate) struct FrameInfo {
    pub payload: Bytes,
    pub width: u32,
    pub height: u32,
    pub online: bool,
}

pub(crate) struct ServingCore {
    source: Arc<StreamSource>,
    exposed: ExposedFrame,
    registry: ClientRegistry,
    commands: mpsc::Receiver<Command>,
    detach_tx: mpsc::Sender<ClientId>,
    detach_rx: mpsc::Receiver<ClientId>,
    config: ServerConfig,
    next_client_id: u64,
}

impl ServingCore {
    pub(crate) fn new(
        source: Arc<StreamSource>,
        registry: ClientRegistry,
        commands: mpsc::Receiver<Command>,
        config: ServerConfig,
    ) -> Self {
        let (detach_tx, detach_rx) = mpsc::channel(64);
        Self {
            source,
            exposed: ExposedFrame::new(),
            registry,
            commands,
            detach_tx,
            detach_rx,
            config,
            next_client_id: 1,
        }
    }

    /// Run until the command channel closes. Dropping the returned future
    /// (select-style shutdown) or letting it return drains the registry,
    /// which closes every client connection.
    pub(crate) async fn run(mut self) {
        let mut refresh = tokio::time::interval(self.config.refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = refresh.tick() => self.refresh(),
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                id = self.detach_rx.recv() => {
                    // Never `None`: the core keeps a sender for new clients.
                    if let Some(id) = id {
                        self.detach_client(id);
                    }
                }
            }
        }

        self.registry.clear();
    }

    /// One tick: reconcile the exposed frame, then fan out if warranted.
    fn refresh(&mut self) {
        match self.source.try_consume(&mut self.exposed) {
            Consume::Frame => {
                tracing::trace!("refreshing exposed frame");
                self.fan_out();
            }
            Consume::Offline => {
                tracing::debug!("producer offline, exposing blank frame");
                self.exposed.set_blank();
                self.fan_out();
            }
            // Keep blank frames flowing while the producer is down, so
            // clients see "no signal" rather than a stalled connection.
            Consume::Clean if !self.exposed.online() => self.fan_out(),
            Consume::Clean => {}
        }
    }

    /// Push the current frame to every registered client.
    fn fan_out(&mut self) {
        if self.registry.is_empty() {
            return;
        }

        let payload = self.exposed.payload();
        let mut dead = Vec::new();

        for client in self.registry.iter_mut() {
            let part = StreamPart::assemble(client.need_initial, payload.clone());
            match client.parts.try_send(part) {
                Ok(()) => client.need_initial = false,
                Err(TrySendError::Full(_)) => {
                    // Slow client: skip this frame instead of buffering
                    // without bound. A part is one message, so nothing is
                    // ever half-sent.
                    tracing::trace!(client = %client.id, "outbound queue full, frame skipped");
                }
                Err(TrySendError::Closed(_)) => dead.push(client.id),
            }
        }

        for id in dead {
            self.detach_client(id);
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Attach { socket, peer_addr } => self.attach_client(socket, peer_addr),
            Command::Inspect(reply) => {
                let _ = reply.send(FrameInfo {
                    payload: self.exposed.payload(),
                    width: self.exposed.width(),
                    height: self.exposed.height(),
                    online: self.exposed.online(),
                });
            }
        }
    }

    fn attach_client(&mut self, socket: TcpStream, peer_addr: SocketAddr) {
        let id = ClientId(self.next_client_id);
        self.next_client_id += 1;

        let (parts_tx, parts_rx) = mpsc::channel(self.config.client_queue_depth);
        tokio::spawn(client_task(id, socket, parts_rx, self.detach_tx.clone()));

        self.registry
            .insert(StreamClient::new(id, peer_addr, parts_tx));
        tracing::debug!(
            client = %id,
            peer = %peer_addr,
            clients = self.registry.len(),
            "stream client attached"
        );
    }

    fn detach_client(&mut self, id: ClientId) {
        if self.registry.remove(id).is_some() {
            tracing::debug!(client = %id, clients = self.registry.len(), "stream client detached");
        }
    }
}

/// Owns one streaming client's socket: drains the part queue onto the wire
/// and watches the read half so EOF from the client surfaces promptly.
async fn client_task(
    id: ClientId,
    socket: TcpStream,
    mut parts: mpsc::Receiver<StreamPart>,
    detach: mpsc::Sender<ClientId>,
) {
    let (mut reader, mut writer) = socket.into_split();
    let mut probe = [0u8; 512];

    loop {
        tokio::select! {
            part = parts.recv() => match part {
                Some(part) => {
                    if let Err(error) = write_part(&mut writer, &part).await {
                        tracing::debug!(client = %id, error = %error, "stream write failed");
                        break;
                    }
                }
                // Registry dropped us (detach or shutdown); just close.
                None => return,
            },
            read = reader.read(&mut probe) => match read {
                Ok(0) => {
                    tracing::debug!(client = %id, "stream client closed connection");
                    break;
                }
                // Streaming clients are not expected to send anything.
                Ok(_) => {}
                Err(error) => {
                    tracing::debug!(client = %id, error = %error, "stream read failed");
                    break;
                }
            },
        }
    }

    let _ = detach.send(id).await;
}

async fn write_part(writer: &mut OwnedWriteHalf, part: &StreamPart) -> std::io::Result<()> {
    if part.preamble {
        writer.write_all(STREAM_PREAMBLE).await?;
    }
    writer.write_all(&part.header).await?;
    writer.write_all(&part.payload).await?;
    writer.write_all(PART_TRAILER).await?;
    writer.flush().await
}
