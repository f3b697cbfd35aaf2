//! Per-client streaming state.

use std::net::SocketAddr;

use tokio::sync::mpsc;

use crate::protocol::mjpeg::StreamPart;

/// Identifier a streaming client keeps for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// A streaming client attached to the registry.
///
/// The registry entry is the control-plane half; the socket itself lives in
/// the client's writer task, fed through the bounded `parts` queue. Dropping
/// the entry closes the queue, which ends the writer task and the
/// connection.
#[derive(Debug)]
pub struct StreamClient {
    pub id: ClientId,
    pub peer_addr: SocketAddr,
    /// True until the preamble has been queued.
    pub need_initial: bool,
    /// Outbound part queue drained by the writer task.
    pub parts: mpsc::Sender<StreamPart>,
}

impl StreamClient {
    pub fn new(id: ClientId, peer_addr: SocketAddr, parts: mpsc::Sender<StreamPart>) -> Self {
        Self {
            id,
            peer_addr,
            need_initial: true,
            parts,
        }
    }
}
