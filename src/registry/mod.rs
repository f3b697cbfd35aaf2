//! Registry of active streaming clients.
//!
//! Only the serving core task touches the registry, so it needs no lock.
//! Removal by id is O(1) and idempotent: detach can race disconnect without
//! corrupting anything. A shared atomic mirrors the size so other tasks can
//! observe the client count without a round-trip through the core.

mod client;

pub use client::{ClientId, StreamClient};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Id-keyed set of attached streaming clients.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<ClientId, StreamClient>,
    count: Arc<AtomicUsize>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for observing the registry size from outside the core task.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.count)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn insert(&mut self, client: StreamClient) {
        self.clients.insert(client.id, client);
        self.count.store(self.clients.len(), Ordering::Relaxed);
    }

    /// Remove a client; a no-op for ids no longer present.
    pub fn remove(&mut self, id: ClientId) -> Option<StreamClient> {
        let removed = self.clients.remove(&id);
        self.count.store(self.clients.len(), Ordering::Relaxed);
        removed
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StreamClient> {
        self.clients.values_mut()
    }

    /// Drop every client, closing all their connections.
    pub fn clear(&mut self) {
        self.clients.clear();
        self.count.store(0, Ordering::Relaxed);
    }
}
