//! Write-only storage backend that forwards writes to the worker thread.
//!
//! The plugin thread cannot touch the filesystem without blocking rendering,
//! so the favorites store on that thread persists through this relay: each
//! `set` becomes a [`WorkerMessage::StoreEntry`] queued on a channel that the
//! application drains into worker posts after every event. Reads are served
//! by the worker with [`WorkerMessage::LoadEntry`] and delivered back through
//! `FavoritesStore::complete_load`.

use crate::domain::error::{MarqueeError, Result};
use crate::storage::backend::KeyValueStore;
use crate::worker::WorkerMessage;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Relay backend handing writes to the worker thread.
#[derive(Debug, Clone)]
pub struct WorkerRelay {
    outbox: Sender<WorkerMessage>,
}

impl WorkerRelay {
    /// Creates a relay and the receiver its writes arrive on.
    #[must_use]
    pub fn new() -> (Self, Receiver<WorkerMessage>) {
        let (outbox, inbox) = channel();
        (Self { outbox }, inbox)
    }
}

impl KeyValueStore for WorkerRelay {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Err(MarqueeError::Storage(format!(
            "reads of '{key}' are served asynchronously by the worker"
        )))
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        tracing::debug!(key = %key, bytes = value.len(), "relaying write to worker");
        self.outbox
            .send(WorkerMessage::store_entry(key.to_string(), value))
            .map_err(|e| MarqueeError::Worker(format!("worker relay closed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_become_store_messages() {
        let (mut relay, inbox) = WorkerRelay::new();
        relay.set("k", "v".to_string()).unwrap();

        match inbox.try_recv().unwrap() {
            WorkerMessage::StoreEntry { key, value, .. } => {
                assert_eq!(key, "k");
                assert_eq!(value, "v");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn dropped_receiver_fails_writes() {
        let (mut relay, inbox) = WorkerRelay::new();
        drop(inbox);
        assert!(matches!(relay.set("k", "v".to_string()), Err(MarqueeError::Worker(_))));
    }

    #[test]
    fn reads_are_not_served_synchronously() {
        let (relay, _inbox) = WorkerRelay::new();
        assert!(relay.get("k").is_err());
    }
}
