//! Worker thread implementation for favorites storage.
//!
//! The worker owns the [`JsonFileStore`] and answers [`WorkerMessage`]s posted
//! by the plugin thread. Zellij binds it through the `ZellijWorker` trait in
//! the plugin binary; this module holds everything that does not need the
//! host, so it runs in native tests against any [`KeyValueStore`].

use crate::domain::error::{MarqueeError, Result};
use crate::infrastructure::paths;
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};

/// Worker thread state for handling storage operations.
///
/// The storage backend is initialized lazily on the first message so that
/// constructing the worker (which Zellij does eagerly) never touches disk.
#[derive(Serialize, Deserialize, Default)]
pub struct FavoritesWorker {
    /// Storage backend, initialized lazily on first use.
    #[serde(skip)]
    storage: Option<Box<dyn KeyValueStore>>,
}

impl std::fmt::Debug for FavoritesWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesWorker")
            .field("initialized", &self.storage.is_some())
            .finish()
    }
}

impl FavoritesWorker {
    /// Creates a worker over an explicit backend.
    #[must_use]
    pub fn with_storage(storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// Opens the default JSON file backend if none is set yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// existing store file is unreadable.
    pub fn ensure_storage(&mut self) -> Result<()> {
        if self.storage.is_none() {
            let store = JsonFileStore::open(paths::store_path())?;
            self.storage = Some(Box::new(store));
        }
        Ok(())
    }

    fn get_storage(&mut self) -> Result<&mut Box<dyn KeyValueStore>> {
        self.storage
            .as_mut()
            .ok_or_else(|| MarqueeError::Worker("Storage not initialized".to_string()))
    }

    /// Converts a storage result to a response with consistent logging.
    fn handle_store_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Attaches the parent trace context carried by `message`.
    ///
    /// The returned guard must be held while the message is processed.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = message.name()).entered();

        match message {
            WorkerMessage::LoadEntry { key, .. } => Self::handle_store_result(
                "load entry",
                self.get_storage().and_then(|storage| storage.get(&key)),
                |value| {
                    tracing::debug!(key = %key, found = value.is_some(), "entry loaded");
                    WorkerResponse::EntryLoaded { key, value }
                },
            ),
            WorkerMessage::StoreEntry { key, value, .. } => Self::handle_store_result(
                "store entry",
                self.get_storage().and_then(|storage| storage.set(&key, value)),
                |()| WorkerResponse::EntryStored { key },
            ),
        }
    }

    /// Decodes a JSON payload, processes it and encodes the response.
    ///
    /// Returns `None` when the payload is not a valid message or the response
    /// cannot be encoded; both are logged.
    pub fn handle_payload(&mut self, payload: &str) -> Option<String> {
        let response = match self.ensure_storage() {
            Ok(()) => {
                let message: WorkerMessage = match serde_json::from_str(payload) {
                    Ok(message) => message,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to deserialize worker message");
                        return None;
                    }
                };
                self.handle_message(message)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to initialize storage");
                WorkerResponse::Error {
                    message: format!("Failed to initialize storage: {e}"),
                }
            }
        };

        match serde_json::to_string(&response) {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker response");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, FAVORITES_KEY};

    #[test]
    fn load_of_unwritten_key_is_none() {
        let mut worker = FavoritesWorker::with_storage(Box::new(MemoryStore::new()));
        let response = worker.handle_message(WorkerMessage::load_entry(FAVORITES_KEY.to_string()));
        assert_eq!(
            response,
            WorkerResponse::EntryLoaded {
                key: FAVORITES_KEY.to_string(),
                value: None
            }
        );
    }

    #[test]
    fn store_then_load_through_payloads() {
        let memory = MemoryStore::new();
        let mut worker = FavoritesWorker::with_storage(Box::new(memory.clone()));

        let store = serde_json::to_string(&WorkerMessage::store_entry("k".to_string(), "[]".to_string())).unwrap();
        let reply = worker.handle_payload(&store).unwrap();
        assert_eq!(
            serde_json::from_str::<WorkerResponse>(&reply).unwrap(),
            WorkerResponse::EntryStored { key: "k".to_string() }
        );
        assert_eq!(memory.peek("k").as_deref(), Some("[]"));
    }

    #[test]
    fn failed_write_becomes_error_response() {
        let memory = MemoryStore::new();
        memory.fail_writes(true);
        let mut worker = FavoritesWorker::with_storage(Box::new(memory));

        let response = worker.handle_message(WorkerMessage::store_entry("k".to_string(), "[]".to_string()));
        assert!(matches!(response, WorkerResponse::Error { .. }));
    }

    #[test]
    fn garbage_payload_is_dropped() {
        let mut worker = FavoritesWorker::with_storage(Box::new(MemoryStore::new()));
        assert_eq!(worker.handle_payload("not json"), None);
    }
}
