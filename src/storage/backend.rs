//! Storage backend abstraction.
//!
//! This module defines the [`KeyValueStore`] trait, the persistence
//! collaborator of the favorites store. The contract is deliberately small: a
//! string value addressed by a string key. The favorites list is stored as a
//! JSON array under [`FAVORITES_KEY`].
//!
//! Backends can be swapped (file, in-memory, worker relay) without touching
//! store logic.

use crate::domain::error::Result;

/// Well-known key holding the JSON-encoded favorites array.
pub const FAVORITES_KEY: &str = "marquee:favorites";

/// Abstraction over string-keyed persistent storage.
///
/// # Implementations
///
/// - [`JsonFileStore`](crate::storage::JsonFileStore): JSON file with atomic writes
/// - [`MemoryStore`](crate::storage::MemoryStore): shared in-memory map
/// - [`WorkerRelay`](crate::storage::WorkerRelay): write-only relay to the worker thread
///
/// # Examples
///
/// ```
/// use marquee::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.set("greeting", "hello".to_string())?;
/// assert_eq!(store.get("greeting")?, Some("hello".to_string()));
/// assert_eq!(store.get("missing")?, None);
/// # Ok::<(), marquee::MarqueeError>(())
/// ```
pub trait KeyValueStore: Send {
    /// Reads the value stored under `key`.
    ///
    /// A missing key is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot serve reads.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be completed.
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}
