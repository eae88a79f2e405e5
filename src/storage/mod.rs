//! Storage layer for persisted favorites.
//!
//! Persistence is a plain string key-value contract so that the favorites
//! store does not care whether values land in a JSON file on the worker
//! thread, in memory during tests, or travel through the worker relay.
//!
//! # Modules
//!
//! - `backend`: The [`KeyValueStore`] trait and well-known keys
//! - `json`: JSON file backend with atomic writes
//! - `memory`: Shared in-memory backend
//! - `relay`: Write-only backend forwarding to the worker thread

pub mod backend;
pub mod json;
pub mod memory;
pub mod relay;

pub use backend::{KeyValueStore, FAVORITES_KEY};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use relay::WorkerRelay;
