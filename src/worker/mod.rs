//! Background worker thread for favorites storage I/O.
//!
//! Disk access happens here so the plugin thread never blocks on the
//! filesystem. Messages are JSON-encoded and carry tracing context.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker state and message processing

pub mod handler;
pub mod messages;

pub use handler::FavoritesWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
