//! Debounced remote search.
//!
//! # Modules
//!
//! - `debounce`: Logical cancellable timer ([`Debouncer`])
//! - `controller`: Query lifecycle, result filtering and notifications
//!   ([`SearchController`])

pub mod controller;
pub mod debounce;

pub use controller::{
    RequestKey, SearchController, SearchFilter, SearchPhase, SearchRequest, SearchResponse, SettledOutcome,
    MIN_QUERY_LEN,
};
pub use debounce::{Debouncer, TimerTicket};
