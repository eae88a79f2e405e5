//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! plugin binary executes them in order against the Zellij host API; the
//! library itself never performs I/O.
//!
//! # Example
//!
//! ```rust
//! use marquee::app::Action;
//! use marquee::storage::FAVORITES_KEY;
//! use marquee::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_entry(FAVORITES_KEY.to_string())),
//!     Action::SetTimeout { seconds: 0.5 },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::api::HttpRequest;
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the background storage worker.
    PostToWorker(WorkerMessage),

    /// Issues an HTTP GET; the result comes back as `Event::WebResponse`
    /// carrying the request's context map.
    WebRequest(HttpRequest),

    /// Schedules a host timer; it comes back as `Event::TimerFired`.
    SetTimeout {
        /// Delay in seconds.
        seconds: f64,
    },
}
