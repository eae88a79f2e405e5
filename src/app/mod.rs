//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (main.rs) and the favorites, search,
//! notification and catalog layers. Nothing here talks to the host: the
//! runtime feeds [`Event`]s in and executes the returned [`Action`]s.
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──── HTTP / Timer / Worker ───────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Input and view modes
//! - [`state`]: Central application state and view model computation
//! - [`timers`]: Bookkeeping for host timers that cannot be cancelled

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;
pub mod timers;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{FavoritesFilter, InputMode, ViewMode};
pub use state::{AppState, DetailsPanel, Selection};
pub use timers::{TimerPurpose, TimerQueue};
