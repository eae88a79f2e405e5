//! Zellij plugin wrapper and entry point.
//!
//! This is the only place that talks to the Zellij host. It maps host events
//! and keys to library [`Event`]s, runs them through [`handle_event`] and
//! executes the returned [`Action`]s.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   Zellij plugin thread       │
//! │  ┌────────────────────────┐  │   web_request / set_timeout
//! │  │  State (AppState)      │──┼──────────────────────────────▶ host
//! │  └────────────────────────┘  │
//! │        │ JSON messages ▲     │
//! │        ▼               │     │
//! │  ┌────────────────────────┐  │
//! │  │  MarqueeWorker         │  │   favorites file I/O
//! │  └────────────────────────┘  │
//! └──────────────────────────────┘
//! ```
//!
//! # Keybindings
//!
//! Any mode:
//! - `Ctrl+n` / `Down`: Move down
//! - `Ctrl+p` / `Up`: Move up
//! - `Ctrl+u`: Clear the query
//!
//! Normal mode:
//! - `j` / `k`: Move down / up
//! - `/`: Type into the query
//! - `Enter`: Show details
//! - `Esc`: Close details, or clear the search
//! - `f` / `x`: Add / remove favorite
//! - `C`: Clear favorites
//! - `P`: Prune incomplete favorites
//! - `t` / `Tab`: Cycle the media type filter
//! - `]`: Load the next page of results
//! - `s` / `v`: Search / favorites view
//! - `q`: Close
//!
//! Typing mode:
//! - Characters edit the query
//! - `Enter`: Search now (favorites view: finish)
//! - `Esc`: Stop typing

#![allow(clippy::multiple_crate_versions)]

#[cfg(target_family = "wasm")]
use plugin::{MarqueeWorker, State};
#[cfg(target_family = "wasm")]
use zellij_tile::prelude::*;

#[cfg(target_family = "wasm")]
register_plugin!(State);
#[cfg(target_family = "wasm")]
register_worker!(MarqueeWorker, marquee_worker, MARQUEE_WORKER);

/// Native builds (tests, docs) have no Zellij host to register with.
#[cfg(not(target_family = "wasm"))]
fn main() {}

#[cfg(target_family = "wasm")]
mod plugin {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use zellij_tile::prelude::*;
    use zellij_tile::shim::{post_message_to, post_message_to_plugin};

    use marquee::worker::{FavoritesWorker, WorkerMessage, WorkerResponse};
    use marquee::{handle_event, Action, Config, Event, InputMode};

    /// Name shared by the worker registration and its messages.
    const WORKER_NAME: &str = "marquee";

    /// Plugin state wrapper.
    pub(crate) struct State {
        app: marquee::AppState,
    }

    impl Default for State {
        fn default() -> Self {
            Self {
                app: marquee::initialize(&Config::default()),
            }
        }
    }

    impl ZellijPlugin for State {
        /// Parses configuration, installs tracing, builds the app state, then
        /// requests permissions. Favorites are loaded once permissions arrive.
        fn load(&mut self, configuration: BTreeMap<String, String>) {
            let config = Config::from_zellij(&configuration);
            marquee::observability::init_tracing(&config);

            let _span = tracing::debug_span!("plugin_load").entered();
            self.app = marquee::initialize(&config);

            request_permission(&[
                PermissionType::ReadApplicationState,
                PermissionType::ChangeApplicationState,
                PermissionType::WebAccess,
                PermissionType::FullHdAccess,
            ]);

            subscribe(&[
                EventType::Key,
                EventType::Timer,
                EventType::WebRequestResult,
                EventType::CustomMessage,
                EventType::PermissionRequestResult,
            ]);

            tracing::debug!(has_api_key = config.api_key.is_some(), "plugin loaded, waiting for permissions");
        }

        fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
            let event_name = Self::get_event_name(&event);
            let span_name = format!("plugin_update::{event_name}");
            let _span =
                tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name).entered();

            let our_event = match event {
                zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                    Some(event) => event,
                    None => return false,
                },
                zellij_tile::prelude::Event::Timer(elapsed) => Event::TimerFired { elapsed },
                zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => Event::WebResponse {
                    status,
                    body,
                    context,
                },
                zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                    match Self::map_custom_message_event(&message, &payload) {
                        Some(event) => event,
                        None => return false,
                    }
                }
                zellij_tile::prelude::Event::PermissionRequestResult(status) => Event::PermissionsResult {
                    granted: matches!(status, PermissionStatus::Granted),
                },
                _ => return false,
            };

            match handle_event(&mut self.app, &our_event) {
                Ok((should_render, actions)) => {
                    tracing::debug!(action_count = actions.len(), should_render = should_render, "event handled");
                    for action in &actions {
                        Self::execute_action(action);
                    }
                    should_render
                }
                Err(e) => {
                    tracing::warn!(error = %e, "error handling event");
                    false
                }
            }
        }

        fn render(&mut self, rows: usize, cols: usize) {
            marquee::ui::render(&self.app, rows, cols);
        }
    }

    impl State {
        fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
            match event {
                zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
                zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
                zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
                zellij_tile::prelude::Event::CustomMessage(message, _) => format!("CustomMessage({message})"),
                zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
                _ => "Other".to_string(),
            }
        }

        fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
            tracing::trace!(bare_key = ?key.bare_key, "key event");

            if key.has_modifiers(&[KeyModifier::Ctrl]) {
                return match key.bare_key {
                    BareKey::Char('n') => Some(Event::KeyDown),
                    BareKey::Char('p') => Some(Event::KeyUp),
                    BareKey::Char('u') => Some(Event::ClearInput),
                    _ => None,
                };
            }

            let typing = self.app.input_mode == InputMode::Typing;
            Some(match key.bare_key {
                BareKey::Down => Event::KeyDown,
                BareKey::Up => Event::KeyUp,
                BareKey::Esc if typing => Event::StopTyping,
                BareKey::Esc => Event::Escape,
                BareKey::Enter if typing => Event::Submit,
                BareKey::Enter => Event::OpenDetails,
                BareKey::Backspace if typing => Event::Backspace,
                BareKey::Tab if !typing => Event::CycleFilter,
                BareKey::Char(c) if typing => Event::Char(c),
                BareKey::Char('j') => Event::KeyDown,
                BareKey::Char('k') => Event::KeyUp,
                BareKey::Char('/') => Event::StartTyping,
                BareKey::Char('f') => Event::AddFavorite,
                BareKey::Char('x') => Event::RemoveFavorite,
                BareKey::Char('C') => Event::ClearFavorites,
                BareKey::Char('P') => Event::PruneFavorites,
                BareKey::Char('t') => Event::CycleFilter,
                BareKey::Char(']') => Event::NextPage,
                BareKey::Char('s') => Event::ShowSearch,
                BareKey::Char('v') => Event::ShowFavorites,
                BareKey::Char('q') => Event::CloseFocus,
                _ => return None,
            })
        }

        fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
            if message != WORKER_NAME {
                tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
                return None;
            }
            match serde_json::from_str::<WorkerResponse>(payload) {
                Ok(response) => Some(Event::WorkerResponse(response)),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to deserialize worker response");
                    None
                }
            }
        }

        fn post_worker_message(message: &WorkerMessage) {
            match serde_json::to_string(message) {
                Ok(payload) => {
                    tracing::debug!(message_type = message.name(), payload_len = payload.len(), "posting to worker");
                    post_message_to(PluginMessage {
                        worker_name: Some(WORKER_NAME.to_string()),
                        name: WORKER_NAME.to_string(),
                        payload,
                    });
                }
                Err(e) => tracing::warn!(error = %e, "failed to serialize worker message"),
            }
        }

        #[tracing::instrument(level = "debug", skip_all)]
        fn execute_action(action: &Action) {
            match action {
                Action::CloseFocus => hide_self(),
                Action::PostToWorker(message) => Self::post_worker_message(message),
                Action::WebRequest(request) => {
                    tracing::debug!(url = %request.url, "web request");
                    web_request(
                        request.url.clone(),
                        HttpVerb::Get,
                        request.headers.clone(),
                        vec![],
                        request.context.clone(),
                    );
                }
                Action::SetTimeout { seconds } => set_timeout(*seconds),
            }
        }
    }

    /// Worker thread entry point; wraps the library worker with host messaging.
    #[derive(Default, Serialize, Deserialize)]
    pub(crate) struct MarqueeWorker {
        worker: FavoritesWorker,
        #[serde(skip)]
        tracing_ready: bool,
    }

    impl ZellijWorker<'_> for MarqueeWorker {
        fn on_message(&mut self, message: String, payload: String) {
            if !self.tracing_ready {
                marquee::observability::init_tracing(&Config::default());
                self.tracing_ready = true;
            }

            if let Some(response) = self.worker.handle_payload(&payload) {
                post_message_to_plugin(PluginMessage {
                    name: message,
                    payload: response,
                    worker_name: None,
                });
            }
        }
    }
}
