//! Event handling and state transition logic.
//!
//! The plugin runtime translates keys and host events into [`Event`]s and
//! feeds them to [`handle_event`], which mutates [`AppState`] and returns the
//! side effects to perform as [`Action`]s. Responses to those effects (HTTP
//! results, fired timers, worker replies) come back as events too.
//!
//! ```text
//! Key / host event → Event → handle_event → AppState mutation → Actions
//!        ↑                                                        ↓
//!        └──────── WebResponse / TimerFired / WorkerResponse ─────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use marquee::app::{handle_event, AppState, Event};
//! use marquee::ui::Theme;
//! use marquee::Config;
//!
//! let mut state = AppState::new(&Config::default(), Theme::default());
//! let (should_render, actions) = handle_event(&mut state, &Event::KeyDown)?;
//! assert!(should_render);
//! assert!(actions.is_empty());
//! # Ok::<(), marquee::MarqueeError>(())
//! ```

use super::modes::{InputMode, ViewMode};
use super::state::{DetailsPanel, Selection};
use super::timers::TimerPurpose;
use crate::api::{
    parse_details_response, parse_genres_response, parse_search_response, DetailsPurpose, RequestKind,
};
use crate::app::{Action, AppState};
use crate::domain::error::{MarqueeError, Result};
use crate::domain::{MediaType, NewFavorite, SearchError};
use crate::notify::Notification;
use crate::search::{RequestKey, SearchRequest, TimerTicket};
use crate::storage::FAVORITES_KEY;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::collections::BTreeMap;

/// Events triggered by user input, host callbacks, or worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Moves the cursor down one row (wraps to top).
    KeyDown,
    /// Moves the cursor up one row (wraps to bottom).
    KeyUp,
    /// Hides the plugin pane.
    CloseFocus,

    /// Starts editing the query of the current view.
    StartTyping,
    /// Leaves typing mode, keeping the query.
    StopTyping,
    /// Appends a character to the query of the current view.
    Char(char),
    /// Removes the last character of the query.
    Backspace,
    /// Clears the query of the current view.
    ClearInput,
    /// Submits the search query now, or finishes the favorites filter.
    Submit,
    /// Closes the details panel, or clears the search when none is open.
    Escape,
    /// Cycles the media type filter of the current view.
    CycleFilter,

    /// Switches to remote search results.
    ShowSearch,
    /// Switches to the favorites list.
    ShowFavorites,

    /// Opens the details panel for the selected row.
    OpenDetails,
    /// Closes the details panel.
    CloseDetails,

    /// Adds the selected row to favorites.
    AddFavorite,
    /// Removes the selected row from favorites.
    RemoveFavorite,
    /// Removes every favorite.
    ClearFavorites,
    /// Drops movie and TV favorites that lack runtime or genres.
    PruneFavorites,

    /// Requests the next page of search results.
    NextPage,

    /// A host timer fired after `elapsed` seconds.
    TimerFired {
        elapsed: f64,
    },

    /// Result of an [`Action::WebRequest`], with the request's context map.
    WebResponse {
        status: u16,
        body: Vec<u8>,
        context: BTreeMap<String, String>,
    },

    /// Wraps a response from the storage worker.
    WorkerResponse(WorkerResponse),

    /// Outcome of the permission request made at load.
    PermissionsResult {
        granted: bool,
    },
}

/// Processes an event, mutates application state, and returns whether to
/// re-render along with the actions to execute.
///
/// # Errors
///
/// Reserved for failures the runtime should log; recoverable problems are
/// reported through notifications instead.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    let mut actions = vec![];
    let should_render = match event {
        Event::KeyDown => {
            state.move_selection_down();
            true
        }
        Event::KeyUp => {
            state.move_selection_up();
            true
        }
        Event::CloseFocus => {
            actions.push(Action::CloseFocus);
            false
        }
        Event::StartTyping => {
            state.input_mode = InputMode::Typing;
            true
        }
        Event::StopTyping => {
            state.input_mode = InputMode::Normal;
            true
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Typing {
                return Ok((false, vec![]));
            }
            match state.view_mode {
                ViewMode::Search => {
                    let ticket = state.search.push_char(*c);
                    schedule_debounce(state, ticket, &mut actions);
                }
                ViewMode::Favorites => {
                    state.favorites_query.push(*c);
                    state.selected_index = 0;
                }
            }
            true
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Typing {
                return Ok((false, vec![]));
            }
            match state.view_mode {
                ViewMode::Search => {
                    let ticket = state.search.pop_char();
                    schedule_debounce(state, ticket, &mut actions);
                }
                ViewMode::Favorites => {
                    state.favorites_query.pop();
                    state.clamp_selection();
                }
            }
            true
        }
        Event::ClearInput => {
            match state.view_mode {
                ViewMode::Search => state.search.clear(),
                ViewMode::Favorites => state.favorites_query.clear(),
            }
            state.selected_index = 0;
            true
        }
        Event::Submit => {
            state.input_mode = InputMode::Normal;
            if state.view_mode == ViewMode::Search {
                if let Some(request) = state.search.submit(&mut state.notifications) {
                    state.selected_index = 0;
                    issue_search(state, &request, &mut actions);
                }
            }
            true
        }
        Event::Escape => {
            if state.details == DetailsPanel::Closed {
                if state.view_mode == ViewMode::Search {
                    state.search.clear();
                    state.selected_index = 0;
                }
            } else {
                state.details = DetailsPanel::Closed;
            }
            true
        }
        Event::CycleFilter => {
            match state.view_mode {
                ViewMode::Search => {
                    let filter = state.search.cycle_filter();
                    tracing::debug!(filter = filter.as_str(), "search filter changed");
                }
                ViewMode::Favorites => {
                    state.favorites_filter = state.favorites_filter.next();
                    tracing::debug!(filter = state.favorites_filter.label(), "favorites filter changed");
                }
            }
            state.clamp_selection();
            true
        }
        Event::ShowSearch => {
            switch_view(state, ViewMode::Search);
            true
        }
        Event::ShowFavorites => {
            state.search.teardown();
            switch_view(state, ViewMode::Favorites);
            true
        }
        Event::OpenDetails => {
            open_details(state, &mut actions);
            true
        }
        Event::CloseDetails => {
            state.details = DetailsPanel::Closed;
            true
        }
        Event::AddFavorite => {
            add_selected_favorite(state, &mut actions);
            true
        }
        Event::RemoveFavorite => {
            let Some(((id, media_type), title)) = state.selection().map(|s| (s.key(), s.title().to_string())) else {
                return Ok((false, vec![]));
            };
            if state.favorites.remove(id, media_type, &mut state.notifications).is_none() {
                tracing::debug!(id = id, title = %title, "selection is not a favorite");
            }
            state.clamp_selection();
            true
        }
        Event::ClearFavorites => {
            let removed = state.favorites.clear(&mut state.notifications);
            tracing::debug!(removed = removed, "favorites cleared");
            state.clamp_selection();
            true
        }
        Event::PruneFavorites => {
            let pruned = state.favorites.prune_incomplete();
            tracing::debug!(pruned = pruned, "incomplete favorites pruned");
            state.clamp_selection();
            true
        }
        Event::NextPage => {
            if state.view_mode != ViewMode::Search {
                return Ok((false, vec![]));
            }
            match state.search.next_page() {
                Some(request) => {
                    issue_search(state, &request, &mut actions);
                    true
                }
                None => false,
            }
        }
        Event::TimerFired { elapsed } => match state.timers.resolve(*elapsed) {
            Some(TimerPurpose::SearchDebounce(ticket)) => match state.search.on_timer(ticket) {
                Some(request) => {
                    state.selected_index = 0;
                    issue_search(state, &request, &mut actions);
                    true
                }
                None => false,
            },
            Some(TimerPurpose::DismissToast(id)) => state.notifications.dismiss(id),
            None => {
                tracing::debug!(elapsed = elapsed, "timer fired with nothing pending");
                false
            }
        },
        Event::WebResponse { status, body, context } => handle_web_response(state, *status, body, context),
        Event::WorkerResponse(response) => handle_worker_response(state, response),
        Event::PermissionsResult { granted } => {
            if *granted {
                state.permissions_granted = true;
                state.notifications.mark_ready();
                actions.push(Action::PostToWorker(WorkerMessage::load_entry(FAVORITES_KEY.to_string())));
                if state.client.has_credentials() {
                    for media_type in [MediaType::Movie, MediaType::Tv] {
                        match state.client.genres_request(media_type) {
                            Ok(request) => actions.push(Action::WebRequest(request)),
                            Err(e) => tracing::warn!(error = %e, "cannot request genres"),
                        }
                    }
                }
                true
            } else {
                tracing::warn!("permissions denied, plugin stays inert");
                false
            }
        }
    };

    let flushed = finish(state, &mut actions);
    Ok((should_render || flushed, actions))
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::KeyDown => "KeyDown",
        Event::KeyUp => "KeyUp",
        Event::CloseFocus => "CloseFocus",
        Event::StartTyping => "StartTyping",
        Event::StopTyping => "StopTyping",
        Event::Char(_) => "Char",
        Event::Backspace => "Backspace",
        Event::ClearInput => "ClearInput",
        Event::Submit => "Submit",
        Event::Escape => "Escape",
        Event::CycleFilter => "CycleFilter",
        Event::ShowSearch => "ShowSearch",
        Event::ShowFavorites => "ShowFavorites",
        Event::OpenDetails => "OpenDetails",
        Event::CloseDetails => "CloseDetails",
        Event::AddFavorite => "AddFavorite",
        Event::RemoveFavorite => "RemoveFavorite",
        Event::ClearFavorites => "ClearFavorites",
        Event::PruneFavorites => "PruneFavorites",
        Event::NextPage => "NextPage",
        Event::TimerFired { .. } => "TimerFired",
        Event::WebResponse { .. } => "WebResponse",
        Event::WorkerResponse(_) => "WorkerResponse",
        Event::PermissionsResult { .. } => "PermissionsResult",
    }
}

/// Turns queued storage writes into worker posts and schedules dismissal of
/// newly shown toasts. Returns `true` when a toast appeared.
fn finish(state: &mut AppState, actions: &mut Vec<Action>) -> bool {
    for message in state.drain_storage_writes() {
        actions.push(Action::PostToWorker(message));
    }

    let shown = state.notifications.take_shown();
    let any_shown = !shown.is_empty();
    for id in shown {
        let seconds = state.timers.schedule(TimerPurpose::DismissToast(id), state.toast_duration);
        actions.push(Action::SetTimeout { seconds });
    }
    any_shown
}

fn switch_view(state: &mut AppState, view_mode: ViewMode) {
    if state.view_mode == view_mode {
        return;
    }
    tracing::debug!(from = ?state.view_mode, to = ?view_mode, "switching view");
    state.view_mode = view_mode;
    state.input_mode = InputMode::Normal;
    state.details = DetailsPanel::Closed;
    state.selected_index = 0;
}

fn schedule_debounce(state: &mut AppState, ticket: Option<TimerTicket>, actions: &mut Vec<Action>) {
    if let Some(ticket) = ticket {
        let seconds = state.timers.schedule(TimerPurpose::SearchDebounce(ticket.id), ticket.delay);
        actions.push(Action::SetTimeout { seconds });
    }
}

/// Builds the HTTP request for a committed search. A request that cannot be
/// built settles the search with that error right away.
fn issue_search(state: &mut AppState, request: &SearchRequest, actions: &mut Vec<Action>) {
    match state.client.search_request(request) {
        Ok(http) => actions.push(Action::WebRequest(http)),
        Err(error) => {
            if let Err(error) = state.search.on_response(&request.key, Err(error), &mut state.notifications) {
                tracing::debug!(error = %error, "search settled without a request");
            }
        }
    }
}

fn open_details(state: &mut AppState, actions: &mut Vec<Action>) {
    let Some(((id, media_type), title)) = state.selection().map(|s| (s.key(), s.title().to_string())) else {
        return;
    };
    if state.details.loaded(id, media_type).is_some() || state.details.is_loading(id, media_type) {
        return;
    }

    match state.client.details_request(media_type, id, DetailsPurpose::View) {
        Ok(request) => {
            tracing::debug!(id = id, media_type = media_type.as_str(), "fetching details");
            state.details = DetailsPanel::Loading { media_type, id, title };
            actions.push(Action::WebRequest(request));
        }
        Err(error) => {
            state.details = DetailsPanel::Failed {
                title,
                message: error.user_message(),
            };
        }
    }
}

/// Adds the selection to favorites.
///
/// People and rows that already are favorites go straight to the store.
/// Movies and TV shows are enriched with runtime and genres first, from the
/// open details panel when it shows the same item, otherwise by fetching.
fn add_selected_favorite(state: &mut AppState, actions: &mut Vec<Action>) {
    let Some(selection) = state.selection() else {
        return;
    };
    let (id, media_type) = selection.key();

    let favorite = match selection {
        Selection::Favorite(item) => Some(NewFavorite::new(item.id, item.media_type, item.title.clone())),
        Selection::Search(item) if state.favorites.is_favorite(id, media_type) => {
            Some(NewFavorite::new(id, media_type, item.title.clone()))
        }
        Selection::Search(item) if media_type == MediaType::Person => Some(NewFavorite::from_search_item(item)),
        Selection::Search(_) => state.details.loaded(id, media_type).map(crate::api::Details::to_favorite),
    };

    if let Some(favorite) = favorite {
        store_favorite(state, favorite);
        return;
    }

    if !state.pending_favorites.insert((id, media_type)) {
        tracing::debug!(id = id, "favorite enrichment already in flight");
        return;
    }
    match state.client.details_request(media_type, id, DetailsPurpose::Favorite) {
        Ok(request) => actions.push(Action::WebRequest(request)),
        Err(error) => {
            state.pending_favorites.remove(&(id, media_type));
            notify_enrichment_failure(state, &error);
        }
    }
}

fn store_favorite(state: &mut AppState, favorite: NewFavorite) {
    if let Err(e) = state.favorites.add(favorite, &mut state.notifications) {
        match e {
            MarqueeError::Validation(_) => tracing::warn!(error = %e, "rejected favorite"),
            _ => tracing::error!(error = %e, "failed to add favorite"),
        }
    }
}

fn notify_enrichment_failure(state: &mut AppState, error: &SearchError) {
    tracing::warn!(error = %error, "favorite enrichment failed");
    state.notifications.emit_notification(Notification::error(
        "Could not add favorite",
        Some(error.user_message()),
    ));
}

fn handle_web_response(state: &mut AppState, status: u16, body: &[u8], context: &BTreeMap<String, String>) -> bool {
    let Some(kind) = RequestKind::from_context(context) else {
        tracing::debug!(?context, "ignoring web response without routing context");
        return false;
    };
    let _span = tracing::debug_span!("web_response", status = status, bytes = body.len()).entered();

    match kind {
        RequestKind::Search(key) => handle_search_response(state, status, body, &key),
        RequestKind::Details {
            media_type,
            id,
            purpose: DetailsPurpose::View,
        } => {
            if !state.details.is_loading(id, media_type) {
                tracing::debug!(id = id, "discarding stale details response");
                return false;
            }
            state.details = match parse_details_response(status, body, media_type) {
                Ok(details) => DetailsPanel::Loaded(Box::new(details)),
                Err(error) => {
                    tracing::warn!(id = id, error = %error, "details fetch failed");
                    let title = match &state.details {
                        DetailsPanel::Loading { title, .. } => title.clone(),
                        _ => String::new(),
                    };
                    DetailsPanel::Failed {
                        title,
                        message: error.user_message(),
                    }
                }
            };
            true
        }
        RequestKind::Details {
            media_type,
            id,
            purpose: DetailsPurpose::Favorite,
        } => {
            if !state.pending_favorites.remove(&(id, media_type)) {
                tracing::debug!(id = id, "discarding unexpected enrichment response");
                return false;
            }
            match parse_details_response(status, body, media_type) {
                Ok(details) => store_favorite(state, details.to_favorite()),
                Err(error) => notify_enrichment_failure(state, &error),
            }
            true
        }
        RequestKind::Genres(media_type) => {
            match parse_genres_response(status, body) {
                Ok(genres) => {
                    tracing::debug!(media_type = media_type.as_str(), count = genres.len(), "genres loaded");
                    state.genres.extend(genres);
                }
                Err(error) => tracing::warn!(error = %error, "failed to load genres"),
            }
            false
        }
    }
}

fn handle_search_response(state: &mut AppState, status: u16, body: &[u8], key: &RequestKey) -> bool {
    let result = parse_search_response(status, body, key);
    let first_page = key.page <= 1;
    let was_current = state.search.in_flight() == Some(key);

    if let Err(error) = state.search.on_response(key, result, &mut state.notifications) {
        tracing::debug!(error = %error, "search settled with error");
    }
    if was_current && first_page {
        state.selected_index = 0;
    }
    state.clamp_selection();
    was_current
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> bool {
    match response {
        WorkerResponse::EntryLoaded { key, value } if key == FAVORITES_KEY => {
            let report = state.favorites.complete_load(value.as_deref(), &mut state.notifications);
            tracing::info!(
                loaded = report.loaded,
                skipped = report.skipped,
                pruned = report.pruned,
                merged = report.merged,
                "favorites loaded"
            );
            state.clamp_selection();
            true
        }
        WorkerResponse::EntryLoaded { key, .. } => {
            tracing::debug!(key = %key, "ignoring unknown storage entry");
            false
        }
        WorkerResponse::EntryStored { key } => {
            tracing::trace!(key = %key, "worker confirmed write");
            false
        }
        WorkerResponse::Error { message } => {
            tracing::warn!(error = %message, "worker error");
            if state.favorites.is_initialized() {
                false
            } else {
                // Without a readable store the session runs from memory.
                state.favorites.complete_load(None, &mut state.notifications);
                true
            }
        }
    }
}
