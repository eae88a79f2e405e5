//! Search query lifecycle.
//!
//! ```text
//! Idle ──edit (≥2 chars)──▶ Typing ──debounce fired / submit──▶ Committed ──response──▶ Settled
//!   ▲                         │ ▲                                                          │
//!   └──────── clear ──────────┘ └─────────────────────── edit ─────────────────────────────┘
//! ```
//!
//! The controller never performs I/O. Operations that start a fetch return a
//! [`SearchRequest`]; the caller executes it and hands the outcome back to
//! [`SearchController::on_response`] with the request's key. Only the single
//! in-flight key is accepted, so a superseded response is discarded.

use crate::domain::error::SearchError;
use crate::domain::{MediaType, SearchItem};
use crate::notify::{Notification, NotificationBus};
use crate::search::debounce::{Debouncer, TimerTicket};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum trimmed query length that arms the debounce timer.
pub const MIN_QUERY_LEN: usize = 2;

/// Result partition by media type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFilter {
    #[default]
    All,
    Movie,
    Tv,
}

impl SearchFilter {
    /// Filters in tab order.
    pub const ALL: [Self; 3] = [Self::All, Self::Movie, Self::Tv];

    #[must_use]
    pub const fn matches(self, media_type: MediaType) -> bool {
        match self {
            Self::All => true,
            Self::Movie => matches!(media_type, MediaType::Movie),
            Self::Tv => matches!(media_type, MediaType::Tv),
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Movie,
            Self::Movie => Self::Tv,
            Self::Tv => Self::All,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Movie => "Movies",
            Self::Tv => "TV Shows",
        }
    }

    /// Wire value of the `type` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

/// How a fetch resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettledOutcome {
    Results,
    Error,
}

/// Where the controller is in the query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing to search for.
    Idle,
    /// Debounce armed.
    Typing,
    /// Fetch in flight.
    Committed,
    /// Fetch resolved. Stays here until the next input.
    Settled(SettledOutcome),
}

/// Identity of one fetch. Responses are matched against the in-flight key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub query: String,
    pub page: u32,
    pub seq: u64,
}

/// A fetch the caller must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub key: RequestKey,
}

/// Normalized search payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchItem>,
    pub total_results: u32,
    pub total_pages: u32,
    pub current_page: u32,
    pub query: String,
}

/// Debounced search session.
#[derive(Debug)]
pub struct SearchController {
    raw_query: String,
    committed_query: String,
    last_submitted: Option<String>,
    active_filter: SearchFilter,
    phase: SearchPhase,
    debouncer: Debouncer,

    results: Vec<SearchItem>,
    total_results: u32,
    total_pages: u32,
    current_page: u32,

    in_flight: Option<RequestKey>,
    next_seq: u64,

    /// Last `(committed_query, total_results)` pair that was announced.
    announced: Option<(String, u32)>,
    config_error_shown: bool,
    last_error: Option<SearchError>,
}

impl SearchController {
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            raw_query: String::new(),
            committed_query: String::new(),
            last_submitted: None,
            active_filter: SearchFilter::All,
            phase: SearchPhase::Idle,
            debouncer: Debouncer::new(debounce),
            results: Vec::new(),
            total_results: 0,
            total_pages: 0,
            current_page: 0,
            in_flight: None,
            next_seq: 1,
            announced: None,
            config_error_shown: false,
            last_error: None,
        }
    }

    /// Replaces the live query text.
    ///
    /// Returns the ticket to schedule when the trimmed text is long enough;
    /// otherwise any pending promotion is cancelled and the controller goes
    /// idle. An in-flight fetch is left alone either way.
    pub fn set_query(&mut self, text: impl Into<String>) -> Option<TimerTicket> {
        self.raw_query = text.into();
        self.on_edit()
    }

    pub fn push_char(&mut self, c: char) -> Option<TimerTicket> {
        self.raw_query.push(c);
        self.on_edit()
    }

    pub fn pop_char(&mut self) -> Option<TimerTicket> {
        self.raw_query.pop();
        self.on_edit()
    }

    fn on_edit(&mut self) -> Option<TimerTicket> {
        if trimmed_len(&self.raw_query) >= MIN_QUERY_LEN {
            let ticket = self.debouncer.arm();
            self.phase = SearchPhase::Typing;
            tracing::trace!(query = %self.raw_query, ticket = ticket.id, "debounce armed");
            Some(ticket)
        } else {
            self.debouncer.cancel();
            self.phase = SearchPhase::Idle;
            None
        }
    }

    /// Handles a fired debounce timer.
    ///
    /// Stale or cancelled tickets are ignored. A live ticket promotes the
    /// trimmed query and returns the fetch to run.
    pub fn on_timer(&mut self, ticket_id: u64) -> Option<SearchRequest> {
        if !self.debouncer.fire(ticket_id) {
            tracing::trace!(ticket = ticket_id, "ignoring stale debounce ticket");
            return None;
        }

        let query = self.raw_query.trim().to_string();
        if query.chars().count() < MIN_QUERY_LEN {
            return None;
        }
        Some(self.commit(query))
    }

    /// Submits the current query immediately, bypassing the debounce.
    ///
    /// An empty trimmed query is rejected silently. Otherwise emits one
    /// "Searching" notification and always returns a fetch, even for the
    /// query already committed.
    pub fn submit(&mut self, bus: &mut NotificationBus) -> Option<SearchRequest> {
        let query = self.raw_query.trim().to_string();
        if query.is_empty() {
            tracing::debug!("ignoring empty search submit");
            return None;
        }

        self.debouncer.cancel();
        self.last_submitted = Some(query.clone());
        bus.emit_notification(Notification::info("Searching", Some(format!("Searching for \"{query}\"..."))));

        Some(self.commit(query))
    }

    fn commit(&mut self, query: String) -> SearchRequest {
        let key = RequestKey {
            query: query.clone(),
            page: 1,
            seq: self.bump_seq(),
        };
        tracing::debug!(query = %query, seq = key.seq, "search committed");

        self.committed_query = query;
        self.in_flight = Some(key.clone());
        self.phase = SearchPhase::Committed;
        self.last_error = None;
        SearchRequest { key }
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Requests the next page of the committed query.
    ///
    /// Returns `None` unless results are settled, more pages exist and no
    /// other fetch is in flight.
    pub fn next_page(&mut self) -> Option<SearchRequest> {
        if self.phase != SearchPhase::Settled(SettledOutcome::Results)
            || self.in_flight.is_some()
            || self.current_page >= self.total_pages
        {
            return None;
        }

        let key = RequestKey {
            query: self.committed_query.clone(),
            page: self.current_page + 1,
            seq: self.bump_seq(),
        };
        tracing::debug!(query = %key.query, page = key.page, "requesting next page");

        self.in_flight = Some(key.clone());
        self.phase = SearchPhase::Committed;
        Some(SearchRequest { key })
    }

    /// Applies the outcome of the fetch identified by `key`.
    ///
    /// A response whose key is not the in-flight one is discarded. Failures
    /// are returned to the caller after being notified.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, unchanged.
    pub fn on_response(
        &mut self,
        key: &RequestKey,
        result: Result<SearchResponse, SearchError>,
        bus: &mut NotificationBus,
    ) -> Result<(), SearchError> {
        if self.in_flight.as_ref() != Some(key) {
            tracing::debug!(query = %key.query, seq = key.seq, "discarding stale search response");
            return Ok(());
        }
        self.in_flight = None;

        match result {
            Ok(response) => {
                self.apply_results(key, response);
                self.announce_results(bus);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(query = %key.query, error = %error, "search failed");
                self.phase = SearchPhase::Settled(SettledOutcome::Error);
                self.notify_error(&error, bus);
                self.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    fn apply_results(&mut self, key: &RequestKey, response: SearchResponse) {
        if key.page <= 1 {
            self.results = response.results;
        } else {
            for item in response.results {
                if !self.results.iter().any(|existing| existing.key() == item.key()) {
                    self.results.push(item);
                }
            }
        }
        self.total_results = response.total_results;
        self.total_pages = response.total_pages;
        self.current_page = key.page;
        self.phase = SearchPhase::Settled(SettledOutcome::Results);
        self.last_error = None;

        tracing::debug!(
            query = %key.query,
            page = key.page,
            total_results = self.total_results,
            loaded = self.results.len(),
            "search settled"
        );
    }

    fn announce_results(&mut self, bus: &mut NotificationBus) {
        let pair = (self.committed_query.clone(), self.total_results);
        if self.announced.as_ref() == Some(&pair) {
            return;
        }

        let notification = if self.total_results == 0 {
            Notification::info("No results", Some(format!("No results for \"{}\"", pair.0)))
        } else {
            let noun = if self.total_results == 1 { "result" } else { "results" };
            Notification::success(
                "Results found",
                Some(format!("{} {noun} for \"{}\"", self.total_results, pair.0)),
            )
        };
        bus.emit_notification(notification);
        self.announced = Some(pair);
    }

    fn notify_error(&mut self, error: &SearchError, bus: &mut NotificationBus) {
        if error.is_configuration() {
            if self.config_error_shown {
                tracing::debug!("configuration error already shown this session");
                return;
            }
            self.config_error_shown = true;
            bus.emit_notification(Notification::error("TMDB API key not configured", Some(error.user_message())));
        } else {
            bus.emit_notification(Notification::error("Search failed", Some(error.user_message())));
        }
    }

    /// Changes the visible partition. Never fetches.
    pub fn set_filter(&mut self, filter: SearchFilter) {
        self.active_filter = filter;
    }

    pub fn cycle_filter(&mut self) -> SearchFilter {
        self.active_filter = self.active_filter.next();
        self.active_filter
    }

    /// Resets the session to idle, cancelling the pending promotion and
    /// forgetting any in-flight fetch. The filter returns to `All`.
    pub fn clear(&mut self) {
        tracing::debug!("search cleared");
        self.debouncer.cancel();
        self.raw_query.clear();
        self.committed_query.clear();
        self.last_submitted = None;
        self.active_filter = SearchFilter::All;
        self.phase = SearchPhase::Idle;
        self.results.clear();
        self.total_results = 0;
        self.total_pages = 0;
        self.current_page = 0;
        self.in_flight = None;
        self.announced = None;
        self.last_error = None;
    }

    /// Unregisters pending work when the search surface goes away.
    ///
    /// Query text, results and filter are kept.
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.in_flight = None;
        if matches!(self.phase, SearchPhase::Typing | SearchPhase::Committed) {
            self.phase = if self.results.is_empty() {
                SearchPhase::Idle
            } else {
                SearchPhase::Settled(SettledOutcome::Results)
            };
        }
    }

    /// Whether results follow the text as it is typed, rather than an
    /// explicit submit of the same text.
    #[must_use]
    pub fn is_real_time(&self) -> bool {
        let trimmed = self.raw_query.trim();
        trimmed.chars().count() >= MIN_QUERY_LEN && self.last_submitted.as_deref() != Some(trimmed)
    }

    /// Fetched results matching the active filter, in fetch order.
    #[must_use]
    pub fn visible_results(&self) -> Vec<&SearchItem> {
        self.results
            .iter()
            .filter(|item| self.active_filter.matches(item.media_type))
            .collect()
    }

    #[must_use]
    pub fn results(&self) -> &[SearchItem] {
        &self.results
    }

    #[must_use]
    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    #[must_use]
    pub fn committed_query(&self) -> &str {
        &self.committed_query
    }

    #[must_use]
    pub const fn active_filter(&self) -> SearchFilter {
        self.active_filter
    }

    #[must_use]
    pub const fn phase(&self) -> SearchPhase {
        self.phase
    }

    #[must_use]
    pub const fn total_results(&self) -> u32 {
        self.total_results
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&SearchError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub const fn in_flight(&self) -> Option<&RequestKey> {
        self.in_flight.as_ref()
    }

    #[must_use]
    pub const fn is_debounce_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    #[must_use]
    pub const fn debounce_delay(&self) -> Duration {
        self.debouncer.delay()
    }
}

fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}
