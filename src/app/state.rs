//! Application state management and view model computation.
//!
//! [`AppState`] is the single owner of every controller: favorites, search,
//! notifications and timers. The event handler mutates it; the renderer reads
//! a [`UIViewModel`](crate::ui::viewmodel::UIViewModel) computed from it.
//!
//! # Example
//!
//! ```rust
//! use marquee::app::AppState;
//! use marquee::ui::Theme;
//! use marquee::Config;
//!
//! let state = AppState::new(&Config::default(), Theme::default());
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert!(viewmodel.display_items.is_empty());
//! ```

use super::modes::{FavoritesFilter, InputMode, ViewMode};
use super::timers::TimerQueue;
use crate::api::{Details, TmdbClient};
use crate::domain::{FavoriteItem, FavoriteKey, MediaType, SearchItem};
use crate::favorites::FavoritesStore;
use crate::notify::NotificationBus;
use crate::search::{SearchController, SearchPhase, SettledOutcome};
use crate::storage::WorkerRelay;
use crate::ui::components::DETAILS_PANEL_HEIGHT;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DetailsInfo, DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, SearchStatusKind, ToastInfo,
    UIViewModel,
};
use crate::worker::WorkerMessage;
use crate::Config;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::{BTreeMap, HashSet};
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// Width of the TITLE column.
const TITLE_COLUMN_WIDTH: usize = 44;

/// State of the details panel.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsPanel {
    Closed,
    Loading {
        media_type: MediaType,
        id: u64,
        title: String,
    },
    Loaded(Box<Details>),
    Failed {
        title: String,
        message: String,
    },
}

impl DetailsPanel {
    /// Whether the panel is waiting for `(id, media_type)`.
    #[must_use]
    pub fn is_loading(&self, id: u64, media_type: MediaType) -> bool {
        matches!(self, Self::Loading { media_type: m, id: i, .. } if *m == media_type && *i == id)
    }

    /// Loaded details for `(id, media_type)`, if that is what the panel shows.
    #[must_use]
    pub fn loaded(&self, id: u64, media_type: MediaType) -> Option<&Details> {
        match self {
            Self::Loaded(details) if details.id == id && details.media_type == media_type => Some(details),
            _ => None,
        }
    }
}

/// The row under the cursor.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    Search(&'a SearchItem),
    Favorite(&'a FavoriteItem),
}

impl Selection<'_> {
    #[must_use]
    pub const fn key(&self) -> FavoriteKey {
        match self {
            Self::Search(item) => item.key(),
            Self::Favorite(item) => item.key(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Search(item) => &item.title,
            Self::Favorite(item) => &item.title,
        }
    }
}

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    /// Persisted favorites; writes travel to the worker through the relay.
    pub favorites: FavoritesStore,

    /// Debounced remote search.
    pub search: SearchController,

    /// Toasts and the pre-ready backlog.
    pub notifications: NotificationBus,

    /// Host timers awaiting their `Timer` event.
    pub timers: TimerQueue,

    /// Catalog request builder.
    pub client: TmdbClient,

    pub view_mode: ViewMode,
    pub input_mode: InputMode,

    /// Media type partition of the favorites view.
    pub favorites_filter: FavoritesFilter,

    /// Local fuzzy filter of the favorites view.
    pub favorites_query: String,

    /// Zero-based index into the rows of the current view.
    pub selected_index: usize,

    pub details: DetailsPanel,

    /// Favorites whose details fetch is in flight.
    pub pending_favorites: HashSet<FavoriteKey>,

    /// Genre names by id, for both movies and TV.
    pub genres: BTreeMap<u32, String>,

    pub theme: Theme,

    /// How long a toast stays visible.
    pub toast_duration: Duration,

    /// Set once the host granted permissions.
    pub permissions_granted: bool,

    /// Storage writes queued by the favorites store, drained into worker posts.
    relay_inbox: Receiver<WorkerMessage>,
}

impl AppState {
    /// Creates the application state.
    ///
    /// The favorites store starts unloaded; its persisted list is requested
    /// from the worker once permissions are granted.
    #[must_use]
    pub fn new(config: &Config, theme: Theme) -> Self {
        let (relay, relay_inbox) = WorkerRelay::new();
        Self {
            favorites: FavoritesStore::new(Box::new(relay)),
            search: SearchController::new(config.debounce()),
            notifications: NotificationBus::new(),
            timers: TimerQueue::new(),
            client: TmdbClient::from_config(config),
            view_mode: ViewMode::Search,
            input_mode: InputMode::Normal,
            favorites_filter: FavoritesFilter::All,
            favorites_query: String::new(),
            selected_index: 0,
            details: DetailsPanel::Closed,
            pending_favorites: HashSet::new(),
            genres: BTreeMap::new(),
            theme,
            toast_duration: config.toast_duration(),
            permissions_granted: false,
            relay_inbox,
        }
    }

    /// Storage writes queued since the last call.
    pub fn drain_storage_writes(&self) -> Vec<WorkerMessage> {
        self.relay_inbox.try_iter().collect()
    }

    /// Favorites visible in the favorites view, in store order.
    ///
    /// Every whitespace-separated token of the local query must fuzzy-match
    /// the title.
    #[must_use]
    pub fn visible_favorites(&self) -> Vec<&FavoriteItem> {
        use fuzzy_matcher::FuzzyMatcher;

        let tokens: Vec<String> = self.favorites_query.split_whitespace().map(str::to_lowercase).collect();
        let matcher = SkimMatcherV2::default();

        self.favorites
            .items()
            .iter()
            .filter(|item| self.favorites_filter.matches(item.media_type))
            .filter(|item| {
                let title = item.title.to_lowercase();
                tokens.iter().all(|token| matcher.fuzzy_match(&title, token).is_some())
            })
            .collect()
    }

    /// Number of rows in the current view.
    #[must_use]
    pub fn row_count(&self) -> usize {
        match self.view_mode {
            ViewMode::Search => self.search.visible_results().len(),
            ViewMode::Favorites => self.visible_favorites().len(),
        }
    }

    /// The row under the cursor, if any.
    #[must_use]
    pub fn selection(&self) -> Option<Selection<'_>> {
        match self.view_mode {
            ViewMode::Search => self
                .search
                .visible_results()
                .get(self.selected_index)
                .copied()
                .map(Selection::Search),
            ViewMode::Favorites => self
                .visible_favorites()
                .get(self.selected_index)
                .copied()
                .map(Selection::Favorite),
        }
    }

    /// Moves the cursor down one row, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Moves the cursor up one row, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            count - 1
        } else {
            self.selected_index - 1
        };
    }

    /// Keeps the cursor inside the current rows.
    pub fn clamp_selection(&mut self) {
        let count = self.row_count();
        self.selected_index = if count == 0 { 0 } else { self.selected_index.min(count - 1) };
    }

    /// Computes a renderable view model for a `rows` x `cols` pane.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let _span = tracing::trace_span!("compute_viewmodel", rows = rows, cols = cols).entered();

        let rows_available = self.calculate_available_rows(rows);
        let items = self.compute_display_items(rows_available, cols);
        let selected_index = items.1;

        UIViewModel {
            empty_state: if items.0.is_empty() { self.compute_empty_state() } else { None },
            display_items: items.0,
            selected_index,
            header: self.compute_header(),
            footer: self.compute_footer(),
            search_bar: Some(self.compute_search_bar()),
            details: self.compute_details(),
            toasts: self
                .notifications
                .toasts()
                .map(|toast| ToastInfo {
                    kind: toast.notification.kind,
                    title: toast.notification.title.clone(),
                    message: toast.notification.message.clone(),
                })
                .collect(),
        }
    }

    /// Rows of the visible window and the selected index within it.
    fn compute_display_items(&self, available_rows: usize, cols: usize) -> (Vec<DisplayItem>, usize) {
        let rows: Vec<(FavoriteKey, &str, Option<&str>, f64)> = match self.view_mode {
            ViewMode::Search => self
                .search
                .visible_results()
                .into_iter()
                .map(|item| (item.key(), item.title.as_str(), item.year(), item.vote_average))
                .collect(),
            ViewMode::Favorites => self
                .visible_favorites()
                .into_iter()
                .map(|item| (item.key(), item.title.as_str(), item.year(), item.vote_average))
                .collect(),
        };

        if rows.is_empty() || available_rows == 0 {
            return (vec![], 0);
        }

        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(rows.len());
        if visible_end - visible_start < available_rows && rows.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let pattern = match self.view_mode {
            ViewMode::Search => self.search.committed_query(),
            ViewMode::Favorites => self.favorites_query.as_str(),
        };
        let matcher = (!pattern.trim().is_empty()).then(SkimMatcherV2::default);
        let title_width = TITLE_COLUMN_WIDTH.min(cols.saturating_sub(24)).max(8);

        let items = rows[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(relative, &((id, media_type), title, year, vote))| {
                let title = truncate_chars(title, title_width);
                let highlight_ranges = matcher
                    .as_ref()
                    .map_or_else(Vec::new, |m| compute_highlight_ranges(&title, pattern, m));

                DisplayItem {
                    is_favorite: self.favorites.is_favorite(id, media_type),
                    title,
                    media_label: media_type.label().to_string(),
                    year: year.unwrap_or_default().to_string(),
                    rating: if media_type == MediaType::Person {
                        String::new()
                    } else {
                        format!("{vote:.1}")
                    },
                    is_selected: visible_start + relative == self.selected_index,
                    highlight_ranges,
                }
            })
            .collect();

        (items, self.selected_index.saturating_sub(visible_start))
    }

    fn compute_header(&self) -> HeaderInfo {
        let (view_name, count) = match self.view_mode {
            ViewMode::Search => ("Search", self.search.visible_results().len()),
            ViewMode::Favorites => ("Favorites", self.visible_favorites().len()),
        };
        let counts = self.favorites.counts();
        HeaderInfo {
            title: format!(" Marquee · {view_name} ({count}) "),
            summary: format!(
                "★ {}  movies {}  tv {}  people {} ",
                counts.total(),
                counts.movie,
                counts.tv,
                counts.person
            ),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.input_mode, self.view_mode) {
            (InputMode::Typing, ViewMode::Search) => {
                "Type to search  Enter: submit  Ctrl+u: clear  ESC: stop typing".to_string()
            }
            (InputMode::Typing, ViewMode::Favorites) => {
                "Type to filter  Enter: done  Ctrl+u: clear  ESC: stop typing".to_string()
            }
            (InputMode::Normal, ViewMode::Search) => {
                "j/k: navigate  /: search  Enter: details  f: favorite  t: filter  ]: more  v: favorites  q: quit"
                    .to_string()
            }
            (InputMode::Normal, ViewMode::Favorites) => {
                "j/k: navigate  /: filter  Enter: details  x: remove  C: clear  P: prune  t: type  s: search  q: quit"
                    .to_string()
            }
        };
        FooterInfo { keybindings }
    }

    fn compute_search_bar(&self) -> SearchBarInfo {
        let is_typing = self.input_mode == InputMode::Typing;
        match self.view_mode {
            ViewMode::Search => {
                let (status, status_kind) = self.search_status();
                SearchBarInfo {
                    label: "Search".to_string(),
                    query: self.search.raw_query().to_string(),
                    is_typing,
                    filters: crate::search::SearchFilter::ALL
                        .iter()
                        .map(|f| (f.label().to_string(), *f == self.search.active_filter()))
                        .collect(),
                    status,
                    status_kind,
                }
            }
            ViewMode::Favorites => SearchBarInfo {
                label: "Filter".to_string(),
                query: self.favorites_query.clone(),
                is_typing,
                filters: FavoritesFilter::ALL
                    .iter()
                    .map(|f| (f.label().to_string(), *f == self.favorites_filter))
                    .collect(),
                status: if self.favorites.is_initialized() {
                    String::new()
                } else {
                    "loading favorites…".to_string()
                },
                status_kind: SearchStatusKind::Idle,
            },
        }
    }

    fn search_status(&self) -> (String, SearchStatusKind) {
        match self.search.phase() {
            SearchPhase::Idle => (String::new(), SearchStatusKind::Idle),
            SearchPhase::Typing => ("real-time".to_string(), SearchStatusKind::RealTime),
            SearchPhase::Committed => (
                format!("searching \"{}\"…", self.search.committed_query()),
                SearchStatusKind::Searching,
            ),
            SearchPhase::Settled(SettledOutcome::Results) => {
                let mode = if self.search.is_real_time() { " · real-time" } else { "" };
                (
                    format!(
                        "{} results · page {}/{}{mode}",
                        self.search.total_results(),
                        self.search.current_page(),
                        self.search.total_pages().max(1)
                    ),
                    SearchStatusKind::Results,
                )
            }
            SearchPhase::Settled(SettledOutcome::Error) => (
                self.search
                    .last_error()
                    .map_or_else(|| "search failed".to_string(), crate::domain::SearchError::user_message),
                SearchStatusKind::Error,
            ),
        }
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        let (message, subtitle) = match self.view_mode {
            ViewMode::Search => match self.search.phase() {
                SearchPhase::Idle => ("Search TMDB", "Press / and type at least two characters"),
                SearchPhase::Typing | SearchPhase::Committed => ("Searching…", ""),
                SearchPhase::Settled(SettledOutcome::Results) => {
                    ("No results", "Try another query or change the filter with t")
                }
                SearchPhase::Settled(SettledOutcome::Error) => ("Search failed", "Press Enter in the search box to retry"),
            },
            ViewMode::Favorites if !self.favorites.is_initialized() => ("Loading favorites…", ""),
            ViewMode::Favorites if self.favorites.is_empty() => {
                ("No favorites yet", "Press f on a search result to add it")
            }
            ViewMode::Favorites => ("Nothing matches", "Change the filter with t or clear it with Ctrl+u"),
        };
        Some(EmptyState {
            message: message.to_string(),
            subtitle: subtitle.to_string(),
        })
    }

    fn compute_details(&self) -> Option<DetailsInfo> {
        match &self.details {
            DetailsPanel::Closed => None,
            DetailsPanel::Loading { title, .. } => Some(DetailsInfo {
                title: title.clone(),
                lines: vec!["Loading details…".to_string()],
            }),
            DetailsPanel::Failed { title, message } => Some(DetailsInfo {
                title: title.clone(),
                lines: vec![message.clone()],
            }),
            DetailsPanel::Loaded(details) => Some(DetailsInfo {
                title: details.title.clone(),
                lines: details_lines(details),
            }),
        }
    }

    /// Rows left for the table after header, search bar, table header,
    /// details panel and footer.
    fn calculate_available_rows(&self, total_rows: usize) -> usize {
        let chrome = 9;
        let details = if self.details == DetailsPanel::Closed { 0 } else { DETAILS_PANEL_HEIGHT };
        total_rows.saturating_sub(chrome + details)
    }
}

/// Formats the body of the details panel.
fn details_lines(details: &Details) -> Vec<String> {
    let mut lines = Vec::new();

    if details.media_type == MediaType::Person {
        if let Some(department) = &details.known_for_department {
            lines.push(format!("Known for: {department}"));
        }
        if let Some(birthday) = &details.date {
            lines.push(format!("Born: {birthday}"));
        }
    } else {
        let mut facts = vec![details.media_type.label().to_string()];
        if let Some(year) = details.year() {
            facts.push(year.to_string());
        }
        if let Some(runtime) = details.runtime_minutes.filter(|r| *r > 0) {
            facts.push(format!("{runtime} min"));
        }
        facts.push(format!("★ {:.1}", details.vote_average));
        lines.push(facts.join(" · "));
        if !details.genres.is_empty() {
            lines.push(details.genres.join(", "));
        }
        if let Some(tagline) = &details.tagline {
            lines.push(format!("\"{tagline}\""));
        }
    }

    if !details.overview.is_empty() {
        lines.push(details.overview.clone());
    }
    if !details.cast.is_empty() {
        let cast: Vec<String> = details
            .cast
            .iter()
            .map(|member| match &member.character {
                Some(character) => format!("{} ({character})", member.name),
                None => member.name.clone(),
            })
            .collect();
        lines.push(format!("Cast: {}", cast.join(", ")));
    }
    if !details.recommendations.is_empty() {
        let titles: Vec<&str> = details.recommendations.iter().map(|r| r.title.as_str()).collect();
        lines.push(format!("More like this: {}", titles.join(", ")));
    }
    lines
}

/// Truncates to `max` characters, marking the cut with an ellipsis.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Character ranges of `text` matched by `pattern`, coalesced into runs.
fn compute_highlight_ranges(text: &str, pattern: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, pattern.trim()) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}
