//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They carry
//! display-ready data only: formatted strings, selection flags and
//! highlight ranges.

use crate::notify::NotificationKind;

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    /// Rows of the results table within the visible window.
    pub display_items: Vec<DisplayItem>,

    /// Index of the selected row within `display_items`.
    pub selected_index: usize,

    pub header: HeaderInfo,
    pub footer: FooterInfo,

    /// Shown instead of the table when there is nothing to list.
    pub empty_state: Option<EmptyState>,

    /// Query box with filter tabs and status.
    pub search_bar: Option<SearchBarInfo>,

    /// Details panel, drawn below the table.
    pub details: Option<DetailsInfo>,

    /// Visible toasts, oldest first.
    pub toasts: Vec<ToastInfo>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    /// Whether the entry is in favorites (drawn as ★).
    pub is_favorite: bool,

    pub title: String,

    /// Media type label (Movie, TV, Person).
    pub media_label: String,

    /// Four-digit year or empty.
    pub year: String,

    /// Rating formatted to one decimal, or empty for people.
    pub rating: String,

    pub is_selected: bool,

    /// Character ranges of `title` to highlight, `(start, end)` exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Title text, including the row count.
    pub title: String,

    /// Right-aligned summary (favorite counts).
    pub summary: String,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text for the current mode.
    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Status line of the search bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatusKind {
    Idle,
    RealTime,
    Searching,
    Results,
    Error,
}

/// Query box display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Prompt label ("Search" or "Filter").
    pub label: String,

    pub query: String,

    /// Whether the cursor is in the box.
    pub is_typing: bool,

    /// Filter tab labels with their active flag.
    pub filters: Vec<(String, bool)>,

    pub status: String,
    pub status_kind: SearchStatusKind,
}

/// Details panel display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsInfo {
    pub title: String,

    /// Pre-formatted body lines.
    pub lines: Vec<String>,
}

/// One toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastInfo {
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
}
