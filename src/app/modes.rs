//! Input and view mode state types for the application.
//!
//! # State Machine
//!
//! The application operates in one of two input modes:
//! - **Normal**: Navigation and command keys
//! - **Typing**: Characters edit the query of the current view
//!
//! View modes choose what the table lists:
//! - **Search**: Remote search results
//! - **Favorites**: The saved favorites, filtered locally

use crate::domain::MediaType;

/// Current input handling mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation and command mode.
    ///
    /// Keybindings: j/k (navigate), / (type), enter (details), f/x (favorite),
    /// t (filter), s/v (views), q (quit).
    #[default]
    Normal,

    /// Typing into the query of the active view.
    Typing,
}

/// Which list the table shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Remote search results.
    #[default]
    Search,

    /// Saved favorites.
    Favorites,
}

/// Media type partition of the favorites view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FavoritesFilter {
    #[default]
    All,
    Movie,
    Tv,
    Person,
}

impl FavoritesFilter {
    /// Filters in tab order.
    pub const ALL: [Self; 4] = [Self::All, Self::Movie, Self::Tv, Self::Person];

    #[must_use]
    pub const fn matches(self, media_type: MediaType) -> bool {
        match self {
            Self::All => true,
            Self::Movie => matches!(media_type, MediaType::Movie),
            Self::Tv => matches!(media_type, MediaType::Tv),
            Self::Person => matches!(media_type, MediaType::Person),
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Movie,
            Self::Movie => Self::Tv,
            Self::Tv => Self::Person,
            Self::Person => Self::All,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Movie => "Movies",
            Self::Tv => "TV Shows",
            Self::Person => "People",
        }
    }
}
