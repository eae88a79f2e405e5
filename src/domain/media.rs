//! Catalog domain model: media types, favorites and search results.
//!
//! A [`FavoriteItem`] is keyed by `(id, media_type)`; the favorites store
//! guarantees at most one item per key. Search results are represented by
//! [`SearchItem`], the normalized shape of a TMDB multi-search hit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Person,
}

impl MediaType {
    /// Path segment / wire name used by the catalog API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Person => "person",
        }
    }

    /// Short label for table rows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Tv => "TV",
            Self::Person => "Person",
        }
    }

    /// Parses the wire name, returning `None` for anything unknown.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            "person" => Some(Self::Person),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique key of a favorite.
pub type FavoriteKey = (u64, MediaType);

/// A favorite as supplied to `FavoritesStore::add`, before it is stamped.
///
/// This is a [`FavoriteItem`] without `added_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: String,
    pub overview: String,
    pub vote_average: f64,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub genres: Option<Vec<String>>,
}

impl NewFavorite {
    /// Starts a favorite with the required fields; optional details default to absent.
    #[must_use]
    pub fn new(id: u64, media_type: MediaType, title: impl Into<String>) -> Self {
        Self {
            id,
            media_type,
            title: title.into(),
            poster_path: String::new(),
            overview: String::new(),
            vote_average: 0.0,
            release_date: None,
            first_air_date: None,
            runtime_minutes: None,
            genres: None,
        }
    }

    /// Sets runtime and genres, the fields that make a movie/tv favorite complete.
    #[must_use]
    pub fn with_details(mut self, runtime_minutes: u32, genres: Vec<String>) -> Self {
        self.runtime_minutes = Some(runtime_minutes);
        self.genres = Some(genres);
        self
    }

    /// Builds a favorite from a search hit, without runtime or genres.
    #[must_use]
    pub fn from_search_item(item: &SearchItem) -> Self {
        let (release_date, first_air_date) = match item.media_type {
            MediaType::Tv => (None, item.date.clone()),
            MediaType::Movie | MediaType::Person => (item.date.clone(), None),
        };
        Self {
            id: item.id,
            media_type: item.media_type,
            title: item.title.clone(),
            poster_path: item.poster_path.clone().unwrap_or_default(),
            overview: item.overview.clone(),
            vote_average: item.vote_average,
            release_date,
            first_air_date,
            runtime_minutes: None,
            genres: None,
        }
    }

    /// Stamps the favorite, producing the stored item.
    #[must_use]
    pub fn stamp(self, added_at: DateTime<Utc>) -> FavoriteItem {
        FavoriteItem {
            id: self.id,
            media_type: self.media_type,
            title: self.title,
            poster_path: self.poster_path,
            overview: self.overview,
            vote_average: self.vote_average,
            added_at,
            release_date: self.release_date,
            first_air_date: self.first_air_date,
            runtime_minutes: self.runtime_minutes,
            genres: self.genres,
        }
    }
}

/// A stored favorite.
///
/// Serialized with camelCase field names; this is the persisted format.
/// `added_at` is set once at insertion and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub poster_path: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: f64,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(
        default,
        rename = "runtime",
        alias = "runtimeMinutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub runtime_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

impl FavoriteItem {
    /// Unique key of this favorite.
    #[must_use]
    pub const fn key(&self) -> FavoriteKey {
        (self.id, self.media_type)
    }

    /// Movie and TV favorites need both runtime and genres; people are always complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        match self.media_type {
            MediaType::Person => true,
            MediaType::Movie | MediaType::Tv => {
                self.runtime_minutes.is_some() && self.genres.is_some()
            }
        }
    }

    /// Release or first-air year, if known.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(year_of)
    }
}

/// A normalized search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: String,
    pub vote_average: f64,
    /// Release date for movies, first-air date for TV.
    pub date: Option<String>,
    pub genre_ids: Vec<u32>,
    /// Department a person is known for.
    pub known_for_department: Option<String>,
}

impl SearchItem {
    /// Unique key, shared with favorites.
    #[must_use]
    pub const fn key(&self) -> FavoriteKey {
        (self.id, self.media_type)
    }

    /// Release or first-air year, if known.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.date.as_deref().and_then(year_of)
    }
}

/// Extracts `YYYY` from a `YYYY-MM-DD` date string.
fn year_of(date: &str) -> Option<&str> {
    date.get(..4).filter(|y| y.chars().all(|c| c.is_ascii_digit()))
}
