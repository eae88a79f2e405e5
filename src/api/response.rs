//! Response decoding and failure classification.
//!
//! Every parser first classifies the HTTP status. A 2xx body is decoded into
//! the normalized type; anything else goes through [`classify_failure`].

use crate::api::types::{RawDetails, RawErrorBody, RawGenreList, RawSearchItem, RawSearchPage};
use crate::domain::error::SearchError;
use crate::domain::{MediaType, NewFavorite, SearchItem};
use crate::search::{RequestKey, SearchResponse};
use serde::de::DeserializeOwned;

/// TMDB status code for an invalid API key.
const TMDB_INVALID_KEY: u32 = 7;

/// Number of cast members and recommendations kept for the details panel.
pub const DETAILS_LIST_LIMIT: usize = 5;

/// One credited actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
}

/// Normalized details of a movie, show or person.
#[derive(Debug, Clone, PartialEq)]
pub struct Details {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub overview: String,
    pub tagline: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: f64,
    /// Release or first-air date; birthday for people.
    pub date: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub cast: Vec<CastMember>,
    pub recommendations: Vec<SearchItem>,
    pub known_for_department: Option<String>,
}

impl Details {
    /// Builds a complete favorite from these details.
    ///
    /// Movies and shows always carry runtime and genres (runtime defaults to
    /// zero when unknown).
    #[must_use]
    pub fn to_favorite(&self) -> NewFavorite {
        let mut favorite = NewFavorite::new(self.id, self.media_type, self.title.clone());
        favorite.poster_path = self.poster_path.clone().unwrap_or_default();
        favorite.overview = self.overview.clone();
        favorite.vote_average = self.vote_average;

        match self.media_type {
            MediaType::Movie => {
                favorite.release_date = self.date.clone();
                favorite.with_details(self.runtime_minutes.unwrap_or(0), self.genres.clone())
            }
            MediaType::Tv => {
                favorite.first_air_date = self.date.clone();
                favorite.with_details(self.runtime_minutes.unwrap_or(0), self.genres.clone())
            }
            MediaType::Person => favorite,
        }
    }

    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.date.as_deref().and_then(|date| date.get(..4))
    }
}

/// Classifies a non-2xx response.
///
/// A structured body yields [`SearchError::Upstream`] with its message, or
/// [`SearchError::Configuration`] when the message or TMDB status code
/// points at the API key. Anything else is a [`SearchError::Transport`].
#[must_use]
pub fn classify_failure(status: u16, body: &[u8]) -> SearchError {
    let parsed = serde_json::from_slice::<RawErrorBody>(body).ok();
    let Some(parsed) = parsed.filter(|b| b.error.is_some() || b.status_message.is_some()) else {
        let detail = String::from_utf8_lossy(body);
        let detail = detail.trim();
        return if detail.is_empty() {
            SearchError::Transport(format!("HTTP {status} with empty body"))
        } else {
            SearchError::Transport(format!("HTTP {status}: {}", truncate(detail, 120)))
        };
    };

    let message = parsed
        .error
        .or(parsed.status_message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {status}"));

    if parsed.status_code == Some(TMDB_INVALID_KEY) || mentions_api_key_problem(&message) {
        SearchError::Configuration(message)
    } else {
        SearchError::Upstream { status, message }
    }
}

fn mentions_api_key_problem(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    (lower.contains("api key") || lower.contains("api_key"))
        && ["not configured", "missing", "invalid"]
            .iter()
            .any(|needle| lower.contains(needle))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}…", &text[..index]),
        None => text.to_string(),
    }
}

fn decode<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, SearchError> {
    if !(200..300).contains(&status) {
        return Err(classify_failure(status, body));
    }
    serde_json::from_slice(body).map_err(|e| SearchError::Decode(e.to_string()))
}

/// Parses a multi search response for `key`.
///
/// Hits of unknown media type are dropped.
///
/// # Errors
///
/// Returns the classified failure for non-2xx statuses and
/// [`SearchError::Decode`] for an unreadable success body.
pub fn parse_search_response(status: u16, body: &[u8], key: &RequestKey) -> Result<SearchResponse, SearchError> {
    parse_typed_search_response(status, body, key, None)
}

/// Parses a search response; `fallback` supplies the media type for typed
/// endpoints, whose hits do not name it.
///
/// # Errors
///
/// Same as [`parse_search_response`].
pub fn parse_typed_search_response(
    status: u16,
    body: &[u8],
    key: &RequestKey,
    fallback: Option<MediaType>,
) -> Result<SearchResponse, SearchError> {
    let page: RawSearchPage = decode(status, body)?;
    let results = normalize_items(page.results, fallback);

    Ok(SearchResponse {
        results,
        total_results: page.total_results,
        total_pages: page.total_pages,
        current_page: if page.page == 0 { key.page } else { page.page },
        query: key.query.clone(),
    })
}

fn normalize_items(items: Vec<RawSearchItem>, fallback: Option<MediaType>) -> Vec<SearchItem> {
    items
        .into_iter()
        .filter_map(|raw| {
            let media_type = raw.media_type.as_deref().map_or(fallback, MediaType::parse)?;
            let title = raw.title.or(raw.name).unwrap_or_default();
            let date = match media_type {
                MediaType::Movie => raw.release_date,
                MediaType::Tv => raw.first_air_date,
                MediaType::Person => None,
            }
            .filter(|d| !d.is_empty());

            Some(SearchItem {
                id: raw.id,
                media_type,
                title,
                poster_path: raw.poster_path.or(raw.profile_path),
                overview: raw.overview.unwrap_or_default(),
                vote_average: raw.vote_average.unwrap_or(0.0),
                date,
                genre_ids: raw.genre_ids,
                known_for_department: raw.known_for_department,
            })
        })
        .collect()
}

/// Parses a details response for `(media_type, id)`.
///
/// TV runtime is the first episode runtime, else the runtime of the last
/// aired episode, else zero.
///
/// # Errors
///
/// Returns the classified failure for non-2xx statuses and
/// [`SearchError::Decode`] for an unreadable success body.
pub fn parse_details_response(status: u16, body: &[u8], media_type: MediaType) -> Result<Details, SearchError> {
    let raw: RawDetails = decode(status, body)?;

    let runtime_minutes = match media_type {
        MediaType::Movie => raw.runtime,
        MediaType::Tv => Some(
            raw.episode_run_time
                .first()
                .copied()
                .or_else(|| raw.last_episode_to_air.as_ref().and_then(|e| e.runtime))
                .unwrap_or(0),
        ),
        MediaType::Person => None,
    };

    let date = match media_type {
        MediaType::Movie => raw.release_date,
        MediaType::Tv => raw.first_air_date,
        MediaType::Person => raw.birthday,
    }
    .filter(|d| !d.is_empty());

    let overview = match media_type {
        MediaType::Person => raw.biography,
        MediaType::Movie | MediaType::Tv => raw.overview,
    }
    .unwrap_or_default();

    let cast = raw
        .credits
        .unwrap_or_default()
        .cast
        .into_iter()
        .take(DETAILS_LIST_LIMIT)
        .map(|member| CastMember {
            name: member.name,
            character: member.character.filter(|c| !c.is_empty()),
        })
        .collect();

    let mut recommendations = raw
        .recommendations
        .map(|page| normalize_items(page.results, Some(media_type)))
        .unwrap_or_default();
    recommendations.truncate(DETAILS_LIST_LIMIT);

    Ok(Details {
        id: raw.id,
        media_type,
        title: raw.title.or(raw.name).unwrap_or_default(),
        overview,
        tagline: raw.tagline.filter(|t| !t.is_empty()),
        poster_path: raw.poster_path.or(raw.profile_path),
        vote_average: raw.vote_average.unwrap_or(0.0),
        date,
        runtime_minutes,
        genres: raw.genres.into_iter().map(|g| g.name).collect(),
        cast,
        recommendations,
        known_for_department: raw.known_for_department,
    })
}

/// Parses a genre list into `(id, name)` pairs.
///
/// # Errors
///
/// Returns the classified failure for non-2xx statuses and
/// [`SearchError::Decode`] for an unreadable success body.
pub fn parse_genres_response(status: u16, body: &[u8]) -> Result<Vec<(u32, String)>, SearchError> {
    let list: RawGenreList = decode(status, body)?;
    Ok(list.genres.into_iter().map(|g| (g.id, g.name)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> RequestKey {
        RequestKey {
            query: "matrix".to_string(),
            page: 1,
            seq: 1,
        }
    }

    #[test]
    fn multi_search_normalizes_titles_dates_and_types() {
        let body = br#"{
            "page": 1,
            "total_pages": 1,
            "total_results": 3,
            "results": [
                {"id": 603, "media_type": "movie", "title": "The Matrix", "release_date": "1999-03-30", "vote_average": 8.2, "genre_ids": [28, 878]},
                {"id": 1, "media_type": "tv", "name": "Matrix", "first_air_date": "1993-03-01"},
                {"id": 6384, "media_type": "person", "name": "Keanu Reeves", "profile_path": "/k.jpg", "known_for_department": "Acting"},
                {"id": 9, "media_type": "collection", "name": "Ignored"}
            ]
        }"#;

        let response = parse_search_response(200, body, &key()).unwrap();
        assert_eq!(response.total_results, 3);
        assert_eq!(response.results.len(), 3);
        assert_eq!(response.results[0].year(), Some("1999"));
        assert_eq!(response.results[1].title, "Matrix");
        assert_eq!(response.results[1].media_type, MediaType::Tv);
        assert_eq!(response.results[2].poster_path.as_deref(), Some("/k.jpg"));
        assert_eq!(response.query, "matrix");
    }

    #[test]
    fn proxy_style_missing_key_is_configuration() {
        let error = parse_search_response(503, br#"{"error":"TMDB API key not configured"}"#, &key()).unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn tmdb_status_code_seven_is_configuration() {
        let body = br#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;
        assert!(classify_failure(401, body).is_configuration());
    }

    #[test]
    fn structured_failure_passes_message_through() {
        let body = br#"{"status_code":34,"status_message":"The resource you requested could not be found."}"#;
        assert_eq!(
            classify_failure(404, body),
            SearchError::Upstream {
                status: 404,
                message: "The resource you requested could not be found.".to_string()
            }
        );
    }

    #[test]
    fn unstructured_failure_is_transport() {
        assert!(matches!(classify_failure(502, b"<html>Bad Gateway</html>"), SearchError::Transport(_)));
        assert!(matches!(classify_failure(0, b""), SearchError::Transport(_)));
    }

    #[test]
    fn garbage_success_body_is_decode_error() {
        assert!(matches!(parse_genres_response(200, b"nope"), Err(SearchError::Decode(_))));
    }

    #[test]
    fn tv_runtime_falls_back_to_last_episode_then_zero() {
        let with_last = br#"{"id": 1399, "name": "GoT", "episode_run_time": [], "last_episode_to_air": {"runtime": 80}, "genres": [{"id": 18, "name": "Drama"}]}"#;
        let details = parse_details_response(200, with_last, MediaType::Tv).unwrap();
        assert_eq!(details.runtime_minutes, Some(80));

        let bare = br#"{"id": 1399, "name": "GoT"}"#;
        let favorite = parse_details_response(200, bare, MediaType::Tv).unwrap().to_favorite();
        assert_eq!(favorite.runtime_minutes, Some(0));
        assert_eq!(favorite.genres, Some(vec![]));
    }

    #[test]
    fn movie_details_keep_top_cast_and_recommendations() {
        let body = br#"{
            "id": 550, "title": "Fight Club", "runtime": 139, "release_date": "1999-10-15",
            "genres": [{"id": 18, "name": "Drama"}],
            "credits": {"cast": [
                {"name": "A", "character": "1"}, {"name": "B"}, {"name": "C"},
                {"name": "D"}, {"name": "E"}, {"name": "F"}
            ]},
            "recommendations": {"results": [{"id": 807, "title": "Se7en"}]}
        }"#;
        let details = parse_details_response(200, body, MediaType::Movie).unwrap();

        assert_eq!(details.cast.len(), DETAILS_LIST_LIMIT);
        assert_eq!(details.recommendations[0].media_type, MediaType::Movie);
        let favorite = details.to_favorite();
        assert_eq!(favorite.runtime_minutes, Some(139));
        assert_eq!(favorite.release_date.as_deref(), Some("1999-10-15"));
    }
}
