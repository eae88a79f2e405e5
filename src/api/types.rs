//! TMDB wire payloads.
//!
//! Only the fields the plugin reads are declared; everything is optional or
//! defaulted because TMDB omits or nulls fields freely.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<RawSearchItem>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchItem {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub known_for_department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGenre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGenreList {
    #[serde(default)]
    pub genres: Vec<RawGenre>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCredits {
    #[serde(default)]
    pub cast: Vec<RawCastMember>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEpisode {
    #[serde(default)]
    pub runtime: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub last_episode_to_air: Option<RawEpisode>,
    #[serde(default)]
    pub genres: Vec<RawGenre>,
    #[serde(default)]
    pub credits: Option<RawCredits>,
    #[serde(default)]
    pub recommendations: Option<RawSearchPage>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
}

/// Error bodies: the proxy shape `{error}` or TMDB's `{status_code, status_message}`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub status_code: Option<u32>,
}
