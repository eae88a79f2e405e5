//! Request builder for the TMDB v3 REST API.

use crate::api::request::{build_url, DetailsPurpose, HttpRequest, RequestKind};
use crate::domain::error::SearchError;
use crate::domain::MediaType;
use crate::search::{SearchFilter, SearchRequest};
use std::collections::BTreeMap;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Builds TMDB requests. Holds no connection state; the host executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmdbClient {
    base_url: String,
    api_key: Option<String>,
    language: String,
    include_adult: bool,
}

impl Default for TmdbClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None, "en-US", false)
    }
}

impl TmdbClient {
    /// Creates a client. A blank `api_key` counts as missing.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        language: impl Into<String>,
        include_adult: bool,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            language: language.into(),
            include_adult,
        }
    }

    /// Creates a client from plugin configuration.
    #[must_use]
    pub fn from_config(config: &crate::Config) -> Self {
        Self::new(
            config.api_base_url.clone(),
            config.api_key.clone(),
            config.language.clone(),
            config.include_adult,
        )
    }

    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Multi search (movies, TV and people) for the request's query and page.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Configuration`] when no API key is set; no
    /// request is built in that case.
    pub fn search_request(&self, request: &SearchRequest) -> Result<HttpRequest, SearchError> {
        self.search_request_typed(request, SearchFilter::All)
    }

    /// Search restricted to one media type (`search/movie`, `search/tv`),
    /// or multi search for [`SearchFilter::All`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Configuration`] when no API key is set.
    pub fn search_request_typed(
        &self,
        request: &SearchRequest,
        filter: SearchFilter,
    ) -> Result<HttpRequest, SearchError> {
        let path = match filter {
            SearchFilter::All => "search/multi",
            SearchFilter::Movie => "search/movie",
            SearchFilter::Tv => "search/tv",
        };
        let params = vec![
            ("query", request.key.query.clone()),
            ("page", request.key.page.max(1).to_string()),
            ("include_adult", self.include_adult.to_string()),
            ("language", self.language.clone()),
        ];

        let mut http = self.get(path, params, &RequestKind::Search(request.key.clone()))?;
        http.context.insert("type".to_string(), filter.as_str().to_string());
        Ok(http)
    }

    /// Details of one movie, show or person.
    ///
    /// Movie and TV details include credits and recommendations.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Configuration`] when no API key is set.
    pub fn details_request(
        &self,
        media_type: MediaType,
        id: u64,
        purpose: DetailsPurpose,
    ) -> Result<HttpRequest, SearchError> {
        let mut params = vec![("language", self.language.clone())];
        if media_type != MediaType::Person {
            params.push(("append_to_response", "credits,recommendations".to_string()));
        }
        let path = format!("{}/{id}", media_type.as_str());
        self.get(
            &path,
            params,
            &RequestKind::Details {
                media_type,
                id,
                purpose,
            },
        )
    }

    /// Official genre list for movies or TV.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Configuration`] when no API key is set and
    /// [`SearchError::Decode`] for people, which have no genre list.
    pub fn genres_request(&self, media_type: MediaType) -> Result<HttpRequest, SearchError> {
        if media_type == MediaType::Person {
            return Err(SearchError::Decode("people have no genre list".to_string()));
        }
        let path = format!("genre/{}/list", media_type.as_str());
        self.get(
            &path,
            vec![("language", self.language.clone())],
            &RequestKind::Genres(media_type),
        )
    }

    fn get(
        &self,
        path: &str,
        mut params: Vec<(&str, String)>,
        kind: &RequestKind,
    ) -> Result<HttpRequest, SearchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!(path = %path, "no API key, skipping request");
            return Err(SearchError::Configuration(
                "TMDB API key not configured".to_string(),
            ));
        };

        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        // v4 read access tokens are JWTs and go in a header; v3 keys go in the query.
        if api_key.starts_with("eyJ") {
            headers.insert("Authorization".to_string(), format!("Bearer {api_key}"));
        } else {
            params.insert(0, ("api_key", api_key.to_string()));
        }

        let url = build_url(&self.base_url, path, &params);
        tracing::debug!(path = %path, "built catalog request");

        Ok(HttpRequest {
            url,
            headers,
            context: kind.to_context(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::RequestKey;

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            key: RequestKey {
                query: query.to_string(),
                page: 1,
                seq: 7,
            },
        }
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let client = TmdbClient::new(DEFAULT_BASE_URL, Some("  ".to_string()), "en-US", false);
        assert!(!client.has_credentials());
        assert!(client.search_request(&request("alien")).unwrap_err().is_configuration());
    }

    #[test]
    fn search_uses_multi_endpoint_and_carries_key() {
        let client = TmdbClient::new("https://tmdb.test/3", Some("abc".to_string()), "en-US", false);
        let http = client.search_request(&request("the thing")).unwrap();

        assert_eq!(
            http.url,
            "https://tmdb.test/3/search/multi?api_key=abc&query=the+thing&page=1&include_adult=false&language=en-US"
        );
        assert_eq!(http.context.get("kind").map(String::as_str), Some("search"));
        assert_eq!(http.context.get("seq").map(String::as_str), Some("7"));
        assert_eq!(http.context.get("type").map(String::as_str), Some("all"));
    }

    #[test]
    fn bearer_tokens_go_in_header() {
        let client = TmdbClient::new("https://tmdb.test/3", Some("eyJhbGciOi".to_string()), "en-US", false);
        let http = client.details_request(MediaType::Movie, 550, DetailsPurpose::View).unwrap();

        assert!(!http.url.contains("api_key"));
        assert!(http.url.contains("/movie/550?"));
        assert!(http.url.contains("append_to_response=credits%2Crecommendations"));
        assert_eq!(
            http.headers.get("Authorization").map(String::as_str),
            Some("Bearer eyJhbGciOi")
        );
    }

    #[test]
    fn person_details_skip_appended_resources() {
        let client = TmdbClient::new("https://tmdb.test/3", Some("abc".to_string()), "en-US", false);
        let http = client.details_request(MediaType::Person, 287, DetailsPurpose::View).unwrap();
        assert!(!http.url.contains("append_to_response"));
        assert!(client.genres_request(MediaType::Person).is_err());
    }
}
