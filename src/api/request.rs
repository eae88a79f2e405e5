//! Outgoing HTTP requests and the routing context they carry.
//!
//! The plugin runtime executes requests asynchronously and hands back the
//! context map untouched, so everything needed to route a response (and to
//! check it for staleness) travels inside the request as [`RequestKind`].

use crate::domain::MediaType;
use crate::search::RequestKey;
use std::collections::BTreeMap;
use url::form_urlencoded;

/// A GET request ready for the host to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub context: BTreeMap<String, String>,
}

/// Why a details fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsPurpose {
    /// Show the details panel.
    View,
    /// Enrich a favorite before adding it.
    Favorite,
}

impl DetailsPurpose {
    const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Favorite => "favorite",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "view" => Some(Self::View),
            "favorite" => Some(Self::Favorite),
            _ => None,
        }
    }
}

/// Routing information of a request, encoded into its context map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Search(RequestKey),
    Details {
        media_type: MediaType,
        id: u64,
        purpose: DetailsPurpose,
    },
    Genres(MediaType),
}

impl RequestKind {
    /// Encodes this kind as a string map.
    #[must_use]
    pub fn to_context(&self) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        match self {
            Self::Search(key) => {
                context.insert("kind".to_string(), "search".to_string());
                context.insert("query".to_string(), key.query.clone());
                context.insert("page".to_string(), key.page.to_string());
                context.insert("seq".to_string(), key.seq.to_string());
            }
            Self::Details { media_type, id, purpose } => {
                context.insert("kind".to_string(), "details".to_string());
                context.insert("media_type".to_string(), media_type.as_str().to_string());
                context.insert("id".to_string(), id.to_string());
                context.insert("purpose".to_string(), purpose.as_str().to_string());
            }
            Self::Genres(media_type) => {
                context.insert("kind".to_string(), "genres".to_string());
                context.insert("media_type".to_string(), media_type.as_str().to_string());
            }
        }
        context
    }

    /// Decodes a context map produced by [`to_context`](Self::to_context).
    ///
    /// Returns `None` for maps that did not originate here.
    #[must_use]
    pub fn from_context(context: &BTreeMap<String, String>) -> Option<Self> {
        let field = |name: &str| context.get(name).map(String::as_str);

        match field("kind")? {
            "search" => Some(Self::Search(RequestKey {
                query: field("query")?.to_string(),
                page: field("page")?.parse().ok()?,
                seq: field("seq")?.parse().ok()?,
            })),
            "details" => Some(Self::Details {
                media_type: MediaType::parse(field("media_type")?)?,
                id: field("id")?.parse().ok()?,
                purpose: DetailsPurpose::parse(field("purpose")?)?,
            }),
            "genres" => Some(Self::Genres(MediaType::parse(field("media_type")?)?)),
            _ => None,
        }
    }
}

/// Builds `base/path?k=v&...`, form-encoding the parameters.
#[must_use]
pub fn build_url(base: &str, path: &str, params: &[(&str, String)]) -> String {
    let mut url = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    if !params.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(name, value)| (*name, value.as_str())))
            .finish();
        url.push('?');
        url.push_str(&query);
    }
    url
}
