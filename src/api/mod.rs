//! TMDB catalog access.
//!
//! The plugin cannot open sockets itself: the host executes HTTP requests
//! and delivers the result as an event. This module builds those requests
//! ([`TmdbClient`]) and turns the raw status and body back into typed values
//! or a classified [`SearchError`](crate::domain::SearchError).
//!
//! # Modules
//!
//! - `client`: Request construction and credential handling
//! - `request`: [`HttpRequest`], routing context and URL encoding
//! - `response`: Decoding and failure classification
//! - `types`: TMDB wire payloads

pub mod client;
pub mod request;
pub mod response;
mod types;

pub use client::{TmdbClient, DEFAULT_BASE_URL};
pub use request::{DetailsPurpose, HttpRequest, RequestKind};
pub use response::{
    classify_failure, parse_details_response, parse_genres_response, parse_search_response,
    parse_typed_search_response, CastMember, Details,
};
