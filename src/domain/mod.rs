//! Domain layer for the Marquee plugin.
//!
//! Core types shared by every other layer, independent of Zellij APIs and of
//! the catalog's wire format.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`media`]: Media types, favorites and normalized search hits
//!
//! # Examples
//!
//! ```
//! use marquee::domain::{MediaType, NewFavorite};
//!
//! let favorite = NewFavorite::new(550, MediaType::Movie, "Fight Club")
//!     .with_details(139, vec!["Drama".to_string()]);
//! assert_eq!(favorite.runtime_minutes, Some(139));
//! ```

pub mod error;
pub mod media;

pub use error::{MarqueeError, Result, SearchError};
pub use media::{FavoriteItem, FavoriteKey, MediaType, NewFavorite, SearchItem};
