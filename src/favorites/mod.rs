//! Favorites: the persisted list of movies, shows and people the user saved.
//!
//! [`FavoritesStore`] owns the authoritative in-memory list, mirrors it into
//! a [`KeyValueStore`](crate::storage::KeyValueStore) and reports every user
//! action through the [`NotificationBus`](crate::notify::NotificationBus).
//!
//! # Boot protocol
//!
//! The persisted list arrives asynchronously (from the worker thread), so the
//! store accepts mutations before it is loaded. They apply to the in-memory
//! list immediately; their notifications are queued and their persistence is
//! deferred until [`FavoritesStore::complete_load`] merges the persisted
//! items in, prunes incomplete entries and flushes the queue.
//!
//! # Examples
//!
//! ```
//! use marquee::domain::{MediaType, NewFavorite};
//! use marquee::favorites::FavoritesStore;
//! use marquee::notify::NotificationBus;
//! use marquee::storage::MemoryStore;
//!
//! let mut bus = NotificationBus::new();
//! let mut store = FavoritesStore::new(Box::new(MemoryStore::new()));
//! store.load(&mut bus);
//!
//! let fight_club = NewFavorite::new(550, MediaType::Movie, "Fight Club")
//!     .with_details(139, vec!["Drama".to_string()]);
//! store.add(fight_club.clone(), &mut bus)?;
//! store.add(fight_club, &mut bus)?;
//!
//! assert_eq!(store.len(), 1);
//! assert!(store.is_favorite(550, MediaType::Movie));
//! # Ok::<(), marquee::MarqueeError>(())
//! ```

pub mod store;

pub use store::{AddOutcome, FavoriteCounts, FavoritesStore, LoadReport};
